use soroban_sdk::{Address, Env, Vec};

use crate::storage_types::DataKey;
use crate::Error;

pub const PAGE_SIZE: u32 = 10;

/// Record an accepted visit for `sender`.
///
/// Duplicate suppression is keyed on the single most-recent visitor only:
/// the same account is rejected until the cooldown has elapsed, while two
/// accounts alternating are each accepted every time.
pub fn record_visit(env: &Env, sender: &Address) -> Result<(), Error> {
    let cooldown: u64 = env
        .storage()
        .instance()
        .get(&DataKey::Cooldown)
        .ok_or(Error::NotInitialized)?;
    let now = env.ledger().timestamp();

    let last: Option<Address> = env.storage().instance().get(&DataKey::LastVisitor);
    if let Some(last) = last {
        if last == *sender {
            let last_visit: u64 = env
                .storage()
                .instance()
                .get(&DataKey::LastVisit)
                .unwrap_or(0);
            if now < last_visit.saturating_add(cooldown) {
                return Err(Error::DuplicateVisit);
            }
        }
    }

    let count_key = DataKey::VisitCount(sender.clone());
    let visits: u32 = env.storage().instance().get(&count_key).unwrap_or(0);
    if visits == 0 {
        let mut index = visitor_index(env);
        index.push_back(sender.clone());
        env.storage().instance().set(&DataKey::Visitors, &index);
    }
    env.storage().instance().set(&count_key, &(visits + 1));

    env.storage().instance().set(&DataKey::LastVisitor, sender);
    env.storage().instance().set(&DataKey::LastVisit, &now);

    Ok(())
}

pub fn has_visited(env: &Env, guest: &Address) -> bool {
    env.storage()
        .instance()
        .has(&DataKey::VisitCount(guest.clone()))
}

pub fn visit_count(env: &Env, guest: &Address) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::VisitCount(guest.clone()))
        .unwrap_or(0)
}

/// Page backward through the ledger in first-visit order: page 1 is the
/// most recent `PAGE_SIZE` entries, page 2 the most recent `2 * PAGE_SIZE`,
/// and so on. The start index saturates at zero, so an oversized page
/// returns the whole ledger.
pub fn list_page(env: &Env, page: u32) -> Vec<Address> {
    let index = visitor_index(env);
    let total = index.len();
    let start = total.saturating_sub(page.saturating_mul(PAGE_SIZE));
    index.slice(start..total)
}

/// Drop every visit record and forget the last visitor. The last visit
/// timestamp stays behind; it is only meaningful alongside a last visitor.
/// Returns the number of accounts that were tracked.
pub fn clear(env: &Env) -> u32 {
    let index = visitor_index(env);
    for guest in index.iter() {
        env.storage()
            .instance()
            .remove(&DataKey::VisitCount(guest));
    }
    let removed = index.len();
    env.storage()
        .instance()
        .set(&DataKey::Visitors, &Vec::<Address>::new(env));
    env.storage().instance().remove(&DataKey::LastVisitor);
    removed
}

fn visitor_index(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Visitors)
        .unwrap_or_else(|| Vec::new(env))
}
