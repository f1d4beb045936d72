#![no_std]
use soroban_sdk::{
    contract, contractimpl, contracterror, symbol_short, Address, BytesN, Env, String, Vec,
};

mod code;
mod proofs;
mod storage_types;
mod visitor;

use storage_types::{DataKey, ProofStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    ContractInactive = 4,
    InvalidCodeFormat = 5,
    StaleCode = 6,
    DuplicateVisit = 7,
    TrackingDisabled = 8,
    InvalidCooldown = 9,
    ProofAlreadyStored = 10,
    ProofNotFound = 11,
}

// Cooldown must stay within (0, 5 minutes], measured in seconds.
const MAX_COOLDOWN_SECONDS: u64 = 5 * 60;

#[contract]
pub struct PresenceContract;

#[contractimpl]
impl PresenceContract {
    /// Initialize the contract with an owner. Only can be called once.
    ///
    /// # Arguments
    /// * `owner` - Account with exclusive rights over configuration and
    ///   visitor data
    /// * `cooldown_seconds` - Seconds before a repeat visit by the same
    ///   account counts again; must be in (0, 300]
    /// * `track_visitors` - Whether confirmed visits are recorded
    ///
    /// The first valid code is issued immediately.
    pub fn initialize(
        env: Env,
        owner: Address,
        cooldown_seconds: u64,
        track_visitors: bool,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        check_cooldown(cooldown_seconds)?;

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage()
            .instance()
            .set(&DataKey::Cooldown, &cooldown_seconds);
        env.storage()
            .instance()
            .set(&DataKey::TrackVisitors, &track_visitors);
        env.storage().instance().set(&DataKey::Active, &true);
        env.storage()
            .instance()
            .set(&DataKey::ValidCode, &code::generate(&env));

        Ok(())
    }

    /// An inactive contract does not handle code confirmations.
    pub fn get_active(env: Env) -> Result<bool, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Active)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_owner(env: Env) -> Result<Address, Error> {
        read_owner(&env)
    }

    /// There can only be one valid code at a time.
    pub fn get_code(env: Env) -> Result<String, Error> {
        env.storage()
            .instance()
            .get(&DataKey::ValidCode)
            .ok_or(Error::NotInitialized)
    }

    /// The most recent accepted visitor, or `None` before the first visit
    /// and after the owner clears visitor records. Owner only.
    pub fn get_last_visitor(env: Env, caller: Address) -> Result<Option<Address>, Error> {
        require_owner(&env, &caller)?;
        Ok(env.storage().instance().get(&DataKey::LastVisitor))
    }

    /// Confirm a presence code.
    ///
    /// The code must be well formed, issued by this deployment in a prior
    /// ledger, and equal to the one currently valid. When visitor tracking
    /// is on, the visit is recorded and immediate duplicates are rejected
    /// until the cooldown elapses. On success the code is consumed and a
    /// new one issued; on any failure no state changes.
    pub fn confirm_code(env: Env, visitor: Address, code: String) -> Result<bool, Error> {
        visitor.require_auth();

        if !Self::get_active(env.clone())? {
            return Err(Error::ContractInactive);
        }

        code::check_format(&env, &code)?;
        let current: String = env
            .storage()
            .instance()
            .get(&DataKey::ValidCode)
            .ok_or(Error::NotInitialized)?;
        if code != current {
            return Err(Error::StaleCode);
        }

        let tracking: bool = env
            .storage()
            .instance()
            .get(&DataKey::TrackVisitors)
            .unwrap_or(false);
        if tracking {
            visitor::record_visit(&env, &visitor)?;
        }

        env.storage()
            .instance()
            .set(&DataKey::ValidCode, &code::generate(&env));

        env.events().publish(
            (symbol_short!("confirm"), visitor),
            env.ledger().timestamp(),
        );
        Ok(true)
    }

    /// Whether `guest` has a recorded visit. Owner only; fails when the
    /// contract is not configured to track visitors.
    pub fn get_has_visited(env: Env, caller: Address, guest: Address) -> Result<bool, Error> {
        require_owner(&env, &caller)?;
        let tracking: bool = env
            .storage()
            .instance()
            .get(&DataKey::TrackVisitors)
            .unwrap_or(false);
        if !tracking {
            return Err(Error::TrackingDisabled);
        }
        Ok(visitor::has_visited(&env, &guest))
    }

    /// Visitors in first-visit order, paged backward from the most recent
    /// entries with a fixed page size of 10. Owner only.
    pub fn get_visitors(env: Env, caller: Address, page: u32) -> Result<Vec<Address>, Error> {
        require_owner(&env, &caller)?;
        Ok(visitor::list_page(&env, page))
    }

    /// Number of recorded visits for `guest`, 0 if none. Owner only.
    pub fn get_visit_count(env: Env, caller: Address, guest: Address) -> Result<u32, Error> {
        require_owner(&env, &caller)?;
        Ok(visitor::visit_count(&env, &guest))
    }

    /// Clear all visitor data. Useful as storage grows large. Owner only.
    pub fn clear_visitor_records(env: Env, caller: Address) -> Result<bool, Error> {
        require_owner(&env, &caller)?;
        let removed = visitor::clear(&env);
        env.events()
            .publish((symbol_short!("cleared"), caller), removed);
        Ok(true)
    }

    /// Toggle the active state and return the new value. Owner only.
    pub fn toggle_active(env: Env, caller: Address) -> Result<bool, Error> {
        require_owner(&env, &caller)?;
        let active = !Self::get_active(env.clone())?;
        env.storage().instance().set(&DataKey::Active, &active);
        env.events().publish((symbol_short!("active"),), active);
        Ok(active)
    }

    /// Replace the visitor cooldown; must be in (0, 300] seconds. Owner
    /// only. Returns the active flag.
    pub fn set_cooldown(env: Env, caller: Address, seconds: u64) -> Result<bool, Error> {
        require_owner(&env, &caller)?;
        check_cooldown(seconds)?;
        env.storage().instance().set(&DataKey::Cooldown, &seconds);
        env.events()
            .publish((symbol_short!("cooldown"),), seconds);
        Self::get_active(env)
    }

    /// Store a privately held proof under its hash.
    ///
    /// # Arguments
    /// * `issuer` - Account storing the proof; must authorize and is the
    ///   only one allowed to terminate it later
    /// * `hash` - Digest of the off-chain proof value
    /// * `timeout_seconds` - Optional lifetime after which validation
    ///   reports the proof expired
    ///
    /// Returns the creation timestamp.
    pub fn store_proof(
        env: Env,
        issuer: Address,
        hash: BytesN<32>,
        timeout_seconds: Option<u64>,
    ) -> Result<u64, Error> {
        issuer.require_auth();
        let created_at = proofs::store(&env, &issuer, &hash, timeout_seconds)?;
        env.events()
            .publish((symbol_short!("stored"), issuer), hash);
        Ok(created_at)
    }

    /// Terminate a stored proof. Only the proof's issuer may do this; the
    /// record stays behind so validation reports it as terminated rather
    /// than unknown.
    pub fn terminate_proof(env: Env, caller: Address, hash: BytesN<32>) -> Result<(), Error> {
        caller.require_auth();
        proofs::terminate(&env, &caller, &hash)?;
        env.events()
            .publish((symbol_short!("terminate"), caller), hash);
        Ok(())
    }

    /// Classify a proof hash as valid, expired, terminated, or invalid.
    pub fn validate_proof(env: Env, hash: BytesN<32>) -> ProofStatus {
        proofs::status(&env, &hash)
    }
}

fn read_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

// Single guard for every owner-gated operation: the caller must authorize
// and must be the stored owner.
fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != read_owner(env)? {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

fn check_cooldown(seconds: u64) -> Result<(), Error> {
    if seconds == 0 || seconds > MAX_COOLDOWN_SECONDS {
        return Err(Error::InvalidCooldown);
    }
    Ok(())
}
