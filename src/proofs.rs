use soroban_sdk::{Address, BytesN, Env};

use crate::storage_types::{DataKey, ProofRecord, ProofStatus};
use crate::Error;

pub fn store(
    env: &Env,
    issuer: &Address,
    hash: &BytesN<32>,
    timeout: Option<u64>,
) -> Result<u64, Error> {
    let key = DataKey::Proof(hash.clone());
    if env.storage().instance().has(&key) {
        return Err(Error::ProofAlreadyStored);
    }

    let created_at = env.ledger().timestamp();
    let record = ProofRecord {
        issuer: issuer.clone(),
        created_at,
        timeout,
    };
    env.storage().instance().set(&key, &record);

    Ok(created_at)
}

/// Move a proof from the active map to the terminated map. Only the
/// issuer may terminate; the record is retained for later validation.
pub fn terminate(env: &Env, caller: &Address, hash: &BytesN<32>) -> Result<(), Error> {
    let key = DataKey::Proof(hash.clone());
    let record: ProofRecord = env
        .storage()
        .instance()
        .get(&key)
        .ok_or(Error::ProofNotFound)?;
    if record.issuer != *caller {
        return Err(Error::Unauthorized);
    }

    env.storage().instance().remove(&key);
    env.storage()
        .instance()
        .set(&DataKey::TerminatedProof(hash.clone()), &record);

    Ok(())
}

/// Classify a hash without mutating state. A proof with a timeout counts
/// as expired once `created_at + timeout` lies strictly in the past.
pub fn status(env: &Env, hash: &BytesN<32>) -> ProofStatus {
    let active: Option<ProofRecord> = env
        .storage()
        .instance()
        .get(&DataKey::Proof(hash.clone()));
    if let Some(record) = active {
        if let Some(timeout) = record.timeout {
            if record.created_at.saturating_add(timeout) < env.ledger().timestamp() {
                return ProofStatus::Expired(record);
            }
        }
        return ProofStatus::Valid(record);
    }

    match env
        .storage()
        .instance()
        .get(&DataKey::TerminatedProof(hash.clone()))
    {
        Some(record) => ProofStatus::Terminated(record),
        None => ProofStatus::Invalid,
    }
}
