use soroban_sdk::{contracttype, Address, BytesN};

/// A privately stored proof, kept until its issuer terminates it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProofRecord {
    pub issuer: Address,
    pub created_at: u64,
    pub timeout: Option<u64>,
}

/// Classification returned by `validate_proof`.
///
/// Terminated proofs keep their record so a verifier can still see who
/// issued them and when; hashes that were never stored come back `Invalid`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProofStatus {
    Invalid,
    Valid(ProofRecord),
    Expired(ProofRecord),
    Terminated(ProofRecord),
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    ValidCode,
    Cooldown,
    TrackVisitors,
    Active,
    LastVisitor,
    LastVisit,
    VisitCount(Address),
    Visitors,
    Proof(BytesN<32>),
    TerminatedProof(BytesN<32>),
}
