//! Claims Ledger Ports
//!
//! The ledger reads through [`LedgerStore`] and writes through a single
//! [`WriteBatch`] per operation. Adapters must apply a batch atomically:
//! either every write in it becomes visible, or none does.
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_kernel::CallContext;
//! use domain_claims::{ClaimsLedger, LedgerConfig, MemoryStore};
//!
//! let ledger = ClaimsLedger::new(LedgerConfig::new("admin"));
//! let mut store = MemoryStore::new();
//! let ctx = CallContext::new("admin", now);
//! let policy_id = ledger.add_policy(&mut store, &ctx, holder, terms)?;
//! ```

use core_kernel::{ClaimId, DomainPort, EvidenceId, Money, PolicyId, PortError, Principal};

use crate::claim::Claim;
use crate::events::ClaimsEvent;
use crate::evidence::Evidence;
use crate::payment::Treasury;
use crate::policy::Policy;

/// Persistence collaborator for the claims ledger
///
/// Reads return `Ok(None)` for absent records; `Err` is reserved for
/// failures of the store itself.
pub trait LedgerStore: DomainPort {
    fn get_policy(&self, id: PolicyId) -> Result<Option<Policy>, PortError>;

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError>;

    fn get_evidence(
        &self,
        claim_id: ClaimId,
        evidence_id: EvidenceId,
    ) -> Result<Option<Evidence>, PortError>;

    /// All evidence for a claim, in attachment order
    fn list_evidence(&self, claim_id: ClaimId) -> Result<Vec<Evidence>, PortError>;

    /// Current treasury, or `None` before the first write
    fn treasury(&self) -> Result<Option<Treasury>, PortError>;

    /// Total paid out to `principal` so far
    fn credit_of(&self, principal: &Principal) -> Result<Option<Money>, PortError>;

    /// Highest policy id allocated so far
    fn last_policy_id(&self) -> Result<Option<PolicyId>, PortError>;

    /// Highest claim id allocated so far
    fn last_claim_id(&self) -> Result<Option<ClaimId>, PortError>;

    /// Applies every write in `batch`, or none of them
    fn commit(&mut self, batch: WriteBatch) -> Result<(), PortError>;
}

/// The complete set of writes produced by one ledger operation
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub policies: Vec<Policy>,
    pub claims: Vec<Claim>,
    pub evidence: Vec<Evidence>,
    pub treasury: Option<Treasury>,
    /// Replacement credit balances, keyed by principal
    pub credits: Vec<(Principal, Money)>,
    pub last_policy_id: Option<PolicyId>,
    pub last_claim_id: Option<ClaimId>,
    pub events: Vec<ClaimsEvent>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn put_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    pub fn put_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    pub fn put_treasury(mut self, treasury: Treasury) -> Self {
        self.treasury = Some(treasury);
        self
    }

    pub fn put_credit(mut self, principal: Principal, balance: Money) -> Self {
        self.credits.push((principal, balance));
        self
    }

    pub fn allocate_policy_id(mut self, id: PolicyId) -> Self {
        self.last_policy_id = Some(id);
        self
    }

    pub fn allocate_claim_id(mut self, id: ClaimId) -> Self {
        self.last_claim_id = Some(id);
        self
    }

    pub fn emit(mut self, event: ClaimsEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
            && self.claims.is_empty()
            && self.evidence.is_empty()
            && self.treasury.is_none()
            && self.credits.is_empty()
            && self.last_policy_id.is_none()
            && self.last_claim_id.is_none()
            && self.events.is_empty()
    }
}
