//! In-memory ledger store
//!
//! Suitable for tests and for hosts that snapshot state themselves. The
//! store also keeps every committed [`ClaimsEvent`] in order.

use std::collections::BTreeMap;

use core_kernel::{ClaimId, DomainPort, EvidenceId, Money, PolicyId, PortError, Principal};

use crate::claim::Claim;
use crate::events::ClaimsEvent;
use crate::evidence::Evidence;
use crate::payment::Treasury;
use crate::policy::Policy;
use crate::ports::{LedgerStore, WriteBatch};

#[derive(Debug, Default)]
pub struct MemoryStore {
    policies: BTreeMap<PolicyId, Policy>,
    claims: BTreeMap<ClaimId, Claim>,
    evidence: BTreeMap<(ClaimId, EvidenceId), Evidence>,
    treasury: Option<Treasury>,
    credits: BTreeMap<Principal, Money>,
    last_policy_id: Option<PolicyId>,
    last_claim_id: Option<ClaimId>,
    events: Vec<ClaimsEvent>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events committed so far, oldest first
    pub fn events(&self) -> &[ClaimsEvent] {
        &self.events
    }

    /// Makes every subsequent commit fail with `ServiceUnavailable`
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Rejects batches that would break store invariants, before any write
    fn check(&self, batch: &WriteBatch) -> Result<(), PortError> {
        if let (Some(current), Some(next)) = (self.last_policy_id, batch.last_policy_id) {
            if next <= current {
                return Err(PortError::conflict(format!(
                    "policy sequence would move from {} to {}",
                    current, next
                )));
            }
        }
        if let (Some(current), Some(next)) = (self.last_claim_id, batch.last_claim_id) {
            if next <= current {
                return Err(PortError::conflict(format!(
                    "claim sequence would move from {} to {}",
                    current, next
                )));
            }
        }
        for evidence in &batch.evidence {
            if self.evidence.contains_key(&(evidence.claim_id, evidence.id)) {
                return Err(PortError::conflict(format!(
                    "evidence {} already attached to {}",
                    evidence.id, evidence.claim_id
                )));
            }
            let claim_known = self.claims.contains_key(&evidence.claim_id)
                || batch.claims.iter().any(|c| c.id == evidence.claim_id);
            if !claim_known {
                return Err(PortError::not_found("Claim", evidence.claim_id));
            }
        }
        Ok(())
    }
}

impl DomainPort for MemoryStore {}

impl LedgerStore for MemoryStore {
    fn get_policy(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        Ok(self.policies.get(&id).cloned())
    }

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
        Ok(self.claims.get(&id).cloned())
    }

    fn get_evidence(
        &self,
        claim_id: ClaimId,
        evidence_id: EvidenceId,
    ) -> Result<Option<Evidence>, PortError> {
        Ok(self.evidence.get(&(claim_id, evidence_id)).cloned())
    }

    fn list_evidence(&self, claim_id: ClaimId) -> Result<Vec<Evidence>, PortError> {
        Ok(self
            .evidence
            .range((claim_id, EvidenceId::new(0))..=(claim_id, EvidenceId::new(u64::MAX)))
            .map(|(_, evidence)| evidence.clone())
            .collect())
    }

    fn treasury(&self) -> Result<Option<Treasury>, PortError> {
        Ok(self.treasury.clone())
    }

    fn credit_of(&self, principal: &Principal) -> Result<Option<Money>, PortError> {
        Ok(self.credits.get(principal).copied())
    }

    fn last_policy_id(&self) -> Result<Option<PolicyId>, PortError> {
        Ok(self.last_policy_id)
    }

    fn last_claim_id(&self) -> Result<Option<ClaimId>, PortError> {
        Ok(self.last_claim_id)
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), PortError> {
        if self.unavailable {
            return Err(PortError::unavailable("memory-store"));
        }
        if batch.is_empty() {
            return Ok(());
        }
        self.check(&batch)?;

        for policy in batch.policies {
            self.policies.insert(policy.id, policy);
        }
        for claim in batch.claims {
            self.claims.insert(claim.id, claim);
        }
        for evidence in batch.evidence {
            self.evidence.insert((evidence.claim_id, evidence.id), evidence);
        }
        if let Some(treasury) = batch.treasury {
            self.treasury = Some(treasury);
        }
        for (principal, balance) in batch.credits {
            self.credits.insert(principal, balance);
        }
        if let Some(id) = batch.last_policy_id {
            self.last_policy_id = Some(id);
        }
        if let Some(id) = batch.last_claim_id {
            self.last_claim_id = Some(id);
        }
        self.events.extend(batch.events);

        Ok(())
    }
}
