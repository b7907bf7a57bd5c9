//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, EvidenceId, Money, PolicyId, Principal};
use crate::error::LedgerError;

/// Claim status
///
/// ```text
/// Submitted -> Approved -> Paid
///           -> Denied
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Awaiting review
    Submitted,
    /// Approved for payment with a settlement amount
    Approved,
    /// Denied (terminal)
    Denied,
    /// Settlement disbursed (terminal)
    Paid,
}

impl ClaimStatus {
    /// Numeric status code used by host environments
    pub fn code(&self) -> u8 {
        match self {
            ClaimStatus::Submitted => 1,
            ClaimStatus::Approved => 3,
            ClaimStatus::Denied => 4,
            ClaimStatus::Paid => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ClaimStatus::Submitted),
            3 => Some(ClaimStatus::Approved),
            4 => Some(ClaimStatus::Denied),
            5 => Some(ClaimStatus::Paid),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Denied | ClaimStatus::Paid)
    }

    /// Evidence may be attached until the claim is closed
    pub fn accepts_evidence(&self) -> bool {
        matches!(self, ClaimStatus::Submitted | ClaimStatus::Approved)
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Submitted, Approved) | (Submitted, Denied) | (Approved, Paid)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Denied => "DENIED",
            ClaimStatus::Paid => "PAID",
        };
        f.write_str(name)
    }
}

/// Outcome of a claim review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    /// Approve, paying out `settlement` before the deductible
    Approve { settlement: Money },
    Deny,
}

/// A claim against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub policy_id: PolicyId,
    pub claimant: Principal,
    pub amount_requested: Money,
    pub description: String,
    pub incident_date: DateTime<Utc>,
    pub status: ClaimStatus,
    /// Set on approval only
    pub settlement_amount: Option<Money>,
    pub evidence: Vec<EvidenceId>,
    pub reviewed_by: Option<Principal>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a claim in the Submitted state
    pub fn submit(
        id: ClaimId,
        policy_id: PolicyId,
        claimant: Principal,
        amount_requested: Money,
        description: String,
        incident_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            policy_id,
            claimant,
            amount_requested,
            description,
            incident_date,
            status: ClaimStatus::Submitted,
            settlement_amount: None,
            evidence: Vec::new(),
            reviewed_by: None,
            reviewed_at: None,
            paid_at: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Fails with `ERR-INVALID-STATUS` unless the claim is in `expected`
    pub fn ensure_status(&self, expected: ClaimStatus) -> Result<(), LedgerError> {
        if self.status != expected {
            return Err(LedgerError::InvalidStatus {
                claim_id: self.id.to_string(),
                status: self.status.to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    fn transition_to(&mut self, target: ClaimStatus, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(target) {
            return Err(LedgerError::InvalidStatus {
                claim_id: self.id.to_string(),
                status: self.status.to_string(),
                expected: format!("a status that can move to {}", target),
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Applies a review decision; the settlement must already be validated
    pub fn apply_review(
        &mut self,
        decision: ReviewDecision,
        reviewer: Principal,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        match decision {
            ReviewDecision::Approve { settlement } => {
                self.transition_to(ClaimStatus::Approved, now)?;
                self.settlement_amount = Some(settlement);
            }
            ReviewDecision::Deny => self.transition_to(ClaimStatus::Denied, now)?,
        }
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(now);
        Ok(())
    }

    pub fn mark_paid(&mut self, now: DateTime<Utc>) -> Result<(), LedgerError> {
        self.transition_to(ClaimStatus::Paid, now)?;
        self.paid_at = Some(now);
        Ok(())
    }

    /// Next evidence id in this claim's sequence
    pub fn next_evidence_id(&self) -> EvidenceId {
        self.evidence
            .last()
            .map(|id| id.next())
            .unwrap_or(EvidenceId::FIRST)
    }

    pub fn attach_evidence(&mut self, evidence_id: EvidenceId, now: DateTime<Utc>) {
        self.evidence.push(evidence_id);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{from_unix_seconds, Currency};

    fn submitted_claim() -> Claim {
        let now = from_unix_seconds(2000).unwrap();
        Claim::submit(
            ClaimId::FIRST,
            PolicyId::FIRST,
            Principal::new("claimant"),
            Money::from_units(25000, Currency::USD),
            "Software bug caused data loss for client".to_string(),
            from_unix_seconds(1000).unwrap(),
            now,
        )
    }

    #[test]
    fn test_transition_table() {
        use ClaimStatus::*;
        let all = [Submitted, Approved, Denied, Paid];
        let allowed = [(Submitted, Approved), (Submitted, Denied), (Approved, Paid)];

        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            ClaimStatus::Submitted,
            ClaimStatus::Approved,
            ClaimStatus::Denied,
            ClaimStatus::Paid,
        ] {
            assert_eq!(ClaimStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ClaimStatus::Approved.code(), 3);
        assert_eq!(ClaimStatus::from_code(2), None);
    }

    #[test]
    fn test_approve_sets_settlement() {
        let mut claim = submitted_claim();
        let settlement = Money::from_units(20000, Currency::USD);
        let now = from_unix_seconds(3000).unwrap();

        claim
            .apply_review(ReviewDecision::Approve { settlement }, Principal::new("rev"), now)
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.settlement_amount, Some(settlement));
        assert_eq!(claim.reviewed_at, Some(now));
    }

    #[test]
    fn test_deny_leaves_settlement_unset() {
        let mut claim = submitted_claim();
        claim
            .apply_review(ReviewDecision::Deny, Principal::new("rev"), from_unix_seconds(3000).unwrap())
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Denied);
        assert!(claim.settlement_amount.is_none());
        assert!(claim.status.is_terminal());
    }

    #[test]
    fn test_cannot_pay_submitted_claim() {
        let mut claim = submitted_claim();
        let err = claim.mark_paid(from_unix_seconds(3000).unwrap()).unwrap_err();
        assert_eq!(err.code(), "ERR-INVALID-STATUS");
        assert_eq!(claim.status, ClaimStatus::Submitted);
    }

    #[test]
    fn test_evidence_ids_are_sequential() {
        let mut claim = submitted_claim();
        assert_eq!(claim.next_evidence_id(), EvidenceId::new(1));

        claim.attach_evidence(EvidenceId::new(1), from_unix_seconds(3000).unwrap());
        assert_eq!(claim.next_evidence_id(), EvidenceId::new(2));
    }
}
