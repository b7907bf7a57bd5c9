//! Domain events emitted by the claims ledger
//!
//! Each committed operation appends one event to the store alongside its
//! state changes. The events form the ledger's audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, EvidenceId, Money, PolicyId, Principal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimsEvent {
    PolicyAdded {
        policy_id: PolicyId,
        holder: Principal,
        coverage_limit: Money,
        deductible: Money,
        expiry: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    ReviewerAssigned {
        policy_id: PolicyId,
        reviewer: Principal,
        timestamp: DateTime<Utc>,
    },

    PolicyDeactivated {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },

    PremiumPaid {
        policy_id: PolicyId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    PoolFunded {
        contributor: Principal,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    ClaimSubmitted {
        claim_id: ClaimId,
        policy_id: PolicyId,
        claimant: Principal,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    ClaimApproved {
        claim_id: ClaimId,
        reviewer: Principal,
        settlement_amount: Money,
        timestamp: DateTime<Utc>,
    },

    ClaimDenied {
        claim_id: ClaimId,
        reviewer: Principal,
        timestamp: DateTime<Utc>,
    },

    EvidenceAdded {
        claim_id: ClaimId,
        evidence_id: EvidenceId,
        evidence_type: String,
        timestamp: DateTime<Utc>,
    },

    ClaimPaid {
        claim_id: ClaimId,
        claimant: Principal,
        net_payment: Money,
        timestamp: DateTime<Utc>,
    },
}

impl ClaimsEvent {
    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ClaimsEvent::PolicyAdded { .. } => "PolicyAdded",
            ClaimsEvent::ReviewerAssigned { .. } => "ReviewerAssigned",
            ClaimsEvent::PolicyDeactivated { .. } => "PolicyDeactivated",
            ClaimsEvent::PremiumPaid { .. } => "PremiumPaid",
            ClaimsEvent::PoolFunded { .. } => "PoolFunded",
            ClaimsEvent::ClaimSubmitted { .. } => "ClaimSubmitted",
            ClaimsEvent::ClaimApproved { .. } => "ClaimApproved",
            ClaimsEvent::ClaimDenied { .. } => "ClaimDenied",
            ClaimsEvent::EvidenceAdded { .. } => "EvidenceAdded",
            ClaimsEvent::ClaimPaid { .. } => "ClaimPaid",
        }
    }

    /// Returns the claim this event concerns, if any
    pub fn claim_id(&self) -> Option<ClaimId> {
        match self {
            ClaimsEvent::ClaimSubmitted { claim_id, .. }
            | ClaimsEvent::ClaimApproved { claim_id, .. }
            | ClaimsEvent::ClaimDenied { claim_id, .. }
            | ClaimsEvent::EvidenceAdded { claim_id, .. }
            | ClaimsEvent::ClaimPaid { claim_id, .. } => Some(*claim_id),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ClaimsEvent::PolicyAdded { timestamp, .. }
            | ClaimsEvent::ReviewerAssigned { timestamp, .. }
            | ClaimsEvent::PolicyDeactivated { timestamp, .. }
            | ClaimsEvent::PremiumPaid { timestamp, .. }
            | ClaimsEvent::PoolFunded { timestamp, .. }
            | ClaimsEvent::ClaimSubmitted { timestamp, .. }
            | ClaimsEvent::ClaimApproved { timestamp, .. }
            | ClaimsEvent::ClaimDenied { timestamp, .. }
            | ClaimsEvent::EvidenceAdded { timestamp, .. }
            | ClaimsEvent::ClaimPaid { timestamp, .. } => *timestamp,
        }
    }
}
