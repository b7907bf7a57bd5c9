//! Supporting evidence attached to claims
//!
//! Only a digest of the artifact is recorded. Evidence is append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, EvidenceId, Principal};
use crate::error::LedgerError;

/// A reference to a supporting artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub claim_id: ClaimId,
    /// Free-form tag, e.g. "email-correspondence"
    pub evidence_type: String,
    /// Opaque digest of the artifact; never empty
    pub content_hash: String,
    pub submitted_by: Principal,
    pub attached_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        id: EvidenceId,
        claim_id: ClaimId,
        evidence_type: impl Into<String>,
        content_hash: impl Into<String>,
        submitted_by: Principal,
        attached_at: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        let evidence_type = evidence_type.into();
        let content_hash = content_hash.into();

        if evidence_type.trim().is_empty() {
            return Err(LedgerError::invalid_terms("evidence type must not be empty"));
        }
        if content_hash.trim().is_empty() {
            return Err(LedgerError::invalid_terms("content hash must not be empty"));
        }

        Ok(Self {
            id,
            claim_id,
            evidence_type,
            content_hash,
            submitted_by,
            attached_at,
        })
    }
}
