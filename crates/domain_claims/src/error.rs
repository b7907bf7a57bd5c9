//! Claims ledger errors
//!
//! Every rejection carries a stable code from the ledger's error taxonomy so
//! the host can surface it verbatim. A failed operation never leaves partial
//! state behind.

use thiserror::Error;

use core_kernel::{MoneyError, PortError, TemporalError};

/// Errors returned by ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Requested amount is above the policy's coverage limit
    #[error("Claim amount {requested} exceeds coverage limit {limit}")]
    InsufficientCoverage { requested: String, limit: String },

    /// Policy deactivated, or incident outside the coverage window
    #[error("Policy {0} is not active")]
    PolicyInactive(String),

    #[error("Claim {claim_id} is {status}, expected {expected}")]
    InvalidStatus {
        claim_id: String,
        status: String,
        expected: String,
    },

    #[error("Settlement amount invalid: {0}")]
    SettlementExceedsLimit(String),

    #[error("Claim {0} is closed")]
    ClaimClosed(String),

    #[error("Insufficient funds: need {required}, available {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("Claim {0} has already been paid")]
    AlreadyPaid(String),

    /// Malformed terms or input: ordering, sign, currency, length
    #[error("Invalid terms: {0}")]
    InvalidTerms(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{caller} is not authorized to {action}")]
    Unauthorized { caller: String, action: String },

    /// Persistence collaborator failure
    #[error("Storage error: {0}")]
    Storage(PortError),
}

impl LedgerError {
    /// Returns the taxonomy code for this error
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InsufficientCoverage { .. } => "ERR-INSUFFICIENT-COVERAGE",
            LedgerError::PolicyInactive(_) => "ERR-POLICY-INACTIVE",
            LedgerError::InvalidStatus { .. } => "ERR-INVALID-STATUS",
            LedgerError::SettlementExceedsLimit(_) => "ERR-SETTLEMENT-EXCEEDS-LIMIT",
            LedgerError::ClaimClosed(_) => "ERR-CLAIM-CLOSED",
            LedgerError::InsufficientFunds { .. } => "ERR-INSUFFICIENT-FUNDS",
            LedgerError::AlreadyPaid(_) => "ERR-ALREADY-PAID",
            LedgerError::InvalidTerms(_) => "ERR-INVALID-TERMS",
            LedgerError::NotFound { .. } => "ERR-NOT-FOUND",
            LedgerError::Unauthorized { .. } => "ERR-UNAUTHORIZED",
            LedgerError::Storage(_) => "ERR-STORAGE",
        }
    }

    pub fn invalid_terms(message: impl Into<String>) -> Self {
        LedgerError::InvalidTerms(message.into())
    }

    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn unauthorized(caller: impl std::fmt::Display, action: impl Into<String>) -> Self {
        LedgerError::Unauthorized {
            caller: caller.to_string(),
            action: action.into(),
        }
    }
}

impl From<PortError> for LedgerError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => LedgerError::NotFound {
                entity: entity_type,
                id,
            },
            other => LedgerError::Storage(other),
        }
    }
}

impl From<MoneyError> for LedgerError {
    fn from(error: MoneyError) -> Self {
        LedgerError::InvalidTerms(error.to_string())
    }
}

impl From<TemporalError> for LedgerError {
    fn from(error: TemporalError) -> Self {
        LedgerError::InvalidTerms(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    #[test]
    fn test_codes_match_taxonomy() {
        assert_eq!(
            LedgerError::AlreadyPaid("CLM-1".into()).code(),
            "ERR-ALREADY-PAID"
        );
        assert_eq!(
            LedgerError::not_found("Claim", "CLM-2").code(),
            "ERR-NOT-FOUND"
        );
        assert_eq!(
            LedgerError::unauthorized("mallory", "review claims").code(),
            "ERR-UNAUTHORIZED"
        );
    }

    #[test]
    fn test_port_not_found_maps_to_not_found() {
        let error: LedgerError = PortError::not_found("Policy", "POL-4").into();
        assert!(matches!(error, LedgerError::NotFound { .. }));
    }

    #[test]
    fn test_other_port_errors_map_to_storage() {
        let error: LedgerError = PortError::internal("disk full").into();
        assert_eq!(error.code(), "ERR-STORAGE");
    }

    #[test]
    fn test_money_error_maps_to_invalid_terms() {
        let error: LedgerError = MoneyError::CurrencyMismatch {
            found: Currency::EUR,
            expected: Currency::USD,
        }
        .into();
        assert_eq!(error.code(), "ERR-INVALID-TERMS");
    }
}
