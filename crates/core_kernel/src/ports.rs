//! Persistence ports
//!
//! Domain services never own their storage. A domain crate declares a store
//! trait extending [`DomainPort`] and the host hands an implementation to
//! each call; the in-memory adapter used by tests is one such implementation.
//!
//! ```text
//!   ClaimsLedger ──calls──▶ LedgerStore (port)
//!                               ▲        ▲
//!                        MemoryStore   host store
//! ```

use std::fmt;
use thiserror::Error;

/// Failure reported by a store adapter
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    /// The batch contradicts state already committed
    #[error("Rejected write: {message}")]
    Conflict { message: String },

    #[error("Store {service} is unavailable")]
    ServiceUnavailable { service: String },

    #[error("Store failure: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Wraps an adapter's own error type
    pub fn from_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker for store traits; adapters must be shareable across threads
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_names_entity_and_id() {
        let error = PortError::not_found("Claim", "CLM-9");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Claim CLM-9 not found");
    }

    #[test]
    fn test_wrapped_source_is_preserved() {
        let io = std::io::Error::other("disk full");
        let error = PortError::from_source("writing claim batch", io);
        assert!(!error.is_not_found());
        assert_eq!(error.source().map(|s| s.to_string()), Some("disk full".to_string()));
    }
}
