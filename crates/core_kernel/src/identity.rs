//! Caller identity and call context
//!
//! The host environment authenticates callers; the ledger only ever compares
//! the identities it is handed. Nothing here parses or interprets an address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, verified identity (account address, user id, service name)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Principal {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Per-call facts supplied by the host: who is calling, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub now: DateTime<Utc>,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, now: DateTime<Utc>) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }

    /// Same caller, later clock
    pub fn at(&self, now: DateTime<Utc>) -> Self {
        Self {
            caller: self.caller.clone(),
            now,
        }
    }

    /// Same clock, different caller
    pub fn as_caller(&self, caller: impl Into<Principal>) -> Self {
        Self {
            caller: caller.into(),
            now: self.now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::from_unix_seconds;

    #[test]
    fn test_context_derivation() {
        let ctx = CallContext::new("admin", from_unix_seconds(0).unwrap());
        let later = ctx.at(from_unix_seconds(60).unwrap());
        let other = later.as_caller("claimant");

        assert_eq!(later.caller, Principal::new("admin"));
        assert_eq!(other.caller.as_str(), "claimant");
        assert_eq!(other.now, later.now);
    }
}
