//! Strongly-typed identifiers for ledger entities
//!
//! Identifiers are allocated from monotonically increasing sequences that
//! start at 1. Newtype wrappers keep a claim id from being passed where a
//! policy id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The first identifier in a sequence
            pub const FIRST: Self = Self(1);

            /// Creates from a raw sequence number
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw sequence number
            pub const fn value(&self) -> u64 {
                self.0
            }

            /// Returns the identifier that follows this one in its sequence
            pub fn next(&self) -> Self {
                Self(self.0.saturating_add(1))
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

define_id!(PolicyId, "POL");
define_id!(ClaimId, "CLM");
// Scoped to a single claim: (ClaimId, EvidenceId) is the unique key.
define_id!(EvidenceId, "EVD");
