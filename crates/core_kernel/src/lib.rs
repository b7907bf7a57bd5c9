//! Core Kernel - Foundational types for the claims ledger
//!
//! This crate provides the building blocks shared by the domain crates:
//! - Money types with precise decimal arithmetic
//! - Sequence identifiers and opaque caller identities
//! - Coverage time windows
//! - Port abstractions for host-supplied persistence

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod identity;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{ValidPeriod, TemporalError, from_unix_seconds};
pub use identifiers::{PolicyId, ClaimId, EvidenceId};
pub use identity::{Principal, CallContext};
pub use ports::{PortError, DomainPort};
