//! Claims Settlement Ledger
//!
//! This crate implements an insurance claims ledger: policies with coverage
//! limits and deductibles, claims raised against them, reviewer decisions,
//! evidence attachment, and settlement payment from a funded treasury.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Approved -> Paid
//!           -> Denied
//! ```
//!
//! The host environment owns the store and the caller identity; see
//! [`ledger::ClaimsLedger`] for the operations and [`ports::LedgerStore`]
//! for the persistence contract.

pub mod adapters;
pub mod claim;
pub mod config;
pub mod error;
pub mod events;
pub mod evidence;
pub mod ledger;
pub mod payment;
pub mod policy;
pub mod ports;

pub use adapters::MemoryStore;
pub use claim::{Claim, ClaimStatus, ReviewDecision};
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use events::ClaimsEvent;
pub use evidence::Evidence;
pub use ledger::ClaimsLedger;
pub use payment::{net_payment, Processability, Treasury};
pub use policy::{Policy, PolicyTerms};
pub use ports::{LedgerStore, WriteBatch};
