//! Store adapters for the claims ledger
//!
//! Hosts with their own persistence implement [`crate::ports::LedgerStore`]
//! directly. This module ships the in-memory adapter.
//!
//! # Available Adapters
//!
//! - **MemoryStore**: In-memory store with an event log, for tests and embedding

pub mod memory;

pub use memory::MemoryStore;
