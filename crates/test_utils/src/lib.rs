//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built identities, amounts, times and policy terms
//! - `builders`: A ready-to-use ledger harness with sensible defaults
//! - `assertions`: Assertion helpers for ledger results and store state
//! - `generators`: Property-based test data generators
//! - `telemetry`: One-time tracing setup for tests

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod telemetry;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use telemetry::init_test_tracing;
