//! Custom Test Assertions
//!
//! Assertion helpers that report ledger failures by taxonomy code and
//! compare store state before and after a rejected call.

use core_kernel::{Money, Principal};
use domain_claims::{ClaimsLedger, LedgerError, MemoryStore, Treasury};
use rust_decimal::Decimal;

/// Asserts that `result` failed with the given taxonomy code
///
/// # Panics
///
/// Panics if the result is `Ok` or carries a different code
pub fn assert_ledger_error<T: std::fmt::Debug>(result: Result<T, LedgerError>, code: &str) {
    match result {
        Ok(value) => panic!("Expected {}, got Ok({:?})", code, value),
        Err(error) => assert_eq!(
            error.code(),
            code,
            "Expected {}, got {} ({})",
            code,
            error.code(),
            error
        ),
    }
}

/// Asserts that a Money value equals a whole number of units
pub fn assert_money_units(money: &Money, units: i64) {
    assert_eq!(
        money.amount(),
        Decimal::from(units),
        "Expected {} units, got {}",
        units,
        money
    );
}

/// Everything a rejected operation must leave untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub event_count: usize,
    pub claim_count: u64,
    pub treasury: Treasury,
    pub claimant_credit: Money,
}

impl StoreSnapshot {
    /// Captures the observable state of `store`
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be read
    pub fn capture(ledger: &ClaimsLedger, store: &MemoryStore, claimant: &Principal) -> Self {
        Self {
            event_count: store.events().len(),
            claim_count: ledger.claim_count(store).expect("claim count readable"),
            treasury: ledger.treasury(store).expect("treasury readable"),
            claimant_credit: ledger
                .claimant_credit(store, claimant)
                .expect("credit readable"),
        }
    }
}

/// Asserts that no observable state changed between two snapshots
pub fn assert_store_unchanged(before: &StoreSnapshot, after: &StoreSnapshot) {
    assert_eq!(before, after, "Store changed after a rejected operation");
}

/// Asserts that the latest committed event has the given type
pub fn assert_last_event(store: &MemoryStore, event_type: &str) {
    let last = store
        .events()
        .last()
        .unwrap_or_else(|| panic!("Expected {} event, log is empty", event_type));
    assert_eq!(last.event_type(), event_type, "Unexpected last event");
}
