//! Property-Based Test Generators
//!
//! Proptest strategies for ledger inputs that respect (or deliberately
//! break) policy invariants.

use core_kernel::{Currency, Money};
use domain_claims::PolicyTerms;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for positive whole-unit USD amounts
pub fn positive_usd_strategy(max_units: i64) -> impl Strategy<Value = Money> {
    (1i64..=max_units).prop_map(|units| Money::from_units(units, Currency::USD))
}

/// Strategy for valid policy terms: `limit >= deductible >= 0`, positive premium
pub fn policy_terms_strategy() -> impl Strategy<Value = PolicyTerms> {
    (1i64..10_000_000i64, 1i64..100_000i64, 1u32..3_650u32)
        .prop_flat_map(|(limit, premium, days)| {
            (Just(limit), 0i64..=limit, Just(premium), Just(days))
        })
        .prop_map(|(limit, deductible, premium, days)| PolicyTerms {
            coverage_limit: Money::from_units(limit, Currency::USD),
            deductible: Money::from_units(deductible, Currency::USD),
            premium_amount: Money::from_units(premium, Currency::USD),
            duration_days: days,
        })
}

/// Strategy for terms paired with a claim amount strictly above the limit
pub fn over_limit_claim_strategy() -> impl Strategy<Value = (PolicyTerms, Money)> {
    policy_terms_strategy().prop_flat_map(|terms| {
        let limit = terms.coverage_limit.amount();
        (Just(terms), 1i64..1_000_000i64).prop_map(move |(terms, excess)| {
            let amount = Money::new(limit + Decimal::from(excess), Currency::USD);
            (terms, amount)
        })
    })
}

/// Strategy for (requested, settlement, deductible) with
/// `0 < settlement <= requested` and an arbitrary non-negative deductible
pub fn settlement_strategy() -> impl Strategy<Value = (i64, i64, i64)> {
    (1i64..1_000_000i64)
        .prop_flat_map(|requested| (Just(requested), 1i64..=requested, 0i64..2_000_000i64))
}
