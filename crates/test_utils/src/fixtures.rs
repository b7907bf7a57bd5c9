//! Pre-built Test Fixtures
//!
//! Deterministic identities, amounts and times. The reference scenario is a
//! freelancer's professional-liability policy (limit 100000, deductible
//! 5000, premium 2000, 365 days) and a client's 25000 claim for data loss.

use chrono::{DateTime, Utc};
use core_kernel::{from_unix_seconds, Currency, Money, Principal};
use domain_claims::PolicyTerms;

/// Fixture for caller identities
pub struct PrincipalFixtures;

impl PrincipalFixtures {
    /// Ledger administrator (deployer)
    pub fn administrator() -> Principal {
        Principal::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
    }

    /// Policy holder
    pub fn freelancer() -> Principal {
        Principal::new("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5")
    }

    /// Party raising the claim
    pub fn claimant() -> Principal {
        Principal::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG")
    }

    /// Delegated claims reviewer
    pub fn reviewer() -> Principal {
        Principal::new("ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC")
    }

    /// Caller with no role on any policy or claim
    pub fn outsider() -> Principal {
        Principal::new("ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0")
    }
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Whole USD units
    pub fn usd(units: i64) -> Money {
        Money::from_units(units, Currency::USD)
    }

    pub fn coverage_limit() -> Money {
        Self::usd(100_000)
    }

    pub fn deductible() -> Money {
        Self::usd(5_000)
    }

    pub fn premium() -> Money {
        Self::usd(2_000)
    }

    pub fn claim_amount() -> Money {
        Self::usd(25_000)
    }

    pub fn settlement() -> Money {
        Self::usd(20_000)
    }

    /// settlement - deductible
    pub fn net_payment() -> Money {
        Self::usd(15_000)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur(units: i64) -> Money {
        Money::from_units(units, Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Unix seconds, panicking on out-of-range input
    pub fn at(seconds: i64) -> DateTime<Utc> {
        from_unix_seconds(seconds).expect("fixture timestamp in range")
    }

    /// When the ledger is deployed and the reference policy issued
    pub fn deployment() -> DateTime<Utc> {
        Self::at(0)
    }

    /// Incident date of the reference claim
    pub fn incident() -> DateTime<Utc> {
        Self::at(1_000)
    }

    /// Time at which the reference claim is submitted
    pub fn submission() -> DateTime<Utc> {
        Self::at(2_000)
    }

    /// One second past the end of a 365-day policy issued at deployment
    pub fn after_expiry() -> DateTime<Utc> {
        Self::at(365 * 86_400 + 1)
    }
}

/// Fixture for policy terms
pub struct TermsFixtures;

impl TermsFixtures {
    pub fn standard() -> PolicyTerms {
        PolicyTerms {
            coverage_limit: MoneyFixtures::coverage_limit(),
            deductible: MoneyFixtures::deductible(),
            premium_amount: MoneyFixtures::premium(),
            duration_days: 365,
        }
    }

    pub fn with_deductible(deductible: Money) -> PolicyTerms {
        PolicyTerms {
            deductible,
            ..Self::standard()
        }
    }
}

pub const REFERENCE_DESCRIPTION: &str = "Software bug caused data loss for client";
pub const REFERENCE_EVIDENCE_TYPE: &str = "email-correspondence";
pub const REFERENCE_EVIDENCE_HASH: &str = "abc123def456";
