//! Policy coverage terms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use core_kernel::{Currency, Money, PolicyId, Principal, ValidPeriod};
use crate::error::LedgerError;

/// Financial terms of a policy, validated before a policy is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTerms {
    pub coverage_limit: Money,
    pub deductible: Money,
    pub premium_amount: Money,
    pub duration_days: u32,
}

impl PolicyTerms {
    /// Checks `coverage_limit >= deductible >= 0`, a positive premium and duration
    pub fn validate(&self, currency: Currency) -> Result<(), LedgerError> {
        self.coverage_limit.ensure_currency(currency)?;
        self.deductible.ensure_currency(currency)?;
        self.premium_amount.ensure_currency(currency)?;

        if self.deductible.is_negative() {
            return Err(LedgerError::invalid_terms("deductible must not be negative"));
        }
        if self.coverage_limit.checked_cmp(&self.deductible)? == Ordering::Less {
            return Err(LedgerError::invalid_terms(format!(
                "coverage limit {} is below deductible {}",
                self.coverage_limit, self.deductible
            )));
        }
        if !self.premium_amount.is_positive() {
            return Err(LedgerError::invalid_terms("premium must be positive"));
        }
        if self.duration_days == 0 {
            return Err(LedgerError::invalid_terms("duration must be at least one day"));
        }
        Ok(())
    }
}

/// An insurance coverage agreement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub holder: Principal,
    pub terms: PolicyTerms,
    /// Cleared by deactivation; coverage also lapses at `period.end`
    pub active: bool,
    pub period: ValidPeriod,
    /// Identity allowed to review claims against this policy
    pub reviewer: Principal,
    pub premiums_paid: Money,
    pub claim_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Creates an active policy covering `[now, now + duration_days)`
    pub fn issue(
        id: PolicyId,
        holder: Principal,
        terms: PolicyTerms,
        reviewer: Principal,
        now: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        let period = ValidPeriod::for_days(now, terms.duration_days)?;
        let currency = terms.premium_amount.currency();

        Ok(Self {
            id,
            holder,
            terms,
            active: true,
            period,
            reviewer,
            premiums_paid: Money::zero(currency),
            claim_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn coverage_limit(&self) -> Money {
        self.terms.coverage_limit
    }

    pub fn deductible(&self) -> Money {
        self.terms.deductible
    }

    pub fn effective(&self) -> DateTime<Utc> {
        self.period.start
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.period.end
    }

    /// True while not deactivated and `at` falls in `[effective, expiry)`
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.active && self.period.contains(at)
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.updated_at = now;
    }

    pub fn record_premium(&mut self, amount: Money, now: DateTime<Utc>) -> Result<(), LedgerError> {
        self.premiums_paid = self.premiums_paid.checked_add(&amount)?;
        self.updated_at = now;
        Ok(())
    }

    pub fn record_claim(&mut self, now: DateTime<Utc>) {
        self.claim_count += 1;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::from_unix_seconds;

    fn usd(units: i64) -> Money {
        Money::from_units(units, Currency::USD)
    }

    fn terms(limit: i64, deductible: i64, premium: i64, days: u32) -> PolicyTerms {
        PolicyTerms {
            coverage_limit: usd(limit),
            deductible: usd(deductible),
            premium_amount: usd(premium),
            duration_days: days,
        }
    }

    #[test]
    fn test_valid_terms() {
        assert!(terms(100000, 5000, 2000, 365).validate(Currency::USD).is_ok());
        // limit == deductible is allowed
        assert!(terms(5000, 5000, 1, 1).validate(Currency::USD).is_ok());
        assert!(terms(5000, 0, 1, 1).validate(Currency::USD).is_ok());
    }

    #[test]
    fn test_invalid_terms() {
        let cases = [
            terms(4000, 5000, 2000, 365),
            terms(100000, -1, 2000, 365),
            terms(100000, 5000, 0, 365),
            terms(100000, 5000, 2000, 0),
        ];
        for case in cases {
            let err = case.validate(Currency::USD).unwrap_err();
            assert_eq!(err.code(), "ERR-INVALID-TERMS");
        }
    }

    #[test]
    fn test_wrong_currency_rejected() {
        let err = terms(100000, 5000, 2000, 365)
            .validate(Currency::EUR)
            .unwrap_err();
        assert_eq!(err.code(), "ERR-INVALID-TERMS");
    }

    #[test]
    fn test_active_window() {
        let now = from_unix_seconds(0).unwrap();
        let mut policy = Policy::issue(
            PolicyId::FIRST,
            Principal::new("holder"),
            terms(100000, 5000, 2000, 365),
            Principal::new("admin"),
            now,
        )
        .unwrap();

        assert!(policy.is_active_at(from_unix_seconds(1000).unwrap()));
        assert!(!policy.is_active_at(policy.expiry()));
        assert!(!policy.is_active_at(from_unix_seconds(-1).unwrap()));

        policy.deactivate(now);
        assert!(!policy.is_active_at(from_unix_seconds(1000).unwrap()));
    }
}
