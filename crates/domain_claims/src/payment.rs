//! Settlement payment calculation and the claims treasury
//!
//! Payments are not stored as records of their own. The net amount is
//! derived from the claim's settlement and the policy deductible at the
//! moment of disbursement.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use core_kernel::{Currency, Money, MoneyError};

/// Net payment for a settlement: `settlement - deductible`, never below zero
pub fn net_payment(settlement: &Money, deductible: &Money) -> Result<Money, MoneyError> {
    Ok(settlement.checked_sub(deductible)?.floor_at_zero())
}

/// Pool of funds that claims are paid from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    pub available_funds: Money,
    pub total_premiums: Money,
    pub total_contributions: Money,
    pub total_paid: Money,
}

impl Treasury {
    pub fn empty(currency: Currency) -> Self {
        Self {
            available_funds: Money::zero(currency),
            total_premiums: Money::zero(currency),
            total_contributions: Money::zero(currency),
            total_paid: Money::zero(currency),
        }
    }

    pub fn can_cover(&self, amount: &Money) -> Result<bool, MoneyError> {
        Ok(self.available_funds.checked_cmp(amount)? != Ordering::Less)
    }

    pub fn receive_premium(&mut self, amount: &Money) -> Result<(), MoneyError> {
        self.available_funds = self.available_funds.checked_add(amount)?;
        self.total_premiums = self.total_premiums.checked_add(amount)?;
        Ok(())
    }

    pub fn receive_contribution(&mut self, amount: &Money) -> Result<(), MoneyError> {
        self.available_funds = self.available_funds.checked_add(amount)?;
        self.total_contributions = self.total_contributions.checked_add(amount)?;
        Ok(())
    }

    /// Debits a disbursement; the caller checks [`Treasury::can_cover`] first
    pub fn disburse(&mut self, amount: &Money) -> Result<(), MoneyError> {
        self.available_funds = self.available_funds.checked_sub(amount)?;
        self.total_paid = self.total_paid.checked_add(amount)?;
        Ok(())
    }
}

/// Read-only answer to "could this claim be paid right now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processability {
    pub can_process: bool,
    pub sufficient_funds: bool,
    pub status_approved: bool,
    /// What the claim would be paid if processed now
    pub net_payment: Money,
}

impl Processability {
    pub fn new(status_approved: bool, sufficient_funds: bool, net_payment: Money) -> Self {
        Self {
            can_process: status_approved && sufficient_funds,
            sufficient_funds,
            status_approved,
            net_payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(units: i64) -> Money {
        Money::from_units(units, Currency::USD)
    }

    #[test]
    fn test_net_payment_common_case() {
        let net = net_payment(&usd(20000), &usd(5000)).unwrap();
        assert_eq!(net.amount(), dec!(15000));
    }

    #[test]
    fn test_net_payment_clamped_at_zero() {
        let net = net_payment(&usd(3000), &usd(5000)).unwrap();
        assert!(net.is_zero());
    }

    #[test]
    fn test_treasury_flow() {
        let mut treasury = Treasury::empty(Currency::USD);
        treasury.receive_premium(&usd(2000)).unwrap();
        treasury.receive_contribution(&usd(50000)).unwrap();
        assert!(treasury.can_cover(&usd(52000)).unwrap());
        assert!(!treasury.can_cover(&usd(52001)).unwrap());

        treasury.disburse(&usd(15000)).unwrap();
        assert_eq!(treasury.available_funds, usd(37000));
        assert_eq!(treasury.total_paid, usd(15000));
        assert_eq!(treasury.total_premiums, usd(2000));
    }

    #[test]
    fn test_processability_requires_both() {
        assert!(Processability::new(true, true, usd(1)).can_process);
        assert!(!Processability::new(true, false, usd(1)).can_process);
        assert!(!Processability::new(false, true, usd(1)).can_process);
    }
}
