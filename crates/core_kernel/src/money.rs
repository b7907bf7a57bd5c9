//! Money types with precise decimal arithmetic
//!
//! Every amount the ledger handles (coverage limits, deductibles, premiums,
//! settlements, pool balances) is a `Money` value. Arithmetic is checked and
//! never combines two currencies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Internal precision of every stored amount
const STORED_SCALE: u32 = 4;

/// ISO 4217 currencies the ledger can be denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    SGD,
}

impl Currency {
    /// Digits after the decimal point in the currency's minor unit
    pub fn minor_digits(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::SGD => "SGD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount in {found} where {expected} is required")]
    CurrencyMismatch { found: Currency, expected: Currency },

    #[error("Arithmetic overflow on {0}")]
    Overflow(&'static str),
}

/// A monetary amount in a single currency
///
/// Ledger amounts are usually whole units (see [`Money::from_units`]); the
/// stored value keeps four decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(STORED_SCALE),
            currency,
        }
    }

    pub fn from_units(units: i64, currency: Currency) -> Self {
        Self::new(Decimal::from(units), currency)
    }

    /// From an integer count of minor units (cents for USD, yen for JPY)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, currency.minor_digits()), currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn ensure_currency(&self, expected: Currency) -> Result<(), MoneyError> {
        if self.currency == expected {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                found: self.currency,
                expected,
            })
        }
    }

    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        other.ensure_currency(self.currency)?;
        self.amount
            .checked_add(other.amount)
            .map(|sum| Self::new(sum, self.currency))
            .ok_or(MoneyError::Overflow("addition"))
    }

    /// May go below zero; see [`Money::floor_at_zero`]
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        other.ensure_currency(self.currency)?;
        self.amount
            .checked_sub(other.amount)
            .map(|difference| Self::new(difference, self.currency))
            .ok_or(MoneyError::Overflow("subtraction"))
    }

    pub fn checked_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        other.ensure_currency(self.currency)?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn floor_at_zero(self) -> Self {
        if self.is_negative() {
            Self::zero(self.currency)
        } else {
            self
        }
    }
}

/// `15000.00 USD`, with the currency's minor-unit digits
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.currency.minor_digits() as usize;
        write!(f, "{:.digits$} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settlement_minus_deductible() {
        let settlement = Money::from_units(20000, Currency::USD);
        let deductible = Money::from_units(5000, Currency::USD);

        let net = settlement.checked_sub(&deductible).unwrap();
        assert_eq!(net.amount(), dec!(15000));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(dec!(100.00), Currency::USD);
        let eur = Money::new(dec!(100.00), Currency::EUR);

        assert_eq!(
            usd.checked_add(&eur),
            Err(MoneyError::CurrencyMismatch {
                found: Currency::EUR,
                expected: Currency::USD,
            })
        );
        assert!(usd.checked_cmp(&eur).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let max = Money::new(Decimal::MAX, Currency::USD);
        assert!(matches!(
            max.checked_add(&Money::from_units(1, Currency::USD)),
            Err(MoneyError::Overflow(_))
        ));
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let zero = Money::zero(Currency::USD);
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert_eq!(zero.floor_at_zero(), zero);
    }
}
