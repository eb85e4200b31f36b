//! Money type for representing monetary values.
//!
//! Amounts are exact decimals. Prices are stored exactly as the catalog
//! serves them; rounding to the currency's minor unit happens only when an
//! amount is formatted for display.

use crate::CommerceError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Supported display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    INR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places shown for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Format an amount with this currency's symbol (e.g., "$49.99").
    pub fn format(&self, money: Money) -> String {
        format!("{}{}", self.symbol(), money.display_amount(self.decimal_places()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An exact monetary amount.
///
/// Serialized as a plain JSON number, which is what the backend's `numeric`
/// columns accept and return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money value from an exact decimal.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from an integer count of minor units.
    ///
    /// ```
    /// use grocer_commerce::Money;
    /// assert_eq!(Money::from_minor(250, 2), Money::parse("2.50").unwrap());
    /// ```
    pub fn from_minor(units: i64, scale: u32) -> Self {
        Self(Decimal::new(units, scale))
    }

    /// Parse a decimal string such as `"49.99"`.
    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| CommerceError::InvalidAmount(s.to_string()))
    }

    /// A zero amount.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiply by a quantity.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format without symbol, rounded half away from zero (e.g., "49.99").
    pub fn display_amount(&self, places: u32) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        let places = places as usize;
        format!("{:.places$}", rounded)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl FromStr for Money {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_amount(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_parse() {
        let m = Money::parse("49.99").unwrap();
        assert_eq!(m, Money::from_minor(4999, 2));
        assert!(Money::parse("forty").is_err());
    }

    #[test]
    fn test_money_is_not_rounded_on_storage() {
        let m = Money::parse("0.125").unwrap();
        assert_eq!(m.amount(), Decimal::new(125, 3));
        assert_eq!(m.times(8), Money::parse("1").unwrap());
    }

    #[test]
    fn test_money_display_rounds_half_away_from_zero() {
        assert_eq!(Money::parse("0.125").unwrap().to_string(), "0.13");
        assert_eq!(Money::parse("4.5").unwrap().to_string(), "4.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_currency_format() {
        let m = Money::parse("49.99").unwrap();
        assert_eq!(Currency::USD.format(m), "$49.99");
        assert_eq!(Currency::JPY.format(Money::parse("100").unwrap()), "\u{00a5}100");
    }

    #[test]
    fn test_money_sum() {
        let total: Money = ["2.50", "1.00", "1.00"]
            .iter()
            .map(|s| Money::parse(s).unwrap())
            .sum();
        assert_eq!(total, Money::parse("4.50").unwrap());
    }

    #[test]
    fn test_money_json_number() {
        let m: Money = serde_json::from_str("2.5").unwrap();
        assert_eq!(m, Money::parse("2.5").unwrap());
        let int: Money = serde_json::from_str("3").unwrap();
        assert_eq!(int, Money::parse("3").unwrap());
    }

    #[test]
    fn test_money_negative() {
        assert!(Money::parse("-1").unwrap().is_negative());
        assert!(!Money::zero().is_negative());
    }
}
