//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.
//! Rounding only happens at the display boundary.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major currency units at full precision.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "USD", "EUR").
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Canadian Dollar
    Cad,
    /// Australian Dollar
    Aud,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Symbol used when rendering amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Cad => "C$",
            Self::Aud => "A$",
            Self::Jpy => "¥",
        }
    }

    /// Number of minor-unit digits shown for this currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds the amount to the currency's minor units, half away from zero.
    #[must_use]
    pub fn round_for_display(&self) -> Decimal {
        round_half_away(self.amount, self.currency.minor_units())
    }

    /// Renders the amount with an explicit number of decimal places.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_shared::types::{Currency, Money};
    ///
    /// let money = Money::new(dec!(1234.5), Currency::Usd);
    /// assert_eq!(money.format_with_places(2), "$1,234.50");
    /// ```
    #[must_use]
    pub fn format_with_places(&self, decimal_places: u32) -> String {
        let mut rounded = round_half_away(self.amount, decimal_places);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded.set_sign_positive(true);
        rounded.rescale(decimal_places);

        let text = rounded.to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut out = String::with_capacity(text.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(self.currency.symbol());
        out.push_str(&group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

fn round_half_away(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_with_places(self.currency.minor_units()))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Cad => write!(f, "CAD"),
            Self::Aud => write!(f, "AUD"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "CAD" => Ok(Self::Cad),
            "AUD" => Ok(Self::Aud),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Eur);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency, Currency::Eur);
    }

    #[test]
    fn test_money_is_negative() {
        assert!(!Money::new(dec!(10), Currency::Usd).is_negative());
        assert!(Money::new(dec!(-10), Currency::Usd).is_negative());
        assert!(!Money::new(dec!(0), Currency::Usd).is_negative());
    }

    #[rstest]
    #[case(dec!(12.345), Currency::Usd, dec!(12.35))]
    #[case(dec!(12.344), Currency::Usd, dec!(12.34))]
    #[case(dec!(-2.5), Currency::Jpy, dec!(-3))]
    #[case(dec!(1234.5), Currency::Jpy, dec!(1235))]
    fn test_round_for_display(
        #[case] amount: Decimal,
        #[case] currency: Currency,
        #[case] expected: Decimal,
    ) {
        assert_eq!(Money::new(amount, currency).round_for_display(), expected);
    }

    #[rstest]
    #[case(dec!(0), Currency::Usd, "$0.00")]
    #[case(dec!(5), Currency::Usd, "$5.00")]
    #[case(dec!(1234.5), Currency::Usd, "$1,234.50")]
    #[case(dec!(1234567.891), Currency::Eur, "€1,234,567.89")]
    #[case(dec!(-12), Currency::Gbp, "-£12.00")]
    #[case(dec!(999.999), Currency::Cad, "C$1,000.00")]
    #[case(dec!(100000), Currency::Aud, "A$100,000.00")]
    #[case(dec!(1234.5), Currency::Jpy, "¥1,235")]
    #[case(dec!(-0.001), Currency::Usd, "$0.00")]
    fn test_display(#[case] amount: Decimal, #[case] currency: Currency, #[case] expected: &str) {
        assert_eq!(Money::new(amount, currency).to_string(), expected);
    }

    #[test]
    fn test_format_with_places_overrides_currency_default() {
        let money = Money::new(dec!(10.125), Currency::Usd);
        assert_eq!(money.format_with_places(0), "$10");
        assert_eq!(money.format_with_places(3), "$10.125");
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Gbp.to_string(), "GBP");
        assert_eq!(Currency::Cad.to_string(), "CAD");
        assert_eq!(Currency::Aud.to_string(), "AUD");
        assert_eq!(Currency::Jpy.to_string(), "JPY");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("Gbp").unwrap(), Currency::Gbp);
        assert_eq!(Currency::from_str("JPY").unwrap(), Currency::Jpy);

        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_currency_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Cad).unwrap(), "\"CAD\"");
        let parsed: Currency = serde_json::from_str("\"AUD\"").unwrap();
        assert_eq!(parsed, Currency::Aud);
    }
}
