//! Type-safe price representation.
//!
//! Prices are stored in minor currency units (cents for USD) so that
//! arithmetic stays exact and the database column is a plain bigint.
//! Display conversion goes through `rust_decimal` to avoid float rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in minor currency units with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the smallest currency unit (e.g., cents for USD).
    pub cents: i64,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price from minor currency units.
    #[must_use]
    pub const fn from_cents(cents: i64, currency: CurrencyCode) -> Self {
        Self { cents, currency }
    }

    /// Whether this price is zero (treated as free content).
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Amount in the currency's standard unit (e.g., "19.99").
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.amount())
    }

    /// Format the bare amount for payment APIs (e.g., "19.99").
    #[must_use]
    pub fn amount_string(&self) -> String {
        format!("{:.2}", self.amount())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        let price = Price::from_cents(1999, CurrencyCode::USD);
        assert_eq!(price.display(), "$19.99");
        assert_eq!(price.amount_string(), "19.99");
    }

    #[test]
    fn test_price_zero() {
        assert!(Price::from_cents(0, CurrencyCode::EUR).is_zero());
        assert!(!Price::from_cents(1, CurrencyCode::EUR).is_zero());
    }

    #[test]
    fn test_price_sub_dollar() {
        let price = Price::from_cents(5, CurrencyCode::USD);
        assert_eq!(price.amount_string(), "0.05");
    }

    #[test]
    fn test_currency_roundtrip() {
        for code in ["USD", "EUR", "GBP", "CAD", "AUD"] {
            let currency: CurrencyCode = code.parse().expect("valid code");
            assert_eq!(currency.code(), code);
        }
        assert!("JPY".parse::<CurrencyCode>().is_err());
    }
}
