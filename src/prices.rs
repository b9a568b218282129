//! Prices

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

/// Errors from constructing or parsing a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceParseError {
    /// The input held no parsable numeric value.
    #[error("price {0:?} is not numeric")]
    NotNumeric(String),

    /// The value parsed but was negative.
    #[error("price {0} is negative")]
    Negative(Decimal),
}

/// A non-negative price in major currency units.
///
/// Upstream menu data delivers prices as either JSON numbers or
/// currency-formatted strings (`"₦1,500.00"`); [`Price::parse`] accepts
/// both forms explicitly, and the serde implementation applies the same
/// leniency at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price {
    value: Decimal,
}

impl Price {
    /// A zero price.
    pub const ZERO: Price = Price {
        value: Decimal::ZERO,
    };

    /// Creates a new price from an already-numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`PriceParseError::Negative`] when `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, PriceParseError> {
        if value < Decimal::ZERO {
            return Err(PriceParseError::Negative(value));
        }

        Ok(Price { value })
    }

    /// Parses a price from upstream text, stripping currency symbols,
    /// thousands separators, and whitespace first.
    ///
    /// # Errors
    ///
    /// Returns [`PriceParseError::NotNumeric`] when nothing numeric
    /// remains after stripping, or [`PriceParseError::Negative`] when
    /// the input carries a leading minus sign.
    pub fn parse(input: &str) -> Result<Self, PriceParseError> {
        let trimmed = input.trim();
        let negative = trimmed.starts_with('-');

        let cleaned: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let Ok(value) = Decimal::from_str(&cleaned) else {
            return Err(PriceParseError::NotNumeric(input.to_string()));
        };

        if negative {
            return Err(PriceParseError::Negative(-value));
        }

        Self::new(value)
    }

    /// The underlying decimal value.
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// This price multiplied by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.value * Decimal::from(quantity)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.value, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(Decimal),
            Text(String),
        }

        let price = match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Price::new(value),
            Raw::Text(text) => Price::parse(&text),
        };

        // Malformed upstream prices are logged once here and contribute
        // zero to totals rather than failing the whole payload.
        Ok(price.unwrap_or_else(|error| {
            warn!(%error, "unparsable upstream price, substituting zero");
            Price::ZERO
        }))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_plain_number() -> TestResult {
        let price = Price::parse("6.5")?;

        assert_eq!(price.value(), Decimal::from_str("6.5")?);

        Ok(())
    }

    #[test]
    fn parse_strips_currency_symbols_and_commas() -> TestResult {
        let price = Price::parse("₦1,500.00")?;

        assert_eq!(price.value(), Decimal::from_str("1500.00")?);

        Ok(())
    }

    #[test]
    fn parse_non_numeric_errors() {
        let result = Price::parse("free");

        assert!(matches!(result, Err(PriceParseError::NotNumeric(_))));
    }

    #[test]
    fn new_rejects_negative() {
        let result = Price::new(Decimal::from(-1));

        assert!(matches!(result, Err(PriceParseError::Negative(_))));
    }

    #[test]
    fn parse_rejects_negative_amounts() {
        for input in ["-5", " -5.00", "-₦1,500.00"] {
            let result = Price::parse(input);

            assert!(
                matches!(result, Err(PriceParseError::Negative(_))),
                "expected Negative for {input:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn times_multiplies_by_quantity() -> TestResult {
        let price = Price::parse("6.5")?;

        assert_eq!(price.times(2), Decimal::from(13));

        Ok(())
    }

    #[test]
    fn deserializes_from_number_and_string() -> TestResult {
        let from_number: Price = serde_json::from_str("6.5")?;
        let from_string: Price = serde_json::from_str("\"₦6.50\"")?;

        assert_eq!(from_number.value(), Decimal::from_str("6.5")?);
        assert_eq!(from_string.value(), Decimal::from_str("6.50")?);

        Ok(())
    }

    #[test]
    fn unparsable_wire_price_deserializes_to_zero() -> TestResult {
        let price: Price = serde_json::from_str("\"market price\"")?;

        assert_eq!(price, Price::ZERO);

        Ok(())
    }

    #[test]
    fn serialize_round_trip() -> TestResult {
        let price = Price::parse("1500.25")?;
        let raw = serde_json::to_string(&price)?;
        let back: Price = serde_json::from_str(&raw)?;

        assert_eq!(back, price);

        Ok(())
    }
}
