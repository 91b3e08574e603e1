//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The amount has more decimal places than are stored.
    #[error("price must have at most {max} decimal places")]
    TooManyDecimals { max: u32 },
    /// The amount does not fit the stored precision.
    #[error("price must be less than {limit}")]
    TooLarge { limit: i64 },
}

/// A product price in the store's single currency.
///
/// ## Constraints
///
/// - Strictly greater than zero
/// - At most 2 decimal places
/// - Less than 100 000 000 (`NUMERIC(10, 2)`)
///
/// ```
/// use tutorial_core::Price;
///
/// assert!(Price::parse("49.99").is_ok());
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("cheap").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Maximum number of decimal places.
    pub const MAX_DECIMAL_PLACES: u32 = 2;

    /// Exclusive upper bound on the amount.
    pub const LIMIT: i64 = 100_000_000;

    /// Create a price from a decimal amount.
    ///
    /// Trailing zeros do not count as decimal places, so `"5.000"` is fine.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the amount is zero or negative,
    /// `PriceError::TooManyDecimals` if it has more than two significant
    /// decimal places, or `PriceError::TooLarge` if it reaches
    /// [`Price::LIMIT`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount.normalize().scale() > Self::MAX_DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimals {
                max: Self::MAX_DECIMAL_PLACES,
            });
        }
        if amount >= Decimal::from(Self::LIMIT) {
            return Err(PriceError::TooLarge { limit: Self::LIMIT });
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotPositive` if the amount is zero or negative.
    pub fn from_units(units: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::from(units))
    }

    /// Parse a price from user input such as `"50"` or `"19.99"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` if the input is not a decimal number,
    /// or `PriceError::NotPositive` if it is not greater than zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(Price::parse("50").unwrap().to_string(), "50");
        assert_eq!(Price::parse(" 19.99 ").unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert_eq!(Price::parse("0"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse("-5"), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(Price::parse(""), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("ten"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_rejects_sub_cent_amounts() {
        assert_eq!(
            Price::parse("0.001"),
            Err(PriceError::TooManyDecimals { max: 2 })
        );
        assert_eq!(
            Price::parse("12.345"),
            Err(PriceError::TooManyDecimals { max: 2 })
        );
        assert!(Price::parse("12.340").is_ok());
    }

    #[test]
    fn test_parse_rejects_amounts_outside_column() {
        assert_eq!(
            Price::parse("100000000"),
            Err(PriceError::TooLarge { limit: 100_000_000 })
        );
        assert!(Price::parse("99999999.99").is_ok());
    }

    #[test]
    fn test_display_drops_trailing_zeros() {
        assert_eq!(Price::parse("100.00").unwrap().to_string(), "100");
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Price>("\"0\"").is_err());
        assert!(serde_json::from_str::<Price>("\"12.5\"").is_ok());
    }
}
