//! Product quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is empty.
    #[error("quantity is required")]
    Empty,
    /// The input is not a whole number.
    #[error("quantity must be a whole number")]
    NotANumber,
    /// The input is below zero.
    #[error("quantity cannot be negative")]
    Negative,
}

/// How many of a product to buy.
///
/// A non-negative whole number. Zero is allowed so a product can stay on a
/// list after it has been bought.
///
/// ```
/// use shopping_list_core::Quantity;
///
/// assert_eq!(Quantity::parse(" 3 ").unwrap().get(), 3);
/// assert!(Quantity::parse("-1").is_err());
/// assert!(Quantity::parse("two").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Create a quantity from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Negative`] if `value` is below zero.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value < 0 {
            return Err(QuantityError::Negative);
        }
        Ok(Self(value))
    }

    /// Parse a quantity from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, not an integer, or negative.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(QuantityError::Empty);
        }

        let value = trimmed
            .parse::<i32>()
            .map_err(|_| QuantityError::NotANumber)?;
        Self::new(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(raw)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Quantity::parse("0").unwrap().get(), 0);
        assert_eq!(Quantity::parse("12").unwrap().get(), 12);
        assert_eq!(Quantity::parse(" 4\n").unwrap().get(), 4);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Quantity::parse(""), Err(QuantityError::Empty));
        assert_eq!(Quantity::parse("  "), Err(QuantityError::Empty));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert_eq!(Quantity::parse("1.5"), Err(QuantityError::NotANumber));
        assert_eq!(Quantity::parse("lots"), Err(QuantityError::NotANumber));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Quantity::parse("-3"), Err(QuantityError::Negative));
    }

    #[test]
    fn test_serde_rejects_negative() {
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        let q: Quantity = serde_json::from_str("2").unwrap();
        assert_eq!(q.get(), 2);
        assert_eq!(serde_json::to_string(&q).unwrap(), "2");
    }
}
