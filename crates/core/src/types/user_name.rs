//! User name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// The input is empty or only whitespace.
    #[error("user name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("user name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains control characters.
    #[error("user name cannot contain control characters")]
    ControlCharacter,
}

/// A user's login name.
///
/// Users log in by name alone, so the name is the account's identity and is
/// unique across the store.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-64 characters after trimming
/// - No control characters
///
/// ## Examples
///
/// ```
/// use shopping_list_core::UserName;
///
/// let name = UserName::parse("  alice ").unwrap();
/// assert_eq!(name.as_str(), "alice");
///
/// assert!(UserName::parse("").is_err());
/// assert!(UserName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Maximum length of a user name, in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `UserName` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`] characters, or contains control characters.
    pub fn parse(s: &str) -> Result<Self, UserNameError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(UserNameError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(UserNameError::ControlCharacter);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `UserName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UserName {
    type Err = UserNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserName {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserName {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let name = UserName::parse("  bob\t").unwrap();
        assert_eq!(name.as_str(), "bob");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(UserName::parse(""), Err(UserNameError::Empty));
        assert_eq!(UserName::parse(" \n "), Err(UserNameError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(UserName::MAX_LENGTH + 1);
        assert!(matches!(
            UserName::parse(&long),
            Err(UserNameError::TooLong { .. })
        ));

        let max = "x".repeat(UserName::MAX_LENGTH);
        assert!(UserName::parse(&max).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let name = "ä".repeat(UserName::MAX_LENGTH);
        assert!(UserName::parse(&name).is_ok());
    }

    #[test]
    fn test_parse_control_character() {
        assert_eq!(
            UserName::parse("al\u{7}ice"),
            Err(UserNameError::ControlCharacter)
        );
    }

    #[test]
    fn test_display_and_from_str() {
        let name: UserName = "carol".parse().unwrap();
        assert_eq!(format!("{name}"), "carol");
    }
}
