//! Vehicle identification number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Vin`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum VinError {
    /// The input string is empty.
    #[error("vin cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("vin must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `A-Z`, `0-9` and `-`.
    #[error("vin may only contain letters, digits and dashes")]
    InvalidCharacter,
}

/// A vehicle identification number.
///
/// VINs are user-supplied primary keys for cars, so the parser is lenient
/// about length (registrations predating the 17-character standard exist)
/// but strict about the alphabet. Input is uppercased so that lookups are
/// case-insensitive.
///
/// ## Constraints
///
/// - Length: 1-17 characters
/// - Characters: ASCII letters, digits and `-`
///
/// ## Examples
///
/// ```
/// use motorpool_core::Vin;
///
/// assert!(Vin::parse("1FTRX18W1XKB12765").is_ok());
/// assert_eq!(Vin::parse("1a").unwrap().as_str(), "1A");
/// assert!(Vin::parse("").is_err());
/// assert!(Vin::parse("BAD VIN!").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    /// Maximum length of a VIN (ISO 3779).
    pub const MAX_LENGTH: usize = 17;

    /// Parse a `Vin` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 17 characters,
    /// or contains a character outside the VIN alphabet.
    pub fn parse(s: &str) -> Result<Self, VinError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(VinError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(VinError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(VinError::InvalidCharacter);
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the VIN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Vin` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Vin {
    type Err = VinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Vin {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Vin {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Vin {
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
    fn test_parse_valid() {
        assert!(Vin::parse("1FTRX18W1XKB12765").is_ok());
        assert!(Vin::parse("1A").is_ok());
        assert!(Vin::parse("ABC-123").is_ok());
    }

    #[test]
    fn test_uppercases() {
        assert_eq!(Vin::parse("1ftrx18w1xkb12765").unwrap().as_str(), "1FTRX18W1XKB12765");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(Vin::parse("  1A  ").unwrap().as_str(), "1A");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Vin::parse(""), Err(VinError::Empty)));
        assert!(matches!(Vin::parse("   "), Err(VinError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "A".repeat(18);
        assert!(matches!(Vin::parse(&long), Err(VinError::TooLong { .. })));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Vin::parse("BAD VIN"),
            Err(VinError::InvalidCharacter)
        ));
        assert!(matches!(
            Vin::parse("VIN#1"),
            Err(VinError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let vin = Vin::parse("1A").unwrap();
        let json = serde_json::to_string(&vin).unwrap();
        assert_eq!(json, "\"1A\"");
        let back: Vin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vin);
    }
}
