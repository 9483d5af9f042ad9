//! Newtype IDs for type-safe entity references.
//!
//! All entity IDs share the external contract of the API: 24 lowercase
//! hexadecimal characters (the shape of a document-store object id). IDs are
//! generated server-side from 12 random bytes and validated at the API
//! boundary before any query runs, so a malformed ID never reaches the
//! database.
//!
//! Use the `define_hex_id!` macro to create type-safe ID wrappers that
//! prevent accidentally mixing IDs from different entity types.

/// Errors that can occur when parsing a hex entity ID.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// The input is not exactly 24 characters long.
    #[error("id must be exactly {expected} characters (got {got})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Actual length of the input.
        got: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("id must contain only hexadecimal characters")]
    InvalidCharacter,
}

/// Number of characters in a hex entity ID.
pub const HEX_ID_LENGTH: usize = 24;

/// Validate that a string has the shape of an entity ID.
///
/// # Errors
///
/// Returns [`IdError`] if the input is not 24 hex characters.
pub fn validate_hex_id(s: &str) -> Result<(), IdError> {
    if s.len() != HEX_ID_LENGTH {
        return Err(IdError::InvalidLength {
            expected: HEX_ID_LENGTH,
            got: s.len(),
        });
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IdError::InvalidCharacter);
    }
    Ok(())
}

/// Generate a fresh 24-character lowercase hex ID from 12 random bytes.
#[must_use]
pub fn generate_hex_id() -> String {
    let mut bytes = [0u8; HEX_ID_LENGTH / 2];
    rand::fill(&mut bytes);
    hex::encode(bytes)
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around a 24-character hex `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` with shape validation, `generate()`, `as_str()`, `into_inner()`
/// - `Display` and `FromStr` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use soundbeatx_core::define_hex_id;
/// define_hex_id!(UserId);
/// define_hex_id!(TicketId);
///
/// let user_id = UserId::generate();
/// let ticket_id = TicketId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = ticket_id;
/// ```
#[macro_export]
macro_rules! define_hex_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, validating the 24-hex-character shape.
            ///
            /// # Errors
            ///
            /// Returns [`$crate::IdError`] if the input is malformed.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::validate_hex_id(s)?;
                Ok(Self(s.to_ascii_lowercase()))
            }

            /// Generate a fresh random ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::generate_hex_id())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                // Database values are assumed valid
                Ok(Self(s))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_hex_id!(OrderId);
define_hex_id!(ProductId);
define_hex_id!(AdminId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let id = generate_hex_id();
        assert_eq!(id.len(), HEX_ID_LENGTH);
        assert!(validate_hex_id(&id).is_ok());
    }

    #[test]
    fn test_generate_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_valid() {
        let id = OrderId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_uppercase_normalized() {
        // Uppercase hex is accepted on input (the original API matched
        // [0-9a-fA-F]) and normalized to lowercase for storage.
        let id = OrderId::parse("507F1F77BCF86CD799439011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            OrderId::parse("abc123"),
            Err(IdError::InvalidLength { got: 6, .. })
        ));
        assert!(matches!(
            OrderId::parse(""),
            Err(IdError::InvalidLength { got: 0, .. })
        ));
    }

    #[test]
    fn test_parse_non_hex() {
        assert!(matches!(
            OrderId::parse("zzzf1f77bcf86cd799439011"),
            Err(IdError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_display_and_from_str() {
        let id: OrderId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert_eq!(format!("{id}"), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::parse("507f191e810c19729de860ea").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"507f191e810c19729de860ea\"");

        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
