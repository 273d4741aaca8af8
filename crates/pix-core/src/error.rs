//! Pix Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PixError>;

/// Errors raised while building, parsing or validating Pix data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    /// Amount is zero, negative or rounds to zero cents
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A TLV value does not fit the two-digit length prefix
    #[error("Field {tag} too long: {len} characters (max 99)")]
    FieldTooLong { tag: String, len: usize },

    /// Tag is not two ASCII digits
    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),

    /// Payload framing is broken
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// A mandatory field is absent from a decoded payload
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Trailing CRC does not match the payload body
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    /// CPF failed the check-digit rules
    #[error("Invalid CPF: {0}")]
    InvalidCpf(String),
}

impl PixError {
    /// Stable machine-readable code, used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            PixError::InvalidAmount(_) => "INVALID_AMOUNT",
            PixError::FieldTooLong { .. } => "FIELD_TOO_LONG",
            PixError::InvalidTag(_) => "INVALID_TAG",
            PixError::Malformed(_) => "MALFORMED_PAYLOAD",
            PixError::MissingField(_) => "MISSING_FIELD",
            PixError::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            PixError::InvalidCpf(_) => "INVALID_CPF",
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PixError::InvalidAmount(_) => "The amount must be greater than zero.",
            PixError::FieldTooLong { .. } | PixError::InvalidTag(_) => {
                "One of the payment fields is too long to encode."
            }
            PixError::Malformed(_) | PixError::MissingField(_) => "This is not a valid Pix code.",
            PixError::ChecksumMismatch { .. } => {
                "The Pix code is corrupted. Please copy it again."
            }
            PixError::InvalidCpf(reason) => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PixError::InvalidAmount("0".into()).code(), "INVALID_AMOUNT");
        assert_eq!(
            PixError::FieldTooLong { tag: "26".into(), len: 120 }.code(),
            "FIELD_TOO_LONG"
        );
    }

    #[test]
    fn test_display_mentions_tag() {
        let err = PixError::FieldTooLong { tag: "26".into(), len: 120 };
        assert_eq!(err.to_string(), "Field 26 too long: 120 characters (max 99)");
    }
}
