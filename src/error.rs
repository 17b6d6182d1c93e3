//! Error types for the payload codecs.
//!
//! Every validation or decode failure is reported as a [`PayloadError`]
//! carrying the offending field and a message suitable for showing to the
//! person who filled in the form. Errors are grouped into a handful of
//! coarse [`ErrorKind`]s so callers can branch without string matching.

use thiserror::Error;

/// Result type alias for codec operations.
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Coarse, user-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingRequiredField,
    FormatInvalid,
    OutOfRange,
    ChecksumInvalid,
    ShortUrlNotSupported,
    Unparseable,
}

impl ErrorKind {
    /// Stable identifier, e.g. for JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "MissingRequiredField",
            Self::FormatInvalid => "FormatInvalid",
            Self::OutOfRange => "OutOfRange",
            Self::ChecksumInvalid => "ChecksumInvalid",
            Self::ShortUrlNotSupported => "ShortUrlNotSupported",
            Self::Unparseable => "Unparseable",
        }
    }
}

/// Error type for all validate, encode and decode operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// A field the format needs was absent or blank
    #[error("missing required field '{field}': {message}")]
    MissingRequiredField { field: &'static str, message: String },

    /// Regex or shape mismatch
    #[error("invalid format for '{field}': {message}")]
    FormatInvalid { field: &'static str, message: String },

    /// Numeric, length or coordinate bounds violated
    #[error("'{field}' out of range: {message}")]
    OutOfRange { field: &'static str, message: String },

    /// IBAN mod-97 check failed
    #[error("checksum failed for '{field}': {message}")]
    ChecksumInvalid { field: &'static str, message: String },

    /// Shortened map link that must be resolved by the caller first
    #[error("short URL not supported for '{field}': {message}")]
    ShortUrlNotSupported { field: &'static str, message: String },

    /// Nothing recognizable could be extracted
    #[error("could not parse '{field}': {message}")]
    Unparseable { field: &'static str, message: String },
}

impl PayloadError {
    pub fn missing(field: &'static str, message: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field,
            message: message.into(),
        }
    }

    pub fn format(field: &'static str, message: impl Into<String>) -> Self {
        Self::FormatInvalid {
            field,
            message: message.into(),
        }
    }

    pub fn range(field: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            message: message.into(),
        }
    }

    pub fn checksum(field: &'static str, message: impl Into<String>) -> Self {
        Self::ChecksumInvalid {
            field,
            message: message.into(),
        }
    }

    pub fn short_url(field: &'static str, message: impl Into<String>) -> Self {
        Self::ShortUrlNotSupported {
            field,
            message: message.into(),
        }
    }

    pub fn unparseable(field: &'static str, message: impl Into<String>) -> Self {
        Self::Unparseable {
            field,
            message: message.into(),
        }
    }

    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            Self::FormatInvalid { .. } => ErrorKind::FormatInvalid,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::ChecksumInvalid { .. } => ErrorKind::ChecksumInvalid,
            Self::ShortUrlNotSupported { .. } => ErrorKind::ShortUrlNotSupported,
            Self::Unparseable { .. } => ErrorKind::Unparseable,
        }
    }

    /// Name of the input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { field, .. }
            | Self::FormatInvalid { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::ChecksumInvalid { field, .. }
            | Self::ShortUrlNotSupported { field, .. }
            | Self::Unparseable { field, .. } => field,
        }
    }

    /// The user-facing message without the kind/field prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::MissingRequiredField { message, .. }
            | Self::FormatInvalid { message, .. }
            | Self::OutOfRange { message, .. }
            | Self::ChecksumInvalid { message, .. }
            | Self::ShortUrlNotSupported { message, .. }
            | Self::Unparseable { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PayloadError::format("ssid", "must be at most 32 characters");
        assert_eq!(
            err.to_string(),
            "invalid format for 'ssid': must be at most 32 characters"
        );
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            PayloadError::checksum("iban", "bad").kind(),
            ErrorKind::ChecksumInvalid
        );
        assert_eq!(
            PayloadError::short_url("url", "resolve first").kind(),
            ErrorKind::ShortUrlNotSupported
        );
        assert_eq!(ErrorKind::OutOfRange.as_str(), "OutOfRange");
    }
}
