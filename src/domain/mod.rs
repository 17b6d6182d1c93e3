//! Leaf utilities shared by the codecs.
//!
//! Nothing in here knows about a particular payload format: these are the
//! normalizers, checksums and the rule table that the codec validators are
//! built from.

pub mod iban;
pub mod patterns;
pub mod percent;
pub mod phone;
pub mod text;

pub use iban::IbanChecksum;
pub use patterns::{Limits, Patterns};
pub use phone::PhoneNormalizer;
pub use text::TextNormalizer;

/// Returns the trimmed value when it is present and not blank.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the value untouched when it holds anything besides whitespace.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Length in Unicode scalar values, which is what the user-facing limits count.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
