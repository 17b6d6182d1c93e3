//! Phone number normalization.
//!
//! Turns whatever a user typed into an international-looking `+<digits>`
//! string. This is a heuristic, not E.164 validation: numbers without a
//! country code are assumed to be North American when they have 10 digits.

use super::patterns::Limits;

/// Canonicalizes phone numbers into `+<digits>` form.
///
/// Rules, applied after dropping everything but digits and a leading `+`:
/// - a leading `+` is kept as-is
/// - 10 digits are assumed to be NANP and get `+1`
/// - 11 digits starting with `1` get `+`
/// - anything else gets a bare `+`
///
/// Normalizing an already normalized number is a no-op.
#[derive(Debug, Clone, Default)]
pub struct PhoneNormalizer;

impl PhoneNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes `raw`. Returns an empty string when it holds no digits.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let has_plus = trimmed.starts_with('+');
        let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return String::new();
        }

        if has_plus {
            format!("+{}", digits)
        } else if digits.len() == 10 {
            format!("+1{}", digits)
        } else {
            // Covers the 11-digit NANP case as well: it only needs the `+`.
            format!("+{}", digits)
        }
    }

    /// Number of digits after the leading `+`.
    pub fn digit_count(normalized: &str) -> usize {
        normalized.chars().filter(|c| c.is_ascii_digit()).count()
    }

    /// Checks the digit count of a normalized number against the 7–15 range.
    pub fn validate(normalized: &str) -> bool {
        let count = Self::digit_count(normalized);
        normalized.starts_with('+')
            && (Limits::PHONE_MIN_DIGITS..=Limits::PHONE_MAX_DIGITS).contains(&count)
    }

    /// The normalized number without its `+`, as wa.me links want it.
    pub fn digits_only(normalized: &str) -> &str {
        normalized.strip_prefix('+').unwrap_or(normalized)
    }
}
