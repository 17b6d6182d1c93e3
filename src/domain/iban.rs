//! IBAN mod-97 checksum.
//!
//! The check moves the first four characters to the end, replaces every
//! letter with its two-digit value (A=10 … Z=35), reads the result as one
//! decimal number and requires `number mod 97 == 1`. The number is never
//! materialized: the remainder is folded in digit by digit.

use super::patterns::Patterns;

#[derive(Debug, Clone, Default)]
pub struct IbanChecksum;

impl IbanChecksum {
    /// Strips whitespace and upper-cases, the form every other check expects.
    pub fn normalize(code: &str) -> String {
        code.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Remainder of the rearranged code modulo 97.
    ///
    /// Returns `None` when the code is too short or contains anything but
    /// ASCII letters and digits.
    pub fn remainder(code: &str) -> Option<u32> {
        if code.len() < 5 || !code.is_ascii() {
            return None;
        }

        let (head, tail) = code.split_at(4);
        let mut remainder: u32 = 0;

        for c in tail.chars().chain(head.chars()) {
            remainder = match c {
                '0'..='9' => (remainder * 10 + (c as u32 - '0' as u32)) % 97,
                'A'..='Z' => (remainder * 100 + (c as u32 - 55)) % 97,
                'a'..='z' => (remainder * 100 + (c.to_ascii_uppercase() as u32 - 55)) % 97,
                _ => return None,
            };
        }

        Some(remainder)
    }

    /// True when the checksum of `code` holds. Does not check the shape.
    pub fn is_valid_checksum(code: &str) -> bool {
        Self::remainder(code) == Some(1)
    }

    /// Shape and checksum together, on an already normalized code.
    pub fn is_valid(code: &str) -> bool {
        Patterns::iban().is_match(code) && Self::is_valid_checksum(code)
    }
}
