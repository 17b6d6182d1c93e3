//! The shared rule table.
//!
//! Every shape check and numeric bound used by a validator lives here, so
//! the form layer and the codecs cannot drift apart.

use once_cell::sync::Lazy;
use regex::Regex;

/// Numeric limits used across the codecs.
pub struct Limits;

impl Limits {
    pub const SSID_MAX_CHARS: usize = 32;
    pub const WPA_PASSWORD_MIN: usize = 8;
    pub const WPA_PASSWORD_MAX: usize = 63;

    pub const PHONE_MIN_DIGITS: usize = 7;
    pub const PHONE_MAX_DIGITS: usize = 15;
    pub const MESSAGE_MAX_CHARS: usize = 160;

    pub const EMAIL_MAX_CHARS: usize = 254;
    pub const EMAIL_LOCAL_MAX_CHARS: usize = 64;
    pub const EMAIL_DOMAIN_MAX_CHARS: usize = 253;
    pub const EMAIL_SUBJECT_MAX_CHARS: usize = 100;
    pub const EMAIL_BODY_MAX_CHARS: usize = 500;

    pub const TEXT_MAX_CHARS: usize = 2000;
    pub const URL_MAX_CHARS: usize = 2048;

    pub const UPI_NAME_MIN_CHARS: usize = 2;
    pub const UPI_NAME_MAX_CHARS: usize = 100;

    // Sanity bounds, not protocol rules.
    pub const PAYPAL_MAX_AMOUNT: f64 = 10_000.0;
    pub const BITCOIN_MAX_AMOUNT: f64 = 21.0;
    pub const ETHEREUM_MAX_AMOUNT: f64 = 1_000.0;
    pub const UPI_MAX_AMOUNT: f64 = 100_000.0;
    pub const IBAN_MAX_AMOUNT: f64 = 999_999.0;
}

/// Compiled regular expressions, built once on first use.
pub struct Patterns;

impl Patterns {
    /// WEP keys: 5 or 13 printable ASCII characters, or 10 or 26 hex digits.
    ///
    /// A 10- or 26-character hex string is also valid printable ASCII of a
    /// different length class, so there is no way to tell a hex key from a
    /// passphrase that merely looks like hex. Both are accepted as-is.
    pub fn wep_password() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(?:[\x20-\x7E]{5}|[\x20-\x7E]{13}|[0-9A-Fa-f]{10}|[0-9A-Fa-f]{26})$")
                .expect("Valid WEP regex")
        });
        &PATTERN
    }

    /// Basic `local@domain.tld` shape.
    pub fn email() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Valid email regex"));
        &PATTERN
    }

    /// An email address embedded in free text, e.g. `Jane <jane@example.com>`.
    pub fn email_token() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
                .expect("Valid email token regex")
        });
        &PATTERN
    }

    /// Legacy Base58 Bitcoin address (P2PKH / P2SH).
    pub fn bitcoin_address() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$").expect("Valid bitcoin regex")
        });
        &PATTERN
    }

    pub fn ethereum_address() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("Valid ethereum regex"));
        &PATTERN
    }

    pub fn paypal_username() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^[A-Za-z0-9._\-]{3,50}$").expect("Valid paypal regex"));
        &PATTERN
    }

    /// UPI virtual payment address, `local@bank`.
    pub fn upi_id() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[A-Za-z0-9._\-]{2,256}@[A-Za-z][A-Za-z0-9]{1,63}$")
                .expect("Valid UPI id regex")
        });
        &PATTERN
    }

    /// Payee name: letters, spaces and `.'-`.
    pub fn upi_name() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^[\p{L} .'\-]+$").expect("Valid UPI name regex"));
        &PATTERN
    }

    /// Normalized (no spaces, upper-case) IBAN shape.
    pub fn iban() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}$").expect("Valid IBAN regex")
        });
        &PATTERN
    }

    pub fn http_url() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("Valid URL regex")
        });
        &PATTERN
    }

    /// Script-injection markers rejected in payment links. Only known DOM
    /// event handler names count, so query keys like `online=` pass.
    pub fn suspicious_url() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(concat!(
                r"(?i)javascript:|vbscript:|data:|<script|",
                r#"(?:^|[\s"'<>/?&;])on(?:abort|animation[a-z]*|auxclick|before[a-z]*|blur|"#,
                r"change|click|contextmenu|copy|cut|dblclick|drag[a-z]*|drop|error|",
                r"focus[a-z]*|hashchange|input|invalid|key[a-z]*|load[a-z]*|message|",
                r"mouse[a-z]*|paste|pointer[a-z]*|reset|resize|scroll|select|submit|",
                r"toggle|touch[a-z]*|transition[a-z]*|unload|wheel)\s*="
            ))
            .expect("Valid suspicious URL regex")
        });
        &PATTERN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wep_lengths() {
        let wep = Patterns::wep_password();
        assert!(wep.is_match("abcde"));
        assert!(wep.is_match("abcdefghijklm"));
        assert!(wep.is_match("0123456789"));
        assert!(wep.is_match("0123456789abcdef0123456789"));
        assert!(!wep.is_match("abcdef"));
        assert!(!wep.is_match("ghijklmnop")); // 10 chars, not hex
    }

    #[test]
    fn test_crypto_addresses() {
        assert!(Patterns::bitcoin_address().is_match("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
        assert!(Patterns::bitcoin_address().is_match("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"));
        // Base58 excludes 0, O, I and l
        assert!(!Patterns::bitcoin_address().is_match("1A1zP1eP5QGefi2DMPTfTL5SLmv7Div0Na"));
        assert!(Patterns::ethereum_address()
            .is_match("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"));
        assert!(!Patterns::ethereum_address()
            .is_match("0x742d35Cc6634C0532925a3b844Bc454e4438f44"));
    }

    #[test]
    fn test_suspicious_url_markers() {
        let pattern = Patterns::suspicious_url();
        assert!(pattern.is_match("https://x.test/?q=javascript:alert(1)"));
        assert!(pattern.is_match("https://x.test/a onerror=alert(1)"));
        assert!(pattern.is_match("https://x.test/?onload=run"));
        assert!(!pattern.is_match("https://x.test/session=abc"));
        assert!(!pattern.is_match("https://example.com/pay?amount=10"));
    }

    #[test]
    fn test_query_keys_starting_with_on() {
        let pattern = Patterns::suspicious_url();
        assert!(!pattern.is_match("https://shop.example/pay?online=true"));
        assert!(!pattern.is_match("https://shop.example/pay?one=1"));
        assert!(!pattern.is_match("https://shop.example/pay?a=1&onset=2"));
        assert!(pattern.is_match("https://x.test/<img onclick=run()>"));
        assert!(pattern.is_match("https://x.test/?a=1&onMouseOver=run"));
        assert!(pattern.is_match("https://x.test/ onkeydown = run"));
    }
}
