//! Payment instructions.
//!
//! Six payment kinds share one closed type. Each has its own address shape
//! and amount cap (see [`Limits`]) and its own URI grammar; [`PaymentCodec`]
//! encodes all of them and decodes previously generated payloads back into
//! a [`PaymentInstruction`].

use super::PayloadCodec;
use crate::domain::percent::{encode_component, parse_query, query_value};
use crate::domain::{char_len, IbanChecksum, Limits, Patterns};
use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Paypal,
    Bitcoin,
    Ethereum,
    Upi,
    Iban,
    Url,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paypal => "paypal",
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
            Self::Upi => "upi",
            Self::Iban => "iban",
            Self::Url => "url",
        }
    }

    /// Upper bound for the amount, `None` for kinds without an amount.
    pub fn max_amount(&self) -> Option<f64> {
        match self {
            Self::Paypal => Some(Limits::PAYPAL_MAX_AMOUNT),
            Self::Bitcoin => Some(Limits::BITCOIN_MAX_AMOUNT),
            Self::Ethereum => Some(Limits::ETHEREUM_MAX_AMOUNT),
            Self::Upi => Some(Limits::UPI_MAX_AMOUNT),
            Self::Iban => Some(Limits::IBAN_MAX_AMOUNT),
            Self::Url => None,
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paypal" => Ok(Self::Paypal),
            "bitcoin" | "btc" => Ok(Self::Bitcoin),
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "upi" => Ok(Self::Upi),
            "iban" | "sepa" => Ok(Self::Iban),
            "url" | "link" => Ok(Self::Url),
            other => Err(format!("unknown payment kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PaymentInstruction {
    Paypal {
        username: String,
        #[serde(default)]
        amount: Option<f64>,
    },
    Bitcoin {
        address: String,
        #[serde(default)]
        amount: Option<f64>,
    },
    Ethereum {
        address: String,
        #[serde(default)]
        amount: Option<f64>,
    },
    Upi {
        id: String,
        name: String,
        #[serde(default)]
        amount: Option<f64>,
    },
    Iban {
        code: String,
        beneficiary: String,
        #[serde(default)]
        amount: Option<f64>,
    },
    Url {
        url: String,
    },
}

impl PaymentInstruction {
    pub fn kind(&self) -> PaymentKind {
        match self {
            Self::Paypal { .. } => PaymentKind::Paypal,
            Self::Bitcoin { .. } => PaymentKind::Bitcoin,
            Self::Ethereum { .. } => PaymentKind::Ethereum,
            Self::Upi { .. } => PaymentKind::Upi,
            Self::Iban { .. } => PaymentKind::Iban,
            Self::Url { .. } => PaymentKind::Url,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Paypal { amount, .. }
            | Self::Bitcoin { amount, .. }
            | Self::Ethereum { amount, .. }
            | Self::Upi { amount, .. }
            | Self::Iban { amount, .. } => *amount,
            Self::Url { .. } => None,
        }
    }
}

/// Shortest decimal form: `100`, `0.5`, `12.75`.
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

fn require<'a>(value: &'a str, field: &'static str, label: &str) -> PayloadResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(PayloadError::missing(field, format!("{} is required", label)))
    } else {
        Ok(value)
    }
}

fn validate_amount(kind: PaymentKind, amount: Option<f64>) -> PayloadResult<()> {
    let (Some(amount), Some(max)) = (amount, kind.max_amount()) else {
        return Ok(());
    };

    if !amount.is_finite() || amount <= 0.0 {
        return Err(PayloadError::range(
            "amount",
            "amount must be greater than zero",
        ));
    }
    if amount > max {
        return Err(PayloadError::range(
            "amount",
            format!("{} amount cannot exceed {}", kind, format_amount(max)),
        ));
    }
    Ok(())
}

fn parse_amount(raw: Option<&str>) -> PayloadResult<Option<f64>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<f64>().map(Some).map_err(|_| {
            PayloadError::unparseable("amount", format!("'{}' is not a number", value))
        }),
    }
}

/// Case-insensitive `strip_prefix` for ASCII scheme prefixes.
fn strip_scheme<'a>(payload: &'a str, prefix: &str) -> Option<&'a str> {
    payload
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &payload[prefix.len()..])
}

fn split_query(rest: &str) -> (&str, Vec<(String, String)>) {
    match rest.split_once('?') {
        Some((path, query)) => (path, parse_query(query)),
        None => (rest, Vec::new()),
    }
}

fn non_empty(value: &str, field: &'static str) -> PayloadResult<String> {
    if value.is_empty() {
        Err(PayloadError::unparseable(field, format!("{} is missing", field)))
    } else {
        Ok(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCodec;

impl PaymentCodec {
    fn validate_url(url: &str) -> PayloadResult<()> {
        if char_len(url) > Limits::URL_MAX_CHARS {
            return Err(PayloadError::range(
                "url",
                format!("link must be at most {} characters", Limits::URL_MAX_CHARS),
            ));
        }
        if !Patterns::http_url().is_match(url) {
            return Err(PayloadError::format(
                "url",
                "link must start with http:// or https://",
            ));
        }
        if Patterns::suspicious_url().is_match(url) {
            warn!("payment link rejected for script content");
            return Err(PayloadError::format(
                "url",
                "link contains content that is not allowed",
            ));
        }
        Ok(())
    }

    fn validate_upi_name(name: &str) -> PayloadResult<()> {
        let len = char_len(name);
        if !(Limits::UPI_NAME_MIN_CHARS..=Limits::UPI_NAME_MAX_CHARS).contains(&len) {
            return Err(PayloadError::range(
                "name",
                format!(
                    "payee name must be {}-{} characters",
                    Limits::UPI_NAME_MIN_CHARS,
                    Limits::UPI_NAME_MAX_CHARS
                ),
            ));
        }
        if !Patterns::upi_name().is_match(name) {
            return Err(PayloadError::format(
                "name",
                "payee name may only contain letters, spaces and . ' -",
            ));
        }
        Ok(())
    }

    /// Parses a payload produced by [`PaymentCodec::encode`] (or a compatible
    /// generator). Optional parameters may be absent; values are not
    /// re-validated.
    pub fn decode(&self, payload: &str) -> PayloadResult<PaymentInstruction> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(PayloadError::missing("payload", "nothing to decode"));
        }

        let instruction = if let Some(rest) = strip_scheme(payload, "upi://pay") {
            let (_, query) = split_query(rest);
            PaymentInstruction::Upi {
                id: non_empty(query_value(&query, "pa").unwrap_or_default(), "pa")?,
                name: query_value(&query, "pn").unwrap_or_default().to_string(),
                amount: parse_amount(query_value(&query, "am"))?,
            }
        } else if let Some(rest) = strip_scheme(payload, "bitcoin:") {
            let (address, query) = split_query(rest);
            PaymentInstruction::Bitcoin {
                address: non_empty(address, "address")?,
                amount: parse_amount(query_value(&query, "amount"))?,
            }
        } else if let Some(rest) = strip_scheme(payload, "ethereum:") {
            let (target, query) = split_query(rest);
            // EIP-681 allows `pay-` and an `@chain_id` suffix.
            let target = target.strip_prefix("pay-").unwrap_or(target);
            let address = target.split(|c: char| c == '@' || c == '/').next().unwrap_or_default();
            PaymentInstruction::Ethereum {
                address: non_empty(address, "address")?,
                amount: parse_amount(query_value(&query, "value"))?,
            }
        } else if let Some(rest) = strip_scheme(payload, "iban:") {
            let (code, query) = split_query(rest);
            PaymentInstruction::Iban {
                code: non_empty(code, "code")?,
                beneficiary: query_value(&query, "beneficiary")
                    .unwrap_or_default()
                    .to_string(),
                amount: parse_amount(query_value(&query, "amount"))?,
            }
        } else if let Some(path) = Self::paypal_path(payload) {
            let mut segments = path.split('/').filter(|s| !s.is_empty());
            let username = segments.next().unwrap_or_default();
            // paypal.me amounts may carry a currency suffix, e.g. `25EUR`.
            let amount = segments
                .next()
                .map(|s| s.trim_end_matches(|c: char| c.is_ascii_alphabetic()));
            PaymentInstruction::Paypal {
                username: non_empty(username, "username")?,
                amount: parse_amount(amount)?,
            }
        } else if strip_scheme(payload, "https://").is_some()
            || strip_scheme(payload, "http://").is_some()
        {
            PaymentInstruction::Url {
                url: payload.to_string(),
            }
        } else {
            return Err(PayloadError::unparseable(
                "payload",
                "not a recognized payment link",
            ));
        };

        debug!(kind = %instruction.kind(), "decoded payment payload");
        Ok(instruction)
    }

    /// Path after `paypal.me/`, with or without scheme and `www.`.
    fn paypal_path(payload: &str) -> Option<&str> {
        let rest = strip_scheme(payload, "https://")
            .or_else(|| strip_scheme(payload, "http://"))
            .unwrap_or(payload);
        let rest = strip_scheme(rest, "www.").unwrap_or(rest);
        let rest = strip_scheme(rest, "paypal.me/")?;
        Some(rest.split(|c: char| c == '?' || c == '#').next().unwrap_or_default())
    }
}

impl PayloadCodec for PaymentCodec {
    type Input = PaymentInstruction;

    fn name(&self) -> &'static str {
        "payment"
    }

    fn validate(&self, input: &PaymentInstruction) -> PayloadResult<()> {
        match input {
            PaymentInstruction::Paypal { username, .. } => {
                let username = require(username, "username", "PayPal username")?;
                if !Patterns::paypal_username().is_match(username) {
                    return Err(PayloadError::format(
                        "username",
                        "PayPal username must be 3-50 letters, digits, '.', '_' or '-'",
                    ));
                }
            }
            PaymentInstruction::Bitcoin { address, .. } => {
                let address = require(address, "address", "Bitcoin address")?;
                if !Patterns::bitcoin_address().is_match(address) {
                    return Err(PayloadError::format(
                        "address",
                        "not a valid Bitcoin address",
                    ));
                }
            }
            PaymentInstruction::Ethereum { address, .. } => {
                let address = require(address, "address", "Ethereum address")?;
                if !Patterns::ethereum_address().is_match(address) {
                    return Err(PayloadError::format(
                        "address",
                        "Ethereum address must be 0x followed by 40 hex digits",
                    ));
                }
            }
            PaymentInstruction::Upi { id, name, .. } => {
                let id = require(id, "id", "UPI ID")?;
                if !Patterns::upi_id().is_match(id) {
                    return Err(PayloadError::format(
                        "id",
                        "UPI ID must look like name@bank",
                    ));
                }
                let name = require(name, "name", "payee name")?;
                Self::validate_upi_name(name)?;
            }
            PaymentInstruction::Iban {
                code, beneficiary, ..
            } => {
                require(code, "code", "IBAN")?;
                let code = IbanChecksum::normalize(code);
                if !Patterns::iban().is_match(&code) {
                    return Err(PayloadError::format(
                        "code",
                        "IBAN must be a country code, 2 check digits and 11-30 letters or digits",
                    ));
                }
                if !IbanChecksum::is_valid_checksum(&code) {
                    return Err(PayloadError::checksum(
                        "code",
                        "IBAN check digits do not match; check for typos",
                    ));
                }
                require(beneficiary, "beneficiary", "beneficiary name")?;
            }
            PaymentInstruction::Url { url } => {
                let url = require(url, "url", "payment link")?;
                Self::validate_url(url)?;
            }
        }

        validate_amount(input.kind(), input.amount())
    }

    fn render(&self, input: &PaymentInstruction) -> PayloadResult<String> {
        let payload = match input {
            PaymentInstruction::Paypal { username, amount } => {
                let mut link = format!("https://paypal.me/{}", username.trim());
                if let Some(amount) = amount {
                    link.push('/');
                    link.push_str(&format_amount(*amount));
                }
                link
            }
            PaymentInstruction::Bitcoin { address, amount } => {
                let mut uri = format!("bitcoin:{}", address.trim());
                if let Some(amount) = amount {
                    uri.push_str(&format!("?amount={}", format_amount(*amount)));
                }
                uri
            }
            PaymentInstruction::Ethereum { address, amount } => {
                let mut uri = format!("ethereum:{}", address.trim());
                if let Some(amount) = amount {
                    uri.push_str(&format!("?value={}", format_amount(*amount)));
                }
                uri
            }
            PaymentInstruction::Upi { id, name, amount } => {
                let mut uri = format!(
                    "upi://pay?pa={}&pn={}",
                    id.trim(),
                    encode_component(name.trim())
                );
                if let Some(amount) = amount {
                    uri.push_str(&format!("&am={}&cu=INR", format_amount(*amount)));
                }
                uri
            }
            PaymentInstruction::Iban {
                code,
                beneficiary,
                amount,
            } => {
                let mut uri = format!(
                    "iban:{}?beneficiary={}",
                    IbanChecksum::normalize(code),
                    encode_component(beneficiary.trim())
                );
                if let Some(amount) = amount {
                    uri.push_str(&format!("&amount={}&currency=EUR", format_amount(*amount)));
                }
                uri
            }
            PaymentInstruction::Url { url } => url.trim().to_string(),
        };

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_upi_encoding() {
        let upi = PaymentInstruction::Upi {
            id: "foo@bank".into(),
            name: "Jane Doe".into(),
            amount: Some(100.0),
        };
        assert_eq!(
            PaymentCodec.encode(&upi).unwrap(),
            "upi://pay?pa=foo@bank&pn=Jane%20Doe&am=100&cu=INR"
        );
    }

    #[test]
    fn test_paypal_with_amount() {
        let paypal = PaymentInstruction::Paypal {
            username: "jane.doe".into(),
            amount: Some(12.5),
        };
        assert_eq!(
            PaymentCodec.encode(&paypal).unwrap(),
            "https://paypal.me/jane.doe/12.5"
        );
    }

    #[test]
    fn test_iban_encoding_normalizes_code() {
        let iban = PaymentInstruction::Iban {
            code: "de89 3704 0044 0532 0130 00".into(),
            beneficiary: "Max Mustermann".into(),
            amount: None,
        };
        assert_eq!(
            PaymentCodec.encode(&iban).unwrap(),
            "iban:DE89370400440532013000?beneficiary=Max%20Mustermann"
        );
    }

    #[test]
    fn test_iban_checksum_error() {
        let iban = PaymentInstruction::Iban {
            code: "DE89370400440532013001".into(),
            beneficiary: "Max".into(),
            amount: None,
        };
        assert_eq!(
            PaymentCodec.validate(&iban).unwrap_err().kind(),
            ErrorKind::ChecksumInvalid
        );
    }

    #[test]
    fn test_amount_caps() {
        let over = PaymentInstruction::Bitcoin {
            address: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa".into(),
            amount: Some(21.5),
        };
        assert_eq!(
            PaymentCodec.validate(&over).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );

        let zero = PaymentInstruction::Ethereum {
            address: "0x742d35Cc6634C0532925a3b844Bc454e4438f44e".into(),
            amount: Some(0.0),
        };
        assert_eq!(
            PaymentCodec.validate(&zero).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_suspicious_url_rejected() {
        let url = PaymentInstruction::Url {
            url: "https://example.com/?next=javascript:alert(1)".into(),
        };
        assert_eq!(
            PaymentCodec.validate(&url).unwrap_err().kind(),
            ErrorKind::FormatInvalid
        );
    }

    #[test]
    fn test_link_with_on_prefixed_keys_accepted() {
        for link in [
            "https://shop.example/pay?online=true",
            "https://shop.example/pay?one=1",
        ] {
            let url = PaymentInstruction::Url { url: link.into() };
            assert_eq!(PaymentCodec.encode(&url).unwrap(), link);
        }
    }

    #[test]
    fn test_decode_tolerates_missing_params() {
        assert_eq!(
            PaymentCodec.decode("upi://pay?pa=foo@bank").unwrap(),
            PaymentInstruction::Upi {
                id: "foo@bank".into(),
                name: String::new(),
                amount: None,
            }
        );
        assert_eq!(
            PaymentCodec
                .decode("bitcoin:1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
                .unwrap(),
            PaymentInstruction::Bitcoin {
                address: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa".into(),
                amount: None,
            }
        );
    }

    #[test]
    fn test_decode_eip681_target() {
        assert_eq!(
            PaymentCodec
                .decode("ethereum:pay-0x742d35Cc6634C0532925a3b844Bc454e4438f44e@1?value=2")
                .unwrap(),
            PaymentInstruction::Ethereum {
                address: "0x742d35Cc6634C0532925a3b844Bc454e4438f44e".into(),
                amount: Some(2.0),
            }
        );
    }

    #[test]
    fn test_decode_paypal_currency_suffix() {
        assert_eq!(
            PaymentCodec.decode("paypal.me/janedoe/25EUR").unwrap(),
            PaymentInstruction::Paypal {
                username: "janedoe".into(),
                amount: Some(25.0),
            }
        );
    }

    #[test]
    fn test_decode_unknown_scheme() {
        assert_eq!(
            PaymentCodec.decode("litecoin:abc").unwrap_err().kind(),
            ErrorKind::Unparseable
        );
        assert_eq!(
            PaymentCodec.decode("bitcoin:1abc?amount=lots").unwrap_err().kind(),
            ErrorKind::Unparseable
        );
    }
}
