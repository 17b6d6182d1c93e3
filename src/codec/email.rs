//! Email intents as `mailto:` URIs.

use super::PayloadCodec;
use crate::domain::percent::encode_component;
use crate::domain::{char_len, non_blank, Limits, Patterns};
use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailIntent {
    pub recipient: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl EmailIntent {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            ..Default::default()
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailCodec;

impl EmailCodec {
    /// Shape plus the SMTP path length limits (254 total, 64 local, 253 domain).
    pub fn validate_address(address: &str) -> PayloadResult<()> {
        if !Patterns::email().is_match(address) {
            return Err(PayloadError::format(
                "recipient",
                "enter a valid email address",
            ));
        }

        if char_len(address) > Limits::EMAIL_MAX_CHARS {
            return Err(PayloadError::range(
                "recipient",
                format!(
                    "email address must be at most {} characters",
                    Limits::EMAIL_MAX_CHARS
                ),
            ));
        }

        // The shape check guarantees exactly one '@'.
        let (local, domain) = address.split_once('@').unwrap_or((address, ""));
        if char_len(local) > Limits::EMAIL_LOCAL_MAX_CHARS {
            return Err(PayloadError::range(
                "recipient",
                format!(
                    "the part before '@' must be at most {} characters",
                    Limits::EMAIL_LOCAL_MAX_CHARS
                ),
            ));
        }
        if char_len(domain) > Limits::EMAIL_DOMAIN_MAX_CHARS {
            return Err(PayloadError::range(
                "recipient",
                format!(
                    "the domain must be at most {} characters",
                    Limits::EMAIL_DOMAIN_MAX_CHARS
                ),
            ));
        }

        Ok(())
    }

    fn check_length(field: &'static str, value: &Option<String>, max: usize) -> PayloadResult<()> {
        match non_blank(value) {
            Some(v) if char_len(v) > max => Err(PayloadError::range(
                field,
                format!("{} must be at most {} characters", field, max),
            )),
            _ => Ok(()),
        }
    }
}

impl PayloadCodec for EmailCodec {
    type Input = EmailIntent;

    fn name(&self) -> &'static str {
        "email"
    }

    fn validate(&self, input: &EmailIntent) -> PayloadResult<()> {
        let recipient = input.recipient.trim();
        if recipient.is_empty() {
            return Err(PayloadError::missing(
                "recipient",
                "a recipient address is required",
            ));
        }
        Self::validate_address(recipient)?;
        Self::check_length("subject", &input.subject, Limits::EMAIL_SUBJECT_MAX_CHARS)?;
        Self::check_length("body", &input.body, Limits::EMAIL_BODY_MAX_CHARS)?;
        Ok(())
    }

    fn render(&self, input: &EmailIntent) -> PayloadResult<String> {
        let mut payload = format!("mailto:{}", encode_component(input.recipient.trim()));

        let params: Vec<String> = [("subject", &input.subject), ("body", &input.body)]
            .into_iter()
            .filter_map(|(key, value)| {
                non_blank(value).map(|v| format!("{}={}", key, encode_component(v)))
            })
            .collect();

        if !params.is_empty() {
            payload.push('?');
            payload.push_str(&params.join("&"));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_recipient_only() {
        let intent = EmailIntent::new("jane@example.com");
        assert_eq!(
            EmailCodec.encode(&intent).unwrap(),
            "mailto:jane%40example.com"
        );
    }

    #[test]
    fn test_subject_and_body() {
        let intent = EmailIntent::new("jane@example.com")
            .subject("Hello there")
            .body("Line 1\nLine 2");
        assert_eq!(
            EmailCodec.encode(&intent).unwrap(),
            "mailto:jane%40example.com?subject=Hello%20there&body=Line%201%0ALine%202"
        );
    }

    #[test]
    fn test_body_without_subject() {
        let intent = EmailIntent::new("jane@example.com").subject("").body("Hi");
        assert_eq!(
            EmailCodec.encode(&intent).unwrap(),
            "mailto:jane%40example.com?body=Hi"
        );
    }

    #[test]
    fn test_subject_padding_kept() {
        let intent = EmailIntent::new("jane@example.com")
            .subject(" Hi ")
            .body("   ");
        assert_eq!(
            EmailCodec.encode(&intent).unwrap(),
            "mailto:jane%40example.com?subject=%20Hi%20"
        );
    }

    #[test]
    fn test_invalid_recipient() {
        let err = EmailCodec
            .validate(&EmailIntent::new("not-an-email"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatInvalid);
    }

    #[test]
    fn test_local_part_limit() {
        let address = format!("{}@example.com", "a".repeat(65));
        let err = EmailCodec.validate(&EmailIntent::new(address)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_subject_limit() {
        let intent = EmailIntent::new("jane@example.com").subject("s".repeat(101));
        let err = EmailCodec.validate(&intent).unwrap_err();
        assert_eq!(err.field(), "subject");
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }
}
