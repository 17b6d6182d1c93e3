//! SMS, WhatsApp and phone-call intents.

use super::PayloadCodec;
use crate::domain::percent::encode_component;
use crate::domain::{char_len, non_blank, Limits, PhoneNormalizer};
use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingPlatform {
    Sms,
    Whatsapp,
    Phone,
}

impl MessagingPlatform {
    /// Whether the platform carries a prefilled message.
    pub fn supports_message(&self) -> bool {
        !matches!(self, Self::Phone)
    }
}

impl FromStr for MessagingPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sms" => Ok(Self::Sms),
            "whatsapp" => Ok(Self::Whatsapp),
            "phone" | "tel" | "call" => Ok(Self::Phone),
            other => Err(format!("unknown messaging platform '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingIntent {
    pub platform: MessagingPlatform,
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessagingIntent {
    pub fn new(platform: MessagingPlatform, phone: impl Into<String>) -> Self {
        Self {
            platform,
            phone: phone.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessagingCodec {
    normalizer: PhoneNormalizer,
}

impl MessagingCodec {
    pub fn normalize_phone(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    fn message<'a>(&self, input: &'a MessagingIntent) -> Option<&'a str> {
        if input.platform.supports_message() {
            non_blank(&input.message)
        } else {
            None
        }
    }
}

impl PayloadCodec for MessagingCodec {
    type Input = MessagingIntent;

    fn name(&self) -> &'static str {
        "messaging"
    }

    fn validate(&self, input: &MessagingIntent) -> PayloadResult<()> {
        if input.phone.trim().is_empty() {
            return Err(PayloadError::missing("phone", "a phone number is required"));
        }

        let phone = self.normalize_phone(&input.phone);
        if !PhoneNormalizer::validate(&phone) {
            return Err(PayloadError::format(
                "phone",
                format!(
                    "phone number must have {}-{} digits",
                    Limits::PHONE_MIN_DIGITS,
                    Limits::PHONE_MAX_DIGITS
                ),
            ));
        }

        if let Some(message) = self.message(input) {
            if char_len(message) > Limits::MESSAGE_MAX_CHARS {
                return Err(PayloadError::range(
                    "message",
                    format!(
                        "message must be at most {} characters",
                        Limits::MESSAGE_MAX_CHARS
                    ),
                ));
            }
        }

        Ok(())
    }

    fn render(&self, input: &MessagingIntent) -> PayloadResult<String> {
        let phone = self.normalize_phone(&input.phone);
        let message = self.message(input);

        let payload = match input.platform {
            MessagingPlatform::Sms => format!(
                "SMSTO:{}:{}",
                phone,
                message.map(encode_component).unwrap_or_default()
            ),
            MessagingPlatform::Whatsapp => {
                let mut link = format!("https://wa.me/{}", PhoneNormalizer::digits_only(&phone));
                if let Some(message) = message {
                    link.push_str("?text=");
                    link.push_str(&encode_component(message));
                }
                link
            }
            MessagingPlatform::Phone => format!("tel:{}", phone),
        };

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_sms() {
        let intent =
            MessagingIntent::new(MessagingPlatform::Sms, "555-123-4567").with_message("On my way!");
        assert_eq!(
            MessagingCodec::default().encode(&intent).unwrap(),
            "SMSTO:+15551234567:On%20my%20way!"
        );
    }

    #[test]
    fn test_sms_without_message() {
        let intent = MessagingIntent::new(MessagingPlatform::Sms, "+44 20 7946 0958");
        assert_eq!(
            MessagingCodec::default().encode(&intent).unwrap(),
            "SMSTO:+442079460958:"
        );
    }

    #[test]
    fn test_message_sent_as_typed() {
        let codec = MessagingCodec::default();
        let intent =
            MessagingIntent::new(MessagingPlatform::Sms, "5551234567").with_message("  hi  ");
        assert_eq!(
            codec.encode(&intent).unwrap(),
            "SMSTO:+15551234567:%20%20hi%20%20"
        );

        let blank = intent.with_message(" \n ");
        assert_eq!(codec.encode(&blank).unwrap(), "SMSTO:+15551234567:");
    }

    #[test]
    fn test_whatsapp() {
        let codec = MessagingCodec::default();
        let intent = MessagingIntent::new(MessagingPlatform::Whatsapp, "5551234567");
        assert_eq!(codec.encode(&intent).unwrap(), "https://wa.me/15551234567");

        let intent = intent.with_message("Hi & bye");
        assert_eq!(
            codec.encode(&intent).unwrap(),
            "https://wa.me/15551234567?text=Hi%20%26%20bye"
        );
    }

    #[test]
    fn test_phone_ignores_message() {
        let intent = MessagingIntent::new(MessagingPlatform::Phone, "5551234567")
            .with_message("x".repeat(500));
        assert_eq!(
            MessagingCodec::default().encode(&intent).unwrap(),
            "tel:+15551234567"
        );
    }

    #[test]
    fn test_message_limit() {
        let codec = MessagingCodec::default();
        let ok = MessagingIntent::new(MessagingPlatform::Sms, "5551234567")
            .with_message("a".repeat(160));
        assert!(codec.validate(&ok).is_ok());

        let long = ok.with_message("a".repeat(161));
        assert_eq!(
            codec.validate(&long).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_phone_digit_range() {
        let codec = MessagingCodec::default();
        let short = MessagingIntent::new(MessagingPlatform::Phone, "12345");
        assert_eq!(
            codec.validate(&short).unwrap_err().kind(),
            ErrorKind::FormatInvalid
        );
        let blank = MessagingIntent::new(MessagingPlatform::Phone, "  ");
        assert_eq!(
            codec.validate(&blank).unwrap_err().kind(),
            ErrorKind::MissingRequiredField
        );
    }
}
