//! Payload codecs, one per tool.
//!
//! Each codec validates a structured value and renders it into the wire
//! grammar a QR scanner understands. [`EncodingRequest`] ties them together
//! behind a single tagged type for callers that do not know ahead of time
//! which tool a submission came from.

pub mod contact;
pub mod email;
pub mod event;
pub mod geo;
pub mod messaging;
pub mod payment;
pub mod text;
pub mod wifi;

pub use contact::{ContactCard, ContactCodec};
pub use email::{EmailCodec, EmailIntent};
pub use event::{CalendarEvent, EventCodec, EventZone};
pub use geo::{Coordinate, GeoCodec};
pub use messaging::{MessagingCodec, MessagingIntent, MessagingPlatform};
pub use payment::{PaymentCodec, PaymentInstruction, PaymentKind};
pub use text::{Complexity, ComplexityLevel, PlainText, TextCodec};
pub use wifi::{WifiCodec, WifiCredentials, WifiSecurity};

use crate::error::PayloadResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A codec turning one kind of structured input into a QR payload string.
///
/// Implementations are stateless (or hold only immutable configuration), so
/// a single instance can serve concurrent callers.
pub trait PayloadCodec: Send + Sync {
    type Input;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Checks every invariant of `input` without producing output.
    fn validate(&self, input: &Self::Input) -> PayloadResult<()>;

    /// Builds the payload. Callers go through [`PayloadCodec::encode`],
    /// which validates first.
    fn render(&self, input: &Self::Input) -> PayloadResult<String>;

    /// Validates, then renders.
    fn encode(&self, input: &Self::Input) -> PayloadResult<String> {
        self.validate(input)?;
        let payload = self.render(input)?;
        debug!(codec = self.name(), bytes = payload.len(), "encoded payload");
        Ok(payload)
    }
}

/// One submission from any of the tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum EncodingRequest {
    Wifi(WifiCredentials),
    Contact(ContactCard),
    Event(CalendarEvent),
    Geo(Coordinate),
    Messaging(MessagingIntent),
    Email(EmailIntent),
    Payment(PaymentInstruction),
    Text(PlainText),
}

impl EncodingRequest {
    pub fn tool(&self) -> &'static str {
        match self {
            Self::Wifi(_) => "wifi",
            Self::Contact(_) => "contact",
            Self::Event(_) => "event",
            Self::Geo(_) => "geo",
            Self::Messaging(_) => "messaging",
            Self::Email(_) => "email",
            Self::Payment(_) => "payment",
            Self::Text(_) => "text",
        }
    }

    /// Validates without encoding.
    pub fn validate(&self) -> PayloadResult<()> {
        match self {
            Self::Wifi(input) => WifiCodec.validate(input),
            Self::Contact(input) => ContactCodec.validate(input),
            Self::Event(input) => EventCodec::default().validate(input),
            Self::Geo(input) => GeoCodec.validate(input),
            Self::Messaging(input) => MessagingCodec::default().validate(input),
            Self::Email(input) => EmailCodec.validate(input),
            Self::Payment(input) => PaymentCodec.validate(input),
            Self::Text(input) => TextCodec::default().validate(input),
        }
    }

    /// Encodes with default codec settings.
    pub fn encode(&self) -> PayloadResult<String> {
        self.encode_with(&EventCodec::default())
    }

    /// Encodes, using `events` for calendar entries so the caller controls
    /// the time zone.
    pub fn encode_with(&self, events: &EventCodec) -> PayloadResult<String> {
        match self {
            Self::Wifi(input) => WifiCodec.encode(input),
            Self::Contact(input) => ContactCodec.encode(input),
            Self::Event(input) => events.encode(input),
            Self::Geo(input) => GeoCodec.encode(input),
            Self::Messaging(input) => MessagingCodec::default().encode(input),
            Self::Email(input) => EmailCodec.encode(input),
            Self::Payment(input) => PaymentCodec.encode(input),
            Self::Text(input) => TextCodec::default().encode(input),
        }
    }
}
