//! Structured-data payloads for QR codes.
//!
//! This library turns structured input (a Wi-Fi network, a contact, a
//! calendar event, a location, a messaging or email intent, a payment
//! instruction, or plain text) into the text payload a QR scanner expects.
//! Rendering the symbol itself is left to an external renderer.
//!
//! # Features
//!
//! - **Wire-exact encoders**: `WIFI:`, vCard 3.0, iCalendar 2.0, `geo:`,
//!   `SMSTO:`/`tel:`/wa.me, `mailto:` and six payment URI grammars
//! - **Validation**: every codec checks its input against one shared rule
//!   table before encoding, including the IBAN mod-97 checksum
//! - **Decoding**: map links back to coordinates, payment payloads back to
//!   structured instructions
//!
//! # Architecture
//!
//! - [`domain`]: normalizers, checksum and the shared pattern/limit table
//! - [`codec`]: one [`PayloadCodec`] per tool and the [`EncodingRequest`] union
//! - [`render`]: contracts for the external renderer and exporter
//! - [`error`]: typed failures grouped by [`ErrorKind`]
//!
//! # Quick Start
//!
//! ```
//! use qrpayload::{PayloadCodec, WifiCodec, WifiCredentials, WifiSecurity};
//!
//! let creds = WifiCredentials::new("Home", Some("password123"), WifiSecurity::Wpa);
//! let payload = WifiCodec.encode(&creds).unwrap();
//! assert_eq!(payload, "WIFI:T:WPA;S:Home;P:password123;H:false;;");
//! ```
//!
//! # Examples
//!
//! ## Map link to geo URI
//!
//! ```
//! use qrpayload::{GeoCodec, PayloadCodec};
//!
//! let point = GeoCodec
//!     .parse_maps_url("https://www.google.com/maps/@40.7128,-74.0060,15z")
//!     .unwrap();
//! assert_eq!(GeoCodec.encode(&point).unwrap(), "geo:40.712800,-74.006000");
//! ```
//!
//! ## Payments
//!
//! ```
//! use qrpayload::{ErrorKind, PaymentCodec, PaymentInstruction, PayloadCodec};
//!
//! let upi = PaymentInstruction::Upi {
//!     id: "foo@bank".into(),
//!     name: "Jane Doe".into(),
//!     amount: Some(100.0),
//! };
//! assert_eq!(
//!     PaymentCodec.encode(&upi).unwrap(),
//!     "upi://pay?pa=foo@bank&pn=Jane%20Doe&am=100&cu=INR"
//! );
//!
//! let bad = PaymentInstruction::Bitcoin { address: "not-an-address".into(), amount: None };
//! assert_eq!(PaymentCodec.validate(&bad).unwrap_err().kind(), ErrorKind::FormatInvalid);
//! ```

pub mod codec;
pub mod domain;
pub mod error;
pub mod render;

pub use codec::{
    CalendarEvent, Complexity, ComplexityLevel, ContactCard, ContactCodec, Coordinate,
    EmailCodec, EmailIntent, EncodingRequest, EventCodec, EventZone, GeoCodec, MessagingCodec,
    MessagingIntent, MessagingPlatform, PayloadCodec, PaymentCodec, PaymentInstruction,
    PaymentKind, PlainText, TextCodec, WifiCodec, WifiCredentials, WifiSecurity,
};
pub use domain::{IbanChecksum, PhoneNormalizer, TextNormalizer};
pub use error::{ErrorKind, PayloadError, PayloadResult};
pub use render::{PayloadService, RenderOptions, SymbolRenderer};
