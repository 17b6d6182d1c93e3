//! Error handling tests.
//!
//! These tests verify every error variant, its display text, and that codec
//! failures surface the field and kind a form needs to highlight the input.

use qrpayload::{
    CalendarEvent, ContactCard, Coordinate, ErrorKind, EventCodec, GeoCodec, PayloadCodec,
    PayloadError, PayloadResult, PaymentCodec, PaymentInstruction,
};
use std::error::Error as StdError;

mod common;
use common::*;

/// Tests display formatting for all variants so that user-facing messages
/// name both the field and the problem.
#[test]
fn test_display_for_every_variant() {
    let cases = [
        (
            PayloadError::missing("ssid", "network name is required"),
            "missing required field 'ssid': network name is required",
        ),
        (
            PayloadError::format("address", "not a bitcoin address"),
            "invalid format for 'address': not a bitcoin address",
        ),
        (
            PayloadError::range("amount", "must be at most 21"),
            "'amount' out of range: must be at most 21",
        ),
        (
            PayloadError::checksum("iban", "check digits do not match"),
            "checksum failed for 'iban': check digits do not match",
        ),
        (
            PayloadError::short_url("url", "open the link first"),
            "short URL not supported for 'url': open the link first",
        ),
        (
            PayloadError::unparseable("payload", "unknown scheme"),
            "could not parse 'payload': unknown scheme",
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn test_kind_field_and_message_accessors() {
    let err = PayloadError::range("latitude", "latitude 91 must be between -90 and 90");
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
    assert_eq!(err.field(), "latitude");
    assert_eq!(err.message(), "latitude 91 must be between -90 and 90");
}

#[test]
fn test_kind_identifiers_are_distinct() {
    let kinds = [
        ErrorKind::MissingRequiredField,
        ErrorKind::FormatInvalid,
        ErrorKind::OutOfRange,
        ErrorKind::ChecksumInvalid,
        ErrorKind::ShortUrlNotSupported,
        ErrorKind::Unparseable,
    ];
    let ids: std::collections::HashSet<&str> = kinds.iter().map(ErrorKind::as_str).collect();
    assert_eq!(ids.len(), kinds.len());
    assert_eq!(ErrorKind::ChecksumInvalid.as_str(), "ChecksumInvalid");
}

#[test]
fn test_is_std_error_without_source() {
    let err = PayloadError::missing("title", "a title is required");
    let dyn_err: &dyn StdError = &err;
    assert!(dyn_err.source().is_none());
}

#[test]
fn test_converts_into_anyhow() {
    fn fails() -> anyhow::Result<()> {
        Err(PayloadError::checksum("iban", "bad check digits"))?;
        Ok(())
    }

    let err = fails().unwrap_err();
    let inner = err
        .downcast_ref::<PayloadError>()
        .expect("payload error preserved");
    assert_eq!(inner.kind(), ErrorKind::ChecksumInvalid);
}

#[test]
fn test_errors_compare_by_value() {
    assert_eq!(
        PayloadError::missing("ssid", "x"),
        PayloadError::missing("ssid", "x")
    );
    assert_ne!(
        PayloadError::missing("ssid", "x"),
        PayloadError::format("ssid", "x")
    );
}

#[test]
fn test_result_alias_propagates_with_question_mark() {
    fn check(point: &str) -> PayloadResult<String> {
        let coordinate: Coordinate = point.parse()?;
        GeoCodec.encode(&coordinate)
    }

    assert_eq!(check("1.5,2.5").unwrap(), "geo:1.500000,2.500000");
    assert_error_kind(check("1.5"), ErrorKind::Unparseable);
    assert_error_kind(check("95,0"), ErrorKind::OutOfRange);
}

/// Failures raised by codecs carry the field the caller filled in.
mod codec_failures {
    use super::*;

    #[test]
    fn test_contact_without_name() {
        assert_field_error(
            qrpayload::ContactCodec.validate(&ContactCard::default()),
            "first_name",
            ErrorKind::MissingRequiredField,
        );
    }

    #[test]
    fn test_event_missing_dates_reported_before_title() {
        let event = CalendarEvent::default();
        assert_error_kind(
            EventCodec::default().validate(&event),
            ErrorKind::MissingRequiredField,
        );
    }

    #[test]
    fn test_iban_checksum_is_its_own_kind() {
        assert_field_error(
            PaymentCodec.validate(&iban("DE88370400440532013000")),
            "code",
            ErrorKind::ChecksumInvalid,
        );
    }

    #[test]
    fn test_iban_shape_is_format() {
        assert_field_error(
            PaymentCodec.validate(&iban("12345")),
            "code",
            ErrorKind::FormatInvalid,
        );
    }

    #[test]
    fn test_short_map_link() {
        assert_error_kind(
            GeoCodec.parse_maps_url("https://maps.app.goo.gl/abc123"),
            ErrorKind::ShortUrlNotSupported,
        );
    }

    #[test]
    fn test_unparseable_payment() {
        assert_error_kind(
            PaymentCodec.decode("ftp://example.com/pay"),
            ErrorKind::Unparseable,
        );
    }

    #[test]
    fn test_amount_cap_message_names_limit() {
        let err = PaymentCodec
            .validate(&PaymentInstruction::Ethereum {
                address: ETHEREUM_ADDRESS.to_string(),
                amount: Some(1000.5),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), "amount");
        assert!(err.message().contains("1000"), "{}", err);
    }
}
