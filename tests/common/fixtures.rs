//! Test fixtures.
//!
//! Builders for valid requests of every tool, so tests only spell out the
//! field they are interested in.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use qrpayload::{
    CalendarEvent, ContactCard, EventCodec, EventZone, PaymentInstruction, WifiCredentials,
    WifiSecurity,
};

pub const BITCOIN_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
pub const ETHEREUM_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const VALID_IBAN: &str = "DE89370400440532013000";

pub fn wpa(ssid: &str, password: &str) -> WifiCredentials {
    WifiCredentials::new(ssid, Some(password), WifiSecurity::Wpa)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Event codec pinned to UTC and a fixed clock.
pub fn utc_event_codec() -> EventCodec {
    EventCodec::new(EventZone::Fixed(FixedOffset::east_opt(0).expect("zero offset")))
        .with_clock(fixed_clock())
}

/// A one-hour timed event on 2025-06-01.
pub fn meeting() -> CalendarEvent {
    CalendarEvent {
        title: "Planning".to_string(),
        start_date: Some(date(2025, 6, 1)),
        start_time: Some(time(14, 0)),
        end_date: Some(date(2025, 6, 1)),
        end_time: Some(time(15, 0)),
        ..Default::default()
    }
}

pub fn contact(first: &str, last: &str) -> ContactCard {
    ContactCard {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        ..Default::default()
    }
}

pub fn bitcoin(amount: Option<f64>) -> PaymentInstruction {
    PaymentInstruction::Bitcoin {
        address: BITCOIN_ADDRESS.to_string(),
        amount,
    }
}

pub fn iban(code: &str) -> PaymentInstruction {
    PaymentInstruction::Iban {
        code: code.to_string(),
        beneficiary: "Max Mustermann".to_string(),
        amount: None,
    }
}
