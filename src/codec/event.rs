//! Calendar events as a single iCalendar `VEVENT`.

use super::PayloadCodec;
use crate::domain::{present, Patterns};
use crate::error::{PayloadError, PayloadResult};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PRODID: &str = "-//qrpayload//Event Codec//EN";

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Free text, optionally `Name <email>`.
    pub organizer: Option<String>,
    pub url: Option<String>,
}

/// Zone the event's wall-clock times are given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

/// Encodes [`CalendarEvent`]s.
///
/// Timed events are converted from `zone` to UTC. `DTSTAMP` and the `UID`
/// come from the system clock unless a fixed clock is set.
#[derive(Debug, Clone, Default)]
pub struct EventCodec {
    zone: EventZone,
    clock: Option<DateTime<Utc>>,
}

/// Escapes SUMMARY/DESCRIPTION/LOCATION text. Backslash first, so the
/// backslashes added afterwards survive; carriage returns are dropped.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\r', "")
        .replace('\n', "\\n")
}

fn sanitize_cn(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '"' | '<' | '>' | '\r' | '\n'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn placeholder_mailbox(name: &str) -> String {
    let local: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if local.is_empty() {
        "organizer@example.invalid".to_string()
    } else {
        format!("{}@example.invalid", local.join("."))
    }
}

/// Builds the ORGANIZER property from a free-text field.
///
/// An email-looking token becomes the MAILTO and the rest of the text the
/// common name. Without one, the text is used as the name with a
/// placeholder mailbox derived from it.
pub fn organizer_line(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let line = match Patterns::email_token().find(raw) {
        Some(token) => {
            let email = token.as_str();
            let rest = format!("{}{}", &raw[..token.start()], &raw[token.end()..]);
            let name = sanitize_cn(&rest);
            let name = if name.is_empty() { email.to_string() } else { name };
            format!("ORGANIZER;CN=\"{}\":MAILTO:{}", name, email)
        }
        None => {
            let name = sanitize_cn(raw);
            format!(
                "ORGANIZER;CN=\"{}\":MAILTO:{}",
                name,
                placeholder_mailbox(&name)
            )
        }
    };
    Some(line)
}

impl EventCodec {
    pub fn new(zone: EventZone) -> Self {
        Self { zone, clock: None }
    }

    /// Uses `now` for `DTSTAMP` and the UID timestamp instead of the system clock.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn zone(&self) -> EventZone {
        self.zone
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    fn required_dates(input: &CalendarEvent) -> PayloadResult<(NaiveDate, NaiveDate)> {
        let start = input
            .start_date
            .ok_or_else(|| PayloadError::missing("start_date", "a start date is required"))?;
        let end = input
            .end_date
            .ok_or_else(|| PayloadError::missing("end_date", "an end date is required"))?;
        Ok((start, end))
    }

    fn required_times(input: &CalendarEvent) -> PayloadResult<(NaiveTime, NaiveTime)> {
        let start = input
            .start_time
            .ok_or_else(|| PayloadError::missing("start_time", "a start time is required"))?;
        let end = input
            .end_time
            .ok_or_else(|| PayloadError::missing("end_time", "an end time is required"))?;
        Ok((start, end))
    }

    /// Interprets `date` + `time` in the codec's zone and converts to UTC.
    pub fn to_utc(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        field: &'static str,
    ) -> PayloadResult<DateTime<Utc>> {
        let naive = date.and_time(time);
        let resolved = match self.zone {
            EventZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            EventZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        };
        resolved.ok_or_else(|| {
            PayloadError::range(field, format!("{} does not exist in the event time zone", naive))
        })
    }

    fn uid(now: DateTime<Utc>) -> String {
        format!(
            "{}-{}@qrpayload",
            now.timestamp_millis(),
            Uuid::new_v4().simple()
        )
    }
}

impl PayloadCodec for EventCodec {
    type Input = CalendarEvent;

    fn name(&self) -> &'static str {
        "event"
    }

    fn validate(&self, input: &CalendarEvent) -> PayloadResult<()> {
        let (start_date, end_date) = Self::required_dates(input)?;
        if end_date < start_date {
            return Err(PayloadError::range(
                "end_date",
                "end date cannot be before start date",
            ));
        }

        if input.title.trim().is_empty() {
            return Err(PayloadError::missing("title", "an event title is required"));
        }

        if !input.all_day {
            let (start_time, end_time) = Self::required_times(input)?;
            if start_date == end_date && end_time <= start_time {
                return Err(PayloadError::range(
                    "end_time",
                    "end time must be after start time",
                ));
            }
        }

        Ok(())
    }

    fn render(&self, input: &CalendarEvent) -> PayloadResult<String> {
        let (start_date, end_date) = Self::required_dates(input)?;
        let now = self.now();

        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODID),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", Self::uid(now)),
            format!("DTSTAMP:{}", now.format(UTC_FORMAT)),
        ];

        if input.all_day {
            // DTEND is exclusive for date values.
            let day_after = end_date
                .succ_opt()
                .ok_or_else(|| PayloadError::range("end_date", "end date is out of range"))?;
            lines.push(format!("DTSTART;VALUE=DATE:{}", start_date.format(DATE_FORMAT)));
            lines.push(format!("DTEND;VALUE=DATE:{}", day_after.format(DATE_FORMAT)));
        } else {
            let (start_time, end_time) = Self::required_times(input)?;
            let start = self.to_utc(start_date, start_time, "start_time")?;
            let end = self.to_utc(end_date, end_time, "end_time")?;
            lines.push(format!("DTSTART:{}", start.format(UTC_FORMAT)));
            lines.push(format!("DTEND:{}", end.format(UTC_FORMAT)));
        }

        lines.push(format!("SUMMARY:{}", escape_text(input.title.trim())));

        if let Some(description) = present(&input.description) {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(location) = present(&input.location) {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(organizer) = input.organizer.as_deref().and_then(organizer_line) {
            lines.push(organizer);
        }
        if let Some(url) = present(&input.url) {
            lines.push(format!("URL:{}", url));
        }

        lines.push("STATUS:CONFIRMED".to_string());
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        Ok(lines.join("\r\n"))
    }
}
