//! Locations: map URL parsing and `geo:` URIs.
//!
//! [`GeoCodec::parse_maps_url`] pulls coordinates out of a link pasted from a
//! maps application. Extraction patterns are tried in a fixed priority
//! order, and the first that matches wins, so the order below decides which
//! pair is used when a URL carries several.

use super::PayloadCodec;
use crate::error::{PayloadError, PayloadResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Range check: latitude within ±90, longitude within ±180.
    pub fn validate(&self) -> PayloadResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PayloadError::range(
                "latitude",
                format!("latitude {} must be between -90 and 90", self.latitude),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PayloadError::range(
                "longitude",
                format!("longitude {} must be between -180 and 180", self.longitude),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6},{:.6}",
            unsigned_zero(self.latitude),
            unsigned_zero(self.longitude)
        )
    }
}

/// Values that print as zero at six places lose their sign.
fn unsigned_zero(value: f64) -> f64 {
    if (value * 1e6).round() == 0.0 {
        0.0
    } else {
        value
    }
}

/// Parses `"lat,lon"` or `"lat, lon"`.
impl FromStr for Coordinate {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| PayloadError::unparseable("coordinates", "expected 'lat,lon'"))?;
        let coordinate = Coordinate::new(
            parse_component(lat.trim(), "latitude")?,
            parse_component(lon.trim(), "longitude")?,
        );
        coordinate.validate()?;
        Ok(coordinate)
    }
}

fn parse_component(raw: &str, field: &'static str) -> PayloadResult<f64> {
    raw.parse::<f64>()
        .map_err(|_| PayloadError::unparseable(field, format!("'{}' is not a number", raw)))
}

/// One extraction rule; group 1 is latitude, group 2 longitude.
struct UrlPattern {
    name: &'static str,
    regex: Regex,
}

const NUMBER: &str = r"(-?\d+(?:\.\d+)?)";
const COMMA: &str = r"(?:,|%2C|%2c)\s*";

fn url_patterns() -> &'static [UrlPattern] {
    static PATTERNS: Lazy<Vec<UrlPattern>> = Lazy::new(|| {
        let rule = |name: &'static str, pattern: String| UrlPattern {
            name,
            regex: Regex::new(&pattern).expect("Valid map URL regex"),
        };
        vec![
            rule("query", format!(r"[?&]q={}{}{}", NUMBER, COMMA, NUMBER)),
            rule("at", format!(r"@{},{}(?:,[\d.]+[a-z]?)?", NUMBER, NUMBER)),
            rule("path", format!(r"/{},{}(?:[/?#]|$)", NUMBER, NUMBER)),
            rule("ll", format!(r"[?&]ll={}{}{}", NUMBER, COMMA, NUMBER)),
            rule("center", format!(r"[?&]center={}{}{}", NUMBER, COMMA, NUMBER)),
            // Two high-precision decimals anywhere. Can pick up unrelated
            // numbers, so it must stay last.
            rule("fallback", r"(-?\d{1,3}\.\d{4,}),\s*(-?\d{1,3}\.\d{4,})".to_string()),
        ]
    });
    &PATTERNS
}

fn short_link() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(concat!(
            r"(?i)^(?:https?://)?",
            r"(?:maps\.app\.goo\.gl|goo\.gl/maps|g\.co/kgs|maps\.apple\.co)(?:/|$)"
        ))
        .expect("Valid short link regex")
    });
    &PATTERN
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeoCodec;

impl GeoCodec {
    /// Extracts coordinates from a maps URL.
    ///
    /// Shortened links are rejected with `ShortUrlNotSupported`; resolving
    /// them needs a network round trip the caller has to make.
    pub fn parse_maps_url(&self, url: &str) -> PayloadResult<Coordinate> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PayloadError::missing("url", "a map link is required"));
        }

        if short_link().is_match(url) {
            warn!(url, "short map link rejected");
            return Err(PayloadError::short_url(
                "url",
                "shortened map links cannot be read; open the link and copy the full URL",
            ));
        }

        for pattern in url_patterns() {
            if let Some(caps) = pattern.regex.captures(url) {
                let coordinate = Coordinate::new(
                    parse_component(&caps[1], "latitude")?,
                    parse_component(&caps[2], "longitude")?,
                );
                debug!(pattern = pattern.name, %coordinate, "extracted coordinates");
                coordinate.validate()?;
                return Ok(coordinate);
            }
        }

        Err(PayloadError::unparseable(
            "url",
            "no coordinates found in the map link",
        ))
    }
}

impl PayloadCodec for GeoCodec {
    type Input = Coordinate;

    fn name(&self) -> &'static str {
        "geo"
    }

    fn validate(&self, input: &Coordinate) -> PayloadResult<()> {
        input.validate()
    }

    fn render(&self, input: &Coordinate) -> PayloadResult<String> {
        Ok(format!("geo:{}", input))
    }
}
