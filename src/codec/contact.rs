//! Contact cards as vCard 3.0.

use super::PayloadCodec;
use crate::domain::{present, Patterns};
use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactCard {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl ContactCard {
    /// `FN` value: first and last name joined by a space.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [present(&self.first_name), present(&self.last_name)]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn has_address(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.zip, &self.country]
            .into_iter()
            .any(|part| present(part).is_some())
    }
}

/// Encodes [`ContactCard`]s.
///
/// Field values are written verbatim: `;`, `,` and newlines inside
/// ORG/TITLE/ADR components are not escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactCodec;

impl PayloadCodec for ContactCodec {
    type Input = ContactCard;

    fn name(&self) -> &'static str {
        "contact"
    }

    fn validate(&self, input: &ContactCard) -> PayloadResult<()> {
        if input.full_name().is_none() {
            return Err(PayloadError::missing(
                "first_name",
                "a first or last name is required",
            ));
        }

        if let Some(email) = present(&input.email) {
            if !Patterns::email().is_match(email) {
                return Err(PayloadError::format("email", "enter a valid email address"));
            }
        }

        Ok(())
    }

    fn render(&self, input: &ContactCard) -> PayloadResult<String> {
        let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

        if let Some(full_name) = input.full_name() {
            lines.push(format!(
                "N:{};{};;;",
                present(&input.last_name).unwrap_or_default(),
                present(&input.first_name).unwrap_or_default()
            ));
            lines.push(format!("FN:{}", full_name));
        }

        let optional = [
            ("ORG", &input.organization),
            ("TITLE", &input.title),
            ("TEL", &input.phone),
            ("EMAIL", &input.email),
            ("URL", &input.url),
        ];
        for (property, value) in optional {
            if let Some(value) = present(value) {
                lines.push(format!("{}:{}", property, value));
            }
        }

        if input.has_address() {
            let components = [
                &input.street,
                &input.city,
                &input.state,
                &input.zip,
                &input.country,
            ]
            .map(|part| present(part).unwrap_or_default());
            // Post-office box and extended address stay empty.
            lines.push(format!("ADR:;;{}", components.join(";")));
        }

        lines.push("END:VCARD".to_string());
        Ok(lines.join("\r\n"))
    }
}
