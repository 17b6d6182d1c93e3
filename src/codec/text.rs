//! Plain text pass-through.

use super::PayloadCodec;
use crate::domain::{char_len, Limits, TextNormalizer};
use crate::error::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainText {
    pub content: String,
}

impl PlainText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Rough density estimate of a text payload, for UI hints only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Complexity {
    /// 0–100
    pub score: u8,
    pub level: ComplexityLevel,
    pub chars: usize,
    pub lines: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TextCodec {
    normalizer: TextNormalizer,
}

impl TextCodec {
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Scores `text` by length, line count, and the density of punctuation
    /// and non-ASCII characters (which push QR encoders into byte mode).
    ///
    /// Never fails and has no effect on [`PayloadCodec::encode`].
    pub fn complexity(&self, text: &str) -> Complexity {
        let chars = char_len(text);
        let lines = text.lines().count();

        if chars == 0 {
            return Complexity {
                score: 0,
                level: ComplexityLevel::Low,
                chars,
                lines,
            };
        }

        let special = text.chars().filter(|c| c.is_ascii_punctuation()).count();
        let non_ascii = text.chars().filter(|c| !c.is_ascii()).count();

        let length_weight = (chars as f64 / Limits::TEXT_MAX_CHARS as f64).min(1.0) * 50.0;
        let line_weight = (lines.saturating_sub(1) as f64 / 20.0).min(1.0) * 15.0;
        let special_weight = (special as f64 / chars as f64 * 2.0).min(1.0) * 15.0;
        let non_ascii_weight = (non_ascii as f64 / chars as f64 * 2.0).min(1.0) * 20.0;

        let score = (length_weight + line_weight + special_weight + non_ascii_weight)
            .round()
            .clamp(0.0, 100.0) as u8;

        let level = match score {
            0..=29 => ComplexityLevel::Low,
            30..=59 => ComplexityLevel::Medium,
            _ => ComplexityLevel::High,
        };

        Complexity {
            score,
            level,
            chars,
            lines,
        }
    }
}

impl PayloadCodec for TextCodec {
    type Input = PlainText;

    fn name(&self) -> &'static str {
        "text"
    }

    fn validate(&self, input: &PlainText) -> PayloadResult<()> {
        let normalized = self.normalize(&input.content);
        if normalized.is_empty() {
            return Err(PayloadError::missing("content", "text cannot be empty"));
        }
        if char_len(&normalized) > Limits::TEXT_MAX_CHARS {
            return Err(PayloadError::range(
                "content",
                format!("text must be at most {} characters", Limits::TEXT_MAX_CHARS),
            ));
        }
        Ok(())
    }

    fn render(&self, input: &PlainText) -> PayloadResult<String> {
        Ok(self.normalize(&input.content))
    }
}
