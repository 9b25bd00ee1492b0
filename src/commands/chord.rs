//! Keyboard chord parsing and matching
//!
//! A chord string like `Ctrl+Shift+Alt+R` decodes to a modifier triple
//! (primary modifier, shift, alt) plus one physical key identity. Chords
//! are parsed once at config load time, never re-parsed per match attempt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    #[error("empty chord")]
    Empty,
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("chord has no key: {0}")]
    MissingKey(String),
}

/// A parsed keyboard chord. `primary` matches either Ctrl or the platform
/// command key; `label` keeps the original spelling for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: String,
    pub label: String,
}

impl KeyChord {
    pub fn parse(spec: &str) -> Result<Self, ChordParseError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(ChordParseError::Empty);
        }
        let parts: Vec<&str> = trimmed.split('+').collect();
        let (key_part, modifiers) = parts.split_last().expect("split yields at least one part");

        let mut primary = false;
        let mut shift = false;
        let mut alt = false;
        for modifier in modifiers {
            match modifier.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "command" | "meta" => primary = true,
                "shift" => shift = true,
                "alt" | "option" => alt = true,
                other => return Err(ChordParseError::UnknownModifier(other.to_string())),
            }
        }

        let key = key_part.trim();
        if key.is_empty() || is_modifier_name(key) {
            return Err(ChordParseError::MissingKey(trimmed.to_string()));
        }

        Ok(Self {
            primary,
            shift,
            alt,
            key: key.to_ascii_lowercase(),
            label: trimmed.to_string(),
        })
    }

    /// Whether an input event's modifier triple and key identity match.
    pub fn matches(&self, primary: bool, shift: bool, alt: bool, key: &str) -> bool {
        self.primary == primary
            && self.shift == shift
            && self.alt == alt
            && self.key.eq_ignore_ascii_case(key)
    }
}

fn is_modifier_name(part: &str) -> bool {
    matches!(
        part.to_ascii_lowercase().as_str(),
        "ctrl" | "control" | "cmd" | "command" | "meta" | "shift" | "alt" | "option"
    )
}
