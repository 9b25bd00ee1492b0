//! Typed shortcut configuration
//!
//! The embedding glue hands over a loosely-typed `{action: "chord"}` JSON
//! map. It is validated exactly once here: action names must belong to the
//! enumerated action set and every chord must parse. An empty chord string
//! unbinds the action (it stays reachable through the palette).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::chord::{ChordParseError, KeyChord};

/// The enumerated set of built-in editor actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorAction {
    Strip,
    StripAll,
    StripByNumber,
    Increment,
    Decrement,
    Renumber,
    Split,
    Merge,
    MoveOut,
    MoveIn,
    ImageToCloze,
    HintEdit,
    HintRemove,
    HintWordCount,
    HintFromSelection,
    FindReplace,
    NextCloze,
    PrevCloze,
    CopyContent,
    ReplayFront,
    OpenPalette,
    Undo,
}

/// Default chord per action.
pub const DEFAULT_SHORTCUTS: &[(EditorAction, &str)] = &[
    (EditorAction::Strip, "Ctrl+Shift+R"),
    (EditorAction::StripAll, "Ctrl+Shift+U"),
    (EditorAction::StripByNumber, "Ctrl+Shift+Alt+R"),
    (EditorAction::Increment, "Ctrl+Shift+Alt+K"),
    (EditorAction::Decrement, "Ctrl+Shift+Alt+J"),
    (EditorAction::Renumber, "Ctrl+Shift+Alt+N"),
    (EditorAction::Split, "Ctrl+Shift+S"),
    (EditorAction::Merge, "Ctrl+Shift+Alt+M"),
    (EditorAction::MoveOut, "Ctrl+Shift+O"),
    (EditorAction::MoveIn, "Ctrl+Shift+Alt+O"),
    (EditorAction::ImageToCloze, "Ctrl+Shift+Alt+I"),
    (EditorAction::HintEdit, "Ctrl+Shift+L"),
    (EditorAction::HintRemove, "Ctrl+Shift+Alt+L"),
    (EditorAction::HintWordCount, "Ctrl+Shift+W"),
    (EditorAction::HintFromSelection, "Ctrl+Shift+Alt+S"),
    (EditorAction::FindReplace, "Ctrl+Shift+Alt+G"),
    (EditorAction::NextCloze, "Ctrl+]"),
    (EditorAction::PrevCloze, "Ctrl+["),
    (EditorAction::CopyContent, "Ctrl+Shift+Alt+Y"),
    (EditorAction::ReplayFront, "Ctrl+Shift+Alt+F"),
    (EditorAction::OpenPalette, "Ctrl+."),
    (EditorAction::Undo, "Ctrl+Alt+Z"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("shortcut config must be a JSON object of action to chord: {0}")]
    Format(#[from] serde_json::Error),
    #[error("unknown action {0:?} in shortcut config")]
    UnknownAction(String),
    #[error("invalid chord {chord:?} for action {action}: {source}")]
    InvalidChord {
        action: String,
        chord: String,
        #[source]
        source: ChordParseError,
    },
}

/// Validated chord assignments, defaults overlaid with the user's map.
#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    chords: HashMap<EditorAction, KeyChord>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ShortcutConfig {
    pub fn defaults() -> Self {
        let chords = DEFAULT_SHORTCUTS
            .iter()
            .map(|(action, spec)| {
                (
                    *action,
                    KeyChord::parse(spec).expect("default chord table parses"),
                )
            })
            .collect();
        Self { chords }
    }

    /// Load from the glue's JSON payload, overlaying the defaults.
    pub fn load(json: &str) -> Result<Self, ConfigError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        Self::from_entries(raw)
    }

    pub fn from_entries(raw: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();
        for (name, spec) in raw {
            let action: EditorAction =
                serde_json::from_value(serde_json::Value::String(name.clone()))
                    .map_err(|_| ConfigError::UnknownAction(name.clone()))?;
            if spec.trim().is_empty() {
                config.chords.remove(&action);
                continue;
            }
            let chord = KeyChord::parse(&spec).map_err(|source| ConfigError::InvalidChord {
                action: name,
                chord: spec.clone(),
                source,
            })?;
            config.chords.insert(action, chord);
        }
        Ok(config)
    }

    pub fn chord(&self, action: EditorAction) -> Option<&KeyChord> {
        self.chords.get(&action)
    }
}
