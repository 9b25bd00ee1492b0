//! Process-wide editor state
//!
//! One `Editor` lives behind the boundary mutex for the lifetime of the
//! process. It owns at most one active session (the focused field); every
//! event re-syncs the session from the payload, since the host document is
//! the source of truth for markup and cursor between our edits.

use serde::{Deserialize, Serialize};

use crate::commands::palette::PaletteState;
use crate::commands::registry::CommandRegistry;
use crate::commands::renumber::PendingRenumber;
use crate::config::ShortcutConfig;
use crate::models::core::Selection;
use crate::text::offset::text_len;
use crate::undo::UndoStack;

/// The focused field: identifier, current markup, and the caret in
/// rendered-text coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSession {
    pub field: String,
    pub fragment: String,
    pub cursor: usize,
    pub selection: Option<Selection>,
}

impl EditorSession {
    pub fn new(field: &str, fragment: &str, cursor: usize) -> Self {
        let mut session = Self {
            field: field.to_string(),
            fragment: fragment.to_string(),
            cursor,
            selection: None,
        };
        session.clamp_cursor();
        session
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(text_len(&self.fragment));
    }

    /// Refresh from the host document before handling an event.
    pub fn set_state(&mut self, fragment: &str, cursor: usize, selection: Option<Selection>) {
        self.fragment = fragment.to_string();
        self.cursor = cursor;
        self.selection = selection.filter(|sel| !sel.is_collapsed());
        self.clamp_cursor();
    }
}

/// Everything that outlives a single key event: the session plus the undo
/// stack, the armed renumber (if any), the palette overlay (if open), and
/// the command registry with its chord bindings.
#[derive(Debug)]
pub struct Editor {
    pub session: Option<EditorSession>,
    pub undo: UndoStack,
    pub pending_renumber: Option<PendingRenumber>,
    pub palette: Option<PaletteState>,
    pub registry: CommandRegistry,
    pub config: ShortcutConfig,
}

impl Editor {
    pub fn new() -> Self {
        let config = ShortcutConfig::defaults();
        Self {
            session: None,
            undo: UndoStack::default(),
            pending_renumber: None,
            palette: None,
            registry: CommandRegistry::with_config(&config),
            config,
        }
    }

    /// Swap in a freshly validated config and rebind the built-in chords.
    pub fn apply_config(&mut self, config: ShortcutConfig) {
        self.registry.apply_config(&config);
        self.config = config;
    }

    /// Focus a field. At most one session exists at a time; focusing closes
    /// any overlay and disarms a pending renumber from the previous field.
    pub fn begin_session(&mut self, field: &str, fragment: &str, cursor: usize) {
        self.palette = None;
        self.pending_renumber = None;
        self.session = Some(EditorSession::new(field, fragment, cursor));
    }

    /// Blur: tear down the session and hand its final state back for the
    /// host to commit.
    pub fn end_session(&mut self) -> Option<EditorSession> {
        self.palette = None;
        self.pending_renumber = None;
        self.session.take()
    }

    /// Re-sync the session from an event payload. A payload for a field we
    /// are not focused on implicitly refocuses.
    pub fn sync_session(
        &mut self,
        field: &str,
        fragment: &str,
        cursor: usize,
        selection: Option<Selection>,
    ) {
        match self.session.as_mut() {
            Some(session) if session.field == field => {
                session.set_state(fragment, cursor, selection);
            }
            _ => {
                self.begin_session(field, fragment, cursor);
                if let Some(session) = self.session.as_mut() {
                    session.selection = selection.filter(|sel| !sel.is_collapsed());
                }
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
