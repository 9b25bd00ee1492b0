//! Fuzzy command palette
//!
//! The palette is a modal overlay over the key dispatcher. While open it
//! captures every key event. It snapshots the cursor and selection of the
//! field it was opened from, so that a command picked after typing a query
//! still executes against the position the user had before the overlay
//! took focus.

use serde::{Deserialize, Serialize};

use crate::commands::registry::{Command, CommandInfo, CommandRegistry};
use crate::models::core::Selection;

/// Overlay state. `field`, `cursor` and `selection` are captured at open
/// time and restored into the session when a command executes.
#[derive(Debug, Clone)]
pub struct PaletteState {
    pub query: String,
    pub selected: usize,
    pub field: String,
    pub cursor: usize,
    pub selection: Option<Selection>,
}

impl PaletteState {
    pub fn open(field: &str, cursor: usize, selection: Option<Selection>) -> Self {
        Self {
            query: String::new(),
            selected: 0,
            field: field.to_string(),
            cursor,
            selection,
        }
    }
}

/// What the palette decided to do with a captured key.
#[derive(Debug, Clone)]
pub enum PaletteEvent {
    /// Query or highlight changed (or the key was swallowed); stay open.
    Updated,
    /// Run this command against the captured position, then close.
    Execute(Command),
    /// Close without running anything.
    Dismiss,
}

/// Feed one captured key into the overlay. `printable` is true when the
/// key is a single character with no primary or alt modifier held.
pub fn handle_palette_key(
    state: &mut PaletteState,
    registry: &CommandRegistry,
    key: &str,
    printable: bool,
) -> PaletteEvent {
    match key {
        "Escape" => PaletteEvent::Dismiss,
        "Enter" => {
            let filtered = registry.filter(&state.query);
            match filtered.get(state.selected) {
                Some(command) => PaletteEvent::Execute((*command).clone()),
                None => PaletteEvent::Updated,
            }
        }
        "ArrowDown" => {
            let count = registry.filter(&state.query).len();
            if state.selected + 1 < count {
                state.selected += 1;
            }
            PaletteEvent::Updated
        }
        "ArrowUp" => {
            state.selected = state.selected.saturating_sub(1);
            PaletteEvent::Updated
        }
        "Backspace" => {
            state.query.pop();
            clamp_selection(state, registry);
            PaletteEvent::Updated
        }
        _ if printable => {
            state.query.push_str(key);
            state.selected = 0;
            PaletteEvent::Updated
        }
        // Anything else (Tab, Home, stray chords) is swallowed.
        _ => PaletteEvent::Updated,
    }
}

fn clamp_selection(state: &mut PaletteState, registry: &CommandRegistry) {
    let count = registry.filter(&state.query).len();
    state.selected = state.selected.min(count.saturating_sub(1));
}

/// Snapshot of the overlay for the rendering glue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteView {
    pub query: String,
    pub selected: usize,
    pub commands: Vec<CommandInfo>,
}

pub fn palette_view(state: &PaletteState, registry: &CommandRegistry) -> PaletteView {
    PaletteView {
        query: state.query.clone(),
        selected: state.selected,
        commands: registry
            .filter(&state.query)
            .into_iter()
            .map(CommandInfo::from)
            .collect(),
    }
}
