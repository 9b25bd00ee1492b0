//! Key event dispatch
//!
//! Every keydown in a focused field funnels through `dispatch_key`. Routing
//! order is fixed: an open palette captures everything; an armed renumber
//! gets one digit or disarms; then the chord table is consulted, first
//! registered match wins. The outcome tells the embedding glue exactly
//! what to write back into the document, and nothing here touches the DOM.

use serde::{Deserialize, Serialize};

use crate::commands::palette::{
    handle_palette_key, palette_view, PaletteEvent, PaletteState, PaletteView,
};
use crate::commands::registry::{Command, CommandAction};
use crate::commands::renumber::{classify_key, PendingRenumber, RenumberKey};
use crate::config::EditorAction;
use crate::models::core::{EditError, EditOutcome, Selection};
use crate::models::editor_state::Editor;
use crate::parse::cloze::locate_at_cursor;
use crate::structure::{hints, operations};
use crate::text::offset::text_len;
use crate::undo::UndoEntry;

/// One normalized keydown from the glue.
#[derive(Debug, Clone)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    /// Monotonic-enough clock in milliseconds, used only for the renumber
    /// expiry window.
    pub now_ms: f64,
}

impl KeyInput {
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Single character with neither primary nor alt held, i.e. something
    /// that would insert text if the palette were not open.
    fn printable(&self) -> bool {
        !self.primary() && !self.alt && self.key.chars().count() == 1
    }
}

/// What the glue must do after a dispatch. `handled == false` means the
/// event was not ours; let the browser have it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub handled: bool,
    /// Field to write into; may differ from the focused field after undo.
    pub field: Option<String>,
    pub fragment: Option<String>,
    pub cursor: Option<usize>,
    pub selection: Option<Selection>,
    /// User-visible message (failed merges and the like).
    pub notice: Option<String>,
    pub palette: Option<PaletteView>,
    pub palette_open: bool,
    /// Ask the host to replay the card front.
    pub request_replay: bool,
    /// Text to place on the clipboard.
    pub copy_text: Option<String>,
    /// Ask the glue to prompt for find/replace terms.
    pub prompt_find_replace: bool,
    pub replacements: Option<usize>,
    /// Name of an externally registered command to run on the glue side.
    pub external_command: Option<String>,
}

impl DispatchOutcome {
    fn unhandled() -> Self {
        Self::default()
    }

    /// Consumed the event but changed nothing.
    fn swallowed() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }
}

/// Route one keydown. See the module doc for the routing order.
pub fn dispatch_key(editor: &mut Editor, input: &KeyInput) -> DispatchOutcome {
    if editor.session.is_none() {
        return DispatchOutcome::unhandled();
    }

    if editor.palette.is_some() {
        return dispatch_palette_key(editor, input);
    }

    if let Some(pending) = editor.pending_renumber.take() {
        let same_field = editor
            .session
            .as_ref()
            .is_some_and(|s| s.field == pending.field);
        if same_field && !pending.expired(input.now_ms) {
            if let RenumberKey::Commit(number) = classify_key(&input.key) {
                let (fragment, cursor) = match editor.session.as_ref() {
                    Some(s) => (s.fragment.clone(), s.cursor),
                    None => return DispatchOutcome::unhandled(),
                };
                return apply_edit(editor, operations::set_number(&fragment, cursor, number));
            }
        }
        // Disarmed; the key falls through to normal dispatch.
    }

    let command = match editor
        .registry
        .find_chord(input.primary(), input.shift, input.alt, &input.key)
    {
        Some(command) => command.clone(),
        None => return DispatchOutcome::unhandled(),
    };
    execute_command(editor, &command, input.now_ms)
}

fn dispatch_palette_key(editor: &mut Editor, input: &KeyInput) -> DispatchOutcome {
    // The palette chord toggles: hitting it again closes the overlay.
    let is_palette_chord = editor
        .registry
        .find_chord(input.primary(), input.shift, input.alt, &input.key)
        .is_some_and(|c| c.action == CommandAction::Builtin(EditorAction::OpenPalette));
    if is_palette_chord {
        editor.palette = None;
        return DispatchOutcome::swallowed();
    }

    let Some(mut state) = editor.palette.take() else {
        return DispatchOutcome::unhandled();
    };
    match handle_palette_key(&mut state, &editor.registry, &input.key, input.printable()) {
        PaletteEvent::Dismiss => DispatchOutcome::swallowed(),
        PaletteEvent::Execute(command) => {
            // Execute against the position captured at open time, not
            // wherever focus drifted while the overlay was up.
            if let Some(session) = editor.session.as_mut() {
                if session.field == state.field {
                    session.cursor = state.cursor.min(text_len(&session.fragment));
                    session.selection = state.selection;
                }
            }
            execute_command(editor, &command, input.now_ms)
        }
        PaletteEvent::Updated => {
            let view = palette_view(&state, &editor.registry);
            editor.palette = Some(state);
            DispatchOutcome {
                handled: true,
                palette_open: true,
                palette: Some(view),
                ..DispatchOutcome::default()
            }
        }
    }
}

fn execute_command(editor: &mut Editor, command: &Command, now_ms: f64) -> DispatchOutcome {
    log::debug!("executing command {:?}", command.name);
    match command.action {
        CommandAction::External => DispatchOutcome {
            handled: true,
            external_command: Some(command.name.clone()),
            ..DispatchOutcome::default()
        },
        CommandAction::Builtin(action) => execute_action(editor, action, now_ms),
    }
}

/// Run one built-in action against the current session.
pub fn execute_action(editor: &mut Editor, action: EditorAction, now_ms: f64) -> DispatchOutcome {
    let (field, fragment, cursor, selection) = match editor.session.as_ref() {
        Some(s) => (s.field.clone(), s.fragment.clone(), s.cursor, s.selection),
        None => return DispatchOutcome::unhandled(),
    };

    match action {
        EditorAction::Strip => apply_edit(editor, operations::strip(&fragment, cursor, selection)),
        EditorAction::StripAll => apply_edit(editor, operations::strip_all(&fragment, cursor)),
        EditorAction::StripByNumber => {
            apply_edit(editor, operations::strip_by_number(&fragment, cursor))
        }
        EditorAction::Increment => apply_edit(editor, operations::shift_number(&fragment, cursor, 1)),
        EditorAction::Decrement => {
            apply_edit(editor, operations::shift_number(&fragment, cursor, -1))
        }
        EditorAction::Renumber => {
            // Arm only when there is a token to renumber.
            if locate_at_cursor(&fragment, cursor).is_some() {
                editor.pending_renumber = Some(PendingRenumber::arm(&field, now_ms));
            }
            DispatchOutcome::swallowed()
        }
        EditorAction::Split => apply_edit(editor, operations::split(&fragment, selection)),
        EditorAction::Merge => apply_edit(editor, operations::merge(&fragment, cursor)),
        EditorAction::MoveOut => apply_edit(editor, operations::move_out(&fragment, selection)),
        EditorAction::MoveIn => apply_edit(editor, operations::move_in(&fragment, selection)),
        EditorAction::ImageToCloze => {
            apply_edit(editor, operations::image_to_cloze(&fragment, cursor, selection))
        }
        EditorAction::HintEdit => apply_edit(editor, hints::ensure_hint(&fragment, cursor)),
        EditorAction::HintRemove => apply_edit(editor, hints::remove_hint(&fragment, cursor)),
        EditorAction::HintWordCount => {
            apply_edit(editor, hints::hint_from_word_count(&fragment, cursor))
        }
        EditorAction::HintFromSelection => {
            apply_edit(editor, hints::hint_from_selection(&fragment, cursor, selection))
        }
        EditorAction::FindReplace => DispatchOutcome {
            handled: true,
            prompt_find_replace: true,
            ..DispatchOutcome::default()
        },
        EditorAction::NextCloze => move_cursor(editor, operations::next_cloze(&fragment, cursor)),
        EditorAction::PrevCloze => move_cursor(editor, operations::prev_cloze(&fragment, cursor)),
        EditorAction::CopyContent => match operations::cloze_content_text(&fragment, cursor) {
            Ok(text) => DispatchOutcome {
                handled: true,
                copy_text: Some(text),
                ..DispatchOutcome::default()
            },
            Err(_) => DispatchOutcome::swallowed(),
        },
        EditorAction::ReplayFront => DispatchOutcome {
            handled: true,
            request_replay: true,
            ..DispatchOutcome::default()
        },
        EditorAction::OpenPalette => {
            editor.palette = Some(PaletteState::open(&field, cursor, selection));
            let view = editor
                .palette
                .as_ref()
                .map(|state| palette_view(state, &editor.registry));
            DispatchOutcome {
                handled: true,
                palette_open: true,
                palette: view,
                ..DispatchOutcome::default()
            }
        }
        EditorAction::Undo => undo_last(editor),
    }
}

/// The two terms come from a glue-side prompt, so this entry point is
/// separate from key dispatch.
pub fn apply_find_replace(editor: &mut Editor, find: &str, replace: &str) -> DispatchOutcome {
    let (fragment, cursor) = match editor.session.as_ref() {
        Some(s) => (s.fragment.clone(), s.cursor),
        None => return DispatchOutcome::unhandled(),
    };
    match operations::find_replace(&fragment, cursor, find, replace) {
        Ok(out) => {
            if out.replacements == 0 {
                let mut outcome = DispatchOutcome::swallowed();
                outcome.replacements = Some(0);
                return outcome;
            }
            let count = out.replacements;
            let mut outcome = commit_edit(editor, EditOutcome::new(out.fragment, out.cursor));
            outcome.replacements = Some(count);
            outcome
        }
        Err(_) => DispatchOutcome::swallowed(),
    }
}

/// Pop the newest snapshot and restore it. The snapshot may belong to a
/// field other than the focused one; the glue routes by `field`.
pub fn undo_last(editor: &mut Editor) -> DispatchOutcome {
    let Some(entry) = editor.undo.pop() else {
        log::debug!("undo requested with empty stack");
        return DispatchOutcome::swallowed();
    };
    let cursor = entry.cursor.min(text_len(&entry.fragment));
    if let Some(session) = editor.session.as_mut() {
        if session.field == entry.field {
            session.fragment = entry.fragment.clone();
            session.cursor = cursor;
            session.selection = None;
        }
    }
    DispatchOutcome {
        handled: true,
        field: Some(entry.field),
        fragment: Some(entry.fragment),
        cursor: Some(cursor),
        ..DispatchOutcome::default()
    }
}

fn apply_edit(
    editor: &mut Editor,
    result: Result<EditOutcome, EditError>,
) -> DispatchOutcome {
    match result {
        Ok(outcome) => commit_edit(editor, outcome),
        // Ambiguity is the one failure worth telling the user about; the
        // rest are quiet no-ops.
        Err(err @ EditError::AmbiguousTarget) => DispatchOutcome {
            handled: true,
            notice: Some(err.to_string()),
            ..DispatchOutcome::default()
        },
        Err(_) => DispatchOutcome::swallowed(),
    }
}

/// Snapshot the pre-edit state, then mutate the session in place.
fn commit_edit(editor: &mut Editor, outcome: EditOutcome) -> DispatchOutcome {
    let Some(session) = editor.session.as_mut() else {
        return DispatchOutcome::unhandled();
    };
    editor.undo.push(UndoEntry {
        field: session.field.clone(),
        fragment: session.fragment.clone(),
        cursor: session.cursor,
    });
    session.fragment = outcome.fragment.clone();
    session.cursor = outcome.cursor;
    session.selection = outcome.selection;
    DispatchOutcome {
        handled: true,
        field: Some(session.field.clone()),
        fragment: Some(outcome.fragment),
        cursor: Some(outcome.cursor),
        selection: outcome.selection,
        ..DispatchOutcome::default()
    }
}

/// Cursor motion never snapshots; there is nothing to undo.
fn move_cursor(
    editor: &mut Editor,
    result: Result<EditOutcome, EditError>,
) -> DispatchOutcome {
    match result {
        Ok(outcome) => {
            if let Some(session) = editor.session.as_mut() {
                session.cursor = outcome.cursor;
                session.selection = None;
            }
            DispatchOutcome {
                handled: true,
                cursor: Some(outcome.cursor),
                ..DispatchOutcome::default()
            }
        }
        Err(_) => DispatchOutcome::swallowed(),
    }
}
