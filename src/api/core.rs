//! WASM API for the cloze editor
//!
//! The JavaScript-facing surface. The glue owns the DOM: it syncs field
//! state in with every call and writes the returned outcome back out. All
//! editing logic lives below this layer and never sees a JsValue.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, lock_editor, serialize, validation_error};
use crate::commands::chord::KeyChord;
use crate::commands::dispatch::{self, DispatchOutcome, KeyInput};
use crate::config::ShortcutConfig;
use crate::models::core::Selection;
use crate::parse::cloze::parse_all;
use crate::text::offset;
use crate::{wasm_info, wasm_log};

/// One keydown event as the glue captured it. `selection_start` and
/// `selection_end` are rendered-text offsets; both absent means collapsed.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct KeyEventPayload {
    pub field: String,
    pub fragment: String,
    pub cursor: usize,
    #[serde(default)]
    pub selection_start: Option<usize>,
    #[serde(default)]
    pub selection_end: Option<usize>,
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    /// Event timestamp in milliseconds; defaults to the host clock.
    #[serde(default)]
    pub now_ms: Option<f64>,
}

impl KeyEventPayload {
    fn selection(&self) -> Option<Selection> {
        match (self.selection_start, self.selection_end) {
            (Some(start), Some(end)) if start != end => Some(Selection::new(start, end)),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn current_time_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time_ms() -> f64 {
    0.0
}

/// Focus a field and start tracking it.
#[wasm_bindgen(js_name = beginSession)]
pub fn begin_session(field: &str, fragment: &str, cursor: usize) {
    wasm_info!("beginSession: field={}", field);
    lock_editor().begin_session(field, fragment, cursor);
}

/// Blur: stop tracking and hand the final session state back for commit.
/// Returns null if no session was active.
#[wasm_bindgen(js_name = endSession)]
pub fn end_session() -> Result<JsValue, JsValue> {
    wasm_info!("endSession");
    match lock_editor().end_session() {
        Some(session) => serialize(&session, "endSession serialization error"),
        None => Ok(JsValue::NULL),
    }
}

/// Route one keydown through the dispatcher. The payload re-syncs the
/// session first, so the host document stays the source of truth for
/// anything the user typed since our last edit.
#[wasm_bindgen(js_name = handleKey)]
pub fn handle_key(payload_js: JsValue) -> Result<JsValue, JsValue> {
    let payload: KeyEventPayload = deserialize(payload_js, "handleKey deserialization error")?;
    wasm_log!(
        "handleKey: field={} key={:?} ctrl={} shift={} alt={}",
        payload.field,
        payload.key,
        payload.ctrl || payload.meta,
        payload.shift,
        payload.alt
    );

    let mut editor = lock_editor();
    editor.sync_session(
        &payload.field,
        &payload.fragment,
        payload.cursor,
        payload.selection(),
    );
    let input = KeyInput {
        key: payload.key,
        ctrl: payload.ctrl,
        meta: payload.meta,
        shift: payload.shift,
        alt: payload.alt,
        now_ms: payload.now_ms.unwrap_or_else(current_time_ms),
    };
    let outcome = dispatch::dispatch_key(&mut editor, &input);
    serialize(&outcome, "handleKey serialization error")
}

/// Run the find/replace the user was prompted for after a
/// `prompt_find_replace` outcome.
#[wasm_bindgen(js_name = applyFindReplace)]
pub fn apply_find_replace(find: &str, replace: &str) -> Result<JsValue, JsValue> {
    wasm_info!("applyFindReplace: find={:?}", find);
    let mut editor = lock_editor();
    let outcome = dispatch::apply_find_replace(&mut editor, find, replace);
    serialize(&outcome, "applyFindReplace serialization error")
}

/// Undo outside of key dispatch (toolbar button and the like).
#[wasm_bindgen(js_name = undoLast)]
pub fn undo_last() -> Result<JsValue, JsValue> {
    wasm_info!("undoLast");
    let mut editor = lock_editor();
    let outcome: DispatchOutcome = dispatch::undo_last(&mut editor);
    serialize(&outcome, "undoLast serialization error")
}

/// Replace the shortcut bindings with a validated `{action: "chord"}` map.
/// Rejects the whole map on the first unknown action or unparsable chord,
/// leaving the current bindings in place.
#[wasm_bindgen(js_name = loadShortcutConfig)]
pub fn load_shortcut_config(json: &str) -> Result<(), JsValue> {
    wasm_info!("loadShortcutConfig");
    let config = ShortcutConfig::load(json).map_err(|e| validation_error(e.to_string()))?;
    lock_editor().apply_config(config);
    Ok(())
}

/// Register a glue-side command. It appears in the palette and, when
/// `chord` is non-empty, in chord dispatch; execution is reported back by
/// name in the outcome.
#[wasm_bindgen(js_name = registerCommand)]
pub fn register_command(name: &str, description: &str, chord: &str) -> Result<(), JsValue> {
    wasm_info!("registerCommand: {}", name);
    let chord = if chord.trim().is_empty() {
        None
    } else {
        Some(KeyChord::parse(chord).map_err(|e| validation_error(e.to_string()))?)
    };
    lock_editor()
        .registry
        .register_external(name, description, chord);
    Ok(())
}

/// Full command list for rendering the palette or a cheat sheet.
#[wasm_bindgen(js_name = paletteCommands)]
pub fn palette_commands() -> Result<JsValue, JsValue> {
    let editor = lock_editor();
    serialize(
        &editor.registry.infos(),
        "paletteCommands serialization error",
    )
}

/// Parse a fragment and return its cloze tokens with both coordinate
/// spaces resolved. Stateless; used for highlighting.
#[wasm_bindgen(js_name = listClozes)]
pub fn list_clozes(fragment: &str) -> Result<JsValue, JsValue> {
    serialize(&parse_all(fragment), "listClozes serialization error")
}

/// Rendered text of a markup fragment (tags dropped, entities decoded).
#[wasm_bindgen(js_name = renderedText)]
pub fn rendered_text(fragment: &str) -> String {
    offset::plain_text(fragment)
}

/// Map a markup byte offset to a rendered-text offset.
#[wasm_bindgen(js_name = markupToText)]
pub fn markup_to_text(fragment: &str, offset_bytes: usize) -> usize {
    offset::markup_to_text(fragment, offset_bytes)
}

/// Map a rendered-text offset to the markup byte offset of that character.
#[wasm_bindgen(js_name = textToMarkup)]
pub fn text_to_markup(fragment: &str, offset_chars: usize) -> usize {
    offset::text_to_markup(fragment, offset_chars)
}
