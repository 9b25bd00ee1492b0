//! End-to-end editing flows
//!
//! Drives the dispatcher the way the glue does: one Editor, a stream of
//! key events, outcomes checked against the fragment the host would write
//! back. Covers the flows that cross module boundaries.

use cloze_editor_wasm::commands::dispatch::{dispatch_key, undo_last, KeyInput};
use cloze_editor_wasm::commands::renumber::RENUMBER_TIMEOUT_MS;
use cloze_editor_wasm::models::core::Selection;
use cloze_editor_wasm::models::editor_state::Editor;

fn key(key: &str, ctrl: bool, shift: bool, alt: bool, now_ms: f64) -> KeyInput {
    KeyInput {
        key: key.to_string(),
        ctrl,
        meta: false,
        shift,
        alt,
        now_ms,
    }
}

fn focused(fragment: &str, cursor: usize) -> Editor {
    let mut editor = Editor::new();
    editor.begin_session("Front", fragment, cursor);
    editor
}

fn session_fragment(editor: &Editor) -> String {
    editor.session.as_ref().expect("session").fragment.clone()
}

#[test]
fn test_split_then_merge_restores_token() {
    let mut editor = focused("{{c1::Mitochondria}} make energy", 0);
    // Select "chondria" inside the content (rendered offsets 10..18).
    editor.session.as_mut().unwrap().selection = Some(Selection::new(10, 18));
    let out = dispatch_key(&mut editor, &key("s", true, true, false, 0.0));
    assert_eq!(
        out.fragment.as_deref(),
        Some("{{c1::Mito}} {{c1::chondria}} make energy")
    );
    // Merge joins them back, single space between.
    let out = dispatch_key(&mut editor, &key("m", true, true, true, 0.0));
    assert_eq!(
        out.fragment.as_deref(),
        Some("{{c1::Mito chondria}} make energy")
    );
    // Two snapshots: one per mutation, oldest first.
    assert_eq!(editor.undo.len(), 2);
}

#[test]
fn test_increment_then_decrement_round_trip() {
    let mut editor = focused("{{c2::Paris}}", 2);
    dispatch_key(&mut editor, &key("k", true, true, true, 0.0));
    assert_eq!(session_fragment(&editor), "{{c3::Paris}}");
    dispatch_key(&mut editor, &key("j", true, true, true, 0.0));
    assert_eq!(session_fragment(&editor), "{{c2::Paris}}");
}

#[test]
fn test_decrement_floors_at_one() {
    let mut editor = focused("{{c1::Paris}}", 2);
    let out = dispatch_key(&mut editor, &key("j", true, true, true, 0.0));
    assert!(out.handled);
    assert_eq!(session_fragment(&editor), "{{c1::Paris}}");
}

#[test]
fn test_renumber_digit_within_window() {
    let mut editor = focused("{{c1::Paris}} and {{c1::Rome}}", 2);
    dispatch_key(&mut editor, &key("n", true, true, true, 1_000.0));
    let out = dispatch_key(&mut editor, &key("7", false, false, false, 2_500.0));
    assert_eq!(
        out.fragment.as_deref(),
        Some("{{c7::Paris}} and {{c1::Rome}}")
    );
}

#[test]
fn test_renumber_expired_digit_types_through() {
    let mut editor = focused("{{c1::Paris}}", 2);
    dispatch_key(&mut editor, &key("n", true, true, true, 1_000.0));
    let late = 1_000.0 + RENUMBER_TIMEOUT_MS + 50.0;
    let out = dispatch_key(&mut editor, &key("7", false, false, false, late));
    // Not ours any more: the digit inserts normally on the host side.
    assert!(!out.handled);
    assert_eq!(session_fragment(&editor), "{{c1::Paris}}");
}

#[test]
fn test_undo_chain_walks_back_edits() {
    let mut editor = focused("{{c1::a}} {{c2::b}}", 0);
    dispatch_key(&mut editor, &key("k", true, true, true, 0.0)); // c1 -> c2
    dispatch_key(&mut editor, &key("u", true, true, false, 0.0)); // strip all
    assert_eq!(session_fragment(&editor), "a b");

    let out = undo_last(&mut editor);
    assert_eq!(out.fragment.as_deref(), Some("{{c2::a}} {{c2::b}}"));
    let out = undo_last(&mut editor);
    assert_eq!(out.fragment.as_deref(), Some("{{c1::a}} {{c2::b}}"));
    // Stack exhausted; quiet no-op.
    let out = undo_last(&mut editor);
    assert!(out.fragment.is_none());
}

#[test]
fn test_undo_restores_blurred_field_by_name() {
    let mut editor = focused("{{c1::Paris}}", 2);
    dispatch_key(&mut editor, &key("r", true, true, false, 0.0));
    editor.sync_session("Back", "untouched", 0, None);
    let out = undo_last(&mut editor);
    assert_eq!(out.field.as_deref(), Some("Front"));
    assert_eq!(out.fragment.as_deref(), Some("{{c1::Paris}}"));
    assert_eq!(session_fragment(&editor), "untouched");
}

#[test]
fn test_palette_flow_executes_against_captured_selection() {
    let mut editor = focused("{{c1::Mitochondria}}", 0);
    editor.session.as_mut().unwrap().selection = Some(Selection::new(10, 18));
    dispatch_key(&mut editor, &key(".", true, false, false, 0.0));
    for ch in "split".chars() {
        dispatch_key(&mut editor, &key(&ch.to_string(), false, false, false, 0.0));
    }
    let out = dispatch_key(&mut editor, &key("Enter", false, false, false, 0.0));
    assert_eq!(out.fragment.as_deref(), Some("{{c1::Mito}} {{c1::chondria}}"));
    assert!(editor.palette.is_none());
}

#[test]
fn test_palette_hint_query_lists_only_hint_commands() {
    let mut editor = focused("{{c1::x}}", 0);
    dispatch_key(&mut editor, &key(".", true, false, false, 0.0));
    let mut last = None;
    for ch in "hint".chars() {
        last = dispatch_key(&mut editor, &key(&ch.to_string(), false, false, false, 0.0)).palette;
    }
    let view = last.expect("palette view");
    assert!(!view.commands.is_empty());
    for info in &view.commands {
        let haystack = format!("{} {}", info.name, info.description).to_lowercase();
        assert!(haystack.contains("hint"), "unexpected entry {:?}", info.name);
    }
}

#[test]
fn test_hint_edit_flow_places_cursor_in_hint() {
    let mut editor = focused("see {{c1::Paris}} now", 6);
    let out = dispatch_key(&mut editor, &key("l", true, true, false, 0.0));
    assert_eq!(out.fragment.as_deref(), Some("see {{c1::Paris::}} now"));
    // Cursor lands between `::` and `}}`.
    assert_eq!(out.cursor, Some("see {{c1::Paris::".len()));
}

#[test]
fn test_image_to_cloze_at_cursor() {
    let mut editor = focused(r#"before <img src="x.png"> after"#, 7);
    let out = dispatch_key(&mut editor, &key("i", true, true, true, 0.0));
    assert_eq!(
        out.fragment.as_deref(),
        Some(r#"before {{c1::<img src="x.png">}} after"#)
    );
}

#[test]
fn test_move_out_then_move_in_round_trip() {
    let mut editor = focused("{{c1::Bravo Charlie}}", 0);
    // Move " Charlie" (rendered 11..19, inside the content region) out.
    editor.session.as_mut().unwrap().selection = Some(Selection::new(11, 19));
    let out = dispatch_key(&mut editor, &key("o", true, true, false, 0.0));
    assert_eq!(out.fragment.as_deref(), Some("{{c1::Bravo}} Charlie"));

    // Select across the token boundary and absorb it back.
    editor.session.as_mut().unwrap().selection = Some(Selection::new(0, 21));
    let out = dispatch_key(&mut editor, &key("o", true, true, true, 0.0));
    assert_eq!(out.fragment.as_deref(), Some("{{c1::Bravo Charlie}}"));
}

#[test]
fn test_selection_survives_sync_and_drives_strip() {
    let mut editor = focused("a {{c1::b}} c {{c2::d}} e", 0);
    // Host reports a selection spanning only the first token.
    editor.sync_session("Front", "a {{c1::b}} c {{c2::d}} e", 0, Some(Selection::new(1, 4)));
    let out = dispatch_key(&mut editor, &key("r", true, true, false, 0.0));
    assert_eq!(out.fragment.as_deref(), Some("a b c {{c2::d}} e"));
}
