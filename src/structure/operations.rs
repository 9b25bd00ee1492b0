//! Structural edit operations over cloze tokens
//!
//! Every operation is atomic: read the fragment once, compute a replacement
//! string, return it as a single mutation together with the repositioned
//! cursor. No state persists between calls. All operations re-validate
//! their preconditions at invocation; a failed check returns an error and
//! leaves nothing half-rewritten.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::core::{token_markup, Cloze, EditError, EditOutcome, Selection};
use crate::parse::cloze::{locate_at_cursor, max_number, parse_all};
use crate::text::offset::{
    markup_to_text, plain_text, rendered_slice, retreat, text_len, text_to_markup,
};

static IMG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("image tag pattern"));

/// Result of a find/replace pass over cloze content regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    pub fragment: String,
    pub cursor: usize,
    pub replacements: usize,
}

// ============================================================================
// Fragment splicing helpers
// ============================================================================

/// Apply sorted, non-overlapping byte-range replacements in one pass.
fn splice(fragment: &str, replacements: &[(usize, usize, String)]) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut pos = 0;
    for (start, end, text) in replacements {
        out.push_str(&fragment[pos..*start]);
        out.push_str(text);
        pos = *end;
    }
    out.push_str(&fragment[pos..]);
    out
}

fn clamp_cursor(fragment: &str, cursor: usize) -> usize {
    cursor.min(text_len(fragment))
}

// ============================================================================
// Strip
// ============================================================================

/// Replace cloze markup with bare content. With a non-empty selection, every
/// token whose markup range intersects the selection is unwrapped; otherwise
/// the token under the cursor is, and the cursor lands on its former start.
pub fn strip(
    fragment: &str,
    cursor: usize,
    selection: Option<Selection>,
) -> Result<EditOutcome, EditError> {
    match selection {
        Some(sel) if !sel.is_collapsed() => strip_selection(fragment, sel),
        _ => strip_at_cursor(fragment, cursor),
    }
}

fn strip_at_cursor(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let new = splice(
        fragment,
        &[(target.markup_start, target.markup_end, target.content.clone())],
    );
    Ok(EditOutcome::new(new, target.text_start))
}

fn strip_selection(fragment: &str, selection: Selection) -> Result<EditOutcome, EditError> {
    let ms = text_to_markup(fragment, selection.start());
    let me = text_to_markup(fragment, selection.end());
    let victims: Vec<Cloze> = parse_all(fragment)
        .into_iter()
        .filter(|c| c.markup_start < me && ms < c.markup_end)
        .collect();
    if victims.is_empty() {
        return Err(EditError::NotFound);
    }
    let replacements: Vec<(usize, usize, String)> = victims
        .iter()
        .map(|c| (c.markup_start, c.markup_end, c.content.clone()))
        .collect();
    let new = splice(fragment, &replacements);
    let cursor = clamp_cursor(&new, selection.start());
    Ok(EditOutcome::new(new, cursor))
}

/// Replace every token in the fragment with its content. The cursor keeps
/// its prior text offset, clamped to the new length. Idempotent.
pub fn strip_all(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let clozes = parse_all(fragment);
    if clozes.is_empty() {
        return Err(EditError::NotFound);
    }
    let replacements: Vec<(usize, usize, String)> = clozes
        .iter()
        .map(|c| (c.markup_start, c.markup_end, c.content.clone()))
        .collect();
    let new = splice(fragment, &replacements);
    let cursor = clamp_cursor(&new, cursor);
    Ok(EditOutcome::new(new, cursor))
}

/// As [`strip_all`], restricted to tokens sharing the number of the token
/// under the cursor at invocation time.
pub fn strip_by_number(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let replacements: Vec<(usize, usize, String)> = parse_all(fragment)
        .into_iter()
        .filter(|c| c.number == target.number)
        .map(|c| (c.markup_start, c.markup_end, c.content))
        .collect();
    let new = splice(fragment, &replacements);
    let cursor = clamp_cursor(&new, cursor);
    Ok(EditOutcome::new(new, cursor))
}

// ============================================================================
// Numbering
// ============================================================================

/// Shift the number of the token under the cursor by `delta`, floored at 1.
/// Content and hint are unchanged.
pub fn shift_number(fragment: &str, cursor: usize, delta: i64) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let shifted = (i64::from(target.number) + delta).max(1) as u32;
    set_number_of(fragment, &target, shifted, cursor)
}

/// Set the number of the token under the cursor to exactly `number`
/// (the commit half of the two-phase renumber gesture).
pub fn set_number(fragment: &str, cursor: usize, number: u32) -> Result<EditOutcome, EditError> {
    if number == 0 {
        return Err(EditError::InvalidRange);
    }
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    set_number_of(fragment, &target, number, cursor)
}

fn set_number_of(
    fragment: &str,
    target: &Cloze,
    number: u32,
    cursor: usize,
) -> Result<EditOutcome, EditError> {
    let token = token_markup(number, &target.content, target.hint.as_deref());
    let new = splice(fragment, &[(target.markup_start, target.markup_end, token)]);
    let cursor = clamp_cursor(&new, cursor);
    Ok(EditOutcome::new(new, cursor))
}

// ============================================================================
// Split & merge
// ============================================================================

/// Partition the target's content around the selected text into up to three
/// sibling tokens sharing its number and hint, joined by single spaces.
/// Parts are trimmed and empty parts are omitted.
pub fn split(
    fragment: &str,
    selection: Option<Selection>,
) -> Result<EditOutcome, EditError> {
    let sel = match selection {
        Some(sel) if !sel.is_collapsed() => sel,
        _ => return Err(EditError::InvalidRange),
    };
    let target = locate_at_cursor(fragment, sel.start()).ok_or(EditError::NotFound)?;
    let sel_text = rendered_slice(fragment, sel.start(), sel.end());
    if sel_text.is_empty() {
        return Err(EditError::InvalidRange);
    }
    let at = target.content.find(&sel_text).ok_or(EditError::InvalidRange)?;

    let before = target.content[..at].trim();
    let middle = sel_text.trim();
    let after = target.content[at + sel_text.len()..].trim();
    let siblings: Vec<String> = [before, middle, after]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| token_markup(target.number, part, target.hint.as_deref()))
        .collect();
    let new = splice(
        fragment,
        &[(target.markup_start, target.markup_end, siblings.join(" "))],
    );
    Ok(EditOutcome::new(new, target.text_start))
}

/// Collapse every token sharing the target's number into one token spanning
/// from the first to the last, keeping the literal text between tokens and
/// stripping the intervening token markup. The first non-empty hint wins.
pub fn merge(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let group: Vec<Cloze> = parse_all(fragment)
        .into_iter()
        .filter(|c| c.number == target.number)
        .collect();
    if group.len() < 2 {
        return Err(EditError::NotFound);
    }
    let first = &group[0];
    let last = &group[group.len() - 1];

    // Unwrap every token inside the merged span, whatever its number.
    let inner: Vec<(usize, usize, String)> = parse_all(fragment)
        .into_iter()
        .filter(|c| c.markup_start >= first.markup_start && c.markup_end <= last.markup_end)
        .map(|c| {
            (
                c.markup_start - first.markup_start,
                c.markup_end - first.markup_start,
                c.content,
            )
        })
        .collect();
    let span = &fragment[first.markup_start..last.markup_end];
    let content = splice(span, &inner);

    let hint = group
        .iter()
        .find_map(|c| c.hint.as_deref().filter(|h| !h.is_empty()))
        .map(str::to_string);
    let token = token_markup(target.number, &content, hint.as_deref());
    let new = splice(fragment, &[(first.markup_start, last.markup_end, token)]);
    Ok(EditOutcome::new(new, first.text_start))
}

// ============================================================================
// Move out / move in
// ============================================================================

/// Push the selected part of a token's content outside the token. A prefix
/// or suffix selection leaves the remainder wrapped; an interior selection
/// leaves both sides wrapped; selecting the full content unwraps entirely.
pub fn move_out(fragment: &str, selection: Option<Selection>) -> Result<EditOutcome, EditError> {
    let sel = match selection {
        Some(sel) if !sel.is_collapsed() => sel,
        _ => return Err(EditError::InvalidRange),
    };
    let target = locate_at_cursor(fragment, sel.start()).ok_or(EditError::NotFound)?;
    let (content_start, content_end) = target.content_markup_range();
    let sel_ms = text_to_markup(fragment, sel.start());
    let sel_me = text_to_markup(fragment, sel.end());
    if sel_ms < content_start || sel_me > content_end {
        return Err(EditError::InvalidRange);
    }

    let before = &fragment[content_start..sel_ms];
    let selected = &fragment[sel_ms..sel_me];
    let after = &fragment[sel_me..content_end];

    let replacement = if before.is_empty() && after.is_empty() {
        // Full-content selection: unwrap entirely.
        selected.to_string()
    } else {
        let mut parts = String::new();
        if !before.is_empty() {
            parts.push_str(&token_markup(target.number, before, target.hint.as_deref()));
        }
        parts.push_str(selected);
        if !after.is_empty() {
            parts.push_str(&token_markup(target.number, after, target.hint.as_deref()));
        }
        parts
    };
    let new = splice(
        fragment,
        &[(target.markup_start, target.markup_end, replacement)],
    );
    Ok(EditOutcome::new(new, target.text_start))
}

/// Absorb the non-token text covered by the selection into the one token it
/// overlaps, preserving the inline markup of the absorbed span. Absorption
/// is clamped so it never crosses into a neighboring token's range.
pub fn move_in(fragment: &str, selection: Option<Selection>) -> Result<EditOutcome, EditError> {
    let sel = match selection {
        Some(sel) if !sel.is_collapsed() => sel,
        _ => return Err(EditError::NotFound),
    };
    let clozes = parse_all(fragment);
    let overlapping: Vec<&Cloze> = clozes
        .iter()
        .filter(|c| c.overlaps_text_range(sel.start(), sel.end()))
        .collect();
    let target = match overlapping.len() {
        0 => return Err(EditError::NotFound),
        1 => overlapping[0],
        _ => return Err(EditError::AmbiguousTarget),
    };
    if sel.start() >= target.text_start && sel.end() <= target.text_end {
        return Err(EditError::InvalidRange);
    }

    let sel_ms = text_to_markup(fragment, sel.start());
    let sel_me = text_to_markup(fragment, sel.end());
    let prev_end = clozes
        .iter()
        .filter(|c| c.markup_end <= target.markup_start)
        .map(|c| c.markup_end)
        .max()
        .unwrap_or(0);
    let next_start = clozes
        .iter()
        .filter(|c| c.markup_start >= target.markup_end)
        .map(|c| c.markup_start)
        .min()
        .unwrap_or(fragment.len());

    let absorb_start = if sel_ms < target.markup_start {
        sel_ms.max(prev_end)
    } else {
        target.markup_start
    };
    let absorb_end = if sel_me > target.markup_end {
        sel_me.min(next_start)
    } else {
        target.markup_end
    };
    if absorb_start == target.markup_start && absorb_end == target.markup_end {
        // Clamping left nothing to absorb.
        return Err(EditError::InvalidRange);
    }

    let mut content = String::new();
    content.push_str(&fragment[absorb_start..target.markup_start]);
    content.push_str(&target.content);
    content.push_str(&fragment[target.markup_end..absorb_end]);
    let token = token_markup(target.number, &content, target.hint.as_deref());
    let cursor = markup_to_text(fragment, absorb_start);
    let new = splice(fragment, &[(absorb_start, absorb_end, token)]);
    Ok(EditOutcome::new(new, cursor))
}

// ============================================================================
// Images
// ============================================================================

/// Wrap an embedded image intersecting the selection (or sitting at the
/// cursor) in a new token numbered one greater than the current maximum.
pub fn image_to_cloze(
    fragment: &str,
    cursor: usize,
    selection: Option<Selection>,
) -> Result<EditOutcome, EditError> {
    let image = match selection {
        Some(sel) if !sel.is_collapsed() => {
            let ms = text_to_markup(fragment, sel.start());
            let me = text_to_markup(fragment, sel.end());
            IMG_RE
                .find_iter(fragment)
                .find(|m| m.start() < me && ms < m.end())
        }
        _ => {
            // Images are zero-width in text space, so the cursor maps to a
            // markup offset on or next to the tag.
            let m = text_to_markup(fragment, cursor);
            IMG_RE
                .find_iter(fragment)
                .find(|img| img.start() <= m && m <= img.end())
        }
    }
    .ok_or(EditError::NotFound)?;

    let number = max_number(fragment) + 1;
    let token = token_markup(number, image.as_str(), None);
    let cursor = markup_to_text(fragment, image.start());
    let new = splice(fragment, &[(image.start(), image.end(), token)]);
    Ok(EditOutcome::new(new, cursor))
}

// ============================================================================
// Find & replace
// ============================================================================

/// Substring substitution applied only inside each token's content region.
/// An empty find term is rejected; zero matches is a successful pass that
/// reports a count of 0.
pub fn find_replace(
    fragment: &str,
    cursor: usize,
    find: &str,
    replace: &str,
) -> Result<ReplaceOutcome, EditError> {
    if find.is_empty() {
        return Err(EditError::InvalidRange);
    }
    let mut replacements = Vec::new();
    let mut count = 0;
    for c in parse_all(fragment) {
        let hits = c.content.matches(find).count();
        if hits == 0 {
            continue;
        }
        count += hits;
        let content = c.content.replace(find, replace);
        let token = token_markup(c.number, &content, c.hint.as_deref());
        replacements.push((c.markup_start, c.markup_end, token));
    }
    let new = splice(fragment, &replacements);
    let cursor = clamp_cursor(&new, cursor);
    Ok(ReplaceOutcome {
        fragment: new,
        cursor,
        replacements: count,
    })
}

// ============================================================================
// Navigation & clipboard source
// ============================================================================

/// Jump the cursor to the next token's start, wrapping around the fragment.
pub fn next_cloze(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let clozes = parse_all(fragment);
    if clozes.is_empty() {
        return Err(EditError::NotFound);
    }
    let next = clozes
        .iter()
        .find(|c| c.text_start > cursor)
        .unwrap_or(&clozes[0]);
    Ok(EditOutcome::new(fragment.to_string(), next.text_start))
}

/// Jump the cursor to the previous token's start, wrapping around.
pub fn prev_cloze(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let clozes = parse_all(fragment);
    if clozes.is_empty() {
        return Err(EditError::NotFound);
    }
    let prev = clozes
        .iter()
        .rev()
        .find(|c| c.text_start < cursor)
        .unwrap_or(&clozes[clozes.len() - 1]);
    Ok(EditOutcome::new(fragment.to_string(), prev.text_start))
}

/// Plain-text content of the token under the cursor (for the clipboard,
/// which the embedding glue owns).
pub fn cloze_content_text(fragment: &str, cursor: usize) -> Result<String, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    Ok(plain_text(&target.content))
}

/// Rendered text position just inside the closing braces of a token that
/// starts at `markup_start` and spans `token_len` markup bytes. Used to
/// drop the cursor into a hint region after a rewrite.
pub fn cursor_before_closing_braces(fragment: &str, markup_start: usize, token_len: usize) -> usize {
    let brace_start = retreat(fragment, markup_start + token_len, 2);
    markup_to_text(fragment, brace_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_at_cursor() {
        let out = strip("ab {{c1::cd}} ef", 5, None).unwrap();
        assert_eq!(out.fragment, "ab cd ef");
        assert_eq!(out.cursor, 3);
    }

    #[test]
    fn test_strip_discards_hint() {
        let out = strip("{{c1::cd::hint}}", 0, None).unwrap();
        assert_eq!(out.fragment, "cd");
    }

    #[test]
    fn test_strip_selection_unwraps_intersecting_tokens() {
        let fragment = "{{c1::a}} {{c2::b}} {{c3::c}}";
        // Selection covering the first two tokens only.
        let sel = Selection::new(0, 12);
        let out = strip(fragment, 0, Some(sel)).unwrap();
        assert_eq!(out.fragment, "a b {{c3::c}}");
    }

    #[test]
    fn test_strip_no_target_is_error() {
        assert_eq!(strip("plain text", 3, None), Err(EditError::NotFound));
    }

    #[test]
    fn test_strip_all_idempotent() {
        let once = strip_all("x {{c1::a}} {{c2::b::h}} y", 9).unwrap();
        assert_eq!(once.fragment, "x a b y");
        // A second pass has no tokens left to act on.
        assert_eq!(strip_all(&once.fragment, once.cursor), Err(EditError::NotFound));
    }

    #[test]
    fn test_strip_all_clamps_cursor() {
        let out = strip_all("{{c1::a}}", 9).unwrap();
        assert_eq!(out.fragment, "a");
        assert_eq!(out.cursor, 1);
    }

    #[test]
    fn test_strip_by_number_only_matching() {
        let out = strip_by_number("{{c1::a}} {{c2::b}} {{c1::c}}", 0).unwrap();
        assert_eq!(out.fragment, "a {{c2::b}} c");
    }

    #[test]
    fn test_increment_then_decrement_restores() {
        let fragment = "{{c2::x}}";
        let up = shift_number(fragment, 0, 1).unwrap();
        assert_eq!(up.fragment, "{{c3::x}}");
        let down = shift_number(&up.fragment, 0, -1).unwrap();
        assert_eq!(down.fragment, fragment);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let out = shift_number("{{c1::x}}", 0, -1).unwrap();
        assert_eq!(out.fragment, "{{c1::x}}");
    }

    #[test]
    fn test_set_number_exact() {
        let out = set_number("{{c2::x::h}}", 0, 5).unwrap();
        assert_eq!(out.fragment, "{{c5::x::h}}");
    }

    #[test]
    fn test_split_scenario() {
        let fragment = "{{c1::Mitochondria}}";
        let sel_start = "{{c1::Mito".len();
        let sel = Selection::new(sel_start, sel_start + "chondria".len());
        let out = split(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::Mito}} {{c1::chondria}}");
        assert_eq!(out.cursor, 0);
    }

    #[test]
    fn test_split_interior_emits_three() {
        let fragment = "{{c1::alpha beta gamma}}";
        let start = "{{c1::alpha ".len();
        let sel = Selection::new(start, start + "beta".len());
        let out = split(fragment, Some(sel)).unwrap();
        assert_eq!(
            out.fragment,
            "{{c1::alpha}} {{c1::beta}} {{c1::gamma}}"
        );
    }

    #[test]
    fn test_split_keeps_hint_on_siblings() {
        let fragment = "{{c1::ab::h}}";
        let sel = Selection::new(6, 7);
        let out = split(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::a::h}} {{c1::b::h}}");
    }

    #[test]
    fn test_split_rejects_foreign_selection() {
        let fragment = "zz {{c1::ab}}";
        let sel = Selection::new(0, 2);
        assert_eq!(split(fragment, Some(sel)), Err(EditError::NotFound));
    }

    #[test]
    fn test_merge_scenario_retains_literal_text() {
        let fragment = "The capital of {{c1::France}} is {{c1::Paris}}.";
        let out = merge(fragment, 16).unwrap();
        assert_eq!(out.fragment, "The capital of {{c1::France is Paris}}.");
        assert_eq!(out.cursor, 15);
    }

    #[test]
    fn test_merge_needs_two_tokens() {
        assert_eq!(merge("{{c1::solo}}", 0), Err(EditError::NotFound));
    }

    #[test]
    fn test_merge_first_nonempty_hint_wins() {
        let fragment = "{{c1::a}} {{c1::b::keep}} {{c1::c::later}}";
        let out = merge(fragment, 0).unwrap();
        assert_eq!(out.fragment, "{{c1::a b c::keep}}");
    }

    #[test]
    fn test_split_then_merge_round_trips() {
        let fragment = "{{c1::Mitochondria}}";
        let sel_start = "{{c1::Mito".len();
        let sel = Selection::new(sel_start, sel_start + "chondria".len());
        let split_out = split(fragment, Some(sel)).unwrap();
        let merged = merge(&split_out.fragment, 0).unwrap();
        // Whitespace at the split boundary is normalized to one space.
        assert_eq!(merged.fragment, "{{c1::Mito chondria}}");
    }

    #[test]
    fn test_move_out_prefix() {
        let fragment = "{{c1::Bravo Charlie}}";
        let start = "{{c1::".len();
        let sel = Selection::new(start, start + "Bravo ".len());
        let out = move_out(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "Bravo {{c1::Charlie}}");
    }

    #[test]
    fn test_move_out_suffix() {
        let fragment = "{{c1::Bravo Charlie}}";
        let start = "{{c1::Bravo".len();
        let sel = Selection::new(start, start + " Charlie".len());
        let out = move_out(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::Bravo}} Charlie");
    }

    #[test]
    fn test_move_out_interior() {
        let fragment = "{{c1::a b c}}";
        let start = "{{c1::a".len();
        let sel = Selection::new(start, start + " b ".len());
        let out = move_out(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::a}} b {{c1::c}}");
    }

    #[test]
    fn test_move_out_full_content_unwraps() {
        let fragment = "{{c1::whole::h}}";
        let start = "{{c1::".len();
        let sel = Selection::new(start, start + "whole".len());
        let out = move_out(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "whole");
    }

    #[test]
    fn test_move_out_rejects_selection_outside_content() {
        let fragment = "{{c1::ab}}";
        // Selection covering the token prefix.
        let sel = Selection::new(0, 4);
        assert_eq!(move_out(fragment, Some(sel)), Err(EditError::InvalidRange));
    }

    #[test]
    fn test_move_in_absorbs_right() {
        let fragment = "{{c1::Bravo}} Charlie";
        let sel = Selection::new(6, 18); // "Bravo Char"
        let out = move_in(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::Bravo Char}}lie");
        assert_eq!(out.cursor, 0);
    }

    #[test]
    fn test_move_in_two_token_overlap_is_ambiguous() {
        let fragment = "{{c1::a}} mid {{c2::b}}";
        // Selection from inside c1 all the way across c2.
        let sel = Selection::new(6, 21);
        assert_eq!(move_in(fragment, Some(sel)), Err(EditError::AmbiguousTarget));
    }

    #[test]
    fn test_move_in_absorbs_left_with_markup() {
        let fragment = "<b>hi</b> {{c1::there}}";
        // Rendered: "hi {{c1::there}}"; select "hi {{c1::t"
        let sel = Selection::new(0, 10);
        let out = move_in(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::<b>hi</b> there}}");
        assert_eq!(out.cursor, 0);
    }

    #[test]
    fn test_move_in_wholly_inside_is_rejected() {
        let fragment = "{{c1::Bravo}} x";
        let sel = Selection::new(6, 9);
        assert_eq!(move_in(fragment, Some(sel)), Err(EditError::InvalidRange));
    }

    #[test]
    fn test_move_in_no_overlap() {
        let fragment = "{{c1::a}} plain";
        let sel = Selection::new(10, 13);
        assert_eq!(move_in(fragment, Some(sel)), Err(EditError::NotFound));
    }

    #[test]
    fn test_move_in_stops_at_previous_token() {
        let fragment = "{{c1::a}}xy{{c2::b}}";
        // Select from inside c1's text range through "xy" into... only c2
        // may absorb leftward; selection overlapping only c2 plus "xy".
        let sel = Selection::new(9, 14); // "xy{{c" rendered
        let out = move_in(fragment, Some(sel)).unwrap();
        assert_eq!(out.fragment, "{{c1::a}}{{c2::xyb}}");
    }

    #[test]
    fn test_image_to_cloze_at_selection() {
        let fragment = "see <img src=\"a.png\"> here";
        let sel = Selection::new(2, 6);
        let out = image_to_cloze(fragment, 0, Some(sel)).unwrap();
        assert_eq!(out.fragment, "see {{c1::<img src=\"a.png\">}} here");
        assert_eq!(out.cursor, 4);
    }

    #[test]
    fn test_image_to_cloze_numbers_above_max() {
        let fragment = "{{c4::x}} <img src=\"a.png\">";
        let out = image_to_cloze(fragment, 10, None).unwrap();
        assert_eq!(out.fragment, "{{c4::x}} {{c5::<img src=\"a.png\">}}");
    }

    #[test]
    fn test_image_to_cloze_without_image() {
        assert_eq!(
            image_to_cloze("no pictures", 3, None),
            Err(EditError::NotFound)
        );
    }

    #[test]
    fn test_find_replace_content_only() {
        let fragment = "ab {{c1::ab}} {{c2::abab}}";
        let out = find_replace(fragment, 0, "ab", "X").unwrap();
        assert_eq!(out.fragment, "ab {{c1::X}} {{c2::XX}}");
        assert_eq!(out.replacements, 3);
    }

    #[test]
    fn test_find_replace_zero_matches_is_not_rejection() {
        let out = find_replace("{{c1::ab}}", 0, "zz", "X").unwrap();
        assert_eq!(out.replacements, 0);
        assert_eq!(out.fragment, "{{c1::ab}}");
        assert_eq!(find_replace("{{c1::ab}}", 0, "", "X"), Err(EditError::InvalidRange));
    }

    #[test]
    fn test_next_prev_cloze_wraps() {
        let fragment = "{{c1::a}} {{c2::b}}";
        let second_start = "{{c1::a}} ".len();
        assert_eq!(next_cloze(fragment, 0).unwrap().cursor, second_start);
        assert_eq!(next_cloze(fragment, second_start).unwrap().cursor, 0);
        assert_eq!(prev_cloze(fragment, second_start).unwrap().cursor, 0);
        assert_eq!(prev_cloze(fragment, 0).unwrap().cursor, second_start);
    }

    #[test]
    fn test_cloze_content_text_is_plain() {
        let got = cloze_content_text("{{c1::a &amp; <b>b</b>}}", 0).unwrap();
        assert_eq!(got, "a & b");
    }

    #[test]
    fn test_operations_noop_on_tokenless_fragment() {
        let fragment = "just words";
        assert!(strip(fragment, 0, None).is_err());
        assert!(strip_all(fragment, 0).is_err());
        assert!(strip_by_number(fragment, 0).is_err());
        assert!(shift_number(fragment, 0, 1).is_err());
        assert!(merge(fragment, 0).is_err());
        assert!(split(fragment, Some(Selection::new(0, 4))).is_err());
        assert!(move_out(fragment, Some(Selection::new(0, 4))).is_err());
        assert!(move_in(fragment, Some(Selection::new(0, 4))).is_err());
        assert!(next_cloze(fragment, 0).is_err());
        assert!(prev_cloze(fragment, 0).is_err());
    }
}
