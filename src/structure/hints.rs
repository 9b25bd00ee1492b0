//! Hint management for cloze tokens
//!
//! The hint is the optional `::hint` suffix of a token. Absence is distinct
//! from an empty hint: `{{c1::x}}` has no hint, `{{c1::x::}}` has an empty
//! one. Every operation here targets the token under the cursor and follows
//! the same atomic rewrite contract as the structural operations.

use crate::models::core::{token_markup, EditError, EditOutcome, Selection};
use crate::parse::cloze::locate_at_cursor;
use crate::structure::operations::cursor_before_closing_braces;
use crate::text::offset::{plain_text, rendered_slice, text_len};

/// Ensure the token has a `::hint` suffix (empty if absent) and drop the
/// cursor inside it, ready for typing.
pub fn ensure_hint(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let hint = target.hint.clone().unwrap_or_default();
    let token = token_markup(target.number, &target.content, Some(&hint));
    let new = rebuild(fragment, target.markup_start, target.markup_end, &token);
    let cursor = cursor_before_closing_braces(&new, target.markup_start, token.len());
    Ok(EditOutcome::new(new, cursor))
}

/// Drop the `::hint` suffix entirely.
pub fn remove_hint(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    if target.hint.is_none() {
        return Err(EditError::NotFound);
    }
    let token = token_markup(target.number, &target.content, None);
    let new = rebuild(fragment, target.markup_start, target.markup_end, &token);
    let cursor = cursor.min(text_len(&new));
    Ok(EditOutcome::new(new, cursor))
}

/// Set the hint to "`<n>` word" or "`<n>` words", where n is the
/// whitespace-delimited token count of the plain-text content.
pub fn hint_from_word_count(fragment: &str, cursor: usize) -> Result<EditOutcome, EditError> {
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let words = plain_text(&target.content).split_whitespace().count();
    let hint = format!("{} word{}", words, if words == 1 { "" } else { "s" });
    let token = token_markup(target.number, &target.content, Some(&hint));
    let new = rebuild(fragment, target.markup_start, target.markup_end, &token);
    let cursor = cursor.min(text_len(&new));
    Ok(EditOutcome::new(new, cursor))
}

/// Set the hint to the trimmed selection text. The selection need not lie
/// within the target token.
pub fn hint_from_selection(
    fragment: &str,
    cursor: usize,
    selection: Option<Selection>,
) -> Result<EditOutcome, EditError> {
    let sel = match selection {
        Some(sel) if !sel.is_collapsed() => sel,
        _ => return Err(EditError::NotFound),
    };
    let target = locate_at_cursor(fragment, cursor).ok_or(EditError::NotFound)?;
    let hint = rendered_slice(fragment, sel.start(), sel.end());
    let hint = hint.trim();
    if hint.is_empty() {
        return Err(EditError::InvalidRange);
    }
    let token = token_markup(target.number, &target.content, Some(hint));
    let new = rebuild(fragment, target.markup_start, target.markup_end, &token);
    let cursor = cursor.min(text_len(&new));
    Ok(EditOutcome::new(new, cursor))
}

fn rebuild(fragment: &str, start: usize, end: usize, token: &str) -> String {
    let mut out = String::with_capacity(fragment.len() + token.len());
    out.push_str(&fragment[..start]);
    out.push_str(token);
    out.push_str(&fragment[end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_hint_adds_empty_suffix() {
        let out = ensure_hint("{{c1::Paris}}", 0).unwrap();
        assert_eq!(out.fragment, "{{c1::Paris::}}");
        // Cursor sits between `::` and `}}`.
        assert_eq!(out.cursor, "{{c1::Paris::".len());
    }

    #[test]
    fn test_ensure_hint_keeps_existing() {
        let out = ensure_hint("{{c1::Paris::city}}", 0).unwrap();
        assert_eq!(out.fragment, "{{c1::Paris::city}}");
        assert_eq!(out.cursor, "{{c1::Paris::city".len());
    }

    #[test]
    fn test_remove_hint() {
        let out = remove_hint("{{c1::Paris::city}}", 0).unwrap();
        assert_eq!(out.fragment, "{{c1::Paris}}");
    }

    #[test]
    fn test_remove_missing_hint_is_error() {
        assert_eq!(remove_hint("{{c1::Paris}}", 0), Err(EditError::NotFound));
    }

    #[test]
    fn test_word_count_plural() {
        let out = hint_from_word_count("{{c1::alpha beta gamma}}", 0).unwrap();
        assert_eq!(out.fragment, "{{c1::alpha beta gamma::3 words}}");
    }

    #[test]
    fn test_word_count_singular() {
        let out = hint_from_word_count("{{c1::solo}}", 0).unwrap();
        assert_eq!(out.fragment, "{{c1::solo::1 word}}");
    }

    #[test]
    fn test_word_count_ignores_markup() {
        let out = hint_from_word_count("{{c1::<b>one</b> two}}", 0).unwrap();
        assert_eq!(out.fragment, "{{c1::<b>one</b> two::2 words}}");
    }

    #[test]
    fn test_hint_from_selection_outside_token() {
        let fragment = "capital {{c1::Paris}}";
        let sel = Selection::new(0, 8); // "capital "
        let out = hint_from_selection(fragment, 9, Some(sel)).unwrap();
        assert_eq!(out.fragment, "capital {{c1::Paris::capital}}");
    }

    #[test]
    fn test_hint_from_selection_replaces_existing() {
        let fragment = "word {{c1::Paris::old}}";
        let sel = Selection::new(0, 4);
        let out = hint_from_selection(fragment, 6, Some(sel)).unwrap();
        assert_eq!(out.fragment, "word {{c1::Paris::word}}");
    }

    #[test]
    fn test_hint_from_collapsed_selection_is_error() {
        let fragment = "{{c1::Paris}}";
        assert_eq!(
            hint_from_selection(fragment, 0, Some(Selection::collapsed(2))),
            Err(EditError::NotFound)
        );
    }
}
