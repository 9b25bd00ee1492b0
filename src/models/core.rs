//! Core data types for cloze editing
//!
//! A cloze token has the literal form `{{cN::content}}` or
//! `{{cN::content::hint}}`. Records carry both coordinate spaces: the
//! byte range of the token in the serialized markup, and the range of the
//! same span in rendered text (the space cursors and selections live in).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parsed cloze token.
///
/// Always derived from the fragment on demand; never cached across a
/// mutation, since every structural operation rewrites the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloze {
    /// Cloze number. Positive, not necessarily unique within a fragment.
    pub number: u32,
    /// Content between `::` and the closing braces (may contain inline markup).
    pub content: String,
    /// Optional hint. `None` is distinct from `Some("")`.
    pub hint: Option<String>,
    /// Half-open byte range of the whole token in the markup.
    pub markup_start: usize,
    pub markup_end: usize,
    /// Half-open range of the token in rendered-text coordinates.
    pub text_start: usize,
    pub text_end: usize,
}

impl Cloze {
    /// Byte range of the content region inside the markup.
    pub fn content_markup_range(&self) -> (usize, usize) {
        let prefix = format!("{{{{c{}::", self.number).len();
        let start = self.markup_start + prefix;
        (start, start + self.content.len())
    }

    /// Whether a text offset sits on or inside this token (both ends inclusive).
    pub fn contains_text_offset(&self, offset: usize) -> bool {
        self.text_start <= offset && offset <= self.text_end
    }

    /// Whether a half-open text range overlaps this token's text range.
    pub fn overlaps_text_range(&self, start: usize, end: usize) -> bool {
        start < self.text_end && self.text_start < end
    }
}

/// Render a cloze token back to its literal markup form.
pub fn token_markup(number: u32, content: &str, hint: Option<&str>) -> String {
    match hint {
        Some(hint) => format!("{{{{c{}::{}::{}}}}}", number, content, hint),
        None => format!("{{{{c{}::{}}}}}", number, content),
    }
}

/// A selection in rendered-text coordinates (anchor + head).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: usize,
    /// Current cursor end of the selection.
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection (cursor only).
    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Ordered start (min of anchor and head).
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Ordered end (max of anchor and head).
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Result of one atomic structural edit: the replacement fragment plus the
/// repositioned cursor, and an optional selection to restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOutcome {
    pub fragment: String,
    pub cursor: usize,
    pub selection: Option<Selection>,
}

impl EditOutcome {
    pub fn new(fragment: String, cursor: usize) -> Self {
        Self {
            fragment,
            cursor,
            selection: None,
        }
    }
}

/// Why a structural edit refused to run.
///
/// `NotFound` and `InvalidRange` are silent no-ops at the dispatch layer;
/// `AmbiguousTarget` surfaces a transient notice because the user attempted
/// a valid gesture that was structurally blocked. A failed check leaves the
/// fragment and cursor untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// No cloze, image, or selection at the requested position.
    #[error("no cloze target at cursor")]
    NotFound,
    /// Selection text absent from the target content, or an empty find term.
    #[error("selection does not apply to the target cloze")]
    InvalidRange,
    /// Selection overlaps more than one cloze token.
    #[error("selection overlaps more than one cloze")]
    AmbiguousTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_markup_without_hint() {
        assert_eq!(token_markup(1, "France", None), "{{c1::France}}");
    }

    #[test]
    fn test_token_markup_with_hint() {
        assert_eq!(
            token_markup(2, "Paris", Some("city")),
            "{{c2::Paris::city}}"
        );
    }

    #[test]
    fn test_token_markup_empty_hint_is_distinct() {
        assert_eq!(token_markup(1, "x", Some("")), "{{c1::x::}}");
        assert_eq!(token_markup(1, "x", None), "{{c1::x}}");
    }

    #[test]
    fn test_selection_orders_endpoints() {
        let sel = Selection::new(9, 4);
        assert_eq!(sel.start(), 4);
        assert_eq!(sel.end(), 9);
        assert_eq!(sel.len(), 5);
        assert!(!sel.is_collapsed());
    }

    #[test]
    fn test_content_markup_range() {
        let cloze = Cloze {
            number: 12,
            content: "abc".to_string(),
            hint: None,
            markup_start: 5,
            markup_end: 5 + "{{c12::abc}}".len(),
            text_start: 5,
            text_end: 17,
        };
        let (start, end) = cloze.content_markup_range();
        assert_eq!(start, 5 + "{{c12::".len());
        assert_eq!(end, start + 3);
    }
}
