//! Cloze token scan
//!
//! Grammar: `{{c<digits>::<content>[::<hint>]}}`. Content and hint are
//! non-greedy; the first `}}` terminates the token, so content containing
//! a literal `}}` breaks boundary detection. That is a known limitation of
//! the flat scan and is kept as-is rather than upgraded to a nested parser.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::core::Cloze;
use crate::text::offset::markup_to_text;

static CLOZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{c(\d+)::(.*?)\}\}").expect("cloze token pattern"));

/// Scan a fragment and return every cloze token, left to right by
/// `markup_start`.
pub fn parse_all(fragment: &str) -> Vec<Cloze> {
    let mut clozes = Vec::new();
    for caps in CLOZE_RE.captures_iter(fragment) {
        let number: u32 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let whole = caps.get(0).expect("match group 0");
        let inner = caps.get(2).expect("inner group").as_str();
        // Hint starts at the first `::` inside the token body.
        let (content, hint) = match inner.split_once("::") {
            Some((content, hint)) => (content.to_string(), Some(hint.to_string())),
            None => (inner.to_string(), None),
        };
        clozes.push(Cloze {
            number,
            content,
            hint,
            markup_start: whole.start(),
            markup_end: whole.end(),
            text_start: markup_to_text(fragment, whole.start()),
            text_end: markup_to_text(fragment, whole.end()),
        });
    }
    clozes
}

/// Find the token whose text range contains `text_offset`, inclusive on
/// both ends. A tie at a shared boundary resolves to the earlier token in
/// document order.
pub fn locate_at_cursor(fragment: &str, text_offset: usize) -> Option<Cloze> {
    parse_all(fragment)
        .into_iter()
        .find(|c| c.contains_text_offset(text_offset))
}

/// Highest cloze number present in the fragment, or 0 when there are none.
pub fn max_number(fragment: &str) -> u32 {
    parse_all(fragment).iter().map(|c| c.number).max().unwrap_or(0)
}
