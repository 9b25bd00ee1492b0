//! Rendered-offset mapping between serialized markup and visible text
//!
//! Rendered-text offsets cannot be obtained by slicing the markup string:
//! inline tags are zero-width in the rendered view and entity references
//! collapse to a single rendered character. This module provides the
//! forward and backward walks every cursor-preserving rewrite is built on,
//! without touching a real display surface.
//!
//! Rendered offsets count Unicode scalar values; markup offsets are byte
//! offsets into the fragment string.

/// One lexical span of the markup: a tag, an entity reference, or a single
/// character. Tags have rendered width 0; everything else width 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupSpan {
    pub start: usize,
    pub end: usize,
    pub width: usize,
}

/// Longest entity reference we recognize, delimiters included.
const MAX_ENTITY_LEN: usize = 32;

/// Iterator over the lexical spans of a markup fragment.
pub struct SpanIter<'a> {
    markup: &'a str,
    pos: usize,
}

impl<'a> SpanIter<'a> {
    fn new(markup: &'a str, pos: usize) -> Self {
        Self { markup, pos }
    }
}

impl Iterator for SpanIter<'_> {
    type Item = MarkupSpan;

    fn next(&mut self) -> Option<MarkupSpan> {
        let rest = &self.markup[self.pos..];
        let first = rest.chars().next()?;
        let start = self.pos;

        if first == '<' && looks_like_tag(rest) {
            // Zero-width tag span. An unterminated tag swallows the rest of
            // the fragment so walks always terminate.
            let end = match rest.find('>') {
                Some(close) => start + close + 1,
                None => self.markup.len(),
            };
            self.pos = end;
            return Some(MarkupSpan {
                start,
                end,
                width: 0,
            });
        }

        if first == '&' {
            if let Some(len) = entity_len(rest) {
                self.pos = start + len;
                return Some(MarkupSpan {
                    start,
                    end: start + len,
                    width: 1,
                });
            }
        }

        let end = start + first.len_utf8();
        self.pos = end;
        Some(MarkupSpan {
            start,
            end,
            width: 1,
        })
    }
}

/// Iterate the lexical spans of `markup`.
pub fn spans(markup: &str) -> SpanIter<'_> {
    SpanIter::new(markup, 0)
}

fn looks_like_tag(rest: &str) -> bool {
    matches!(
        rest[1..].chars().next(),
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!'
    )
}

/// Length in bytes of an entity reference at the start of `rest`, if any.
fn entity_len(rest: &str) -> Option<usize> {
    let body = &rest[1..];
    for (i, c) in body.char_indices().take(MAX_ENTITY_LEN) {
        match c {
            ';' if i > 0 => return Some(i + 2),
            c if c.is_ascii_alphanumeric() || c == '#' => continue,
            _ => return None,
        }
    }
    None
}

/// Decode an entity reference (delimiters included) to its rendered character.
fn entity_char(entity: &str) -> char {
    match entity {
        "&amp;" => '&',
        "&lt;" => '<',
        "&gt;" => '>',
        "&quot;" => '"',
        "&apos;" | "&#39;" => '\'',
        "&nbsp;" => '\u{a0}',
        _ => {
            let body = &entity[1..entity.len() - 1];
            if let Some(digits) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            } else if let Some(digits) = body.strip_prefix('#') {
                digits
                    .parse::<u32>()
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            } else {
                char::REPLACEMENT_CHARACTER
            }
        }
    }
}

/// Rendered length of a markup fragment.
pub fn text_len(markup: &str) -> usize {
    spans(markup).map(|s| s.width).sum()
}

/// Rendered offset of a markup byte offset.
///
/// An offset falling inside a tag or entity maps to that span's start.
pub fn markup_to_text(markup: &str, markup_offset: usize) -> usize {
    let mut rendered = 0;
    for span in spans(markup) {
        if span.start >= markup_offset {
            break;
        }
        if span.width == 1 && span.end <= markup_offset {
            rendered += 1;
        }
    }
    rendered
}

/// Forward walk: consume `n` rendered characters starting at markup byte
/// offset `from`. Returns the byte offset just after the last consumed
/// character; trailing zero-width tags are not consumed. Walking past the
/// end of the fragment stops at its length.
pub fn advance(markup: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    let mut remaining = n;
    for span in SpanIter::new(markup, from) {
        if span.width == 1 {
            remaining -= 1;
            if remaining == 0 {
                return span.end;
            }
        }
    }
    markup.len()
}

/// Backward walk, symmetric to [`advance`]: back up over `n` rendered
/// characters ending before markup byte offset `from`. Returns the byte
/// offset of the first character backed over, or 0 when the walk exhausts
/// the fragment.
pub fn retreat(markup: &str, from: usize, n: usize) -> usize {
    if n == 0 {
        return from;
    }
    let visible: Vec<MarkupSpan> = spans(markup)
        .take_while(|s| s.end <= from)
        .filter(|s| s.width == 1)
        .collect();
    if visible.len() < n {
        return 0;
    }
    visible[visible.len() - n].start
}

/// Markup byte offset of a rendered-text offset, measured from the start of
/// the fragment. Equivalent to `advance(markup, 0, text_offset)`.
pub fn text_to_markup(markup: &str, text_offset: usize) -> usize {
    advance(markup, 0, text_offset)
}

/// Rendered plain text of a markup fragment: tags dropped, entities decoded.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::new();
    for span in spans(markup) {
        if span.width == 0 {
            continue;
        }
        let piece = &markup[span.start..span.end];
        if piece.starts_with('&') && piece.len() > 1 {
            out.push(entity_char(piece));
        } else {
            out.push_str(piece);
        }
    }
    out
}

/// Rendered text of a half-open rendered range.
pub fn rendered_slice(markup: &str, text_start: usize, text_end: usize) -> String {
    if text_end <= text_start {
        return String::new();
    }
    let start = text_to_markup(markup, text_start);
    let end = text_to_markup(markup, text_end);
    plain_text(&markup[start..end])
}
