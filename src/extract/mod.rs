//! Pull converted code out of a free-form agent reply.

const FENCE: &str = "```";

/// Extract code from `text`, preferring a block fenced with `language_tag`.
///
/// Resolution order:
/// 1. the first block opened by "```<language_tag>" (tag matched case-insensitively),
/// 2. the first block opened by a bare "```",
/// 3. the whole reply, trimmed.
///
/// An opening fence without a closing one does not count as a block. An empty
/// return value means the reply had nothing usable in it.
pub fn extract(text: &str, language_tag: &str) -> String {
    match extract_fenced(text, language_tag) {
        Some(code) => code.to_string(),
        None => text.trim().to_string(),
    }
}

/// Only the fenced part of [`extract`]; `None` when no closed, non-empty block exists.
pub fn extract_fenced<'a>(text: &'a str, language_tag: &str) -> Option<&'a str> {
    let tag = language_tag.trim();
    let body_start = if tag.is_empty() {
        find_bare_opening(text)
    } else {
        match find_tagged_opening(text, tag) {
            Some(start) => Some(start),
            None => find_bare_opening(text),
        }
    }?;

    let rest = &text[body_start..];
    let close = rest.find(FENCE)?;
    let body = rest[..close].trim();
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Byte offset just past "```<tag>". The tag must not run on into a longer
/// word, so `java` does not match "```javascript".
fn find_tagged_opening(text: &str, tag: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let haystack = text.to_ascii_lowercase();
    let marker = format!("{FENCE}{}", tag.to_ascii_lowercase());

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&marker) {
        let end = from + pos + marker.len();
        let boundary = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_info_char(c));
        if boundary {
            return Some(end);
        }
        from = end;
    }
    None
}

/// Byte offset of the body after the first bare "```". A lone info string on
/// the opening line (a block tagged with some other language) is skipped.
fn find_bare_opening(text: &str) -> Option<usize> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    match rest.find('\n') {
        Some(newline) => {
            let info = rest[..newline].trim();
            if !info.is_empty() && info.chars().all(is_info_char) {
                Some(start + newline + 1)
            } else {
                Some(start)
            }
        }
        None => Some(start),
    }
}

fn is_info_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_' | '.')
}
