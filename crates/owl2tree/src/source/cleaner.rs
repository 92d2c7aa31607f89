//! Escape stray XML special characters inside annotation elements.
//!
//! Hand-edited ontology files routinely carry text such as `m/z & charge` or
//! `values < 1` inside `rdfs:label` and `obo:IAO_0000115` elements, which is
//! not well-formed XML. Only the content of those elements is touched; entity
//! and character references that are already valid are kept as they are.

use std::borrow::Cow;

use tracing::debug;

/// Elements whose text content is repaired.
const ANNOTATION_ELEMENTS: [&str; 2] = ["rdfs:label", "obo:IAO_0000115"];

/// Return the repaired text and the number of element contents that changed.
pub fn repair_annotations(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut repaired = 0;

    while let Some((start, name)) = next_annotation_open_tag(rest) {
        let Some(tag_len) = rest[start..].find('>') else {
            break;
        };
        let content_start = start + tag_len + 1;
        if rest[..content_start].ends_with("/>") {
            out.push_str(&rest[..content_start]);
            rest = &rest[content_start..];
            continue;
        }

        let close = format!("</{name}>");
        let Some(content_len) = rest[content_start..].find(&close) else {
            break;
        };
        let content = &rest[content_start..content_start + content_len];

        out.push_str(&rest[..content_start]);
        match escape_content(content) {
            Cow::Owned(escaped) => {
                debug!(element = name, text = content, "repaired annotation text");
                repaired += 1;
                out.push_str(&escaped);
            }
            Cow::Borrowed(unchanged) => out.push_str(unchanged),
        }
        out.push_str(&close);
        rest = &rest[content_start + content_len + close.len()..];
    }

    out.push_str(rest);
    (out, repaired)
}

/// Find the earliest opening tag of any annotation element.
fn next_annotation_open_tag(haystack: &str) -> Option<(usize, &'static str)> {
    ANNOTATION_ELEMENTS
        .iter()
        .filter_map(|name| find_open_tag(haystack, name).map(|pos| (pos, *name)))
        .min_by_key(|(pos, _)| *pos)
}

/// Regions whose markup is not scanned for annotation tags.
const SKIPPED_SECTIONS: [(&str, &str); 3] = [("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")];

fn find_open_tag(haystack: &str, name: &str) -> Option<usize> {
    let needle = format!("<{name}");
    let mut offset = 0;
    while let Some(found) = haystack[offset..].find('<') {
        let start = offset + found;
        let rest = &haystack[start..];
        if let Some(len) = skipped_section_len(rest) {
            offset = start + len;
            continue;
        }
        if let Some(after) = rest.strip_prefix(needle.as_str()) {
            if matches!(after.chars().next(), Some(c) if c == '>' || c == '/' || c.is_whitespace()) {
                return Some(start);
            }
        }
        offset = start + 1;
    }
    None
}

/// Length of the comment, CDATA section or processing instruction opening
/// `s`; an unterminated one runs to the end of the text.
fn skipped_section_len(s: &str) -> Option<usize> {
    SKIPPED_SECTIONS
        .iter()
        .find(|(open, _)| s.starts_with(open))
        .map(|(open, close)| {
            s[open.len()..]
                .find(close)
                .map_or(s.len(), |end| open.len() + end + close.len())
        })
}

fn escape_content(content: &str) -> Cow<'_, str> {
    if content.contains("<![CDATA[") {
        return Cow::Borrowed(content);
    }
    let needs_escape = content
        .char_indices()
        .any(|(i, c)| matches!(c, '<' | '>') || (c == '&' && !is_reference(&content[i..])));
    if !needs_escape {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len() + 8);
    for (i, c) in content.char_indices() {
        match c {
            '&' if !is_reference(&content[i..]) => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Whether `s` (starting at `&`) begins a well-formed entity or character reference.
fn is_reference(s: &str) -> bool {
    let Some(body) = s.strip_prefix('&') else {
        return false;
    };
    let Some(end) = body.find(';') else {
        return false;
    };
    let name = &body[..end];
    if let Some(hex) = name.strip_prefix("#x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(dec) = name.strip_prefix('#') {
        return !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit());
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ':'))
        }
        _ => false,
    }
}
