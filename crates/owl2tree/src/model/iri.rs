//! IRI helpers: reference resolution and short-identifier derivation.

use percent_encoding::percent_decode_str;

/// Whether `value` starts with an RFC 3986 scheme (`http:`, `urn:`, ...).
pub fn has_scheme(value: &str) -> bool {
    let Some(colon) = value.find(':') else {
        return false;
    };
    let scheme = &value[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Resolve a (possibly relative) reference against `base`.
///
/// Covers the forms found in ontology files: absolute IRIs, fragment-only
/// references (`#term`), the empty reference and plain relative paths.
pub fn resolve_iri(base: &str, value: &str) -> String {
    if has_scheme(value) {
        return value.to_string();
    }
    let without_fragment = base.split('#').next().unwrap_or(base);
    if value.is_empty() {
        return without_fragment.to_string();
    }
    if value.starts_with('#') {
        return format!("{without_fragment}{value}");
    }
    match without_fragment.rfind('/') {
        Some(slash) if slash + 1 > scheme_prefix_len(without_fragment) => {
            format!("{}{value}", &without_fragment[..=slash])
        }
        _ => format!("{without_fragment}/{value}"),
    }
}

/// Length of `scheme://authority` so that relative joins never cut into the host.
fn scheme_prefix_len(iri: &str) -> usize {
    match iri.find("://") {
        Some(pos) => {
            let after = pos + 3;
            iri[after..]
                .find('/')
                .map(|p| after + p)
                .unwrap_or(iri.len())
        }
        None => 0,
    }
}

/// The local name of an IRI: the part after the last `#`, or else the last `/`.
pub fn local_name(iri: &str) -> &str {
    if let Some(hash) = iri.rfind('#') {
        if hash + 1 < iri.len() {
            return &iri[hash + 1..];
        }
    }
    let trimmed = iri.trim_end_matches(['/', '#']);
    match trimmed.rfind('/') {
        Some(slash) => &trimmed[slash + 1..],
        None => trimmed,
    }
}

/// Derive the short identifier of a term from its IRI.
///
/// The local name is percent-decoded; OBO-shaped names (`MS_1000031`) become
/// `MS:1000031`. Anything else is returned as decoded.
pub fn derive_term_id(iri: &str) -> String {
    let decoded = percent_decode_str(local_name(iri)).decode_utf8_lossy();
    match decoded.split_once('_') {
        Some((prefix, suffix))
            if !prefix.is_empty()
                && !suffix.is_empty()
                && prefix.chars().all(|c| c.is_ascii_alphanumeric())
                && prefix.starts_with(|c: char| c.is_ascii_alphabetic()) =>
        {
            format!("{prefix}:{suffix}")
        }
        _ => decoded.into_owned(),
    }
}
