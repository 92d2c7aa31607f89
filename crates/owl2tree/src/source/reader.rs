//! Load ontology markup from disk or memory and normalize it for parsing.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::cleaner::repair_annotations;
use crate::config::LoadOptions;
use crate::error::{OntologyError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decoded, normalized markup ready for the RDF/XML parser.
#[derive(Debug, Clone)]
pub struct Markup {
    pub text: String,
    /// Where the markup came from (a path, or `<memory>`).
    pub origin: String,
    /// Annotation fragments whose stray XML characters were escaped.
    pub repaired_fragments: usize,
}

/// Read an ontology file from disk.
///
/// The size ceiling is checked against file metadata before any bytes are read.
pub fn read_path(path: &Path, options: &LoadOptions) -> Result<Markup> {
    let origin = path.display().to_string();
    let unavailable = |reason: String| OntologyError::SourceUnavailable {
        path: origin.clone(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| unavailable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unavailable("not a regular file".to_string()));
    }
    if metadata.len() > options.max_size {
        return Err(unavailable(too_large(metadata.len(), options.max_size)));
    }

    let bytes = fs::read(path).map_err(|e| unavailable(e.to_string()))?;
    normalize(&bytes, origin.clone(), options)
}

/// Normalize an in-memory byte source.
pub fn read_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Markup> {
    normalize(bytes, "<memory>".to_string(), options)
}

fn normalize(bytes: &[u8], origin: String, options: &LoadOptions) -> Result<Markup> {
    if bytes.len() as u64 > options.max_size {
        return Err(OntologyError::SourceUnavailable {
            path: origin,
            reason: too_large(bytes.len() as u64, options.max_size),
        });
    }

    let decoded = decode(bytes)?;
    let (text, repaired_fragments) = if options.repair_annotations {
        repair_annotations(&decoded)
    } else {
        (decoded, 0)
    };

    debug!(
        origin = %origin,
        bytes = bytes.len(),
        repaired_fragments,
        "normalized ontology source"
    );

    Ok(Markup {
        text,
        origin,
        repaired_fragments,
    })
}

fn too_large(len: u64, max: u64) -> String {
    format!("source is {len} bytes, exceeding the configured maximum of {max} bytes")
}

/// Decode bytes to text, honouring (and stripping) a leading byte-order mark.
fn decode(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return decode_utf8(rest, UTF8_BOM.len());
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    decode_utf8(bytes, 0)
}

fn decode_utf8(bytes: &[u8], bom_len: usize) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        let err = e.utf8_error();
        OntologyError::EncodingError {
            offset: bom_len + err.valid_up_to(),
            reason: "invalid UTF-8 sequence".to_string(),
        }
    })
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(OntologyError::EncodingError {
            offset: bytes.len() + 1,
            reason: "truncated UTF-16 code unit".to_string(),
        });
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();

    let mut text = String::with_capacity(units.len());
    let mut unit = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                unit += c.len_utf16();
                text.push(c);
            }
            Err(_) => {
                return Err(OntologyError::EncodingError {
                    offset: 2 + unit * 2,
                    reason: "unpaired UTF-16 surrogate".to_string(),
                })
            }
        }
    }
    Ok(text)
}
