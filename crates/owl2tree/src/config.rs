//! Load options and source-file policy.

use std::path::Path;

use crate::error::{OntologyError, Result};

/// Default ceiling on source size: 100 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;

/// Base IRI used for relative references when a document declares no `xml:base`.
pub const DEFAULT_BASE_IRI: &str = "http://localhost/ontology";

/// Extensions accepted for ontology sources. Enforced by callers, not the core.
pub const ALLOWED_EXTENSIONS: [&str; 3] = [".owl", ".rdf", ".xml"];

/// Options controlling how a source is read and parsed.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub max_size: u64,
    pub base_iri: String,
    /// Escape stray `&`, `<` and `>` inside label/definition elements before parsing.
    pub repair_annotations: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            base_iri: DEFAULT_BASE_IRI.to_string(),
            repair_annotations: true,
        }
    }
}

impl LoadOptions {
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = base_iri.into();
        self
    }
}

/// Reject paths whose extension is not in [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn ensure_allowed_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()));

    match ext {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(OntologyError::SourceUnavailable {
            path: path.display().to_string(),
            reason: format!(
                "unsupported file extension (allowed: {})",
                ALLOWED_EXTENSIONS.join(", ")
            ),
        }),
    }
}
