//! Error types for loading, building and querying term graphs.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::term::RelationKind;

/// Errors raised while building a snapshot or answering a query.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The source could not be read: missing, unreadable or too large.
    #[error("source unavailable ({path}): {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// The source bytes could not be decoded as text.
    #[error("encoding error at byte {offset}: {reason}")]
    EncodingError { offset: usize, reason: String },

    /// The markup could not be parsed as RDF/XML.
    #[error("malformed document{}: {message}", position_suffix(.position))]
    MalformedDocument {
        message: String,
        position: Option<u64>,
    },

    /// Two distinct IRIs derived the same short identifier.
    #[error("identifier `{id}` is shared by <{first}> and <{second}>")]
    IdCollision {
        id: String,
        first: String,
        second: String,
    },

    /// The relation graph contains a cycle through the named term.
    #[error("cycle detected through term `{id}`")]
    CycleDetected { id: String },

    /// No term carries the requested identifier.
    #[error("term `{id}` not found")]
    NotFound { id: String },

    /// Search queries must contain at least one non-whitespace character.
    #[error("search query must not be empty")]
    InvalidQuery,

    /// Export serialization failed.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Export output could not be written.
    #[error("failed to write export to {}: {source}", .path.display())]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OntologyError {
    pub(crate) fn malformed(message: impl Into<String>, position: Option<u64>) -> Self {
        OntologyError::MalformedDocument {
            message: message.into(),
            position,
        }
    }

    /// Whether this error aborts a snapshot build (and therefore a reload).
    ///
    /// Query-time errors (`NotFound`, `InvalidQuery`) and export failures
    /// never invalidate the active snapshot.
    pub fn is_fatal_build_error(&self) -> bool {
        matches!(
            self,
            OntologyError::SourceUnavailable { .. }
                | OntologyError::EncodingError { .. }
                | OntologyError::MalformedDocument { .. }
                | OntologyError::IdCollision { .. }
                | OntologyError::CycleDetected { .. }
        )
    }

    /// Whether this error is a per-call query error.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            OntologyError::NotFound { .. } | OntologyError::InvalidQuery
        )
    }
}

fn position_suffix(position: &Option<u64>) -> String {
    match position {
        Some(pos) => format!(" at byte {pos}"),
        None => String::new(),
    }
}

/// Recoverable problems recorded during a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildWarning {
    /// A relation names a term that was never declared; the edge is omitted.
    #[error("dangling reference: <{subject}> {relation} <{object}> (undeclared <{missing}>)")]
    DanglingReference {
        subject: String,
        relation: RelationKind,
        object: String,
        missing: String,
    },
}

pub type Result<T> = std::result::Result<T, OntologyError>;
