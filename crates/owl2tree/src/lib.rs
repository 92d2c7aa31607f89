//! Build queryable term hierarchies from OWL ontologies in RDF/XML.
//!
//! Loading runs reader -> parser -> graph builder -> derived attributes ->
//! search index and produces an immutable [`Snapshot`]. [`OntologyService`]
//! serves queries from the active snapshot and swaps in a new one on reload.

pub mod config;
pub mod emitter;
pub mod error;
pub mod extraction;
pub mod graph;
pub mod model;
pub mod record;
pub mod search;
pub mod service;
pub mod snapshot;
pub mod source;

pub use config::LoadOptions;
pub use error::{BuildWarning, OntologyError, Result};
pub use model::term::{Edge, RelationKind, TermNode};
pub use model::triple::{Predicate, Triple};
pub use record::{ExportDocument, StatsRecord, TermRecord};
pub use service::{OntologyService, Terms};
pub use snapshot::{BuildReport, Snapshot};
