//! Term nodes: the persistent unit of the term graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two hierarchical relation kinds between classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationKind {
    #[serde(rename = "subClassOf")]
    SubClassOf,
    #[serde(rename = "partOf")]
    PartOf,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::SubClassOf => "subClassOf",
            RelationKind::PartOf => "partOf",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directed edge from a node to a neighbour, by arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Index of the neighbour in the owning snapshot's node arena.
    pub target: usize,
    pub relation: RelationKind,
}

/// A class of the ontology together with its place in the hierarchy.
///
/// `parents` and `children` are kept as a consistent bidirectional pair:
/// `children` of A holds `(B, R)` exactly when `parents` of B holds `(A, R)`.
/// `is_leaf`, `descendant_count` and `depth` are filled in once, when the
/// snapshot is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNode {
    pub id: String,
    pub iri: String,
    pub label: Option<String>,
    pub label_zh: Option<String>,
    pub definition: Option<String>,
    pub definition_zh: Option<String>,
    pub parents: Vec<Edge>,
    pub children: Vec<Edge>,
    pub is_leaf: bool,
    pub descendant_count: usize,
    /// Length of the longest parent chain above this node; roots are at 0.
    pub depth: usize,
}

impl TermNode {
    pub fn new(id: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            iri: iri.into(),
            label: None,
            label_zh: None,
            definition: None,
            definition_zh: None,
            parents: Vec::new(),
            children: Vec::new(),
            is_leaf: true,
            descendant_count: 0,
            depth: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
