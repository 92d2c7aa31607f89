//! Recognized triples: the only statements the graph builder consumes.

use super::term::RelationKind;

/// Predicates the parser recognizes. Everything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Class declaration (`rdf:type owl:Class`); the object is the class IRI.
    Type,
    SubClassOf,
    PartOf,
    LabelEn,
    LabelZh,
    DefinitionEn,
    DefinitionZh,
    /// Explicit short identifier (`oboInOwl:id`).
    Identifier,
}

impl Predicate {
    /// The relation kind for `SubClassOf` / `PartOf`, `None` otherwise.
    pub fn relation(self) -> Option<RelationKind> {
        match self {
            Predicate::SubClassOf => Some(RelationKind::SubClassOf),
            Predicate::PartOf => Some(RelationKind::PartOf),
            _ => None,
        }
    }

    /// Whether the object is a literal rather than an IRI.
    pub fn is_annotation(self) -> bool {
        matches!(
            self,
            Predicate::LabelEn
                | Predicate::LabelZh
                | Predicate::DefinitionEn
                | Predicate::DefinitionZh
                | Predicate::Identifier
        )
    }
}

impl From<RelationKind> for Predicate {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::SubClassOf => Predicate::SubClassOf,
            RelationKind::PartOf => Predicate::PartOf,
        }
    }
}

/// A subject--predicate--object statement about a class IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: Predicate, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}
