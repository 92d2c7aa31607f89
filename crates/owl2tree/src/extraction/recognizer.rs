//! Map raw RDF statements onto the recognized triple vocabulary.
//!
//! Class declarations, labels, definitions, `oboInOwl:id`, `rdfs:subClassOf`
//! and part-of relations are kept. Part-of arrives in two shapes:
//!
//! ```text
//! <A> rdfs:subClassOf [ a owl:Restriction ;
//!                        owl:onProperty obo:BFO_0000050 ;
//!                        owl:someValuesFrom <B> ] .
//! <A> obo:BFO_0000050 <B> .
//! ```
//!
//! Every other statement is dropped and counted.

use std::collections::HashMap;

use tracing::debug;

use super::rdfxml::{Literal, Object, Resource, Statement};
use crate::model::ontology::{obo, obo_in_owl, standard};
use crate::model::triple::{Predicate, Triple};

/// Recognized triples plus the number of statements that were not used.
#[derive(Debug, Default)]
pub struct Recognized {
    pub triples: Vec<Triple>,
    pub dropped: usize,
}

#[derive(Default)]
struct Restriction {
    on_property: Option<String>,
    some_values_from: Option<String>,
}

impl Restriction {
    fn part_of_target(&self) -> Option<&str> {
        match (&self.on_property, &self.some_values_from) {
            (Some(property), Some(target)) if property == obo::PART_OF => Some(target),
            _ => None,
        }
    }
}

/// Interpret statements, preserving their document order.
pub fn recognize(statements: &[Statement]) -> Recognized {
    let restrictions = collect_restrictions(statements);
    let mut out = Recognized::default();

    for statement in statements {
        match classify(statement, &restrictions) {
            Classified::Triple(triple) => out.triples.push(triple),
            Classified::RestrictionPart => {}
            Classified::Dropped => out.dropped += 1,
        }
    }

    debug!(
        triples = out.triples.len(),
        dropped = out.dropped,
        "recognized ontology triples"
    );
    out
}

enum Classified {
    Triple(Triple),
    /// Consumed while resolving a restriction.
    RestrictionPart,
    Dropped,
}

fn classify(statement: &Statement, restrictions: &HashMap<&Resource, Restriction>) -> Classified {
    let Resource::Iri(subject) = &statement.subject else {
        return if restrictions.contains_key(&statement.subject) {
            Classified::RestrictionPart
        } else {
            Classified::Dropped
        };
    };

    let predicate = statement.predicate.as_str();
    let triple = match (predicate, &statement.object) {
        (standard::RDF_TYPE, Object::Resource(Resource::Iri(class)))
            if class == standard::OWL_CLASS =>
        {
            Some(Triple::new(subject.as_str(), Predicate::Type, class.as_str()))
        }
        (standard::RDFS_SUBCLASS_OF, Object::Resource(Resource::Iri(parent))) => {
            Some(Triple::new(subject.as_str(), Predicate::SubClassOf, parent.as_str()))
        }
        (standard::RDFS_SUBCLASS_OF, Object::Resource(node)) => restrictions
            .get(node)
            .and_then(Restriction::part_of_target)
            .map(|target| Triple::new(subject.as_str(), Predicate::PartOf, target)),
        (obo::PART_OF, Object::Resource(Resource::Iri(parent))) => {
            Some(Triple::new(subject.as_str(), Predicate::PartOf, parent.as_str()))
        }
        (standard::RDFS_LABEL, Object::Literal(literal)) => {
            annotation(subject, literal, Predicate::LabelEn, Predicate::LabelZh)
        }
        (obo::DEFINITION, Object::Literal(literal)) => {
            annotation(subject, literal, Predicate::DefinitionEn, Predicate::DefinitionZh)
        }
        (obo_in_owl::ID, Object::Literal(literal)) => {
            non_blank(&literal.value).map(|id| Triple::new(subject.as_str(), Predicate::Identifier, id))
        }
        _ => None,
    };

    match triple {
        Some(triple) => Classified::Triple(triple),
        None => Classified::Dropped,
    }
}

/// Route a literal to the Chinese channel for `zh*` tags, otherwise to the default one.
fn annotation(subject: &str, literal: &Literal, default: Predicate, zh: Predicate) -> Option<Triple> {
    let value = non_blank(&literal.value)?;
    let predicate = if is_chinese_tag(literal.lang.as_deref()) {
        zh
    } else {
        default
    };
    Some(Triple::new(subject, predicate, value))
}

fn is_chinese_tag(lang: Option<&str>) -> bool {
    lang.and_then(|tag| tag.split(['-', '_']).next())
        .is_some_and(|primary| primary.eq_ignore_ascii_case("zh"))
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Gather `owl:onProperty` / `owl:someValuesFrom` for every blank node.
fn collect_restrictions(statements: &[Statement]) -> HashMap<&Resource, Restriction> {
    let mut restrictions: HashMap<&Resource, Restriction> = HashMap::new();

    for statement in statements {
        let node = &statement.subject;
        if matches!(node, Resource::Iri(_)) {
            continue;
        }
        let target = match &statement.object {
            Object::Resource(Resource::Iri(iri)) => iri,
            _ => continue,
        };
        match statement.predicate.as_str() {
            standard::OWL_ON_PROPERTY => {
                restrictions.entry(node).or_default().on_property = Some(target.clone());
            }
            standard::OWL_SOME_VALUES_FROM => {
                restrictions.entry(node).or_default().some_values_from = Some(target.clone());
            }
            standard::RDF_TYPE if target == standard::OWL_RESTRICTION => {
                restrictions.entry(node).or_default();
            }
            _ => {}
        }
    }

    restrictions
}
