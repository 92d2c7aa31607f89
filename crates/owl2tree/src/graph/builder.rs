//! Term graph construction: one node per declared class, linked by relations.
//!
//! The build runs in three passes over the triple set:
//! 1. declarations -- create nodes in declaration order and assign short ids,
//!    rejecting id collisions;
//! 2. annotations -- attach labels and definitions (first value per channel wins);
//! 3. relations -- link `subClassOf` / `partOf` edges in both directions,
//!    preserving statement order and omitting edges to undeclared classes.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{BuildWarning, OntologyError, Result};
use crate::model::iri::derive_term_id;
use crate::model::term::{Edge, RelationKind, TermNode};
use crate::model::triple::{Predicate, Triple};

/// A linked (but not yet annotated with derived attributes) node arena.
#[derive(Debug, Default)]
pub struct LinkedGraph {
    pub nodes: Vec<TermNode>,
    pub by_iri: HashMap<String, usize>,
    pub by_id: HashMap<String, usize>,
    pub warnings: Vec<BuildWarning>,
    pub edge_count: usize,
}

/// Build the linked node set from recognized triples.
pub fn build_graph(triples: &[Triple]) -> Result<LinkedGraph> {
    let mut graph = LinkedGraph::default();

    declare_nodes(&mut graph, triples)?;
    attach_annotations(&mut graph, triples);
    link_relations(&mut graph, triples);

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edge_count,
        dangling = graph.warnings.len(),
        "linked term graph"
    );
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Pass 1: declarations
// ---------------------------------------------------------------------------

fn declare_nodes(graph: &mut LinkedGraph, triples: &[Triple]) -> Result<()> {
    let mut explicit_ids: HashMap<&str, &str> = HashMap::new();
    for triple in triples.iter().filter(|t| t.predicate == Predicate::Identifier) {
        explicit_ids
            .entry(triple.subject.as_str())
            .or_insert(triple.object.as_str());
    }

    for triple in triples.iter().filter(|t| t.predicate == Predicate::Type) {
        let iri = triple.subject.as_str();
        if graph.by_iri.contains_key(iri) {
            continue;
        }

        let id = match explicit_ids.get(iri) {
            Some(id) => (*id).to_string(),
            None => derive_term_id(iri),
        };
        if let Some(&existing) = graph.by_id.get(&id) {
            return Err(OntologyError::IdCollision {
                id,
                first: graph.nodes[existing].iri.clone(),
                second: iri.to_string(),
            });
        }

        let index = graph.nodes.len();
        graph.by_iri.insert(iri.to_string(), index);
        graph.by_id.insert(id.clone(), index);
        graph.nodes.push(TermNode::new(id, iri));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pass 2: annotations
// ---------------------------------------------------------------------------

fn attach_annotations(graph: &mut LinkedGraph, triples: &[Triple]) {
    for triple in triples {
        let Some(&index) = graph.by_iri.get(&triple.subject) else {
            if triple.predicate.is_annotation() && triple.predicate != Predicate::Identifier {
                debug!(iri = %triple.subject, "annotation on undeclared class ignored");
            }
            continue;
        };
        let node = &mut graph.nodes[index];
        let slot = match triple.predicate {
            Predicate::LabelEn => &mut node.label,
            Predicate::LabelZh => &mut node.label_zh,
            Predicate::DefinitionEn => &mut node.definition,
            Predicate::DefinitionZh => &mut node.definition_zh,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(triple.object.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 3: relations
// ---------------------------------------------------------------------------

fn link_relations(graph: &mut LinkedGraph, triples: &[Triple]) {
    let mut seen: HashSet<(usize, usize, RelationKind)> = HashSet::new();

    for triple in triples {
        let Some(relation) = triple.predicate.relation() else {
            continue;
        };

        let child = graph.by_iri.get(&triple.subject).copied();
        let parent = graph.by_iri.get(&triple.object).copied();
        let (child, parent) = match (child, parent) {
            (Some(child), Some(parent)) => (child, parent),
            (child, _) => {
                let missing = if child.is_none() {
                    &triple.subject
                } else {
                    &triple.object
                };
                graph.warnings.push(BuildWarning::DanglingReference {
                    subject: triple.subject.clone(),
                    relation,
                    object: triple.object.clone(),
                    missing: missing.clone(),
                });
                continue;
            }
        };

        if !seen.insert((child, parent, relation)) {
            continue;
        }
        graph.nodes[child].parents.push(Edge {
            target: parent,
            relation,
        });
        graph.nodes[parent].children.push(Edge {
            target: child,
            relation,
        });
        graph.edge_count += 1;
    }
}
