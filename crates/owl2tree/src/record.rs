//! Output records: the JSON shapes handed to callers and written on export.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, Result};
use crate::model::ontology::standard;
use crate::model::term::{RelationKind, TermNode};
use crate::model::triple::{Predicate, Triple};

/// A term as seen by callers. Field names follow the published JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub id: String,
    pub label: Option<String>,
    pub label_zh: Option<String>,
    pub definition: Option<String>,
    pub definition_zh: Option<String>,
    pub iri: String,
    #[serde(rename = "isLeaf")]
    pub is_leaf: bool,
    /// Number of distinct descendants.
    pub count: usize,
    pub children: Vec<ChildRef>,
    pub parents: Vec<ParentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    #[serde(rename = "childId")]
    pub child_id: String,
    #[serde(rename = "relationType")]
    pub relation_type: RelationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "relationType")]
    pub relation_type: RelationKind,
}

impl TermRecord {
    /// Project a node, resolving edge targets against the arena it lives in.
    pub fn from_node(node: &TermNode, arena: &[TermNode]) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            label_zh: node.label_zh.clone(),
            definition: node.definition.clone(),
            definition_zh: node.definition_zh.clone(),
            iri: node.iri.clone(),
            is_leaf: node.is_leaf,
            count: node.descendant_count,
            children: node
                .children
                .iter()
                .map(|edge| ChildRef {
                    child_id: arena[edge.target].id.clone(),
                    relation_type: edge.relation,
                })
                .collect(),
            parents: node
                .parents
                .iter()
                .map(|edge| ParentRef {
                    parent_id: arena[edge.target].id.clone(),
                    relation_type: edge.relation,
                })
                .collect(),
        }
    }
}

/// Aggregate statistics over one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub total_terms: usize,
    pub leaf_terms: usize,
    pub terms_with_label_zh: usize,
    pub terms_with_definition_zh: usize,
    pub max_descendant_count: usize,
    pub avg_descendant_count: f64,
    pub total_relations: usize,
    pub sub_class_of_relations: usize,
    pub part_of_relations: usize,
    pub root_terms: usize,
    pub max_depth: usize,
}

impl StatsRecord {
    pub fn compute(nodes: &[TermNode]) -> Self {
        let mut stats = StatsRecord {
            total_terms: nodes.len(),
            leaf_terms: 0,
            terms_with_label_zh: 0,
            terms_with_definition_zh: 0,
            max_descendant_count: 0,
            avg_descendant_count: 0.0,
            total_relations: 0,
            sub_class_of_relations: 0,
            part_of_relations: 0,
            root_terms: 0,
            max_depth: 0,
        };
        let mut descendant_sum = 0usize;

        for node in nodes {
            stats.leaf_terms += usize::from(node.is_leaf);
            stats.root_terms += usize::from(node.is_root());
            stats.terms_with_label_zh += usize::from(node.label_zh.is_some());
            stats.terms_with_definition_zh += usize::from(node.definition_zh.is_some());
            stats.max_descendant_count = stats.max_descendant_count.max(node.descendant_count);
            stats.max_depth = stats.max_depth.max(node.depth);
            descendant_sum += node.descendant_count;

            for edge in &node.parents {
                match edge.relation {
                    RelationKind::SubClassOf => stats.sub_class_of_relations += 1,
                    RelationKind::PartOf => stats.part_of_relations += 1,
                }
            }
        }

        stats.total_relations = stats.sub_class_of_relations + stats.part_of_relations;
        if !nodes.is_empty() {
            stats.avg_descendant_count = descendant_sum as f64 / nodes.len() as f64;
        }
        stats
    }
}

/// A full export: metadata header plus every term in build order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub terms: Vec<TermRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub total_terms: usize,
    pub generated_at: DateTime<Utc>,
    pub description: String,
    /// Where the snapshot was loaded from.
    pub source: String,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let failed = |source| OntologyError::ExportFailed {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(failed)?;
        }
        fs::write(path, json).map_err(failed)
    }

    /// Load an export previously written with [`ExportDocument::write_to`].
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| OntologyError::SourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// `ontology_terms_YYYYmmdd_HHMMSS.json`, stamped with local time.
pub fn default_export_file_name(now: DateTime<Local>) -> String {
    format!("ontology_terms_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Re-encode exported records as triples that rebuild the same graph.
///
/// Each record contributes its declaration, its explicit id, its annotations
/// and one relation triple per parent reference. Relation triples are ordered
/// so that rebuilding reproduces every `parents` and `children` listing. Parent
/// ids that no record carries are passed through unchanged, so they surface as
/// dangling references when the triples are built.
pub fn import_records(records: &[TermRecord]) -> Vec<Triple> {
    let iri_by_id: HashMap<&str, &str> = records
        .iter()
        .map(|record| (record.id.as_str(), record.iri.as_str()))
        .collect();

    let mut triples = Vec::new();
    for record in records {
        let subject = record.iri.as_str();
        triples.push(Triple::new(subject, Predicate::Type, standard::OWL_CLASS));
        triples.push(Triple::new(subject, Predicate::Identifier, record.id.as_str()));

        let annotations = [
            (Predicate::LabelEn, &record.label),
            (Predicate::LabelZh, &record.label_zh),
            (Predicate::DefinitionEn, &record.definition),
            (Predicate::DefinitionZh, &record.definition_zh),
        ];
        for (predicate, value) in annotations {
            if let Some(value) = value {
                triples.push(Triple::new(subject, predicate, value.as_str()));
            }
        }
    }

    for (record, parent) in relation_order(records) {
        let object = iri_by_id
            .get(parent.parent_id.as_str())
            .copied()
            .unwrap_or(parent.parent_id.as_str());
        triples.push(Triple::new(
            record.iri.as_str(),
            Predicate::from(parent.relation_type),
            object,
        ));
    }

    triples
}

/// Parent references in an order consistent with both listing directions.
///
/// Consecutive entries of a record's `parents` and of a record's `children`
/// become ordering constraints between relations; ties go to record order.
/// Listings that contradict each other are resolved in record order.
fn relation_order(records: &[TermRecord]) -> Vec<(&TermRecord, &ParentRef)> {
    let mut relations = Vec::new();
    let mut ordinal: HashMap<(&str, &str, RelationKind), usize> = HashMap::new();
    for record in records {
        for parent in &record.parents {
            let key = (record.id.as_str(), parent.parent_id.as_str(), parent.relation_type);
            ordinal.entry(key).or_insert(relations.len());
            relations.push((record, parent));
        }
    }

    let mut sequences: Vec<Vec<usize>> = Vec::with_capacity(records.len() * 2);
    let mut start = 0;
    for record in records {
        sequences.push((start..start + record.parents.len()).collect());
        start += record.parents.len();
    }
    for record in records {
        sequences.push(
            record
                .children
                .iter()
                .filter_map(|child| {
                    let key = (child.child_id.as_str(), record.id.as_str(), child.relation_type);
                    ordinal.get(&key).copied()
                })
                .collect(),
        );
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); relations.len()];
    let mut blockers = vec![0usize; relations.len()];
    for sequence in &sequences {
        for pair in sequence.windows(2) {
            successors[pair[0]].push(pair[1]);
            blockers[pair[1]] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..relations.len()).filter(|&r| blockers[r] == 0).collect();
    let mut placed = vec![false; relations.len()];
    let mut order = Vec::with_capacity(relations.len());
    while order.len() < relations.len() {
        let next = match ready.pop_first() {
            Some(next) => next,
            None => match placed.iter().position(|done| !done) {
                Some(stuck) => stuck,
                None => break,
            },
        };
        if placed[next] {
            continue;
        }
        placed[next] = true;
        order.push(relations[next]);
        for &successor in &successors[next] {
            blockers[successor] = blockers[successor].saturating_sub(1);
            if blockers[successor] == 0 && !placed[successor] {
                ready.insert(successor);
            }
        }
    }
    order
}
