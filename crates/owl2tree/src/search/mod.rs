//! Case-insensitive substring search over labels and definitions.

use crate::error::{OntologyError, Result};
use crate::model::term::TermNode;

/// Relevance buckets; lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    Label = 0,
    Definition = 1,
}

/// Lowercased haystacks per node, built once per snapshot.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    /// `label` and `label_zh`, lowercased.
    labels: Vec<String>,
    /// `definition` and `definition_zh`, lowercased.
    definitions: Vec<String>,
}

impl SearchIndex {
    pub fn build(nodes: &[TermNode]) -> Self {
        let entries = nodes
            .iter()
            .map(|node| IndexEntry {
                labels: lowered([&node.label, &node.label_zh]),
                definitions: lowered([&node.definition, &node.definition_zh]),
            })
            .collect();
        Self { entries }
    }

    /// Node indices matching `query`, best rank first, then by term id.
    ///
    /// `nodes` must be the slice the index was built from.
    pub fn search(&self, nodes: &[TermNode], query: &str) -> Result<Vec<usize>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(OntologyError::InvalidQuery);
        }

        let mut hits: Vec<(MatchRank, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.rank(&needle).map(|rank| (rank, index)))
            .collect();
        hits.sort_by(|(rank_a, a), (rank_b, b)| {
            rank_a.cmp(rank_b).then_with(|| nodes[*a].id.cmp(&nodes[*b].id))
        });

        Ok(hits.into_iter().map(|(_, index)| index).collect())
    }
}

impl IndexEntry {
    fn rank(&self, needle: &str) -> Option<MatchRank> {
        if self.labels.iter().any(|text| text.contains(needle)) {
            Some(MatchRank::Label)
        } else if self.definitions.iter().any(|text| text.contains(needle)) {
            Some(MatchRank::Definition)
        } else {
            None
        }
    }
}

fn lowered(fields: [&Option<String>; 2]) -> Vec<String> {
    fields
        .into_iter()
        .flatten()
        .map(|text| text.to_lowercase())
        .collect()
}
