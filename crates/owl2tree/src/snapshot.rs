//! Immutable, fully built term graphs.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::config::LoadOptions;
use crate::error::{BuildWarning, OntologyError, Result};
use crate::extraction::parse_triples;
use crate::graph::{build_graph, compute_derived};
use crate::model::term::{RelationKind, TermNode};
use crate::model::triple::Triple;
use crate::record::{ExportDocument, ExportMetadata, StatsRecord, TermRecord};
use crate::search::SearchIndex;
use crate::source::{read_bytes, read_path, Markup};

const EXPORT_DESCRIPTION: &str = "Ontology term hierarchy exported by owl2tree";

/// Recoverable findings from one build, returned alongside a usable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub warnings: Vec<BuildWarning>,
    /// RDF statements read from the document.
    pub statement_count: usize,
    /// Statements recognized as class, annotation or relation triples.
    pub triple_count: usize,
    pub dropped_statements: usize,
    pub repaired_fragments: usize,
}

/// A built term graph. Never mutated after construction.
#[derive(Debug)]
pub struct Snapshot {
    nodes: Vec<TermNode>,
    by_id: HashMap<String, usize>,
    index: SearchIndex,
    stats: StatsRecord,
    report: BuildReport,
    origin: String,
}

impl Snapshot {
    pub fn from_path(path: &Path, options: &LoadOptions) -> Result<Self> {
        let markup = read_path(path, options)?;
        Self::from_markup(markup, options)
    }

    pub fn from_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        let markup = read_bytes(bytes, options)?;
        Self::from_markup(markup, options)
    }

    /// Build directly from recognized triples, skipping the reader and parser.
    pub fn from_triples(triples: &[Triple]) -> Result<Self> {
        let report = BuildReport {
            triple_count: triples.len(),
            statement_count: triples.len(),
            ..BuildReport::default()
        };
        Self::assemble(triples, report, "<triples>".to_string())
    }

    fn from_markup(markup: Markup, options: &LoadOptions) -> Result<Self> {
        let parsed = parse_triples(&markup.text, &options.base_iri)?;
        let report = BuildReport {
            statement_count: parsed.statement_count,
            triple_count: parsed.triples.len(),
            dropped_statements: parsed.dropped_statements,
            repaired_fragments: markup.repaired_fragments,
            ..BuildReport::default()
        };
        Self::assemble(&parsed.triples, report, markup.origin)
    }

    fn assemble(triples: &[Triple], mut report: BuildReport, origin: String) -> Result<Self> {
        let graph = build_graph(triples)?;
        let mut nodes = graph.nodes;
        compute_derived(&mut nodes)?;

        let index = SearchIndex::build(&nodes);
        let stats = StatsRecord::compute(&nodes);
        report.warnings = graph.warnings;

        info!(
            origin = %origin,
            terms = stats.total_terms,
            relations = stats.total_relations,
            dangling = report.warnings.len(),
            "built ontology snapshot"
        );

        Ok(Self {
            nodes,
            by_id: graph.by_id,
            index,
            stats,
            report,
            origin,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in build (declaration) order.
    pub fn nodes(&self) -> &[TermNode] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&TermNode> {
        self.by_id.get(id).map(|&index| &self.nodes[index])
    }

    /// Like [`Snapshot::get`], failing with `NotFound` on a miss.
    pub fn term(&self, id: &str) -> Result<&TermNode> {
        self.get(id).ok_or_else(|| OntologyError::NotFound { id: id.to_string() })
    }

    pub fn children<'a>(
        &'a self,
        node: &'a TermNode,
    ) -> impl Iterator<Item = (&'a TermNode, RelationKind)> + 'a {
        node.children
            .iter()
            .map(move |edge| (&self.nodes[edge.target], edge.relation))
    }

    pub fn parents<'a>(
        &'a self,
        node: &'a TermNode,
    ) -> impl Iterator<Item = (&'a TermNode, RelationKind)> + 'a {
        node.parents
            .iter()
            .map(move |edge| (&self.nodes[edge.target], edge.relation))
    }

    pub fn search(&self, query: &str) -> Result<Vec<&TermNode>> {
        let hits = self.index.search(&self.nodes, query)?;
        Ok(hits.into_iter().map(|index| &self.nodes[index]).collect())
    }

    pub fn stats(&self) -> &StatsRecord {
        &self.stats
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn record(&self, node: &TermNode) -> TermRecord {
        TermRecord::from_node(node, &self.nodes)
    }

    pub fn records(&self) -> Vec<TermRecord> {
        self.nodes.iter().map(|node| self.record(node)).collect()
    }

    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            metadata: ExportMetadata {
                total_terms: self.nodes.len(),
                generated_at: Utc::now(),
                description: EXPORT_DESCRIPTION.to_string(),
                source: self.origin.clone(),
            },
            terms: self.records(),
        }
    }
}
