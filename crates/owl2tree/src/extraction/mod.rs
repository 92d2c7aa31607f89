//! RDF triple parsing: RDF/XML markup in, recognized triples out.

pub mod rdfxml;
pub mod recognizer;

use crate::error::Result;
use crate::model::triple::Triple;

/// Triples recognized from one document, plus bookkeeping for the build report.
#[derive(Debug)]
pub struct ParsedDocument {
    pub triples: Vec<Triple>,
    pub statement_count: usize,
    pub dropped_statements: usize,
}

/// Parse normalized markup and keep the statements the graph builder understands.
pub fn parse_triples(markup: &str, base_iri: &str) -> Result<ParsedDocument> {
    let statements = rdfxml::parse_statements(markup, base_iri)?;
    let recognized = recognizer::recognize(&statements);
    Ok(ParsedDocument {
        triples: recognized.triples,
        statement_count: statements.len(),
        dropped_statements: recognized.dropped,
    })
}
