pub mod iri;
pub mod ontology;
pub mod term;
pub mod triple;
