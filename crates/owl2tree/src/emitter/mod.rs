pub mod ntriples;
pub mod turtle;

use std::io;

use crate::model::ontology::{obo, obo_in_owl, standard};
use crate::model::term::RelationKind;
use crate::snapshot::Snapshot;

/// Trait for emitting RDF triples in different serialization formats.
pub trait TriplesEmitter {
    /// Emit a triple with an IRI object.
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()>;
    /// Emit a triple with a plain string literal object.
    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()>;
    /// Emit a triple with a language-tagged literal object.
    fn emit_lang_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        lang: &str,
    ) -> io::Result<()>;
    /// Emit a triple with a typed literal object.
    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()>;
    /// Register a namespace prefix (used by Turtle format).
    fn add_prefix(&mut self, prefix: &str, iri: &str) -> io::Result<()>;
    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;
    /// Return the number of triples emitted so far.
    fn triple_count(&self) -> u64;
}

/// Re-encode a snapshot as RDF: declarations, ids, annotations and relations.
///
/// Part-of edges are written as direct `obo:BFO_0000050` statements rather
/// than restrictions. Returns the number of triples written.
pub fn emit_snapshot<E: TriplesEmitter + ?Sized>(
    snapshot: &Snapshot,
    emitter: &mut E,
) -> io::Result<u64> {
    let start = emitter.triple_count();
    emitter.add_prefix("rdf", standard::RDF)?;
    emitter.add_prefix("rdfs", standard::RDFS)?;
    emitter.add_prefix("owl", standard::OWL)?;
    emitter.add_prefix("xsd", standard::XSD)?;
    emitter.add_prefix(obo::PREFIX, obo::NS)?;
    emitter.add_prefix(obo_in_owl::PREFIX, obo_in_owl::NS)?;

    for node in snapshot.nodes() {
        let s = node.iri.as_str();
        emitter.emit_iri(s, standard::RDF_TYPE, standard::OWL_CLASS)?;
        emitter.emit_typed_literal(s, obo_in_owl::ID, &node.id, &format!("{}string", standard::XSD))?;

        if let Some(label) = &node.label {
            emitter.emit_literal(s, standard::RDFS_LABEL, label)?;
        }
        if let Some(label) = &node.label_zh {
            emitter.emit_lang_literal(s, standard::RDFS_LABEL, label, "zh")?;
        }
        if let Some(definition) = &node.definition {
            emitter.emit_literal(s, obo::DEFINITION, definition)?;
        }
        if let Some(definition) = &node.definition_zh {
            emitter.emit_lang_literal(s, obo::DEFINITION, definition, "zh")?;
        }

        for (parent, relation) in snapshot.parents(node) {
            let predicate = match relation {
                RelationKind::SubClassOf => standard::RDFS_SUBCLASS_OF,
                RelationKind::PartOf => obo::PART_OF,
            };
            emitter.emit_iri(s, predicate, &parent.iri)?;
        }
    }

    emitter.flush()?;
    Ok(emitter.triple_count() - start)
}
