use std::path::PathBuf;

use owl2tree::extraction::parse_triples;
use owl2tree::source::{read_bytes, read_path};
use owl2tree::{LoadOptions, OntologyError, Predicate, Triple};

const OBO: &str = "http://purl.obolibrary.org/obo/";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("psi_ms_sample.owl")
}

fn fixture_triples() -> Vec<Triple> {
    let options = LoadOptions::default();
    let markup = read_path(&fixture_path(), &options).unwrap();
    parse_triples(&markup.text, &options.base_iri).unwrap().triples
}

fn wrap(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:obo="http://purl.obolibrary.org/obo/">
{body}
</rdf:RDF>"#
    )
}

fn triples_with(triples: &[Triple], predicate: Predicate) -> Vec<(String, String)> {
    triples
        .iter()
        .filter(|t| t.predicate == predicate)
        .map(|t| (t.subject.clone(), t.object.clone()))
        .collect()
}

#[test]
fn fixture_declares_classes_in_document_order() {
    let triples = fixture_triples();
    let declared: Vec<String> = triples_with(&triples, Predicate::Type)
        .into_iter()
        .map(|(subject, _)| subject.trim_start_matches(OBO).to_string())
        .collect();
    assert_eq!(
        declared,
        vec![
            "MS_0000000",
            "MS_1000031",
            "MS_1000040",
            "MS_1000081",
            "MS_1000084",
            "MS_1000264",
            "MS_1000443",
            "MS_1000451",
        ]
    );
}

#[test]
fn restriction_on_part_of_becomes_part_of() {
    let triples = fixture_triples();
    assert_eq!(
        triples_with(&triples, Predicate::PartOf),
        vec![(format!("{OBO}MS_1000451"), format!("{OBO}MS_1000031"))]
    );
    // The RO_0000053 restriction is not a hierarchy edge.
    assert!(!triples
        .iter()
        .any(|t| t.object == format!("{OBO}MS_1000040") && t.subject.ends_with("MS_1000451")));
}

#[test]
fn chinese_annotations_use_their_own_channel() {
    let triples = fixture_triples();
    let zh_labels = triples_with(&triples, Predicate::LabelZh);
    assert_eq!(zh_labels.len(), 4);
    assert!(zh_labels.contains(&(format!("{OBO}MS_1000040"), "质荷比".to_string())));

    let zh_definitions = triples_with(&triples, Predicate::DefinitionZh);
    assert_eq!(zh_definitions.len(), 2);
}

#[test]
fn repaired_definition_reads_back_verbatim() {
    let triples = fixture_triples();
    let definition = triples
        .iter()
        .find(|t| t.predicate == Predicate::DefinitionEn && t.subject.ends_with("MS_1000040"))
        .unwrap();
    assert!(definition.object.contains("Th & m/z < 1 as a unit"));
}

#[test]
fn explicit_identifier_is_recognized() {
    let triples = fixture_triples();
    assert_eq!(
        triples_with(&triples, Predicate::Identifier),
        vec![(format!("{OBO}MS_0000000"), "MS:0000000".to_string())]
    );
}

#[test]
fn unrelated_statements_are_counted_as_dropped() {
    let options = LoadOptions::default();
    let markup = read_path(&fixture_path(), &options).unwrap();
    let parsed = parse_triples(&markup.text, &options.base_iri).unwrap();
    assert!(parsed.dropped_statements > 0);
    assert!(parsed.statement_count > parsed.triples.len());
}

#[test]
fn direct_part_of_property_is_recognized() {
    let xml = wrap(
        r#"<owl:Class rdf:about="http://purl.obolibrary.org/obo/MS_2">
             <obo:BFO_0000050 rdf:resource="http://purl.obolibrary.org/obo/MS_1"/>
           </owl:Class>"#,
    );
    let triples = parse_triples(&xml, "http://localhost/ontology").unwrap().triples;
    assert_eq!(
        triples_with(&triples, Predicate::PartOf),
        vec![(format!("{OBO}MS_2"), format!("{OBO}MS_1"))]
    );
}

#[test]
fn relative_about_resolves_against_base() {
    let xml = wrap(r#"<owl:Class rdf:about="MS_7"/>"#);
    let triples = parse_triples(&xml, "http://purl.obolibrary.org/obo/ms.owl")
        .unwrap()
        .triples;
    assert_eq!(triples[0].subject, format!("{OBO}MS_7"));
}

#[test]
fn rdf_id_resolves_as_fragment() {
    let xml = wrap(r#"<owl:Class rdf:ID="Analyzer"/>"#);
    let triples = parse_triples(&xml, "http://example.org/onto").unwrap().triples;
    assert_eq!(triples[0].subject, "http://example.org/onto#Analyzer");
}

#[test]
fn literal_parse_type_is_skipped() {
    let xml = wrap(
        r#"<owl:Class rdf:about="http://purl.obolibrary.org/obo/MS_1">
             <rdfs:comment rdf:parseType="Literal"><b>bold</b> text</rdfs:comment>
             <rdfs:label>mass</rdfs:label>
           </owl:Class>"#,
    );
    let triples = parse_triples(&xml, "http://localhost/ontology").unwrap().triples;
    assert_eq!(
        triples_with(&triples, Predicate::LabelEn),
        vec![(format!("{OBO}MS_1"), "mass".to_string())]
    );
}

#[test]
fn mismatched_tags_are_malformed() {
    let xml = wrap(r#"<owl:Class rdf:about="http://example.org/A"></rdfs:label>"#);
    let err = parse_triples(&xml, "http://localhost/ontology").unwrap_err();
    assert!(matches!(err, OntologyError::MalformedDocument { .. }), "{err:?}");
}

#[test]
fn truncated_document_is_malformed() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
        <rdf:Description rdf:about="http://example.org/A">"#;
    let err = parse_triples(xml, "http://localhost/ontology").unwrap_err();
    assert!(matches!(err, OntologyError::MalformedDocument { .. }), "{err:?}");
}

#[test]
fn undeclared_prefix_is_malformed() {
    let xml = wrap(r#"<ex:Thing rdf:about="http://example.org/A"/>"#);
    let err = parse_triples(&xml, "http://localhost/ontology").unwrap_err();
    match err {
        OntologyError::MalformedDocument { message, .. } => {
            assert!(message.contains("`ex`"), "message: {message}")
        }
        other => panic!("expected MalformedDocument, got {other:?}"),
    }
}

#[test]
fn empty_namespace_binding_is_malformed() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:x="">
        </rdf:RDF>"#;
    let err = parse_triples(xml, "http://localhost/ontology").unwrap_err();
    match err {
        OntologyError::MalformedDocument { message, .. } => {
            assert!(message.contains("`x`"), "message: {message}")
        }
        other => panic!("expected MalformedDocument, got {other:?}"),
    }
}

#[test]
fn anonymous_and_named_restrictions_stay_apart() {
    let xml = wrap(
        r#"<owl:Class rdf:about="http://purl.obolibrary.org/obo/MS_3">
             <rdfs:subClassOf>
               <owl:Restriction>
                 <owl:onProperty rdf:resource="http://purl.obolibrary.org/obo/BFO_0000050"/>
                 <owl:someValuesFrom rdf:resource="http://purl.obolibrary.org/obo/MS_1"/>
               </owl:Restriction>
             </rdfs:subClassOf>
           </owl:Class>
           <owl:Class rdf:about="http://purl.obolibrary.org/obo/MS_4">
             <rdfs:subClassOf rdf:nodeID="b1"/>
           </owl:Class>
           <owl:Restriction rdf:nodeID="b1">
             <owl:onProperty rdf:resource="http://purl.obolibrary.org/obo/BFO_0000050"/>
             <owl:someValuesFrom rdf:resource="http://purl.obolibrary.org/obo/MS_2"/>
           </owl:Restriction>"#,
    );
    let triples = parse_triples(&xml, "http://localhost/ontology").unwrap().triples;
    assert_eq!(
        triples_with(&triples, Predicate::PartOf),
        vec![
            (format!("{OBO}MS_3"), format!("{OBO}MS_1")),
            (format!("{OBO}MS_4"), format!("{OBO}MS_2")),
        ]
    );
}

#[test]
fn commented_annotation_tags_survive_repair() {
    let xml = wrap(
        r#"<!-- NOTE: <rdfs:label> should be reworded -->
           <owl:Class rdf:about="http://purl.obolibrary.org/obo/MS_1">
             <rdfs:label>m/z & charge</rdfs:label>
           </owl:Class>"#,
    );
    let options = LoadOptions::default();
    let markup = read_bytes(xml.as_bytes(), &options).unwrap();
    let triples = parse_triples(&markup.text, &options.base_iri).unwrap().triples;
    assert_eq!(
        triples_with(&triples, Predicate::LabelEn),
        vec![(format!("{OBO}MS_1"), "m/z & charge".to_string())]
    );
}
