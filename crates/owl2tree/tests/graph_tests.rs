use std::path::PathBuf;

use owl2tree::{
    BuildWarning, LoadOptions, OntologyError, Predicate, RelationKind, Snapshot, Triple,
};

const OBO: &str = "http://purl.obolibrary.org/obo/";
const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("psi_ms_sample.owl")
}

fn fixture_snapshot() -> Snapshot {
    Snapshot::from_path(&fixture_path(), &LoadOptions::default()).unwrap()
}

fn class(local: &str) -> Triple {
    Triple::new(format!("{OBO}{local}"), Predicate::Type, OWL_CLASS)
}

fn relation(child: &str, predicate: Predicate, parent: &str) -> Triple {
    Triple::new(format!("{OBO}{child}"), predicate, format!("{OBO}{parent}"))
}

fn child_ids(snapshot: &Snapshot, id: &str) -> Vec<String> {
    let node = snapshot.term(id).unwrap();
    snapshot
        .children(node)
        .map(|(child, _)| child.id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

#[test]
fn fixture_descendant_counts() {
    let snapshot = fixture_snapshot();
    assert_eq!(snapshot.len(), 8);
    assert_eq!(snapshot.term("MS:0000000").unwrap().descendant_count, 7);
    assert_eq!(snapshot.term("MS:1000443").unwrap().descendant_count, 3);
    assert_eq!(snapshot.term("MS:1000031").unwrap().descendant_count, 1);
    assert_eq!(snapshot.term("MS:1000451").unwrap().descendant_count, 0);
}

#[test]
fn fixture_leaves() {
    let snapshot = fixture_snapshot();
    let leaves: Vec<&str> = snapshot
        .nodes()
        .iter()
        .filter(|n| n.is_leaf)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(
        leaves,
        vec!["MS:1000040", "MS:1000081", "MS:1000084", "MS:1000264", "MS:1000451"]
    );
}

#[test]
fn children_follow_statement_order() {
    let snapshot = fixture_snapshot();
    assert_eq!(
        child_ids(&snapshot, "MS:0000000"),
        vec!["MS:1000031", "MS:1000040", "MS:1000443", "MS:1000451"]
    );
    assert_eq!(
        child_ids(&snapshot, "MS:1000443"),
        vec!["MS:1000081", "MS:1000084", "MS:1000264"]
    );
}

#[test]
fn part_of_edge_is_linked_both_ways() {
    let snapshot = fixture_snapshot();
    let analyzer = snapshot.term("MS:1000451").unwrap();
    let parents: Vec<(String, RelationKind)> = snapshot
        .parents(analyzer)
        .map(|(parent, kind)| (parent.id.clone(), kind))
        .collect();
    assert_eq!(
        parents,
        vec![
            ("MS:0000000".to_string(), RelationKind::SubClassOf),
            ("MS:1000031".to_string(), RelationKind::PartOf),
        ]
    );

    let model = snapshot.term("MS:1000031").unwrap();
    let children: Vec<(String, RelationKind)> = snapshot
        .children(model)
        .map(|(child, kind)| (child.id.clone(), kind))
        .collect();
    assert_eq!(children, vec![("MS:1000451".to_string(), RelationKind::PartOf)]);
}

#[test]
fn fixture_annotations() {
    let snapshot = fixture_snapshot();
    let mz = snapshot.term("MS:1000040").unwrap();
    assert_eq!(mz.label.as_deref(), Some("m/z"));
    assert_eq!(mz.label_zh.as_deref(), Some("质荷比"));
    assert!(mz.definition.as_deref().unwrap().contains("Th & m/z < 1"));
    assert_eq!(mz.definition_zh, None);
    assert_eq!(mz.iri, format!("{OBO}MS_1000040"));
}

#[test]
fn fixture_stats() {
    let snapshot = fixture_snapshot();
    let stats = snapshot.stats();
    assert_eq!(stats.total_terms, 8);
    assert_eq!(stats.leaf_terms, 5);
    assert_eq!(stats.terms_with_label_zh, 4);
    assert_eq!(stats.terms_with_definition_zh, 2);
    assert_eq!(stats.max_descendant_count, 7);
    assert!((stats.avg_descendant_count - 1.375).abs() < 1e-9);
    assert_eq!(stats.total_relations, 8);
    assert_eq!(stats.sub_class_of_relations, 7);
    assert_eq!(stats.part_of_relations, 1);
    assert_eq!(stats.root_terms, 1);
    assert_eq!(stats.max_depth, 2);
}

#[test]
fn fixture_report() {
    let snapshot = fixture_snapshot();
    let report = snapshot.report();
    assert!(report.warnings.is_empty());
    assert_eq!(report.repaired_fragments, 1);
    assert!(report.dropped_statements > 0);
}

#[test]
fn building_twice_is_identical() {
    let first = fixture_snapshot();
    let second = fixture_snapshot();
    assert_eq!(first.nodes(), second.nodes());
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn three_term_scenario() {
    let triples = vec![
        class("MS_1"),
        class("MS_2"),
        class("MS_3"),
        Triple::new(format!("{OBO}MS_1"), Predicate::LabelEn, "mass"),
        Triple::new(format!("{OBO}MS_2"), Predicate::LabelEn, "mass analyzer"),
        Triple::new(format!("{OBO}MS_3"), Predicate::LabelZh, "分析器"),
        relation("MS_2", Predicate::SubClassOf, "MS_1"),
        relation("MS_3", Predicate::PartOf, "MS_2"),
    ];
    let snapshot = Snapshot::from_triples(&triples).unwrap();

    let root = snapshot.term("MS:1").unwrap();
    assert_eq!(root.descendant_count, 2);
    assert!(!root.is_leaf);
    let leaf = snapshot.term("MS:3").unwrap();
    assert!(leaf.is_leaf);
    assert_eq!(leaf.descendant_count, 0);
}

#[test]
fn diamond_counts_shared_descendants_once() {
    let triples = vec![
        class("A_1"),
        class("A_2"),
        class("A_3"),
        class("A_4"),
        relation("A_2", Predicate::SubClassOf, "A_1"),
        relation("A_3", Predicate::SubClassOf, "A_1"),
        relation("A_4", Predicate::SubClassOf, "A_2"),
        relation("A_4", Predicate::PartOf, "A_3"),
    ];
    let snapshot = Snapshot::from_triples(&triples).unwrap();
    assert_eq!(snapshot.term("A:1").unwrap().descendant_count, 3);
    assert_eq!(snapshot.term("A:4").unwrap().depth, 2);
}

#[test]
fn cycle_aborts_the_build() {
    let triples = vec![
        class("A_1"),
        class("A_2"),
        relation("A_1", Predicate::SubClassOf, "A_2"),
        relation("A_2", Predicate::SubClassOf, "A_1"),
    ];
    let err = Snapshot::from_triples(&triples).unwrap_err();
    match &err {
        OntologyError::CycleDetected { id } => assert!(id == "A:1" || id == "A:2"),
        other => panic!("expected CycleDetected, got {other:?}"),
    }
    assert!(err.is_fatal_build_error());
}

#[test]
fn self_loop_is_a_cycle() {
    let triples = vec![class("A_1"), relation("A_1", Predicate::PartOf, "A_1")];
    let err = Snapshot::from_triples(&triples).unwrap_err();
    assert!(matches!(err, OntologyError::CycleDetected { id } if id == "A:1"));
}

#[test]
fn dangling_reference_is_recoverable() {
    let triples = vec![
        class("MS_1"),
        class("MS_2"),
        relation("MS_2", Predicate::SubClassOf, "MS_1"),
        relation("MS_2", Predicate::PartOf, "MS_404"),
    ];
    let snapshot = Snapshot::from_triples(&triples).unwrap();

    assert_eq!(
        snapshot.report().warnings,
        vec![BuildWarning::DanglingReference {
            subject: format!("{OBO}MS_2"),
            relation: RelationKind::PartOf,
            object: format!("{OBO}MS_404"),
            missing: format!("{OBO}MS_404"),
        }]
    );
    let node = snapshot.term("MS:2").unwrap();
    assert_eq!(node.parents.len(), 1);
    assert!(node.is_leaf);
}

#[test]
fn id_collision_aborts_the_build() {
    let triples = vec![
        Triple::new("http://a.example/MS_1", Predicate::Type, OWL_CLASS),
        Triple::new("http://b.example/MS_1", Predicate::Type, OWL_CLASS),
    ];
    let err = Snapshot::from_triples(&triples).unwrap_err();
    match err {
        OntologyError::IdCollision { id, first, second } => {
            assert_eq!(id, "MS:1");
            assert_eq!(first, "http://a.example/MS_1");
            assert_eq!(second, "http://b.example/MS_1");
        }
        other => panic!("expected IdCollision, got {other:?}"),
    }
}

#[test]
fn unknown_id_is_not_found() {
    let snapshot = fixture_snapshot();
    assert!(snapshot.get("MS:9999999").is_none());
    let err = snapshot.term("MS:9999999").unwrap_err();
    assert!(matches!(err, OntologyError::NotFound { ref id } if id == "MS:9999999"));
    assert!(err.is_query_error());
}

#[test]
fn deep_chain_does_not_overflow() {
    let depth = 50_000;
    let mut triples: Vec<Triple> = (0..depth).map(|i| class(&format!("D_{i}"))).collect();
    for i in 1..depth {
        triples.push(relation(
            &format!("D_{i}"),
            Predicate::SubClassOf,
            &format!("D_{}", i - 1),
        ));
    }
    let snapshot = Snapshot::from_triples(&triples).unwrap();
    assert_eq!(snapshot.term("D:0").unwrap().descendant_count, depth - 1);
    assert_eq!(snapshot.stats().max_depth, depth - 1);
}
