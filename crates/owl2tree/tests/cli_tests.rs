//! CLI integration tests.
//!
//! These tests invoke the `owl2tree` binary via `std::process::Command`
//! against the fixture ontology and verify output correctness.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path to the fixture ontology.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("psi_ms_sample.owl")
}

fn run(input: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_owl2tree"))
        .arg(input)
        .args(args)
        .arg("-q")
        .env_remove("OWL2TREE_MAX_SIZE")
        .env_remove("OWL2TREE_BASE_IRI")
        .output()
        .expect("failed to execute binary")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "owl2tree failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn stats_prints_json() {
    let stats = stdout_json(&run(&fixture_path(), &["stats"]));
    assert_eq!(stats["total_terms"], 8);
    assert_eq!(stats["leaf_terms"], 5);
    assert_eq!(stats["part_of_relations"], 1);
}

#[test]
fn get_prints_one_record() {
    let record = stdout_json(&run(&fixture_path(), &["get", "MS:1000040"]));
    assert_eq!(record["label"], "m/z");
    assert_eq!(record["label_zh"], "质荷比");
    assert_eq!(record["isLeaf"], true);
}

#[test]
fn unknown_id_exits_with_2() {
    let output = run(&fixture_path(), &["get", "MS:404"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: term `MS:404` not found"), "{stderr}");
}

#[test]
fn empty_search_exits_with_2() {
    let output = run(&fixture_path(), &["search", ""]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn search_orders_label_hits_first() {
    let hits = stdout_json(&run(&fixture_path(), &["search", "mass"]));
    let ids: Vec<&str> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["MS:0000000", "MS:1000443", "MS:1000451", "MS:1000040", "MS:1000081"]
    );
}

#[test]
fn list_respects_limit() {
    let terms = stdout_json(&run(&fixture_path(), &["list", "--limit", "3"]));
    assert_eq!(terms.as_array().unwrap().len(), 3);
    assert_eq!(terms[2]["id"], "MS:1000040");
}

#[test]
fn children_lists_direct_children() {
    let terms = stdout_json(&run(&fixture_path(), &["children", "MS:1000031"]));
    assert_eq!(terms[0]["id"], "MS:1000451");
}

#[test]
fn export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("terms.json");
    let output = run(&fixture_path(), &["export", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(document["metadata"]["total_terms"], 8);
    assert_eq!(document["terms"].as_array().unwrap().len(), 8);
}

#[test]
fn rdf_turtle_output_has_prefixes() {
    let output = run(&fixture_path(), &["rdf", "--format", "turtle"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("@prefix obo: <http://purl.obolibrary.org/obo/> ."));
    assert!(stdout.contains("obo:MS_1000451 obo:BFO_0000050 obo:MS_1000031 ."));
}

#[test]
fn rdf_ntriples_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("terms.nt");
    let output = run(&fixture_path(), &["rdf", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());
    let text = fs::read_to_string(&out).unwrap();
    let triples = text.lines().filter(|l| !l.starts_with('#')).count();
    assert_eq!(triples, 44);
}

#[test]
fn unknown_rdf_format_fails() {
    let output = run(&fixture_path(), &["rdf", "--format", "jsonld"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unknown_rdf_format_leaves_output_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("keep.nt");
    fs::write(&out, "existing\n").unwrap();
    let output = run(
        &fixture_path(),
        &["rdf", "-o", out.to_str().unwrap(), "--format", "bogus"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&out).unwrap(), "existing\n");
}

#[test]
fn disallowed_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ontology.txt");
    fs::copy(fixture_path(), &path).unwrap();
    let output = run(&path, &["stats"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported file extension"), "{stderr}");
}

#[test]
fn max_size_flag_is_enforced() {
    let output = run(&fixture_path(), &["stats", "--max-size", "100"]);
    assert_eq!(output.status.code(), Some(1));
}
