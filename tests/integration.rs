//! Integration test suite: drives the compiled `docgraph` binary over a
//! small symbol-graph fixture via subprocess. `CARGO_BIN_EXE_docgraph` is
//! set by Cargo during `cargo test` to point at the compiled binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_docgraph"))
}

/// Run a docgraph command and assert it exits successfully.
/// Returns stdout as a String.
fn run_success(dir: &Path, args: &[&str]) -> String {
    let out = Command::new(binary())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to invoke docgraph binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
        args,
        out.status,
        stdout,
        stderr
    );
    stdout
}

/// Run a docgraph command and assert it exits with a non-zero status.
/// Returns stderr as a String.
fn run_failure(dir: &Path, args: &[&str]) -> String {
    let out = Command::new(binary())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to invoke docgraph binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {:?} expected to fail but exited successfully\nstdout: {}\nstderr: {}",
        args,
        stdout,
        stderr
    );
    stderr
}

/// A module "box.ts" exporting `interface Box<T>`, `function add`, and an
/// enum, with a type-edge cycle between Box and its self-referencing member.
fn fixture_graph() -> serde_json::Value {
    serde_json::json!({
        "modules": [0],
        "nodes": [
            {
                "kind": "module",
                "name": "box.ts",
                "children": [1, 5, 9]
            },
            {
                "kind": "interface",
                "name": "Box",
                "id": 1,
                "flags": 1,
                "typeParameters": [2],
                "children": [3],
                "parent": 0,
                "source": {"file": "box.ts", "offset": 0, "line": 1}
            },
            {"kind": "typeParameter", "name": "T"},
            {
                "kind": "property",
                "name": "next",
                "id": 2,
                "type": 4,
                "parent": 1,
                "source": {"file": "box.ts", "offset": 40, "line": 3}
            },
            {"kind": "reference", "name": "Box", "type": 1},
            {
                "kind": "function",
                "name": "add",
                "id": 3,
                "flags": 1,
                "parameters": [6, 7],
                "type": 8,
                "parent": 0,
                "source": {"file": "box.ts", "offset": 80, "line": 7}
            },
            {"kind": "property", "name": "a", "type": 8},
            {"kind": "property", "name": "b", "type": 8},
            {"kind": "baseType", "name": "number"},
            {
                "kind": "enum",
                "name": "Level",
                "id": 4,
                "flags": 1,
                "children": [10, 11],
                "parent": 0,
                "source": {"file": "box.ts", "offset": 120, "line": 12}
            },
            {"kind": "property", "name": "Low", "id": 5, "value": "0", "parent": 9},
            {"kind": "property", "name": "High", "id": 6, "value": "1", "parent": 9}
        ]
    })
}

fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("graph.json");
    fs::write(&path, fixture_graph().to_string()).unwrap();
    path
}

fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".html"))
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[test]
fn test_generate_writes_expected_pages() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    run_success(dir.path(), &["generate", "graph.json", "-o", "docs"]);

    let out = dir.path().join("docs");
    assert_eq!(
        html_files(&out),
        vec!["box--Box.html", "box--Level.html", "box.html"]
    );

    let module = fs::read_to_string(out.join("box.html")).unwrap();
    assert!(module.contains("add(a: number, b: number): number"));
    assert!(module.contains("box--Box.html"), "module links to Box page");

    let interface = fs::read_to_string(out.join("box--Box.html")).unwrap();
    assert!(interface.contains("Box&lt;T&gt;"));
    // The self-referencing member links by anchor without recursing.
    assert!(interface.contains("<a name=\"s2\"></a>"));
}

#[test]
fn test_generate_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    run_success(dir.path(), &["generate", "graph.json", "-o", "a"]);
    run_success(dir.path(), &["generate", "graph.json", "-o", "b"]);

    let a = dir.path().join("a");
    let b = dir.path().join("b");
    assert_eq!(html_files(&a), html_files(&b));
    for name in html_files(&a) {
        let left = fs::read_to_string(a.join(&name)).unwrap();
        let right = fs::read_to_string(b.join(&name)).unwrap();
        assert_eq!(left, right, "{name} differs between runs");
    }
}

#[test]
fn test_summary_is_valid_json_with_id_references() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    run_success(
        dir.path(),
        &["generate", "graph.json", "-o", "docs", "--summary", "--no-html"],
    );

    let out = dir.path().join("docs");
    assert!(html_files(&out).is_empty(), "--no-html should skip pages");

    let raw = fs::read_to_string(out.join("summary.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let index = parsed["index"].as_array().unwrap();
    let names: Vec<&str> = index.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Box", "Level"]);

    // Box.next points back at Box: serialized as the bare id 1.
    let box_record = &index[0];
    assert_eq!(box_record["children"][0]["type"], serde_json::json!(1));
}

#[test]
fn test_clean_removes_stale_pages() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("docs");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("renamed--Old.html"), "stale").unwrap();

    run_success(dir.path(), &["generate", "graph.json", "-o", "docs", "--clean"]);
    assert!(!out.join("renamed--Old.html").exists());
    assert!(out.join("box.html").exists());
}

#[test]
fn test_readme_claims_index_page() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join("README.md"), "# Boxes\n\nA box library.\n").unwrap();

    run_success(
        dir.path(),
        &["generate", "graph.json", "-o", "docs", "--readme", "README.md"],
    );

    let index = fs::read_to_string(dir.path().join("docs/index.html")).unwrap();
    assert!(index.contains("Boxes"));
    let navbar = fs::read_to_string(dir.path().join("docs/box.html")).unwrap();
    assert!(navbar.contains(">Home</doc-item>"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(
        dir.path().join("docgraph.toml"),
        "package-name = \"boxlib\"\nout-dir = \"site\"\n",
    )
    .unwrap();

    run_success(dir.path(), &["generate", "graph.json"]);
    let page = fs::read_to_string(dir.path().join("site/box.html")).unwrap();
    assert!(page.contains("<title>boxlib API Reference</title>"));
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn test_missing_graph_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = run_failure(dir.path(), &["generate", "nothere.json"]);
    assert!(stderr.contains("nothere.json"), "stderr: {stderr}");
}

#[test]
fn test_out_of_range_reference_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let broken = serde_json::json!({
        "modules": [0],
        "nodes": [
            {"kind": "module", "name": "m.ts", "children": [99]}
        ]
    });
    fs::write(dir.path().join("graph.json"), broken.to_string()).unwrap();

    let stderr = run_failure(dir.path(), &["generate", "graph.json", "-o", "docs"]);
    assert!(stderr.contains("out of range"), "stderr: {stderr}");
    assert!(!dir.path().join("docs").exists(), "no partial output");
}

#[test]
fn test_page_owner_without_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let broken = serde_json::json!({
        "modules": [0],
        "nodes": [
            {"kind": "module", "name": "m.ts", "children": [1]},
            {"kind": "class", "name": "Orphan", "id": 1, "flags": 1, "parent": 0}
        ]
    });
    fs::write(dir.path().join("graph.json"), broken.to_string()).unwrap();

    let stderr = run_failure(dir.path(), &["generate", "graph.json", "-o", "docs"]);
    assert!(stderr.contains("Orphan"), "stderr: {stderr}");
}

#[test]
fn test_unknown_kind_degrades_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let mut graph = fixture_graph();
    graph["nodes"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({"kind": "hologram", "name": "mystery"}));
    graph["nodes"][0]["children"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!(12));
    fs::write(dir.path().join("graph.json"), graph.to_string()).unwrap();

    run_success(dir.path(), &["generate", "graph.json", "-o", "docs"]);
    assert!(dir.path().join("docs/box.html").exists());
}
