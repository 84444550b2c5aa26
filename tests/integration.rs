use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn kgviz() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kgviz"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn lays_out_fixture_inside_canvas() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("layout.json");

    let status = kgviz()
        .args([
            "layout",
            "--input",
            "tests/fixtures/small_graph.json",
            "--output",
            output.to_str().unwrap(),
            "--seed",
            "7",
        ])
        .status()
        .expect("Failed to execute kgviz");
    assert!(status.success(), "kgviz layout exited with error");

    let layout: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let nodes = layout["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert_eq!(layout["edges"].as_array().unwrap().len(), 4);

    for node in nodes {
        let (x, y, r) = (
            node["x"].as_f64().unwrap(),
            node["y"].as_f64().unwrap(),
            node["radius"].as_f64().unwrap(),
        );
        assert!(x >= r && x <= 800.0 - r, "x out of bounds: {node}");
        assert!(y >= r && y <= 500.0 - r, "y out of bounds: {node}");
    }
    assert_eq!(nodes[0]["label"], "Ada Lovelace");
    assert_eq!(nodes[0]["category"], "Person");
}

#[test]
fn seeded_layout_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let run = |name: &str| {
        let output = dir.path().join(name);
        let status = kgviz()
            .args([
                "layout",
                "-i",
                "tests/fixtures/small_graph.yaml",
                "-o",
                output.to_str().unwrap(),
                "--format",
                "yaml",
                "--seed",
                "21",
            ])
            .status()
            .expect("Failed to execute kgviz");
        assert!(status.success());
        fs::read_to_string(output).unwrap()
    };

    assert_eq!(run("first.yaml"), run("second.yaml"));
}

#[test]
fn analyze_prints_degree_summary() {
    let output = kgviz()
        .args(["analyze", "--input", "tests/fixtures/small_graph.json"])
        .output()
        .expect("Failed to execute kgviz");
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["nodeCount"], 4);
    assert_eq!(summary["edgeCount"], 4);
    assert_eq!(summary["avgDegree"], 2.0);
    assert_eq!(summary["topByDegree"][0]["id"], "2");
    assert_eq!(summary["topByDegree"][0]["degree"], 3);
    assert_eq!(summary["typeCounts"]["Person"], 1);
    assert_eq!(summary["relationshipTypeCounts"]["KNOWS"], 1);
}

#[test]
fn sample_then_layout_round_trip() {
    let dir = TempDir::new().unwrap();
    let graph = dir.path().join("sample.json");
    let layout = dir.path().join("out/layout.json");

    let status = kgviz()
        .args([
            "sample",
            "--nodes",
            "30",
            "--edges",
            "40",
            "--output",
            graph.to_str().unwrap(),
            "--seed",
            "3",
        ])
        .status()
        .expect("Failed to execute kgviz");
    assert!(status.success(), "kgviz sample exited with error");

    let snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&graph).unwrap()).unwrap();
    assert_eq!(snapshot["nodes"].as_array().unwrap().len(), 30);
    assert_eq!(snapshot["relationships"].as_array().unwrap().len(), 40);

    let status = kgviz()
        .args([
            "layout",
            "--input",
            graph.to_str().unwrap(),
            "--output",
            layout.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to execute kgviz");
    assert!(status.success(), "kgviz layout exited with error");
    assert!(layout.exists(), "layout.json was not generated");
}

#[test]
fn unsupported_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("graph.txt");
    fs::write(&input, "nodes").unwrap();

    let output = kgviz()
        .args([
            "analyze",
            "--input",
            input.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute kgviz");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported format"));
}
