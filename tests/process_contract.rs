//! End-to-end checks of the stdin/stdout contract of the `frame-adapter` binary

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_frame-adapter"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn frame-adapter");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_json(output: &Output) -> Value {
    let text = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(text.lines().count(), 1, "expected one line, got {:?}", text);
    serde_json::from_str(text.trim_end()).unwrap()
}

const CANTILEVER: &str = r#"{
    "nodes": [
        {"id": 1, "x": 0.0, "y": 0.0, "fix": [1, 1, 1]},
        {"id": 2, "x": 2.0, "y": 0.0}
    ],
    "elements": [
        {"id": 1, "type": "ElasticBeamColumn", "nodes": [1, 2], "A": 0.01, "E": 200e9, "Iz": 1e-4}
    ],
    "loads": [
        {"type": "Nodal", "node": 2, "value": [0.0, -1000.0, 0.0]}
    ]
}"#;

#[test]
fn empty_stdin() {
    let output = run(&[], "");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{\"error\":\"No input provided\"}\n"
    );
}

#[test]
fn malformed_json() {
    let output = run(&[], "{\"nodes\": [");
    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert!(value["error"].is_string());
    assert!(value.get("nodeDisplacements").is_none());
}

#[test]
fn unknown_node_reference() {
    let body = r#"{"nodes": [{"id": 1, "x": 0, "y": 0}],
                   "loads": [{"type": "Nodal", "node": 99, "value": [1, 0, 0]}]}"#;
    let output = run(&[], body);
    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert!(value["error"].as_str().unwrap().contains("99"));
    assert!(value.get("kind").is_none());
}

#[test]
fn successful_analysis() {
    let output = run(&[], CANTILEVER);
    assert_eq!(output.status.code(), Some(0));

    let value = stdout_json(&output);
    let tip = value["nodeDisplacements"]["2"].as_array().unwrap();
    assert_eq!(tip.len(), 3);
    assert!(tip[1].as_f64().unwrap() < 0.0);
    assert_eq!(value["nodeDisplacements"]["1"], serde_json::json!([0.0, 0.0, 0.0]));
    assert_eq!(value["elementForces"], serde_json::json!({}));
}

#[test]
fn flags_extend_the_output() {
    let output = run(&["--element-forces"], CANTILEVER);
    assert_eq!(output.status.code(), Some(0));
    let value = stdout_json(&output);
    assert_eq!(value["elementForces"]["1"].as_array().unwrap().len(), 6);

    let output = run(&["--error-detail"], "[]");
    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert_eq!(value["kind"], "schema");
    assert_eq!(value["details"][0]["entity"], "document");

    let strict = r#"{"elements": [{"id": 1, "type": "Truss"}]}"#;
    assert_eq!(run(&[], strict).status.code(), Some(0));
    assert_eq!(run(&["--strict"], strict).status.code(), Some(1));
}
