use std::fs;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn m2x() -> Command {
    Command::new(env!("CARGO_BIN_EXE_m2x"))
}

#[test]
fn demo_output_feeds_extract() {
    let dir = tempdir().unwrap();
    let lhe_path = dir.path().join("demo.lhe");
    let jsonl_path = dir.path().join("inputs.jsonl");

    let output = m2x()
        .args(["demo", "--events", "20", "--seed", "7", "--lhe-out"])
        .arg(&lhe_path)
        .output()
        .expect("run m2x demo");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("demo json");
    assert_eq!(report["summary"]["assembled"], 20);
    assert_eq!(report["residuals"].as_array().map(Vec::len), Some(20));
    assert!(report["max_residual"].as_f64().unwrap() < 1e-9);

    let output = m2x()
        .arg("extract")
        .arg("--input")
        .arg(&lhe_path)
        .arg("--out")
        .arg(&jsonl_path)
        .output()
        .expect("run m2x extract");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: Value = serde_json::from_slice(&output.stdout).expect("summary json");
    assert_eq!(summary["processed"], 20);
    assert_eq!(summary["assembled"], 20);

    let lines: Vec<Value> = fs::read_to_string(&jsonl_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0]["event"], 1);
    assert_eq!(lines[19]["event"], 20);
    assert!(lines[0]["input"]["visible"][0]["e"].as_f64().unwrap() > 0.0);
}

#[test]
fn skipped_events_are_counted_by_code() {
    let dir = tempdir().unwrap();
    let lhe_path = dir.path().join("mixed.lhe");
    let jsonl_path = dir.path().join("inputs.jsonl");
    fs::write(
        &lhe_path,
        "<event>\n 3 1 1.0 0 0 0\n\
         15 2 1 2 0 0 0 0 1 2 1.77686 0 9\n\
         11 1 1 1 0 0 0 0 1 1 0 0 9\n\
         12 1 1 1 0 0 0 0 1 1 0 0 9\n</event>\n\
         <event>\n 1 1 1.0 0 0 0\n 15 2 1 2 bad\n</event>\n",
    )
    .unwrap();

    let output = m2x()
        .arg("extract")
        .arg("--input")
        .arg(&lhe_path)
        .arg("--out")
        .arg(&jsonl_path)
        .output()
        .expect("run m2x extract");
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).expect("summary json");
    assert_eq!(summary["processed"], 2);
    assert_eq!(summary["assembled"], 0);
    assert_eq!(summary["skipped_by_code"]["initial-state-count"], 1);
    assert_eq!(summary["skipped_by_code"]["short-particle-line"], 1);
    assert_eq!(fs::read_to_string(&jsonl_path).unwrap(), "");
}

#[test]
fn missing_input_exits_non_zero() {
    let dir = tempdir().unwrap();
    let status = m2x()
        .arg("extract")
        .arg("--input")
        .arg(dir.path().join("absent.lhe"))
        .arg("--out")
        .arg(dir.path().join("out.jsonl"))
        .status()
        .expect("run m2x extract");
    assert!(!status.success());
}
