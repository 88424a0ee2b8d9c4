use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn events_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("center_selector_{}_{name}.jsonl", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn accepts_southern_western_coordinates() {
    let path = events_file(
        "negative",
        r#"{"type":"idle","event":{"properties":{"center":[-46.7,-23.6]}}}
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_center_selector"))
        .arg("--value")
        .arg("-23.5505199,-46.6333094")
        .arg("--initial")
        .arg("-10.0,-50.0")
        .arg(&path)
        .output()
        .unwrap();
    fs::remove_file(&path).ok();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);

    let emission: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(emission["latitude"], -23.6);
    assert_eq!(emission["longitude"], -46.7);
}

#[test]
fn missing_events_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_center_selector"))
        .arg("--value=-23.5,-46.6")
        .arg("/nonexistent/center_selector/events.jsonl")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
