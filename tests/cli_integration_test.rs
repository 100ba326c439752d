//! Integration tests for the jde-fixtures binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn jde_fixtures_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jde-fixtures"))
}

fn generate(dir: &std::path::Path, extra: &[&str]) -> std::process::Output {
    jde_fixtures_bin()
        .arg("generate")
        .arg("--output")
        .arg(dir)
        .arg("--as-of")
        .arg("2024-06-30")
        .args(extra)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_generate_defaults_and_summary() {
    let dir = TempDir::new().unwrap();
    let output = generate(dir.path(), &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("F0101: 50 rows"));
    assert!(stdout.contains("F4211: 200 rows"));
    assert!(stdout.contains("Sample Julian date:"));
    assert!(stdout.contains("Actual USD: $"));

    let f4211 = fs::read_to_string(dir.path().join("F4211.csv")).unwrap();
    assert_eq!(f4211.lines().count(), 201);
}

#[test]
fn test_generate_json_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let parse = |dir: &TempDir| -> serde_json::Value {
        let output = generate(dir.path(), &["--json", "--seed", "7", "-e", "10", "-t", "25"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).unwrap_or_else(|_| panic!("Failed to parse JSON: {}", stdout))
    };
    let a = parse(&first);
    let b = parse(&second);

    assert_eq!(a["seed"], 7);
    assert_eq!(a["as_of"], "2024-06-30");
    let files = a["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["rows"], 10);
    assert_eq!(files[1]["rows"], 25);

    for i in 0..2 {
        assert_eq!(a["files"][i]["sha256"], b["files"][i]["sha256"]);
    }
}

#[test]
fn test_generate_jde_headers_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("fixtures.yaml");
    fs::write(&config, "entities: 5\ntransactions: 8\nheaders: jde\n").unwrap();
    let out = dir.path().join("out");

    let output = generate(&out, &["--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let f0101 = fs::read_to_string(out.join("F0101.csv")).unwrap();
    assert!(f0101.starts_with("ABAN8,ABALPH,ABAT1,ABAC01,ABUPMJ"));
    assert_eq!(f0101.lines().count(), 6);
}

#[test]
fn test_generate_exhaustion_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let output = generate(&out, &["--entities", "90001"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at most 90000"));
    assert!(!out.join("F0101.csv").exists());
}

#[test]
fn test_generate_unwritable_destination() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"x").unwrap();

    let output = generate(&blocker.join("sub"), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot create output directory"));
}

#[test]
fn test_validate_passes_and_fails() {
    let dir = TempDir::new().unwrap();
    assert!(generate(dir.path(), &[]).status.success());

    let output = jde_fixtures_bin()
        .arg("validate")
        .arg(dir.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["errors"], 0);
    assert_eq!(json["checks"]["fk_integrity"], "ok");

    // Break referential integrity
    let f4211 = dir.path().join("F4211.csv");
    let mut content = fs::read_to_string(&f4211).unwrap();
    content.push_str("999999,SO,12,4006381333931,124010,1000,10500\n");
    fs::write(&f4211, content).unwrap();

    let output = jde_fixtures_bin()
        .arg("validate")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FK_MISSING_PARENT"));
    assert!(stderr.contains("Result: FAILED"));
}

#[test]
fn test_decode_examples() {
    let output = jde_fixtures_bin()
        .args(["decode", "--date", "123001", "--amount", "10500"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("C=1 YY=23 DDD=001"));
    assert!(stdout.contains("2023-01-01"));
    assert!(stdout.contains("$105.00"));

    let output = jde_fixtures_bin()
        .args(["decode", "--date", "99365"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Julian date: 099365"));
    assert!(stdout.contains("1999-12-31"));
}

#[test]
fn test_completions() {
    let output = jde_fixtures_bin()
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("jde-fixtures"));
}
