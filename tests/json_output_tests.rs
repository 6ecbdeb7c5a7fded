//! Integration tests for --format json output
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use predicates::prelude::*;

fn run_json(args: &[&str]) -> serde_json::Value {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ab-significance");
    cmd.arg("--format").arg("json").args(args);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_json_output_valid_format() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ab-significance");
    cmd.args([
        "--format",
        "json",
        "--control-hits",
        "100",
        "--control-conversions",
        "50",
        "--treatment-hits",
        "100",
        "--treatment-conversions",
        "50",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"version\":"))
        .stdout(predicate::str::contains(
            "\"format\": \"ab-significance-json-v1\"",
        ))
        .stdout(predicate::str::contains("\"result\":"));
}

#[test]
fn test_json_all_equal_variants() {
    let parsed = run_json(&[
        "--control-label",
        "Control A",
        "--control-hits",
        "100",
        "--control-conversions",
        "50",
        "--treatment-label",
        "Treatment A",
        "--treatment-hits",
        "100",
        "--treatment-conversions",
        "50",
        "--rate-decimals",
        "2",
        "--rate-percentage",
    ]);

    assert_eq!(parsed["resultKind"], "all");
    let result = &parsed["result"];
    assert_eq!(result["conversionRates"]["Control A"], "50.00%");
    assert_eq!(result["conversionRates"]["Treatment A"], "50.00%");
    assert_eq!(result["zScore"], 0.0);
    assert_eq!(result["confidencePercentage"], "50.00%");
    assert_eq!(result["significant"], false);

    let confidence = result["confidence"].as_f64().unwrap();
    assert!((confidence - 0.50000000102793).abs() < 1e-12);
    let p_value = result["pValue"].as_f64().unwrap();
    assert!((p_value - 0.49999999897207004).abs() < 1e-12);
}

#[test]
fn test_json_conversions_map() {
    let parsed = run_json(&[
        "--control-label",
        "Control A",
        "--control-hits",
        "16",
        "--control-conversions",
        "4",
        "--treatment-label",
        "Treatment A",
        "--treatment-hits",
        "16",
        "--treatment-conversions",
        "8",
        "--result",
        "conversions",
    ]);

    assert_eq!(parsed["resultKind"], "conversions");
    assert_eq!(
        parsed["result"],
        serde_json::json!({"Control A": 4, "Treatment A": 8})
    );
}

#[test]
fn test_json_p_value() {
    let parsed = run_json(&[
        "--control-hits",
        "600",
        "--control-conversions",
        "100",
        "--treatment-hits",
        "700",
        "--treatment-conversions",
        "150",
        "--result",
        "pValue",
    ]);

    let p_value = parsed["result"].as_f64().unwrap();
    assert!((p_value - 0.014195849665686433).abs() < 1e-12);
}

#[test]
fn test_json_sample_size() {
    let parsed = run_json(&["--sample-size", "0.1"]);

    assert!(parsed.get("result").is_none());
    let tiers = parsed["sampleSize"]["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[0]["tier"], "worst");
    assert_eq!(tiers[2]["tier"], "best");

    let sizes: Vec<f64> = tiers
        .iter()
        .map(|t| t["sampleSize"].as_f64().unwrap())
        .collect();
    assert!(sizes[0] < sizes[1] && sizes[1] < sizes[2]);
}
