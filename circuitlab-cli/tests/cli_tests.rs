//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Build command for the circuitlab-cli binary (finds it in target/debug when run via cargo test).
fn circuitlab_cli() -> Command {
    cargo_bin_cmd!("circuitlab-cli")
}

#[test]
fn test_cli_help() {
    let mut cmd = circuitlab_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("circuit"));
}

#[test]
fn test_cli_version() {
    let mut cmd = circuitlab_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_eval_series_scenario() {
    let mut cmd = circuitlab_cli();

    cmd.args([
        "eval",
        "--topology",
        "series",
        "--voltage",
        "9",
        "--r1",
        "100",
        "--r2",
        "200",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.030000"));
}

#[test]
fn test_cli_eval_open_switch() {
    let mut cmd = circuitlab_cli();

    cmd.args(["eval", "--topology", "parallel", "--open"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.000000"));
}

#[test]
fn test_cli_eval_json_format() {
    let mut cmd = circuitlab_cli();

    cmd.args(["eval", "--topology", "rc-delay", "--time", "0.1", "--format", "json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"topology\": \"rc-delay\""))
        .stdout(predicate::str::contains("capacitor_voltage"));
}

#[test]
fn test_cli_eval_rejects_zero_resistance() {
    let mut cmd = circuitlab_cli();

    cmd.args(["eval", "--r1", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("resistance1"));
}

#[test]
fn test_cli_eval_config_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    write!(
        file,
        r#"{{"switch_closed": true, "voltage": 5.0, "resistance1": 10.0, "resistance2": 20.0, "capacitance_uf": 100.0}}"#
    )
    .unwrap();

    let mut cmd = circuitlab_cli();
    cmd.args(["eval", "--topology", "parallel", "--config"])
        .arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.750000"));
}

#[test]
fn test_cli_eval_bad_config_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    write!(file, "not json").unwrap();

    let mut cmd = circuitlab_cli();
    cmd.args(["eval", "--config"]).arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"))
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_cli_eval_missing_config_file() {
    let mut cmd = circuitlab_cli();
    cmd.args(["eval", "--config", "no/such/config.json"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"))
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_cli_trace_rc_delay() {
    let mut cmd = circuitlab_cli();

    cmd.args([
        "trace",
        "--topology",
        "rc-delay",
        "--duration",
        "0.5",
        "--steps",
        "5",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Vc (V)"))
        .stdout(predicate::str::contains("0.010000")); // I at t=0 is V/R
}

#[test]
fn test_cli_trace_rejects_zero_steps() {
    let mut cmd = circuitlab_cli();

    cmd.args(["trace", "--steps", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("steps"));
}

#[test]
fn test_cli_topologies() {
    let mut cmd = circuitlab_cli();

    cmd.args(["topologies", "--verbose"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("series"))
        .stdout(predicate::str::contains("parallel"))
        .stdout(predicate::str::contains("rc-delay"))
        .stdout(predicate::str::contains("exp(-t / RC)"));
}
