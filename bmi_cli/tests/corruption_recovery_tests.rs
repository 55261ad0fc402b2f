//! Corruption recovery tests for the bmi binary.
//!
//! These tests verify the system can handle:
//! - Corrupted history files
//! - Wrongly shaped history data
//! - Corrupted saved form data

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn data_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data")
}

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bmi").expect("Failed to find bmi binary");
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir(temp_dir));
    cmd
}

fn write_data_file(temp_dir: &TempDir, name: &str, contents: &str) {
    let dir = data_dir(temp_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), contents).expect("Failed to write data file");
}

#[test]
fn test_corrupted_history_reads_as_empty() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiHistory.json", "{ invalid json }}}}");

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No BMI history yet"))
        .stderr(predicate::str::contains("Corrupt BMI history"));
}

#[test]
fn test_save_overwrites_corrupted_history() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiHistory.json", "[{\"bmi\": \"oops\"");

    cli(&temp_dir)
        .args([
            "calc", "--height", "175", "--weight", "70", "--age", "30", "--gender", "male",
            "--save",
        ])
        .assert()
        .success();

    let raw = fs::read_to_string(data_dir(&temp_dir).join("bmiHistory.json")).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["bmi"], 22.9);
}

#[test]
fn test_wrongly_shaped_history_reads_as_empty() {
    let temp_dir = setup_test_dir();
    // Valid JSON, but not an array of records
    write_data_file(&temp_dir, "bmiHistory.json", "{\"bmi\": 22.9}");

    cli(&temp_dir)
        .args(["history", "--json"])
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_corrupted_form_data_ignored_on_restore() {
    let temp_dir = setup_test_dir();
    write_data_file(&temp_dir, "bmiFormData.json", "not json at all");

    // Restore finds nothing usable, so the explicit fields must stand alone
    cli(&temp_dir)
        .args([
            "calc", "--restore", "--height", "160", "--weight", "50", "--age", "25", "--gender",
            "female",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI 19.5"));

    // The corrupt file was replaced by the new form
    let raw = fs::read_to_string(data_dir(&temp_dir).join("bmiFormData.json")).unwrap();
    let form: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(form["height"], "160");
    assert_eq!(form["gender"], "female");
}
