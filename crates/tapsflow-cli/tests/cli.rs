use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const VALID: &str = "\
tags = finance
schedule.interval = @daily
schedule.start_date = 2024-01-15T08:02:00Z
origins = PTR
ptr.schemas = SALES
ptr.sales.tables = ORDERS
ptr.sales.orders.fields = ID,AMOUNT
";

const MISSING_SCHEDULE: &str = "\
origins = PTR
ptr.schemas = SALES
ptr.sales.tables = ORDERS
";

fn write_properties(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let properties = dir.join("properties");
    std::fs::create_dir_all(&properties).expect("create properties dir");
    let path = properties.join(name);
    std::fs::write(&path, contents).expect("write properties");
    path
}

fn tapsflow() -> Command {
    Command::cargo_bin("tapsflow").expect("binary")
}

#[test]
fn validate_reports_ok_without_writing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_properties(dir.path(), "sales.properties", VALID);

    tapsflow()
        .current_dir(dir.path())
        .args(["validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is OK"))
        .stdout(predicate::str::contains("tasks: ptr_sales_orders"));

    assert!(!dir.path().join("pipelines").exists());
}

#[test]
fn validate_write_emits_artifacts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("out");
    let path = write_properties(dir.path(), "sales.properties", VALID);

    tapsflow()
        .args(["validate", "--write", "--output"])
        .arg(&out)
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("written:"));

    let task = out.join("pipelines/sales/ptr_sales_orders");
    let env = std::fs::read_to_string(task.join("env")).expect("read env");
    assert_eq!(env, "export MELTANO_ENVIRONMENT=ptr_sales_orders");
    let environment = std::fs::read_to_string(task.join("environment.yml")).expect("read yaml");
    assert!(environment.contains("SALES-ORDERS.AMOUNT"));
    let tags = std::fs::read_to_string(out.join("pipelines/sales/tags")).expect("read tags");
    assert_eq!(tags, "finance,PTR,SALES,ORDERS");
}

#[test]
fn invalid_file_is_ko_and_not_written() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_properties(dir.path(), "broken.properties", MISSING_SCHEDULE);

    tapsflow()
        .args(["validate", "--write", "--output"])
        .arg(dir.path())
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is KO"))
        .stdout(predicate::str::contains("[schedule] No schedule is defined"))
        .stderr(predicate::str::contains("Invalid schedule configuration"));

    assert!(!dir.path().join("pipelines").exists());
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("properties/none.properties");

    tapsflow()
        .arg("validate")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("doesn't exists"));
}

#[test]
fn json_format_prints_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_properties(dir.path(), "sales.properties", VALID);

    let assert = tapsflow()
        .args(["-q", "validate", "--format", "json"])
        .arg(&path)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("parse json");
    assert_eq!(value["files_ok"], 1);
    assert_eq!(value["files"][0]["pipeline"], "sales");
}

#[test]
fn sync_selects_added_and_modified_properties() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_properties(dir.path(), "sales.properties", VALID);
    write_properties(dir.path(), "broken.properties", MISSING_SCHEDULE);

    tapsflow()
        .current_dir(dir.path())
        .args([
            "sync",
            "M",
            "properties/sales.properties",
            "D",
            "properties/broken.properties",
            "A",
            "docs/notes.md",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("properties/sales.properties is OK"))
        .stdout(predicate::str::contains("broken").not());
}

#[test]
fn version_starts_with_package_version() {
    tapsflow()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "tapsflow {}",
            env!("CARGO_PKG_VERSION")
        )));
}
