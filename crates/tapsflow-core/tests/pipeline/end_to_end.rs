use std::fs;
use std::path::{Path, PathBuf};

use tapsflow_core::{process_file, validate_file, FileStatus, ProcessOptions, Value};

fn write_properties(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write properties");
    path
}

const SALES: &str = "\
# nightly sales extraction
tags = finance
schedule.interval = @daily
schedule.start_date = 2024-01-15 06:00
origins = PTR
ptr.schemas = SALES
ptr.sales.tables = ORDERS
ptr.sales.orders.fields = ID,AMOUNT
snowflake.prefix = raw
ptr.sales.orders.snowflake.batch_size_rows = 1000
";

#[test]
fn single_table_pipeline() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_properties(dir.path(), "sales.properties", SALES);
    let build = validate_file(&path).expect("validate file");

    assert!(!build.has_errors(), "{:?}", build.diagnostics);
    assert_eq!(build.name, "sales");
    assert_eq!(build.tasks.len(), 1);

    let task = &build.tasks[0];
    assert_eq!(task.id, "ptr_sales_orders");
    assert_eq!(task.key, "pipelines/sales/ptr_sales_orders");

    let extractor = task.extractor().expect("extractor");
    assert_eq!(extractor.select, vec!["SALES-ORDERS.ID", "SALES-ORDERS.AMOUNT"]);

    let loader = task.loader().expect("loader");
    assert_eq!(loader.config.get_text("prefix"), Some("RAW"));
    assert_eq!(loader.config.get("batch_size_rows"), Some(&Value::Integer(1000)));

    assert_eq!(
        build.schedule.get_text("start_date"),
        Some("2024-01-15T06:00:00+01:00")
    );
}

#[test]
fn process_file_writes_valid_pipeline() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_properties(dir.path(), "sales.properties", SALES);
    let root = tempfile::tempdir().expect("temp dir");
    let options = ProcessOptions {
        write: true,
        output_root: Some(root.path().to_path_buf()),
    };

    let outcome = process_file(&path, &options).expect("process file");
    assert_eq!(outcome.status(), FileStatus::Ok);
    let written = outcome.written.clone().expect("written");
    assert!(written.join("ptr_sales_orders/schedule.yml").is_file());

    let summary = outcome.summarize();
    assert_eq!(summary.pipeline, "sales");
    assert_eq!(summary.tasks, vec!["ptr_sales_orders"]);
    assert_eq!(summary.written.as_deref(), Some(written.display().to_string().as_str()));
}

#[test]
fn process_file_skips_writing_invalid_pipeline() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_properties(
        dir.path(),
        "broken.properties",
        "origins = PTR\nptr.schemas = SALES\nptr.sales.tables = ORDERS\n",
    );
    let root = tempfile::tempdir().expect("temp dir");
    let options = ProcessOptions {
        write: true,
        output_root: Some(root.path().to_path_buf()),
    };

    let outcome = process_file(&path, &options).expect("process file");
    assert_eq!(outcome.status(), FileStatus::Ko);
    assert!(outcome.written.is_none());
    assert!(!root.path().join("pipelines").exists());
}
