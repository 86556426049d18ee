use tapsflow_core::{build_pipeline, parse_properties_str};

#[test]
fn missing_schedule_is_the_only_error() {
    let build = build_pipeline(
        parse_properties_str("origins = PTR\nptr.schemas = SALES\nptr.sales.tables = ORDERS\n"),
        "sales",
    );

    assert_eq!(build.diagnostics.error_count(), 1);
    assert_eq!(
        build.diagnostics.errors_for("schedule"),
        Some(&["No schedule is defined".to_string()][..])
    );
}

#[test]
fn unknown_origin_skips_its_schemas() {
    let build = build_pipeline(
        parse_properties_str(
            "schedule.interval = @daily\norigins = ORACLE\noracle.schemas = SALES\noracle.sales.tables = ORDERS\n",
        ),
        "sales",
    );

    assert_eq!(
        build.diagnostics.errors_for("origins"),
        Some(
            &["'ORACLE' is not a valid origin, accepted origins are: ptr, exadata".to_string()][..]
        )
    );
    assert!(build.tasks.is_empty());
    assert!(build.hierarchy.get("ORACLE_SALES").is_none());
}

#[test]
fn every_problem_is_reported_in_one_pass() {
    let contents = "\
schedule.interval = */5 * * * *
origins = PTR
ptr.schemas = SALES
ptr.sales.tables = ORDERS,ITEMS
ptr.sales.orders.replication_method = incremental
ptr.sales.items.query_threads = many
ptr.sales.snowflake.parallelism = 0
";
    let build = build_pipeline(parse_properties_str(contents), "sales");

    let labels: Vec<&str> = build
        .diagnostics
        .errors()
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["schedule", "PTR_SALES_snowflake", "PTR_SALES_ORDERS", "PTR_SALES_ITEMS"]
    );
    assert_eq!(
        build.diagnostics.errors_for("PTR_SALES_ORDERS"),
        Some(&["Required key 'replication_key' is missing from config".to_string()][..])
    );
    // Tasks are still assembled so the report can list them.
    assert_eq!(build.tasks.len(), 2);
}

#[test]
fn casts_are_warnings_not_errors() {
    let contents = "\
schedule.interval = @hourly
origins = EXADATA
exadata.schemas = HR
exadata.hr.tables = EMPLOYEES
exadata.hr.employees.snowflake.wait_to_load = TRUE
exadata.hr.employees.additional_filters = 42
";
    let build = build_pipeline(parse_properties_str(contents), "hr");

    assert!(!build.has_errors(), "{:?}", build.diagnostics);
    assert_eq!(
        build.diagnostics.warnings_for("EXADATA_HR_EMPLOYEES"),
        Some(
            &["Provided key 'additional_filters' with type integer, it should be string, value was casted successfully"
                .to_string()][..]
        )
    );
}

#[test]
fn blank_origins_list_is_an_error() {
    let build = build_pipeline(
        parse_properties_str("schedule.interval = @daily\norigins = ,,\n"),
        "sales",
    );

    assert!(build.has_errors());
    assert_eq!(
        build.diagnostics.errors_for("origins"),
        Some(&["Provided key 'origins' with value '[]' does not met validation condition".to_string()][..])
    );
    assert!(build.tasks.is_empty());
}
