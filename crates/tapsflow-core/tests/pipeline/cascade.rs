use tapsflow_core::{build_pipeline, parse_properties_str, ConfigNode, Level, Value};

const TWO_ORIGINS: &str = "\
schedule.interval = 0 2 * * *
origins = PTR,EXADATA
snowflake.stage_type = GCS
snowflake.wait_to_load = false
ptr.schemas = SALES
ptr.snowflake.stage_type = snowflake
ptr.sales.tables = ORDERS
exadata.schemas = HR
exadata.hr.tables = EMPLOYEES
exadata.hr.employees.snowflake.wait_to_load = true
exadata.hr.employees.snowflake.warehouse = ignored
";

#[test]
fn snowflake_settings_shadow_per_branch() {
    let build = build_pipeline(parse_properties_str(TWO_ORIGINS), "mixed");
    assert!(!build.has_errors(), "{:?}", build.diagnostics);

    let orders = build.hierarchy.get("PTR_SALES_ORDERS").expect("orders");
    assert_eq!(orders.snowflake.get_text("stage_type"), Some("snowflake"));
    assert_eq!(orders.snowflake.get("wait_to_load"), Some(&Value::Boolean(false)));

    let employees = build.hierarchy.get("EXADATA_HR_EMPLOYEES").expect("employees");
    assert_eq!(employees.snowflake.get_text("stage_type"), Some("gcs"));
    assert_eq!(employees.snowflake.get("wait_to_load"), Some(&Value::Boolean(true)));
    assert!(!employees.snowflake.contains_key("warehouse"));

    // Parents keep their own view.
    let global = build.hierarchy.get("global").expect("global");
    assert_eq!(global.snowflake.get("wait_to_load"), Some(&Value::Boolean(false)));
}

#[test]
fn hierarchy_links_levels_and_tags() {
    let build = build_pipeline(parse_properties_str(TWO_ORIGINS), "mixed");

    let tables: Vec<&str> = build.hierarchy.tables().map(|node| node.label.as_str()).collect();
    assert_eq!(tables, vec!["PTR_SALES_ORDERS", "EXADATA_HR_EMPLOYEES"]);

    let employees = build.hierarchy.get("EXADATA_HR_EMPLOYEES").expect("employees");
    let schema = build.hierarchy.parent_of(employees).expect("schema");
    let origin = build.hierarchy.parent_of(schema).expect("origin");
    assert_eq!(schema.level, Level::Schema);
    assert_eq!(origin.level, Level::Origin);
    assert_eq!(origin.name(), Some("EXADATA"));

    assert_eq!(
        build.unique_tags(),
        vec!["PTR", "SALES", "ORDERS", "EXADATA", "HR", "EMPLOYEES"]
    );
    let ids: Vec<&str> = build.tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, vec!["ptr_sales_orders", "exadata_hr_employees"]);
}

#[test]
fn override_is_shallow_and_leaves_parent_untouched() {
    let parent: ConfigNode = [("a", 1i64), ("b", 2i64)].into_iter().collect();
    let child: ConfigNode = [("b", 3i64), ("c", 4i64)].into_iter().collect();

    let merged = parent.overridden_by(&child);
    let expected: ConfigNode = [("a", 1i64), ("b", 3i64), ("c", 4i64)].into_iter().collect();
    assert_eq!(merged, expected);
    assert_eq!(parent.get("b"), Some(&Value::Integer(2)));
}
