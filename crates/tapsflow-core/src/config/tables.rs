use crate::config::keys::{DefaultValue, KeySpec, KeyTable};
use crate::config::schedule::{
    default_start_date, format_start_date, is_valid_interval, parse_start_date,
};
use crate::config::ConfigNode;
use crate::value::{Value, ValueType};

pub const VALID_ORIGINS: &[&str] = &["ptr", "exadata"];

pub const VALID_STRATEGIES: &[&str] = &["default", "partition", "offset_rownum", "offset_denserank"];

pub const VALID_REPLICATION: &[&str] = &["FULL_TABLE", "INCREMENTAL"];

pub const VALID_STAGE_TYPES: &[&str] = &["gcs", "snowflake"];

/// Table keys routed to the extractor's per-stream metadata instead of its
/// connector config.
pub const METADATA_FIELDS: &[&str] = &[
    "replication_method",
    "replication_key",
    "encrypt_columns",
    "additional_filters",
    "strategy",
    "partitions",
    "partition_columns",
    "max_results",
];

pub static TAG_KEYS: &KeyTable = &[(
    "tags",
    KeySpec::optional(ValueType::Text)
        .transform(comma_list)
        .check(non_empty_list),
)];

pub static ORIGINS_KEYS: &KeyTable = &[(
    "origins",
    KeySpec::required(ValueType::Text)
        .transform(upper_comma_list)
        .check(non_empty_list),
)];

pub static ORIGIN_KEYS: &KeyTable = &[(
    "schemas",
    KeySpec::required(ValueType::Text)
        .transform(upper_comma_list)
        .check(non_empty_list),
)];

pub static SCHEMA_KEYS: &KeyTable = &[(
    "tables",
    KeySpec::required(ValueType::Text)
        .transform(upper_comma_list)
        .check(non_empty_list),
)];

pub static SCHEDULE_KEYS: &KeyTable = &[
    (
        "interval",
        KeySpec::required(ValueType::Text)
            .transform(trimmed)
            .check(valid_interval),
    ),
    (
        "start_date",
        KeySpec::optional(ValueType::Text)
            .transform(start_date)
            .default(DefaultValue::Produce(now_start_date)),
    ),
];

pub static ORACLE_KEYS: &KeyTable = &[
    (
        "query_threads",
        KeySpec::optional(ValueType::Integer)
            .check(positive)
            .default(DefaultValue::Integer(1)),
    ),
    (
        "fields",
        KeySpec::optional(ValueType::Text)
            .transform(comma_list)
            .default(DefaultValue::List(&["*"])),
    ),
    (
        "replication_method",
        KeySpec::optional(ValueType::Text)
            .transform(upper)
            .check(valid_replication)
            .default(DefaultValue::Text("FULL_TABLE")),
    ),
    (
        "replication_key",
        KeySpec::required_when(is_incremental, ValueType::Text).transform(upper),
    ),
    (
        "additional_filters",
        KeySpec::optional(ValueType::Text).transform(trimmed),
    ),
    (
        "encrypt_columns",
        KeySpec::optional(ValueType::Text).transform(comma_list),
    ),
    (
        "strategy",
        KeySpec::optional(ValueType::Text)
            .transform(lower)
            .check(valid_strategy)
            .default(DefaultValue::Text("default")),
    ),
    (
        "partitions",
        KeySpec::required_when(is_partitioned, ValueType::Integer).check(positive),
    ),
    (
        "partition_column",
        KeySpec::required_when(is_partitioned, ValueType::Text).transform(trimmed),
    ),
    (
        "max_results",
        KeySpec::required_when(is_offset_strategy, ValueType::Integer).check(positive),
    ),
];

pub static SNOWFLAKE_KEYS: &KeyTable = &[
    (
        "batch_size_rows",
        KeySpec::optional(ValueType::Integer).check(positive),
    ),
    (
        "parallelism",
        KeySpec::optional(ValueType::Integer).check(positive),
    ),
    ("add_metadata_columns", KeySpec::optional(ValueType::Boolean)),
    ("primary_key_required", KeySpec::optional(ValueType::Boolean)),
    ("no_compression", KeySpec::optional(ValueType::Boolean)),
    (
        "stage_type",
        KeySpec::optional(ValueType::Text)
            .transform(lower)
            .check(valid_stage_type),
    ),
    ("prefix", KeySpec::optional(ValueType::Text).transform(upper)),
    ("wait_to_load", KeySpec::optional(ValueType::Boolean)),
    ("clean_stage", KeySpec::optional(ValueType::Boolean)),
];

/// Split a comma separated string, dropping empty items.
pub fn split_commas(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn text_of(value: &Value) -> Result<&str, String> {
    value
        .as_text()
        .ok_or_else(|| format!("expected string, got {}", value.type_name()))
}

fn trimmed(value: &Value) -> Result<Value, String> {
    Ok(Value::text(text_of(value)?.trim()))
}

fn upper(value: &Value) -> Result<Value, String> {
    Ok(Value::text(text_of(value)?.trim().to_uppercase()))
}

fn lower(value: &Value) -> Result<Value, String> {
    Ok(Value::text(text_of(value)?.trim().to_lowercase()))
}

fn comma_list(value: &Value) -> Result<Value, String> {
    Ok(Value::List(split_commas(text_of(value)?)))
}

fn upper_comma_list(value: &Value) -> Result<Value, String> {
    Ok(Value::List(split_commas(&text_of(value)?.to_uppercase())))
}

fn start_date(value: &Value) -> Result<Value, String> {
    let parsed = parse_start_date(text_of(value)?)?;
    Ok(Value::text(format_start_date(&parsed)))
}

fn now_start_date(_: &ConfigNode) -> Result<Option<Value>, String> {
    Ok(Some(Value::text(format_start_date(&default_start_date()))))
}

fn positive(value: &Value) -> Result<bool, String> {
    value
        .as_integer()
        .map(|number| number > 0)
        .ok_or_else(|| format!("expected integer, got {}", value.type_name()))
}

fn non_empty_list(value: &Value) -> Result<bool, String> {
    value
        .as_list()
        .map(|items| !items.is_empty())
        .ok_or_else(|| format!("expected list, got {}", value.type_name()))
}

fn one_of(value: &Value, allowed: &[&str]) -> Result<bool, String> {
    Ok(allowed.contains(&text_of(value)?))
}

fn valid_interval(value: &Value) -> Result<bool, String> {
    Ok(is_valid_interval(text_of(value)?))
}

fn valid_replication(value: &Value) -> Result<bool, String> {
    one_of(value, VALID_REPLICATION)
}

fn valid_strategy(value: &Value) -> Result<bool, String> {
    one_of(value, VALID_STRATEGIES)
}

fn valid_stage_type(value: &Value) -> Result<bool, String> {
    one_of(value, VALID_STAGE_TYPES)
}

fn is_incremental(config: &ConfigNode) -> bool {
    config.get_text("replication_method") == Some("INCREMENTAL")
}

fn is_partitioned(config: &ConfigNode) -> bool {
    config.get_text("strategy") == Some("partition")
}

fn is_offset_strategy(config: &ConfigNode) -> bool {
    config
        .get_text("strategy")
        .is_some_and(|strategy| strategy.starts_with("offset_"))
}
