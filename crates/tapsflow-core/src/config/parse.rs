use std::path::Path;

use crate::config::ConfigNode;
use crate::value::parse_value;
use crate::{ConfigError, FlowResult};

pub fn parse_properties(path: &Path) -> FlowResult<ConfigNode> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        Box::new(ConfigError(format!(
            "failed to read properties file {}: {err}",
            path.display()
        )))
    })?;
    Ok(parse_properties_str(&contents))
}

/// Read `dotted.key = value` lines into nested nodes. Lines starting with
/// `#` or without `=` are skipped; a repeated key keeps the last value.
pub fn parse_properties_str(contents: &str) -> ConfigNode {
    let mut properties = ConfigNode::new();
    for line in contents.lines() {
        let line = line.trim_end();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let path: Vec<&str> = key.trim().split('.').collect();
        properties.insert_path(&path, parse_value(value.trim()));
    }
    properties
}
