use serde::Serialize;

use crate::config::tables::METADATA_FIELDS;
use crate::config::ConfigNode;
use crate::hierarchy::LevelNode;
use crate::value::Value;

pub const EXTRACTOR_PREFIX: &str = "tap-";
pub const LOADER_NAME: &str = "target-snowflake";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extractor {
    pub name: String,
    pub config: ConfigNode,
    pub select: Vec<String>,
    /// Stream name to per-stream settings.
    pub metadata: ConfigNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loader {
    pub name: String,
    pub config: ConfigNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub extractors: Vec<Extractor>,
    pub loaders: Vec<Loader>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentConfig {
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    pub name: String,
    pub config: EnvironmentConfig,
}

/// Content of a task's `environment.yml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentFile {
    pub environments: Vec<Environment>,
}

/// Content of a task's `schedule.yml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleFile {
    pub schedules: Vec<ConfigNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDescriptor {
    /// Lower-cased `origin_schema_table`.
    pub id: String,
    /// Output location relative to the output root.
    pub key: String,
    pub environment: EnvironmentFile,
    pub schedule: ScheduleFile,
}

impl TaskDescriptor {
    pub fn extractor(&self) -> Option<&Extractor> {
        self.environment
            .environments
            .first()
            .and_then(|environment| environment.config.plugins.extractors.first())
    }

    pub fn loader(&self) -> Option<&Loader> {
        self.environment
            .environments
            .first()
            .and_then(|environment| environment.config.plugins.loaders.first())
    }
}

/// Build the environment and schedule descriptors of one table.
///
/// Returns `None` when `table` is not a table-level node.
pub fn assemble(pipeline_name: &str, table: &LevelNode, schedule: &ConfigNode) -> Option<TaskDescriptor> {
    let [origin, schema, table_name] = table.path.as_slice() else {
        return None;
    };
    let stream_name = format!("{}-{}", schema.to_uppercase(), table_name.to_uppercase());
    let id = format!(
        "{}_{}_{}",
        origin.to_lowercase(),
        schema.to_lowercase(),
        table_name.to_lowercase()
    );

    let extractor = build_extractor(origin, schema, &stream_name, &table.config);
    let loader = Loader {
        name: LOADER_NAME.to_string(),
        config: table.snowflake.clone(),
    };

    let task_schedule: ConfigNode = [
        ("name", id.clone()),
        ("extractor", extractor.name.clone()),
        ("loader", loader.name.clone()),
    ]
    .into_iter()
    .collect();

    Some(TaskDescriptor {
        key: format!("pipelines/{pipeline_name}/{id}"),
        environment: EnvironmentFile {
            environments: vec![Environment {
                name: id.clone(),
                config: EnvironmentConfig {
                    plugins: Plugins {
                        extractors: vec![extractor],
                        loaders: vec![loader],
                    },
                },
            }],
        },
        schedule: ScheduleFile {
            schedules: vec![schedule.overridden_by(&task_schedule)],
        },
        id,
    })
}

fn build_extractor(origin: &str, schema: &str, stream_name: &str, config: &ConfigNode) -> Extractor {
    let mut connector: ConfigNode = [("filter_schemas", schema.to_uppercase())].into_iter().collect();
    let mut select = Vec::new();
    let mut stream = ConfigNode::new();

    for (key, value) in config.iter() {
        if key == "fields" {
            let fields = match value {
                Value::List(items) => items.clone(),
                other => vec![other.to_string()],
            };
            select.extend(fields.iter().map(|field| format!("{stream_name}.{field}")));
        } else if METADATA_FIELDS.contains(&key) {
            let name = if key.contains("replication_") {
                key.replace('_', "-")
            } else {
                key.to_string()
            };
            stream.insert(name, value.clone());
        } else {
            connector.insert(key, value.clone());
        }
    }

    Extractor {
        name: format!("{EXTRACTOR_PREFIX}{}", origin.to_lowercase()),
        config: connector,
        select,
        metadata: [(stream_name, stream)].into_iter().collect(),
    }
}
