use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::tables::{
    ORACLE_KEYS, ORIGINS_KEYS, ORIGIN_KEYS, SCHEDULE_KEYS, SCHEMA_KEYS, SNOWFLAKE_KEYS, TAG_KEYS,
    VALID_ORIGINS,
};
use crate::config::{validate_config, CheckOptions, ConfigNode, KeyTable};
use crate::report::Diagnostics;
use crate::value::Value;

pub const SNOWFLAKE_KEY: &str = "snowflake";
pub const SCHEDULE_KEY: &str = "schedule";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Global,
    Origin,
    Schema,
    Table,
}

impl Level {
    /// Level below this one, the key listing its names, its key table and
    /// whether undeclared keys are dropped.
    fn child(self) -> Option<(Level, &'static str, &'static KeyTable, bool)> {
        match self {
            Level::Global => Some((Level::Origin, "origins", ORIGIN_KEYS, false)),
            Level::Origin => Some((Level::Schema, "schemas", SCHEMA_KEYS, false)),
            Level::Schema => Some((Level::Table, "tables", ORACLE_KEYS, true)),
            Level::Table => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LevelNode {
    pub level: Level,
    /// Declared names from the origin down, e.g. `["PTR", "SALES", "ORDERS"]`.
    pub path: Vec<String>,
    pub label: String,
    pub parent: Option<usize>,
    pub config: ConfigNode,
    /// Snowflake settings of every ancestor with this level's written over them.
    pub snowflake: ConfigNode,
}

impl LevelNode {
    pub fn name(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

/// Arena of visited levels, indexed by diagnostics label.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: Vec<LevelNode>,
    by_label: HashMap<String, usize>,
}

impl Hierarchy {
    fn push(&mut self, node: LevelNode) -> usize {
        let index = self.nodes.len();
        self.by_label.insert(node.label.clone(), index);
        self.nodes.push(node);
        index
    }

    pub fn get(&self, label: &str) -> Option<&LevelNode> {
        self.by_label.get(label).and_then(|index| self.nodes.get(*index))
    }

    pub fn node(&self, index: usize) -> Option<&LevelNode> {
        self.nodes.get(index)
    }

    pub fn parent_of(&self, node: &LevelNode) -> Option<&LevelNode> {
        node.parent.and_then(|index| self.nodes.get(index))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelNode> {
        self.nodes.iter()
    }

    pub fn tables(&self) -> impl Iterator<Item = &LevelNode> {
        self.nodes.iter().filter(|node| node.level == Level::Table)
    }
}

#[derive(Debug, Clone)]
pub struct Cascade {
    pub hierarchy: Hierarchy,
    pub schedule: ConfigNode,
    /// Tags in visit order, duplicates included.
    pub tags: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Validate a parsed properties file level by level (global, origin,
/// schema, table), cascading snowflake settings down to every table.
pub fn build_cascade(mut properties: ConfigNode, pipeline_name: &str) -> Cascade {
    let mut diagnostics = Diagnostics::default();

    diagnostics.record(
        "tags",
        validate_config(&mut properties, TAG_KEYS, &CheckOptions::unfiltered()),
    );
    diagnostics.record(
        "origins",
        validate_config(&mut properties, ORIGINS_KEYS, &CheckOptions::unfiltered()),
    );
    let tags = properties
        .get_list("tags")
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let schedule = build_schedule(&mut properties, pipeline_name, &mut diagnostics);

    let mut global_snowflake = properties.take_node(SNOWFLAKE_KEY);
    diagnostics.record(
        SNOWFLAKE_KEY,
        validate_config(
            &mut global_snowflake,
            SNOWFLAKE_KEYS,
            &CheckOptions::filtered(),
        ),
    );

    let mut walker = Walker {
        hierarchy: Hierarchy::default(),
        diagnostics,
        tags,
    };
    let global = walker.hierarchy.push(LevelNode {
        level: Level::Global,
        path: Vec::new(),
        label: "global".to_string(),
        parent: None,
        config: properties,
        snowflake: global_snowflake,
    });
    walker.walk_children(global);

    Cascade {
        hierarchy: walker.hierarchy,
        schedule,
        tags: walker.tags,
        diagnostics: walker.diagnostics,
    }
}

fn build_schedule(
    properties: &mut ConfigNode,
    pipeline_name: &str,
    diagnostics: &mut Diagnostics,
) -> ConfigNode {
    let base: ConfigNode = [
        ("name", Value::text(pipeline_name)),
        ("transform", Value::text("skip")),
    ]
    .into_iter()
    .collect();

    match properties.remove(SCHEDULE_KEY) {
        Some(Value::Node(declared)) => {
            let mut schedule = base.overridden_by(&declared);
            diagnostics.record(
                SCHEDULE_KEY,
                validate_config(&mut schedule, SCHEDULE_KEYS, &CheckOptions::unfiltered()),
            );
            schedule
        }
        _ => {
            diagnostics.error(SCHEDULE_KEY, "No schedule is defined");
            base
        }
    }
}

struct Walker {
    hierarchy: Hierarchy,
    diagnostics: Diagnostics,
    tags: Vec<String>,
}

impl Walker {
    fn walk_children(&mut self, parent: usize) {
        let Some(parent_node) = self.hierarchy.node(parent) else {
            return;
        };
        let Some((level, children_key, table, filter)) = parent_node.level.child() else {
            return;
        };
        let parent_label = parent_node.label.clone();
        let names = parent_node
            .config
            .get_list(children_key)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let mut seen: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if seen.contains(&name) {
                self.diagnostics.warning(
                    &parent_label,
                    format!("'{name}' is declared more than once in {children_key}, repeats are ignored"),
                );
                continue;
            }
            seen.push(name.clone());

            if level == Level::Origin && !VALID_ORIGINS.contains(&name.to_lowercase().as_str()) {
                self.diagnostics.error(
                    "origins",
                    format!(
                        "'{name}' is not a valid origin, accepted origins are: {}",
                        VALID_ORIGINS.join(", ")
                    ),
                );
                continue;
            }

            let options = if filter {
                CheckOptions::filtered()
            } else {
                CheckOptions::unfiltered()
            };
            let child = self.descend(parent, level, &name, table, &options);
            self.walk_children(child);
        }
    }

    fn descend(
        &mut self,
        parent: usize,
        level: Level,
        name: &str,
        table: &KeyTable,
        options: &CheckOptions<'_>,
    ) -> usize {
        let parent_node = &mut self.hierarchy.nodes[parent];
        let mut config = parent_node.config.take_node(&name.to_lowercase());
        let mut snowflake = config.take_node(SNOWFLAKE_KEY);
        let mut path = parent_node.path.clone();
        path.push(name.to_string());
        let label = path.join("_");

        self.diagnostics
            .record(&label, validate_config(&mut config, table, options));
        self.diagnostics.record(
            &format!("{label}_{SNOWFLAKE_KEY}"),
            validate_config(&mut snowflake, SNOWFLAKE_KEYS, &CheckOptions::filtered()),
        );

        let merged = self.hierarchy.nodes[parent].snowflake.overridden_by(&snowflake);
        self.tags.push(name.to_string());
        debug!(
            kind = ?level,
            label = %label,
            keys = config.len(),
            snowflake_keys = merged.len(),
            "validated level"
        );

        self.hierarchy.push(LevelNode {
            level,
            path,
            label,
            parent: Some(parent),
            config,
            snowflake: merged,
        })
    }
}
