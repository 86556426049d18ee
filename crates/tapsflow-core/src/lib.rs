use std::path::{Path, PathBuf};

use tracing::{error, info};

pub mod changes;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod hierarchy;
pub mod logging;
pub mod report;
pub mod value;
pub mod write;

pub use changes::select_changed_files;
pub use config::{parse_properties, parse_properties_str, ConfigNode};
pub use descriptor::TaskDescriptor;
pub use hierarchy::{Hierarchy, Level, LevelNode};
pub use report::{Diagnostics, FileStatus, FileSummary};
pub use value::{parse_value, Value, ValueType};
pub use write::write_pipeline;

pub type FlowResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Everything learned from one properties file.
#[derive(Debug, Clone)]
pub struct PipelineBuild {
    pub name: String,
    pub schedule: ConfigNode,
    /// Declared tags followed by every visited origin, schema and table name.
    pub tags: Vec<String>,
    pub hierarchy: Hierarchy,
    pub tasks: Vec<TaskDescriptor>,
    pub diagnostics: Diagnostics,
}

impl PipelineBuild {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Tags with repeats removed, keeping first occurrences.
    pub fn unique_tags(&self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            if !unique.contains(tag) {
                unique.push(tag.clone());
            }
        }
        unique
    }
}

/// Validate parsed properties and assemble one task per table.
pub fn build_pipeline(properties: ConfigNode, pipeline_name: &str) -> PipelineBuild {
    let cascade = hierarchy::build_cascade(properties, pipeline_name);
    let tasks = cascade
        .hierarchy
        .tables()
        .filter_map(|table| descriptor::assemble(pipeline_name, table, &cascade.schedule))
        .collect();

    PipelineBuild {
        name: pipeline_name.to_string(),
        schedule: cascade.schedule,
        tags: cascade.tags,
        hierarchy: cascade.hierarchy,
        tasks,
        diagnostics: cascade.diagnostics,
    }
}

/// File name up to its first `.`, e.g. `sales` for `properties/sales.dev.properties`.
pub fn pipeline_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

pub fn validate_file(path: &Path) -> FlowResult<PipelineBuild> {
    let properties = parse_properties(path)?;
    Ok(build_pipeline(properties, &pipeline_name(path)))
}

#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub write: bool,
    /// Directory holding the `pipelines/` tree. Defaults to the working directory.
    pub output_root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub build: PipelineBuild,
    pub written: Option<PathBuf>,
}

impl FileOutcome {
    pub fn status(&self) -> FileStatus {
        if self.build.has_errors() {
            FileStatus::Ko
        } else {
            FileStatus::Ok
        }
    }

    pub fn summarize(&self) -> FileSummary {
        FileSummary {
            file: self.path.display().to_string(),
            pipeline: self.build.name.clone(),
            status: self.status(),
            tasks: self.build.tasks.iter().map(|task| task.id.clone()).collect(),
            written: self
                .written
                .as_ref()
                .map(|path| path.display().to_string()),
            diagnostics: self.build.diagnostics.clone(),
        }
    }
}

/// Validate one file, log its diagnostics and write its artifacts when
/// requested and valid. Missing files and write failures are errors; an
/// invalid file is not.
pub fn process_file(path: &Path, options: &ProcessOptions) -> FlowResult<FileOutcome> {
    if !path.is_file() {
        error!("File {} doesn't exists", path.display());
        return Err(Box::new(ConfigError(format!(
            "File {} doesn't exists",
            path.display()
        ))));
    }

    let build = validate_file(path)?;
    info!("Successfully read file {}", path.display());
    build.diagnostics.log();

    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        build,
        written: None,
    };
    info!(
        "Properties file {} is {}",
        path.display(),
        outcome.status().as_str()
    );

    if options.write && outcome.status() == FileStatus::Ok {
        let root = match &options.output_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        outcome.written = Some(write_pipeline(&outcome.build, &root)?);
    }
    Ok(outcome)
}
