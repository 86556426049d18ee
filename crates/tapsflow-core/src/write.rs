use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info};

use crate::errors::WriteError;
use crate::{FlowResult, PipelineBuild};

pub const SCHEDULE_INTERVAL_FILE: &str = "schedule_interval";
pub const SCHEDULE_START_FILE: &str = "schedule_start";
pub const TAGS_FILE: &str = "tags";
pub const ENVIRONMENT_FILE: &str = "environment.yml";
pub const SCHEDULE_FILE: &str = "schedule.yml";
pub const ENV_FILE: &str = "env";

pub fn pipeline_dir(output_root: &Path, pipeline_name: &str) -> PathBuf {
    output_root.join("pipelines").join(pipeline_name)
}

/// Write every artifact of a valid pipeline under
/// `<output_root>/pipelines/<name>/`, replacing any previous content.
///
/// Either everything is written or the pipeline directory is removed.
pub fn write_pipeline(build: &PipelineBuild, output_root: &Path) -> FlowResult<PathBuf> {
    if build.has_errors() {
        return Err(Box::new(WriteError(format!(
            "pipeline {} has errors, nothing was written",
            build.name
        ))));
    }

    let target = pipeline_dir(output_root, &build.name);
    info!("Writing files for pipeline {}...", build.name);
    if target.exists() {
        std::fs::remove_dir_all(&target).map_err(|err| {
            Box::new(WriteError(format!(
                "failed to remove previous pipeline {}: {err}",
                target.display()
            )))
        })?;
    }

    match write_artifacts(build, output_root, &target) {
        Ok(()) => {
            info!("Pipeline {} written to {}", build.name, target.display());
            Ok(target)
        }
        Err(err) => {
            error!("Failed writing pipeline {}: {err}", build.name);
            if target.exists() {
                if let Err(cleanup) = std::fs::remove_dir_all(&target) {
                    error!("Could not remove {}: {cleanup}", target.display());
                }
            }
            Err(Box::new(WriteError(format!(
                "failed to write pipeline {}: {err}",
                build.name
            ))))
        }
    }
}

fn write_artifacts(build: &PipelineBuild, output_root: &Path, target: &Path) -> FlowResult<()> {
    std::fs::create_dir_all(target)?;

    let interval = build
        .schedule
        .get("interval")
        .map(ToString::to_string)
        .unwrap_or_default();
    write_text_file(&target.join(SCHEDULE_INTERVAL_FILE), &interval)?;

    let start = build.schedule.get_text("start_date").unwrap_or_default();
    write_text_file(&target.join(SCHEDULE_START_FILE), start)?;

    write_text_file(&target.join(TAGS_FILE), &build.unique_tags().join(","))?;

    for task in &build.tasks {
        let task_dir = output_root.join(&task.key);
        write_text_file(
            &task_dir.join(ENVIRONMENT_FILE),
            &serde_yaml::to_string(&task.environment)?,
        )?;
        write_text_file(
            &task_dir.join(SCHEDULE_FILE),
            &serde_yaml::to_string(&task.schedule)?,
        )?;
        write_text_file(
            &task_dir.join(ENV_FILE),
            &format!("export MELTANO_ENVIRONMENT={}", task.id),
        )?;
    }
    Ok(())
}

fn write_text_file(path: &Path, content: &str) -> FlowResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path(path);
    let mut file = std::fs::File::create(&tmp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("artifact");
    let tmp_name = format!("{file_name}.tmp-{}", unique_suffix());
    path.parent().unwrap_or(path).join(tmp_name)
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0)
}
