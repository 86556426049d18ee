use clap::ValueEnum;
use serde::Serialize;
use tapsflow_core::{FileStatus, FileSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub fn format_summaries(summaries: &[FileSummary], format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(format_text(summaries)),
        Format::Json => format_json(summaries),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
struct JsonReport<'a> {
    files_total: usize,
    files_ok: usize,
    files_ko: usize,
    files: &'a [FileSummary],
}

pub fn format_json(summaries: &[FileSummary]) -> Result<String, serde_json::Error> {
    let files_ko = count_failed(summaries);
    serde_json::to_string_pretty(&JsonReport {
        files_total: summaries.len(),
        files_ok: summaries.len() - files_ko,
        files_ko,
        files: summaries,
    })
}

fn count_failed(summaries: &[FileSummary]) -> usize {
    summaries
        .iter()
        .filter(|summary| summary.status == FileStatus::Ko)
        .count()
}

pub fn format_text(summaries: &[FileSummary]) -> String {
    let mut lines = Vec::new();
    for summary in summaries {
        lines.extend(format_file(summary));
    }
    let failed = count_failed(summaries);
    lines.push(format!(
        "{} file(s) checked, {} OK, {} KO",
        summaries.len(),
        summaries.len() - failed,
        failed
    ));
    lines.join("\n")
}

fn format_file(summary: &FileSummary) -> Vec<String> {
    let diagnostics = &summary.diagnostics;
    let mut lines = vec![format!(
        "Properties file {} is {}",
        summary.file,
        summary.status.as_str()
    )];
    lines.push(format!("  pipeline: {}", summary.pipeline));
    if !summary.tasks.is_empty() {
        lines.push(format!("  tasks: {}", summary.tasks.join(", ")));
    }
    lines.push(format!(
        "  errors: {}, warnings: {}",
        diagnostics.error_count(),
        diagnostics.warning_count()
    ));
    for entry in diagnostics.errors() {
        for message in &entry.messages {
            lines.push(format!("  [{}] {}", entry.label, message));
        }
    }
    if let Some(written) = &summary.written {
        lines.push(format!("  written: {written}"));
    }
    lines
}
