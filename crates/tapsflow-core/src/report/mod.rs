use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::KeyReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LabeledMessages {
    pub label: String,
    pub messages: Vec<String>,
}

/// Errors and warnings of one properties file, grouped by hierarchy label
/// in the order labels first reported something.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Diagnostics {
    errors: Vec<LabeledMessages>,
    warnings: Vec<LabeledMessages>,
}

impl Diagnostics {
    pub fn record(&mut self, label: &str, report: KeyReport) {
        push_messages(&mut self.errors, label, report.errors);
        push_messages(&mut self.warnings, label, report.warnings);
    }

    pub fn error(&mut self, label: &str, message: impl Into<String>) {
        push_messages(&mut self.errors, label, vec![message.into()]);
    }

    pub fn warning(&mut self, label: &str, message: impl Into<String>) {
        push_messages(&mut self.warnings, label, vec![message.into()]);
    }

    pub fn errors(&self) -> &[LabeledMessages] {
        &self.errors
    }

    pub fn warnings(&self) -> &[LabeledMessages] {
        &self.warnings
    }

    pub fn errors_for(&self, label: &str) -> Option<&[String]> {
        find_messages(&self.errors, label)
    }

    pub fn warnings_for(&self, label: &str) -> Option<&[String]> {
        find_messages(&self.warnings, label)
    }

    /// The only gate for writing artifacts; warnings never block.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().map(|entry| entry.messages.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.iter().map(|entry| entry.messages.len()).sum()
    }

    pub fn log(&self) {
        for entry in &self.warnings {
            warn!(
                "Warning on {} configuration:\n   * {}",
                entry.label,
                entry.messages.join("\n   * ")
            );
        }
        for entry in &self.errors {
            error!(
                "Invalid {} configuration:\n   * {}",
                entry.label,
                entry.messages.join("\n   * ")
            );
        }
    }
}

fn push_messages(entries: &mut Vec<LabeledMessages>, label: &str, messages: Vec<String>) {
    if messages.is_empty() {
        return;
    }
    match entries.iter_mut().find(|entry| entry.label == label) {
        Some(entry) => entry.messages.extend(messages),
        None => entries.push(LabeledMessages {
            label: label.to_string(),
            messages,
        }),
    }
}

fn find_messages<'a>(entries: &'a [LabeledMessages], label: &str) -> Option<&'a [String]> {
    entries
        .iter()
        .find(|entry| entry.label == label)
        .map(|entry| entry.messages.as_slice())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ok,
    Ko,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Ok => "OK",
            FileStatus::Ko => "KO",
        }
    }
}

/// Per-file outcome echoed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FileSummary {
    pub file: String,
    pub pipeline: String,
    pub status: FileStatus,
    pub tasks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<String>,
    pub diagnostics: Diagnostics,
}
