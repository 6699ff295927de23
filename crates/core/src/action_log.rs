//! Append-only action records: `actions_log.jsonl` plus a readable `actions.log`.

use crate::categories::Category;
use crate::extractor::Metadata;
use crate::naming::NameSource;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const JSON_LOG_FILE: &str = "actions_log.jsonl";
pub const TEXT_LOG_FILE: &str = "actions.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Organize,
    Reanalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Moved,
    Simulated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub action: ActionKind,
    pub status: ActionStatus,
    pub original_path: String,
    pub new_path: String,
    pub original_name: String,
    pub new_name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_category: Option<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
    pub mime_type: String,
    pub metadata: Metadata,
    pub naming: NameSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl ActionLogEntry {
    /// The decision itself, without when or whether it was carried out.
    pub fn intent(&self) -> (ActionKind, &str, &str, Category, &str) {
        (
            self.action,
            self.original_path.as_str(),
            self.new_path.as_str(),
            self.category,
            self.new_name.as_str(),
        )
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} [{:?}/{:?}] {} -> {} ({}, {}, naming={:?})",
            self.timestamp,
            self.action,
            self.status,
            self.original_path,
            self.new_path,
            self.category,
            self.mime_type,
            self.naming,
        );
        if !self.changes.is_empty() {
            line.push_str(&format!(" changes: {}", self.changes.join(", ")));
        }
        if let Some(note) = &self.note {
            line.push_str(&format!(" note: {}", note));
        }
        if let Some(err) = &self.error {
            line.push_str(&format!(" error: {}", err));
        }
        line
    }
}

#[derive(Debug, Clone)]
pub struct ActionLogger {
    json_path: PathBuf,
    text_path: PathBuf,
}

impl ActionLogger {
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("create log directory {:?}", dir))?;
        Ok(Self {
            json_path: dir.join(JSON_LOG_FILE),
            text_path: dir.join(TEXT_LOG_FILE),
        })
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Appends to both logs; one failing does not stop the other.
    pub fn record(&self, entry: &ActionLogEntry) -> anyhow::Result<()> {
        let line = serde_json::to_string(entry)?;
        let json = append_line(&self.json_path, &line);
        let text = append_line(&self.text_path, &entry.summary_line());
        match (json, text) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) => Err(e.context("json action log not written (text log was)")),
            (Ok(()), Err(e)) => Err(e.context("text action log not written (json log was)")),
            (Err(e), Err(_)) => Err(e.context("neither action log was written")),
        }
    }
}

fn append_line(path: &Path, line: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {:?}", path))?;
    writeln!(file, "{}", line).with_context(|| format!("append to {:?}", path))?;
    Ok(())
}

/// Reads back every record, skipping lines that do not parse.
pub fn read_entries(path: &Path) -> anyhow::Result<Vec<ActionLogEntry>> {
    let file = fs::File::open(path).with_context(|| format!("open {:?}", path))?;
    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!("skipping malformed log line: {}", e),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ActionLogEntry {
        ActionLogEntry {
            action: ActionKind::Organize,
            status: ActionStatus::Moved,
            original_path: format!("/home/u/Desktop/{}", name),
            new_path: format!("/home/u/Desktop/Organized_Documents/{}", name),
            original_name: name.to_string(),
            new_name: name.to_string(),
            category: Category::Documents,
            original_category: None,
            changes: vec![],
            mime_type: "application/pdf".into(),
            metadata: Metadata::from([("size".to_string(), "3".to_string())]),
            naming: NameSource::Fallback,
            note: None,
            error: None,
            timestamp: "2024-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn records_append_and_read_back_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let logger = ActionLogger::new(&temp.path().join("logs")).unwrap();
        logger.record(&entry("a.pdf")).unwrap();
        logger.record(&entry("b.pdf")).unwrap();

        let back = read_entries(logger.json_path()).unwrap();
        assert_eq!(back, vec![entry("a.pdf"), entry("b.pdf")]);

        let text = fs::read_to_string(temp.path().join("logs").join(TEXT_LOG_FILE)).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Organized_Documents/b.pdf"));
    }

    #[test]
    fn failing_text_log_is_named_and_json_still_written() {
        let temp = tempfile::tempdir().unwrap();
        let logger = ActionLogger::new(temp.path()).unwrap();
        // A directory where the text log should be makes its append fail.
        fs::create_dir(temp.path().join(TEXT_LOG_FILE)).unwrap();

        let err = logger.record(&entry("a.pdf")).unwrap_err();
        assert!(format!("{:#}", err).contains("text action log not written"));
        assert_eq!(read_entries(logger.json_path()).unwrap(), vec![entry("a.pdf")]);
    }

    #[test]
    fn json_shape_carries_the_required_fields() {
        let value = serde_json::to_value(entry("a.pdf")).unwrap();
        for key in [
            "original_path",
            "new_path",
            "original_name",
            "new_name",
            "category",
            "mime_type",
            "metadata",
            "timestamp",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["category"], "Documents");
        assert_eq!(value["status"], "moved");
        assert!(value.get("error").is_none());
    }
}
