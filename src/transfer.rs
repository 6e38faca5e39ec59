//! Bulk export and import of the task list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use std::path::Path;

use crate::error::StoreResult;
use crate::model::{Priority, SubTask, Task, TaskStatus};
use crate::storage::write_atomically;

/// Snapshot of every task and subtask, ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
}

impl ExportBundle {
    pub fn new(tasks: Vec<Task>, subtasks: Vec<SubTask>) -> Self {
        Self {
            exported_at: Utc::now(),
            tasks,
            subtasks,
        }
    }

    pub fn to_toml(&self) -> StoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parse an export file
    ///
    /// Bundles may come from other installs or older versions, so an
    /// unrecognised priority or status falls back to the default instead of
    /// rejecting the whole file.
    pub fn from_toml(content: &str) -> StoreResult<Self> {
        let mut doc: Table = toml::from_str(content)?;
        if let Some(Value::Array(tasks)) = doc.get_mut("tasks") {
            for task in tasks.iter_mut().filter_map(Value::as_table_mut) {
                relax(task, "priority", Priority::from_lenient)?;
                relax(task, "status", TaskStatus::from_lenient)?;
            }
        }
        Ok(Value::Table(doc).try_into()?)
    }

    pub async fn write_to(&self, path: &Path) -> StoreResult<()> {
        write_atomically(path, self.to_toml()?.as_bytes()).await
    }

    pub async fn read_from(path: &Path) -> StoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&content)
    }
}

/// Rewrite `record[key]` in its canonical form, parsed leniently
fn relax<T: Serialize>(
    record: &mut Table,
    key: &str,
    parse: impl Fn(&str) -> T,
) -> StoreResult<()> {
    if let Some(value) = record.get_mut(key) {
        let raw = value.as_str().unwrap_or_default();
        let parsed = parse(raw);
        let canonical = Value::try_from(parsed)?;
        if canonical
            .as_str()
            .is_some_and(|c| !c.eq_ignore_ascii_case(raw.trim()))
        {
            tracing::warn!(
                key,
                value = %value,
                fallback = %canonical,
                "unrecognised value in import"
            );
        }
        *value = canonical;
    }
    Ok(())
}

/// How many records an import wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub tasks: usize,
    pub subtasks: usize,
}
