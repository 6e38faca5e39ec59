//! File persistence for the task tables
//!
//! The whole document is rewritten on every save: serialized to a sibling
//! temporary file first, then renamed over the data file so a crash never
//! leaves a half-written document behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::git_ops::GitJournal;
use crate::store::Tables;

/// Where the tables live
///
/// A storage without a path keeps everything in memory, which is what the
/// unit tests use.
#[derive(Clone)]
pub struct Storage {
    file_path: Option<PathBuf>,
    journal: Option<Arc<GitJournal>>,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let journal = if sync_git {
            let journal = GitJournal::discover(&file_path).map(Arc::new);
            if journal.is_none() {
                tracing::warn!(
                    path = %file_path.display(),
                    "git journaling requested but the data file is not inside a git work tree"
                );
            }
            journal
        } else {
            None
        };
        Self {
            file_path: Some(file_path),
            journal,
        }
    }

    pub fn memory() -> Self {
        Self {
            file_path: None,
            journal: None,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_journaled(&self) -> bool {
        self.journal.is_some()
    }

    /// Load the tables; a missing file yields empty tables
    pub async fn load(&self) -> StoreResult<Tables> {
        let Some(path) = &self.file_path else {
            return Ok(Tables::default());
        };
        if !tokio::fs::try_exists(path).await? {
            tracing::info!(path = %path.display(), "data file not found, starting empty");
            return Ok(Tables::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let tables: Tables = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            tasks = tables.tasks.len(),
            subtasks = tables.subtasks.len(),
            "loaded data file"
        );
        Ok(tables)
    }

    /// Write the tables and, when journaling, commit them with `message`
    ///
    /// The rename is the durable step. Once it succeeds the save succeeds;
    /// a failed journal commit is logged and the next commit picks the file
    /// up again.
    pub async fn save(&self, tables: &Tables, message: &str) -> StoreResult<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let content = toml::to_string_pretty(tables)?;
        write_atomically(path, content.as_bytes()).await?;

        if let Some(journal) = &self.journal
            && let Err(e) = self.journal_commit(journal, path, message).await
        {
            tracing::warn!(path = %path.display(), error = %e, "journal commit failed");
        }
        Ok(())
    }

    async fn journal_commit(
        &self,
        journal: &Arc<GitJournal>,
        path: &Path,
        message: &str,
    ) -> StoreResult<()> {
        let journal = Arc::clone(journal);
        let path = path.to_path_buf();
        let message = message.to_string();
        tokio::task::spawn_blocking(move || journal.commit(&path, &message))
            .await?
            .map_err(|e| StoreError::Git(format!("{:#}", e)))
    }
}

/// Temp file + rename, creating parent directories as needed
pub(crate) async fn write_atomically(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, SubTask, Task};
    use crate::store::Store;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("tasks.toml"), false);
        let tables = storage.load().await.unwrap();
        assert!(tables.tasks.is_empty());
        assert!(tables.subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tasks.toml");
        let storage = Storage::new(&path, false);

        let task = Task {
            title: "Write report".to_string(),
            ..Default::default()
        };
        let subtask = SubTask::new(task.id.clone(), "Outline");
        let tables = Tables {
            tasks: vec![task.clone()],
            subtasks: vec![subtask.clone()],
            ..Default::default()
        };
        storage.save(&tables, "test").await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.tasks, vec![task]);
        assert_eq!(loaded.subtasks, vec![subtask]);
        assert!(!dir.path().join("nested").join("tasks.toml.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.toml");
        std::fs::write(&path, "tasks = \"not a table\"").unwrap();

        let storage = Storage::new(&path, false);
        assert!(matches!(
            storage.load().await,
            Err(StoreError::Deserialize(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_journal_commit_keeps_disk_and_memory_in_step() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        let path = dir.path().join("tasks.toml");

        let storage = Storage::new(&path, true);
        assert!(storage.is_journaled());
        let store = Store::open(storage).await.unwrap();
        store.insert_task(Task::new("A", "", Priority::Medium, None)).await.unwrap();

        // A stale lock makes every commit fail
        std::fs::write(dir.path().join(".git").join("index.lock"), "").unwrap();
        store.insert_task(Task::new("B", "", Priority::Medium, None)).await.unwrap();
        assert_eq!(store.count_tasks().await, 2);

        let reopened = Store::open(Storage::new(&path, false)).await.unwrap();
        assert_eq!(reopened.count_tasks().await, 2);
    }

    #[tokio::test]
    async fn test_memory_storage_never_touches_disk() {
        let storage = Storage::memory();
        assert!(storage.file_path().is_none());
        storage.save(&Tables::default(), "noop").await.unwrap();
        assert!(storage.load().await.unwrap().tasks.is_empty());
    }
}
