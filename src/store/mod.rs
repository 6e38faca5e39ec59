//! Persistence store for tasks and subtasks
//!
//! The store owns both tables behind an async mutex, persists the whole
//! document through [`Storage`] after every mutation and publishes a revision
//! number per table on a `watch` channel. Read streams subscribe to those
//! revisions and re-run their query on each change.
//!
//! - `tables`: the serialized document
//! - `query`: predicates answered by the store
//! - `stream`: cold-to-warm read streams
//! - `cell`: single-instance initialization

mod cell;
mod query;
mod stream;
mod tables;

pub use cell::StoreCell;
pub use query::TaskQuery;
pub use stream::{SubTaskStream, TaskStream};
pub use tables::{FORMAT_VERSION, Tables};

use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::error::StoreResult;
use crate::model::{SubTask, Task, TaskStatus};
use crate::storage::Storage;

/// Which tables a write touched
#[derive(Debug, Clone, Copy)]
struct Touched {
    tasks: bool,
    subtasks: bool,
}

const TASKS: Touched = Touched {
    tasks: true,
    subtasks: false,
};
const SUBTASKS: Touched = Touched {
    tasks: false,
    subtasks: true,
};
const BOTH: Touched = Touched {
    tasks: true,
    subtasks: true,
};

pub struct Store {
    tables: Mutex<Tables>,
    storage: Storage,
    tasks_rev: watch::Sender<u64>,
    subtasks_rev: watch::Sender<u64>,
}

impl Store {
    /// Load the tables from `storage` and start publishing revisions
    pub async fn open(storage: Storage) -> StoreResult<Self> {
        let tables = storage.load().await?;
        Ok(Self::with_tables(storage, tables))
    }

    /// An empty, memory-only store
    pub fn in_memory() -> Self {
        Self::with_tables(Storage::memory(), Tables::default())
    }

    fn with_tables(storage: Storage, tables: Tables) -> Self {
        let (tasks_rev, _) = watch::channel(0);
        let (subtasks_rev, _) = watch::channel(0);
        Self {
            tables: Mutex::new(tables),
            storage,
            tasks_rev,
            subtasks_rev,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Apply `mutate` to a copy of the tables and commit it only if the save
    /// succeeds. `mutate` reports whether anything changed; unchanged writes
    /// are neither saved nor announced.
    async fn write<R>(
        &self,
        message: &str,
        touched: Touched,
        mutate: impl FnOnce(&mut Tables) -> (R, bool),
    ) -> StoreResult<R> {
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let (result, changed) = mutate(&mut next);
        if !changed {
            return Ok(result);
        }

        if let Err(e) = self.storage.save(&next, message).await {
            tracing::warn!(error = %e, message, "failed to persist write");
            return Err(e);
        }
        *tables = next;
        drop(tables);

        tracing::debug!(message, "store write committed");
        if touched.tasks {
            self.tasks_rev.send_modify(|rev| *rev += 1);
        }
        if touched.subtasks {
            self.subtasks_rev.send_modify(|rev| *rev += 1);
        }
        Ok(result)
    }

    // Tasks

    /// Insert a task, replacing any task with the same id in place
    pub async fn insert_task(&self, task: Task) -> StoreResult<()> {
        let message = format!("Save task {}", task.title);
        self.write(&message, TASKS, |t| {
            match t.task_index(&task.id) {
                Some(i) => t.tasks[i] = task,
                None => t.tasks.push(task),
            }
            ((), true)
        })
        .await
    }

    /// Overwrite an existing task; returns `false` when no task has that id
    pub async fn update_task(&self, task: Task) -> StoreResult<bool> {
        let message = format!("Update task {}", task.title);
        self.write(&message, TASKS, |t| match t.task_index(&task.id) {
            Some(i) => {
                let changed = t.tasks[i] != task;
                t.tasks[i] = task;
                (true, changed)
            }
            None => (false, false),
        })
        .await
    }

    /// Delete a task and every subtask that belongs to it
    pub async fn delete_task(&self, id: &str) -> StoreResult<bool> {
        let message = format!("Delete task {}", id);
        self.write(&message, BOTH, |t| match t.task_index(id) {
            Some(i) => {
                t.tasks.remove(i);
                t.subtasks.retain(|s| s.task_id != id);
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    /// Delete every task (and therefore every subtask)
    pub async fn delete_all_tasks(&self) -> StoreResult<usize> {
        self.write("Delete all tasks", BOTH, |t| {
            let count = t.tasks.len();
            let changed = count > 0 || !t.subtasks.is_empty();
            t.tasks.clear();
            t.subtasks.clear();
            (count, changed)
        })
        .await
    }

    /// Point lookup; a miss is `None`, never an error
    pub async fn task(&self, id: &str) -> Option<Task> {
        let tables = self.tables.lock().await;
        tables.task_index(id).map(|i| tables.tasks[i].clone())
    }

    /// Run a query against the current tables
    pub async fn tasks(&self, query: &TaskQuery) -> Vec<Task> {
        let tables = self.tables.lock().await;
        query.run(&tables.tasks)
    }

    pub async fn count_tasks(&self) -> usize {
        self.tables.lock().await.tasks.len()
    }

    pub async fn count_completed(&self) -> usize {
        self.tables
            .lock()
            .await
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    /// Set a single task's position; returns `false` when the id is unknown
    pub async fn update_task_position(&self, id: &str, position: i32) -> StoreResult<bool> {
        let message = format!("Move task {} to {}", id, position);
        self.write(&message, TASKS, |t| match t.task_index(id) {
            Some(i) => {
                let changed = t.tasks[i].position != position;
                t.tasks[i].position = position;
                (true, changed)
            }
            None => (false, false),
        })
        .await
    }

    // Subtasks

    pub async fn insert_subtask(&self, subtask: SubTask) -> StoreResult<()> {
        let message = format!("Save subtask {}", subtask.title);
        self.write(&message, SUBTASKS, |t| {
            match t.subtask_index(&subtask.id) {
                Some(i) => t.subtasks[i] = subtask,
                None => t.subtasks.push(subtask),
            }
            ((), true)
        })
        .await
    }

    pub async fn update_subtask(&self, subtask: SubTask) -> StoreResult<bool> {
        let message = format!("Update subtask {}", subtask.title);
        self.write(&message, SUBTASKS, |t| match t.subtask_index(&subtask.id) {
            Some(i) => {
                let changed = t.subtasks[i] != subtask;
                t.subtasks[i] = subtask;
                (true, changed)
            }
            None => (false, false),
        })
        .await
    }

    pub async fn delete_subtask(&self, id: &str) -> StoreResult<bool> {
        let message = format!("Delete subtask {}", id);
        self.write(&message, SUBTASKS, |t| match t.subtask_index(id) {
            Some(i) => {
                t.subtasks.remove(i);
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    pub async fn delete_subtasks_for(&self, task_id: &str) -> StoreResult<usize> {
        let message = format!("Delete subtasks of {}", task_id);
        self.write(&message, SUBTASKS, |t| {
            let before = t.subtasks.len();
            t.subtasks.retain(|s| s.task_id != task_id);
            let removed = before - t.subtasks.len();
            (removed, removed > 0)
        })
        .await
    }

    pub async fn subtask(&self, id: &str) -> Option<SubTask> {
        let tables = self.tables.lock().await;
        tables.subtask_index(id).map(|i| tables.subtasks[i].clone())
    }

    /// Subtasks of one task ordered by position
    pub async fn subtasks_for(&self, task_id: &str) -> Vec<SubTask> {
        let tables = self.tables.lock().await;
        let mut subtasks: Vec<SubTask> = tables
            .subtasks
            .iter()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect();
        subtasks.sort_by_key(|s| s.position);
        subtasks
    }

    pub async fn count_subtasks(&self, task_id: &str) -> usize {
        self.tables
            .lock()
            .await
            .subtasks
            .iter()
            .filter(|s| s.task_id == task_id)
            .count()
    }

    pub async fn count_completed_subtasks(&self, task_id: &str) -> usize {
        self.tables
            .lock()
            .await
            .subtasks
            .iter()
            .filter(|s| s.task_id == task_id && s.is_completed)
            .count()
    }

    pub async fn update_subtask_position(&self, id: &str, position: i32) -> StoreResult<bool> {
        let message = format!("Move subtask {} to {}", id, position);
        self.write(&message, SUBTASKS, |t| match t.subtask_index(id) {
            Some(i) => {
                let changed = t.subtasks[i].position != position;
                t.subtasks[i].position = position;
                (true, changed)
            }
            None => (false, false),
        })
        .await
    }

    // One-shot reads and subscriptions

    /// Every row as of now, tasks and subtasks ordered by position
    ///
    /// This is the read path for bulk export; it never goes through a
    /// subscription.
    pub async fn snapshot(&self) -> (Vec<Task>, Vec<SubTask>) {
        let tables = self.tables.lock().await;
        let tasks = TaskQuery::All.run(&tables.tasks);
        let mut subtasks = tables.subtasks.clone();
        subtasks.sort_by_key(|s| s.position);
        (tasks, subtasks)
    }

    pub(crate) fn subscribe_tasks(&self) -> watch::Receiver<u64> {
        self.tasks_rev.subscribe()
    }

    pub(crate) fn subscribe_subtasks(&self) -> watch::Receiver<u64> {
        self.subtasks_rev.subscribe()
    }

    /// Stream of `query` results, re-emitted after every task write
    pub fn watch_tasks(self: &Arc<Self>, query: TaskQuery) -> TaskStream {
        TaskStream::new(self, query)
    }

    /// Stream of one task's subtasks, re-emitted after every subtask write
    pub fn watch_subtasks(self: &Arc<Self>, task_id: impl Into<String>) -> SubTaskStream {
        SubTaskStream::new(self, task_id.into())
    }
}
