//! Domain-facing façade over the store
//!
//! The repository is what the filter engine, the ordering service and the
//! command handlers talk to. It adds validation, read-modify-write helpers,
//! statistics and the bulk export/import paths on top of the raw store.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::{AnjezError, Result, ValidationError};
use crate::model::{Priority, SubTask, Task, TaskDraft, TaskStatus};
use crate::statistics::{StatisticsStream, TaskStatistics};
use crate::store::{Store, SubTaskStream, TaskQuery, TaskStream};
use crate::transfer::{ExportBundle, ImportReport};

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<Store>,
}

impl TaskRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    // Tasks

    pub async fn insert_task(&self, task: Task) -> Result<()> {
        Ok(self.store.insert_task(task).await?)
    }

    /// Overwrite a task; fails with `NotFound` when it no longer exists
    pub async fn update_task(&self, task: Task) -> Result<()> {
        let id = task.id.clone();
        if self.store.update_task(task).await? {
            Ok(())
        } else {
            Err(AnjezError::NotFound(format!("Task '{}'", id)))
        }
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        if self.store.delete_task(id).await? {
            Ok(())
        } else {
            Err(AnjezError::NotFound(format!("Task '{}'", id)))
        }
    }

    pub async fn task(&self, id: &str) -> Option<Task> {
        self.store.task(id).await
    }

    /// Validate a draft and append the new task at the end of the list
    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task> {
        let mut task = draft.into_task()?;
        task.position = self.next_task_position().await;
        self.store.insert_task(task.clone()).await?;
        tracing::info!(id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    async fn next_task_position(&self) -> i32 {
        self.store
            .tasks(&TaskQuery::All)
            .await
            .last()
            .map_or(0, |t| t.position.saturating_add(1))
    }

    /// Advance a task's status through new → in progress → completed → new
    pub async fn toggle_task_status(&self, id: &str) -> Result<Task> {
        let mut task = self
            .store
            .task(id)
            .await
            .ok_or_else(|| AnjezError::NotFound(format!("Task '{}'", id)))?;
        task.status = task.status.toggled();
        self.update_task(task.clone()).await?;
        Ok(task)
    }

    // Read streams

    pub fn all_tasks(&self) -> TaskStream {
        self.store.watch_tasks(TaskQuery::All)
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> TaskStream {
        self.store.watch_tasks(TaskQuery::ByStatus(status))
    }

    pub fn tasks_by_priority(&self, priority: Priority) -> TaskStream {
        self.store.watch_tasks(TaskQuery::ByPriority(priority))
    }

    pub fn tasks_due_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> TaskStream {
        self.store
            .watch_tasks(TaskQuery::DueBetween { start, end })
    }

    pub fn search_tasks(&self, text: &str) -> TaskStream {
        self.store.watch_tasks(TaskQuery::search(text))
    }

    pub fn stream(&self, query: TaskQuery) -> TaskStream {
        self.store.watch_tasks(query)
    }

    /// One-shot evaluation of `query`
    pub async fn query(&self, query: &TaskQuery) -> Vec<Task> {
        self.store.tasks(query).await
    }

    // Statistics

    pub fn statistics(&self) -> StatisticsStream {
        StatisticsStream::new(self.all_tasks())
    }

    pub async fn current_statistics(&self) -> TaskStatistics {
        let tasks = self.store.tasks(&TaskQuery::All).await;
        TaskStatistics::from_tasks(&tasks, Utc::now())
    }

    // Ordering

    /// Persist `position = index` for each task, one write per element
    ///
    /// Not atomic: the first failing write aborts the batch and every earlier
    /// write stays committed.
    pub async fn update_task_positions(&self, ordered: &[Task]) -> Result<()> {
        for (index, task) in ordered.iter().enumerate() {
            let position = i32::try_from(index).unwrap_or(i32::MAX);
            self.store.update_task_position(&task.id, position).await?;
        }
        tracing::info!(count = ordered.len(), "task positions updated");
        Ok(())
    }

    pub async fn update_subtask_positions(&self, ordered: &[SubTask]) -> Result<()> {
        for (index, subtask) in ordered.iter().enumerate() {
            let position = i32::try_from(index).unwrap_or(i32::MAX);
            self.store
                .update_subtask_position(&subtask.id, position)
                .await?;
        }
        Ok(())
    }

    // Subtasks

    pub async fn insert_subtask(&self, subtask: SubTask) -> Result<()> {
        Ok(self.store.insert_subtask(subtask).await?)
    }

    pub async fn update_subtask(&self, subtask: SubTask) -> Result<()> {
        let id = subtask.id.clone();
        if self.store.update_subtask(subtask).await? {
            Ok(())
        } else {
            Err(AnjezError::NotFound(format!("Subtask '{}'", id)))
        }
    }

    pub async fn delete_subtask(&self, id: &str) -> Result<()> {
        if self.store.delete_subtask(id).await? {
            Ok(())
        } else {
            Err(AnjezError::NotFound(format!("Subtask '{}'", id)))
        }
    }

    pub async fn subtask(&self, id: &str) -> Option<SubTask> {
        self.store.subtask(id).await
    }

    /// Append a subtask to an existing task
    pub async fn create_subtask(&self, task_id: &str, title: &str) -> Result<SubTask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if self.store.task(task_id).await.is_none() {
            return Err(AnjezError::NotFound(format!("Task '{}'", task_id)));
        }

        let mut subtask = SubTask::new(task_id, title);
        subtask.position = self
            .store
            .subtasks_for(task_id)
            .await
            .last()
            .map_or(0, |s| s.position.saturating_add(1));
        self.store.insert_subtask(subtask.clone()).await?;
        Ok(subtask)
    }

    pub async fn toggle_subtask(&self, id: &str) -> Result<SubTask> {
        let mut subtask = self
            .store
            .subtask(id)
            .await
            .ok_or_else(|| AnjezError::NotFound(format!("Subtask '{}'", id)))?;
        subtask.is_completed = !subtask.is_completed;
        self.update_subtask(subtask.clone()).await?;
        Ok(subtask)
    }

    pub fn subtasks(&self, task_id: &str) -> SubTaskStream {
        self.store.watch_subtasks(task_id)
    }

    pub async fn subtasks_for(&self, task_id: &str) -> Vec<SubTask> {
        self.store.subtasks_for(task_id).await
    }

    /// `(completed, total)` for a task's subtasks
    pub async fn subtask_progress(&self, task_id: &str) -> (usize, usize) {
        let total = self.store.count_subtasks(task_id).await;
        let completed = self.store.count_completed_subtasks(task_id).await;
        (completed, total)
    }

    // Export / import

    /// Every current row, read through the one-shot path
    pub async fn export_snapshot(&self) -> ExportBundle {
        let (tasks, subtasks) = self.store.snapshot().await;
        ExportBundle::new(tasks, subtasks)
    }

    /// Insert-or-replace each record in turn, tasks first
    ///
    /// Not atomic: a failure leaves the records written before it in place.
    pub async fn import_bundle(&self, bundle: ExportBundle) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        for task in bundle.tasks {
            self.store.insert_task(task).await?;
            report.tasks += 1;
        }
        for subtask in bundle.subtasks {
            self.store.insert_subtask(subtask).await?;
            report.subtasks += 1;
        }
        tracing::info!(
            tasks = report.tasks,
            subtasks = report.subtasks,
            "import finished"
        );
        Ok(report)
    }
}
