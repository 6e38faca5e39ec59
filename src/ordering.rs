//! Drag-and-drop reordering
//!
//! A drag always happens on the list the user is looking at, which may be a
//! filtered subset. [`ReorderScope`] decides how that subset's new order is
//! written back to the full task list.

use std::collections::HashSet;

use crate::error::{AnjezError, Result};
use crate::model::{SubTask, Task};
use crate::repository::TaskRepository;
use crate::store::TaskQuery;

/// How a reorder of the visible list is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReorderScope {
    /// Visible tasks take over the slots they already held in the full list,
    /// then every task is renumbered contiguously. Hidden tasks keep their
    /// relative places.
    #[default]
    FullSet,
    /// Only the visible tasks are renumbered, by their index in the visible
    /// list. Hidden tasks keep whatever positions they had, which may now
    /// collide with the visible ones.
    VisibleOnly,
}

/// Move one element the way a single drag step does
///
/// Returns `false` and leaves the list untouched when either index is out of
/// range.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || to >= list.len() {
        return false;
    }
    let item = list.remove(from);
    list.insert(to, item);
    true
}

/// Place `visible` (in its new order) into the slots its members occupy in
/// `full`, leaving every other task where it was
///
/// Tasks in `visible` that are not in `full` are ignored, as are repeated ids.
pub fn merge_visible_order(full: &[Task], visible: &[Task]) -> Vec<Task> {
    let present: HashSet<&str> = full.iter().map(|t| t.id.as_str()).collect();
    let mut moved: HashSet<&str> = HashSet::new();
    let reordered: Vec<&Task> = visible
        .iter()
        .filter(|t| present.contains(t.id.as_str()) && moved.insert(t.id.as_str()))
        .collect();

    let mut next = reordered.into_iter();
    full.iter()
        .map(|task| {
            if moved.contains(task.id.as_str()) {
                // One slot per distinct visible task, so `next` never runs dry
                next.next().unwrap_or(task).clone()
            } else {
                task.clone()
            }
        })
        .collect()
}

pub struct OrderingService {
    repo: TaskRepository,
    scope: ReorderScope,
}

impl OrderingService {
    pub fn new(repo: TaskRepository, scope: ReorderScope) -> Self {
        Self { repo, scope }
    }

    pub fn scope(&self) -> ReorderScope {
        self.scope
    }

    /// Persist the order of `visible` after a drag; returns the list whose
    /// indices became the new positions
    pub async fn reorder(&self, visible: &[Task]) -> Result<Vec<Task>> {
        let ordered = match self.scope {
            ReorderScope::VisibleOnly => visible.to_vec(),
            ReorderScope::FullSet => {
                let full = self.repo.query(&TaskQuery::All).await;
                merge_visible_order(&full, visible)
            }
        };
        self.repo.update_task_positions(&ordered).await?;
        Ok(ordered)
    }

    /// [`OrderingService::reorder`] for a list of task ids
    pub async fn reorder_ids(&self, ids: &[String]) -> Result<Vec<Task>> {
        let mut visible = Vec::with_capacity(ids.len());
        for id in ids {
            let task = self
                .repo
                .task(id)
                .await
                .ok_or_else(|| AnjezError::NotFound(format!("Task '{}'", id)))?;
            visible.push(task);
        }
        self.reorder(&visible).await
    }

    /// Renumber a task's subtasks in the given order
    ///
    /// Subtasks of the task that are missing from `ids` keep their relative
    /// order after the listed ones.
    pub async fn reorder_subtasks(&self, task_id: &str, ids: &[String]) -> Result<Vec<SubTask>> {
        let current = self.repo.subtasks_for(task_id).await;
        let mut ordered: Vec<SubTask> = Vec::with_capacity(current.len());
        for id in ids {
            let subtask = current
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| {
                    AnjezError::NotFound(format!("Subtask '{}' of task '{}'", id, task_id))
                })?;
            if !ordered.iter().any(|s| s.id == subtask.id) {
                ordered.push(subtask.clone());
            }
        }
        for subtask in current {
            if !ordered.iter().any(|s| s.id == subtask.id) {
                ordered.push(subtask);
            }
        }
        self.repo.update_subtask_positions(&ordered).await?;
        Ok(ordered)
    }
}
