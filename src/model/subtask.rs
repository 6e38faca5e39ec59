use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A checklist item scoped to one task
///
/// `task_id` integrity is kept by cascade delete in the store; inserting a
/// subtask for an unknown task is not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubTask {
    pub id: String,
    /// Owning task
    pub task_id: String,
    pub title: String,
    pub is_completed: bool,
    /// Order within the parent task's list
    pub position: i32,
}

impl Default for SubTask {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: String::new(),
            title: String::new(),
            is_completed: false,
            position: 0,
        }
    }
}

impl SubTask {
    pub fn new(task_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}
