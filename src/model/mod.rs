//! Domain model for tasks and subtasks
//!
//! - `task`: the `Task` record with its priority, status and overdue rule
//! - `subtask`: checklist items scoped to one task

mod subtask;
mod task;

pub use subtask::SubTask;
pub use task::{Priority, Task, TaskDraft, TaskStatus};
