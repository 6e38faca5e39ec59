use chrono::{DateTime, Utc};

use crate::model::{Priority, Task, TaskStatus};

/// Predicates the store can answer directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskQuery {
    All,
    ByStatus(TaskStatus),
    ByPriority(Priority),
    /// Due date within `[start, end]`; tasks without a due date never match
    DueBetween {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Case-insensitive substring over title or description
    Search(String),
}

impl TaskQuery {
    pub fn search(text: impl Into<String>) -> Self {
        TaskQuery::Search(text.into())
    }

    fn matcher(&self) -> impl Fn(&Task) -> bool + '_ {
        let needle = match self {
            TaskQuery::Search(text) => text.to_lowercase(),
            _ => String::new(),
        };
        move |task: &Task| match self {
            TaskQuery::All => true,
            TaskQuery::ByStatus(status) => task.status == *status,
            TaskQuery::ByPriority(priority) => task.priority == *priority,
            TaskQuery::DueBetween { start, end } => task
                .due_date
                .is_some_and(|due| *start <= due && due <= *end),
            TaskQuery::Search(_) => task.matches_text(&needle),
        }
    }

    /// Matching tasks ordered by position; equal positions keep table order
    pub fn run(&self, tasks: &[Task]) -> Vec<Task> {
        let matches = self.matcher();
        let mut result: Vec<Task> = tasks.iter().filter(|t| matches(*t)).cloned().collect();
        result.sort_by_key(|t| t.position);
        result
    }
}
