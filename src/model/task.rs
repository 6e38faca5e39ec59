use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Task priority
///
/// Serialized in upper case (`HIGH`, `MEDIUM`, `LOW`) to keep data files
/// readable and stable across versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Parse a priority, falling back to `Medium` for anything unrecognised.
    ///
    /// Used by [`crate::transfer::ExportBundle::from_toml`] so one foreign
    /// value does not reject a whole import.
    pub fn from_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    New,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::New,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Next status in the toggle cycle: new → in progress → completed → new.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::New => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::New,
        }
    }

    /// Parse a status, falling back to `New` for anything unrecognised.
    pub fn from_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(TaskStatus::New),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ValidationError::InvalidStatus(s.to_string())),
        }
    }
}

/// A user-tracked unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Opaque unique identifier, generated at creation
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Optional deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    /// Sort key among all tasks; not guaranteed unique or gap-free
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            status: TaskStatus::default(),
            position: 0,
            created_at: Utc::now(),
        }
    }
}

impl Task {
    /// Create a new task with a fresh id and creation time
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            due_date,
            ..Default::default()
        }
    }

    /// A task is overdue when it has a due date strictly before `now` and is
    /// not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Case-insensitive substring match over title and description.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// User input for a new task, validated before it becomes a [`Task`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Trim the text fields and reject an empty title.
    pub fn into_task(self) -> Result<Task, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Task::new(
            title,
            self.description.trim(),
            self.priority,
            self.due_date,
        ))
    }
}
