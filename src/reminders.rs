//! Reminder delivery
//!
//! The core only hands `(title, description)` to a [`ReminderNotifier`].
//! Delivery is best effort: failures are logged and never reach the caller
//! as errors.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::model::{Task, TaskStatus};

pub trait ReminderNotifier: Send + Sync {
    fn notify(&self, title: &str, description: &str) -> anyhow::Result<()>;
}

/// Emits reminders as log events
pub struct TracingNotifier;

impl ReminderNotifier for TracingNotifier {
    fn notify(&self, title: &str, description: &str) -> anyhow::Result<()> {
        tracing::info!(target: "anjez::reminder", title, description, "reminder");
        Ok(())
    }
}

#[derive(Clone)]
pub struct Reminders {
    notifier: Arc<dyn ReminderNotifier>,
}

impl Reminders {
    pub fn new(notifier: Arc<dyn ReminderNotifier>) -> Self {
        Self { notifier }
    }

    /// Send a reminder for one task; `true` if the notifier accepted it
    pub fn remind(&self, task: &Task) -> bool {
        match self.notifier.notify(&task.title, &task.description) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(id = %task.id, error = %e, "reminder delivery failed");
                false
            }
        }
    }

    /// Remind about every open task due within `window` from `now`
    ///
    /// Already overdue tasks are included. Returns how many reminders were
    /// delivered.
    pub fn notify_due(&self, tasks: &[Task], now: DateTime<Utc>, window: Duration) -> usize {
        let horizon = now + window;
        tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .filter(|t| t.due_date.is_some_and(|due| due <= horizon))
            .filter(|t| self.remind(t))
            .count()
    }
}
