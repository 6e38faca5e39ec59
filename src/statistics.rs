use chrono::{DateTime, Utc};

use crate::model::{Task, TaskStatus};
use crate::store::TaskStream;

/// Aggregate counts over the whole task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
}

impl TaskStatistics {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            in_progress: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::InProgress)
                .count(),
            overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    /// Completed share in whole percent, rounded down; 0 for an empty list
    pub fn progress_percentage(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// Statistics recomputed on every emission of the all-tasks stream
pub struct StatisticsStream {
    tasks: TaskStream,
}

impl StatisticsStream {
    pub(crate) fn new(tasks: TaskStream) -> Self {
        Self { tasks }
    }

    pub async fn next(&mut self) -> Option<TaskStatistics> {
        let tasks = self.tasks.next().await?;
        Some(TaskStatistics::from_tasks(&tasks, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn stats(total: usize, completed: usize) -> TaskStatistics {
        TaskStatistics {
            total,
            completed,
            ..Default::default()
        }
    }

    #[test]
    fn test_progress_percentage() {
        assert_eq!(stats(0, 0).progress_percentage(), 0);
        assert_eq!(stats(0, 5).progress_percentage(), 0);
        assert_eq!(stats(4, 1).progress_percentage(), 25);
        assert_eq!(stats(3, 1).progress_percentage(), 33);
        assert_eq!(stats(3, 2).progress_percentage(), 66);
        assert_eq!(stats(2, 2).progress_percentage(), 100);
    }

    #[test]
    fn test_from_tasks() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        let tasks = vec![
            Task {
                status: TaskStatus::Completed,
                due_date: past,
                ..Default::default()
            },
            Task {
                status: TaskStatus::InProgress,
                due_date: past,
                ..Default::default()
            },
            Task {
                status: TaskStatus::New,
                ..Default::default()
            },
        ];
        let s = TaskStatistics::from_tasks(&tasks, now);
        assert_eq!(s.total, 3);
        assert_eq!(s.completed, 1);
        assert_eq!(s.in_progress, 1);
        assert_eq!(s.overdue, 1);
        assert_eq!(s.progress_percentage(), 33);
    }
}
