//! Text rendering of tasks, subtasks and statistics for command output

use chrono::{DateTime, Local, Utc};

use crate::labels::{self, Locale};
use crate::model::{SubTask, Task, TaskStatus};
use crate::statistics::TaskStatistics;

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::New => "[ ]",
        TaskStatus::InProgress => "[~]",
        TaskStatus::Completed => "[x]",
    }
}

/// One block per task, in the given order
pub fn format_tasks(tasks: &[Task], locale: Locale, now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return "No tasks found".to_string();
    }

    let mut result = format!("Found {} task(s):\n\n", tasks.len());
    for task in tasks {
        result.push_str(&format!(
            "{} {} (id: {}, priority: {}, status: {})\n",
            status_marker(task.status),
            task.title,
            task.id,
            labels::priority_label(task.priority, locale),
            labels::status_label(task.status, locale),
        ));
        if !task.description.is_empty() {
            result.push_str(&format!("  Description: {}\n", task.description));
        }
        if let Some(ref due) = task.due_date {
            result.push_str(&format!("  Due: {}", format_timestamp(due)));
            if task.is_overdue(now) {
                result.push_str(" (overdue)");
            }
            result.push('\n');
        }
        result.push_str(&format!("  Position: {}\n", task.position));
        result.push_str(&format!("  Created: {}\n", format_timestamp(&task.created_at)));
    }
    result
}

pub fn format_task(task: &Task, locale: Locale, now: DateTime<Utc>) -> String {
    format_tasks(std::slice::from_ref(task), locale, now)
        .trim_start_matches("Found 1 task(s):\n\n")
        .to_string()
}

pub fn format_subtasks(subtasks: &[SubTask]) -> String {
    if subtasks.is_empty() {
        return "No subtasks".to_string();
    }
    let done = subtasks.iter().filter(|s| s.is_completed).count();
    let mut result = format!("Subtasks ({}/{} done):\n", done, subtasks.len());
    for subtask in subtasks {
        result.push_str(&format!(
            "- [{}] {} (id: {})\n",
            if subtask.is_completed { "x" } else { " " },
            subtask.title,
            subtask.id
        ));
    }
    result
}

pub fn format_statistics(stats: &TaskStatistics) -> String {
    format!(
        "Total: {}\nCompleted: {}\nIn progress: {}\nOverdue: {}\nProgress: {}%\n",
        stats.total,
        stats.completed,
        stats.in_progress,
        stats.overdue,
        stats.progress_percentage()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::Duration;

    #[test]
    fn test_empty_list() {
        assert_eq!(format_tasks(&[], Locale::English, Utc::now()), "No tasks found");
        assert_eq!(format_subtasks(&[]), "No subtasks");
    }

    #[test]
    fn test_overdue_marker() {
        let now = Utc::now();
        let task = Task::new(
            "Pay rent",
            "before the 5th",
            Priority::High,
            Some(now - Duration::days(1)),
        );
        let text = format_tasks(&[task], Locale::English, now);
        assert!(text.starts_with("Found 1 task(s)"));
        assert!(text.contains("[ ] Pay rent"));
        assert!(text.contains("priority: High"));
        assert!(text.contains("(overdue)"));
        assert!(text.contains("Description: before the 5th"));
    }

    #[test]
    fn test_arabic_labels_in_output() {
        let task = Task::new("t", "", Priority::Low, None);
        let text = format_task(&task, Locale::Arabic, Utc::now());
        assert!(text.contains("منخفضة"));
        assert!(!text.starts_with("Found"));
    }

    #[test]
    fn test_statistics() {
        let stats = TaskStatistics {
            total: 4,
            completed: 1,
            in_progress: 2,
            overdue: 1,
        };
        let text = format_statistics(&stats);
        assert!(text.contains("Total: 4"));
        assert!(text.contains("Progress: 25%"));
    }
}
