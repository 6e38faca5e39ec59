//! Subtask checklist tools

use mcp_attr::{Result as McpResult, bail_public};

use crate::formatting;
use crate::validation;
use crate::{AnjezServerHandler, fail};

impl AnjezServerHandler {
    pub async fn handle_add_subtask(&self, task_id: String, title: String) -> McpResult<String> {
        let task_id = validation::normalize_id(&task_id);
        let repo = self.repository().await?;
        let subtask = repo.create_subtask(&task_id, &title).await.or_else(fail)?;
        Ok(format!(
            "Subtask created with ID: {} (task: {})",
            subtask.id, task_id
        ))
    }

    pub async fn handle_toggle_subtask(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let repo = self.repository().await?;
        let subtask = repo.toggle_subtask(&id).await.or_else(fail)?;
        let (completed, total) = repo.subtask_progress(&subtask.task_id).await;
        Ok(format!(
            "Subtask '{}' marked {} ({}/{} done)",
            subtask.title,
            if subtask.is_completed { "done" } else { "not done" },
            completed,
            total
        ))
    }

    pub async fn handle_delete_subtask(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let repo = self.repository().await?;
        let Some(subtask) = repo.subtask(&id).await else {
            bail_public!(_, "Subtask '{}' not found", id);
        };
        repo.delete_subtask(&id).await.or_else(fail)?;
        Ok(format!("Deleted subtask '{}'", subtask.title))
    }

    pub async fn handle_list_subtasks(&self, task_id: String) -> McpResult<String> {
        let task_id = validation::normalize_id(&task_id);
        let repo = self.repository().await?;
        let Some(task) = repo.task(&task_id).await else {
            bail_public!(_, "Task '{}' not found", task_id);
        };
        let subtasks = repo.subtasks_for(&task_id).await;
        Ok(format!(
            "{}\n{}",
            task.title,
            formatting::format_subtasks(&subtasks)
        ))
    }
}
