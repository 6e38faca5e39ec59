//! Create, edit, toggle and delete tasks

use chrono::Utc;
use mcp_attr::{Result as McpResult, bail_public};

use crate::formatting;
use crate::model::TaskDraft;
use crate::validation;
use crate::{AnjezServerHandler, fail, invalid};

impl AnjezServerHandler {
    pub async fn handle_add_task(
        &self,
        title: String,
        description: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
    ) -> McpResult<String> {
        let mut draft = TaskDraft::new(title).description(description.unwrap_or_default());
        if let Some(ref p) = priority {
            draft = draft.priority(validation::parse_priority(p).or_else(invalid)?);
        }
        if let Some(ref d) = due_date
            && let Some(due) = validation::parse_optional_due_date(d).or_else(invalid)?
        {
            draft = draft.due(due);
        }

        let repo = self.repository().await?;
        let task = repo.create_task(draft).await.or_else(fail)?;
        Ok(format!(
            "Task created with ID: {}\n{}",
            task.id,
            formatting::format_task(&task, self.config.locale, Utc::now())
        ))
    }

    pub async fn handle_edit_task(
        &self,
        id: String,
        title: Option<String>,
        description: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
        status: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        // Parse everything before touching the store
        let title = title
            .map(|t| validation::validate_title(&t))
            .transpose()
            .or_else(invalid)?;
        let priority = priority
            .map(|p| validation::parse_priority(&p))
            .transpose()
            .or_else(invalid)?;
        let due_date = due_date
            .map(|d| validation::parse_optional_due_date(&d))
            .transpose()
            .or_else(invalid)?;
        let status = status
            .map(|s| validation::parse_status(&s))
            .transpose()
            .or_else(invalid)?;

        let repo = self.repository().await?;
        let Some(mut task) = repo.task(&id).await else {
            bail_public!(_, "Task '{}' not found", id);
        };

        let mut changes = Vec::new();
        if let Some(title) = title {
            task.title = title;
            changes.push("title");
        }
        if let Some(description) = description {
            task.description = description.trim().to_string();
            changes.push("description");
        }
        if let Some(priority) = priority {
            task.priority = priority;
            changes.push("priority");
        }
        if let Some(due_date) = due_date {
            task.due_date = due_date;
            changes.push("due date");
        }
        if let Some(status) = status {
            task.status = status;
            changes.push("status");
        }

        if changes.is_empty() {
            return Ok(format!("No changes for task {}", id));
        }

        repo.update_task(task.clone()).await.or_else(fail)?;
        Ok(format!(
            "Task {} updated ({})\n{}",
            id,
            changes.join(", "),
            formatting::format_task(&task, self.config.locale, Utc::now())
        ))
    }

    pub async fn handle_toggle_status(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let repo = self.repository().await?;
        let task = repo.toggle_task_status(&id).await.or_else(fail)?;
        Ok(format!(
            "Task {} is now {}",
            id,
            crate::labels::status_label(task.status, self.config.locale)
        ))
    }

    pub async fn handle_delete_task(&self, id: String, confirm: bool) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let repo = self.repository().await?;
        let Some(task) = repo.task(&id).await else {
            bail_public!(_, "Task '{}' not found", id);
        };

        if !confirm {
            return Ok(format!(
                "Delete '{}' and its subtasks? Call delete_task again with confirm=true.",
                task.title
            ));
        }

        repo.delete_task(&id).await.or_else(fail)?;
        Ok(format!("Deleted task '{}'", task.title))
    }
}
