//! Drag-and-drop reorder tools

use mcp_attr::{Result as McpResult, bail_public};

use crate::validation;
use crate::{AnjezServerHandler, fail};

impl AnjezServerHandler {
    pub async fn handle_reorder_tasks(&self, ids: Vec<String>) -> McpResult<String> {
        if ids.is_empty() {
            bail_public!(_, "No IDs provided. Pass the task IDs in their new order.");
        }
        let ids: Vec<String> = ids.iter().map(|id| validation::normalize_id(id)).collect();

        let ordering = self.ordering().await?;
        let ordered = ordering.reorder_ids(&ids).await.or_else(fail)?;

        let mut result = format!("Reordered {} task(s):\n", ordered.len());
        for (position, task) in ordered.iter().enumerate() {
            result.push_str(&format!("{}. {} ({})\n", position, task.title, task.id));
        }
        Ok(result)
    }

    pub async fn handle_reorder_subtasks(
        &self,
        task_id: String,
        ids: Vec<String>,
    ) -> McpResult<String> {
        let task_id = validation::normalize_id(&task_id);
        let ids: Vec<String> = ids.iter().map(|id| validation::normalize_id(id)).collect();

        let ordering = self.ordering().await?;
        let ordered = ordering
            .reorder_subtasks(&task_id, &ids)
            .await
            .or_else(fail)?;
        Ok(format!(
            "Reordered {} subtask(s) of task {}",
            ordered.len(),
            task_id
        ))
    }
}
