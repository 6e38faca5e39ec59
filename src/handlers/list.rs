//! Filtered listing and statistics

use chrono::Utc;
use mcp_attr::Result as McpResult;

use crate::formatting;
use crate::labels;
use crate::validation;
use crate::{AnjezServerHandler, invalid};

impl AnjezServerHandler {
    /// Update the remembered selection (last one wins) and list its tasks
    pub async fn handle_list_tasks(
        &self,
        filter: Option<String>,
        search: Option<String>,
    ) -> McpResult<String> {
        let filter = filter
            .map(|f| validation::parse_filter(&f))
            .transpose()
            .or_else(invalid)?;

        let engine = self.filter_engine().await?;
        if let Some(filter) = filter {
            engine.set_filter(filter);
        }
        if let Some(search) = search {
            engine.set_query(search);
        }

        let tasks = engine.current().await;
        let query = engine.query();
        let mut header = format!(
            "Filter: {}",
            labels::filter_label(engine.filter(), self.config.locale)
        );
        if !query.trim().is_empty() {
            header.push_str(&format!(", search: \"{}\"", query.trim()));
        }
        Ok(format!(
            "{}\n{}",
            header,
            formatting::format_tasks(&tasks, self.config.locale, Utc::now())
        ))
    }

    pub async fn handle_statistics(&self) -> McpResult<String> {
        let repo = self.repository().await?;
        let stats = repo.current_statistics().await;
        Ok(formatting::format_statistics(&stats))
    }
}
