//! Settings and reminder tools

use chrono::{Duration, Utc};
use mcp_attr::{Result as McpResult, bail, bail_public};

use crate::AnjezServerHandler;
use crate::settings::AppLock;
use crate::store::TaskQuery;
use crate::validation;

const DEFAULT_REMINDER_WINDOW_HOURS: u32 = 24;

impl AnjezServerHandler {
    pub async fn handle_settings(&self, app_lock: Option<bool>) -> McpResult<String> {
        if let Some(enabled) = app_lock
            && let Err(e) = self.prefs.set_app_lock_enabled(enabled).await
        {
            bail!("Failed to save preferences: {}", e);
        }

        let enabled = match self.prefs.is_app_lock_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => bail!("Failed to read preferences: {}", e),
        };
        let unlocked = match AppLock::new(&self.prefs).unlock(self.auth.as_ref()).await {
            Ok(unlocked) => unlocked,
            Err(e) => bail!("Failed to read preferences: {}", e),
        };

        let mut result = String::from("Settings:\n");
        result.push_str(&format!(
            "  App lock: {}\n",
            if enabled { "enabled" } else { "disabled" }
        ));
        result.push_str(&format!(
            "  Biometric authentication: {}\n",
            if self.auth.is_available() {
                "available"
            } else {
                "unavailable"
            }
        ));
        if enabled && !unlocked {
            result.push_str("  Warning: the app lock cannot be satisfied on this device\n");
        }
        if let Some(path) = self.config.data_file.as_ref() {
            result.push_str(&format!("  Data file: {}\n", path.display()));
        }
        result.push_str(&format!("  Reorder scope: {:?}\n", self.config.reorder_scope));
        Ok(result)
    }

    pub async fn handle_remind(
        &self,
        id: Option<String>,
        within_hours: Option<u32>,
    ) -> McpResult<String> {
        let repo = self.repository().await?;

        if let Some(id) = id {
            let id = validation::normalize_id(&id);
            let Some(task) = repo.task(&id).await else {
                bail_public!(_, "Task '{}' not found", id);
            };
            return Ok(if self.reminders.remind(&task) {
                format!("Reminder sent for '{}'", task.title)
            } else {
                format!("Reminder for '{}' could not be delivered", task.title)
            });
        }

        let hours = within_hours.unwrap_or(DEFAULT_REMINDER_WINDOW_HOURS);
        let tasks = repo.query(&TaskQuery::All).await;
        let sent = self
            .reminders
            .notify_due(&tasks, Utc::now(), Duration::hours(i64::from(hours)));
        Ok(format!(
            "Sent {} reminder(s) for tasks due within {} hour(s)",
            sent, hours
        ))
    }
}
