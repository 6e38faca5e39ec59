//! Anjez task store
//!
//! A to-do list core: tasks with priority, due date and status, ordered
//! subtasks, filtering and search over reactive read streams, drag-reorder
//! and statistics. The command surface is served over the Model Context
//! Protocol (MCP).
//!
//! # Architecture
//!
//! Data flows one way and writes flow back:
//! - **Store** (`store`, `storage`): tables of tasks and subtasks persisted as
//!   TOML, with per-table change notification
//! - **Repository** (`repository`): domain façade, statistics, export/import
//! - **Filter engine** (`filter`): latest filter + query, switching sources
//! - **Ordering** (`ordering`): drag results turned into positions
//! - **Command surface**: `AnjezServerHandler` and the `handlers` module
//!
//! # Example
//!
//! ```no_run
//! use anjez::{AnjezServerHandler, AppConfig};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = AnjezServerHandler::new(AppConfig::new("tasks.toml"))?;
//!     // Serve the handler over MCP...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod formatting;
mod git_ops;
mod handlers;
pub mod labels;
pub mod model;
pub mod ordering;
pub mod reminders;
pub mod repository;
pub mod settings;
pub mod statistics;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod validation;

use anyhow::Result;
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail, bail_public};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub use config::AppConfig;
pub use error::{AnjezError, StoreError, ValidationError};
pub use filter::{FilterEngine, FilteredTasks, TaskFilter};
pub use labels::Locale;
pub use model::{Priority, SubTask, Task, TaskDraft, TaskStatus};
pub use ordering::{OrderingService, ReorderScope};
pub use repository::TaskRepository;
pub use statistics::TaskStatistics;
pub use storage::Storage;
pub use store::{Store, StoreCell, TaskQuery};

use reminders::{ReminderNotifier, Reminders, TracingNotifier};
use settings::{BiometricAuth, NoBiometrics, PreferenceStore};

/// MCP server handler for the task list
///
/// Owns the single store instance (opened on first use), the filter
/// selection that persists between `list_tasks` calls, the preferences file
/// and the external collaborators for reminders and app-lock.
pub struct AnjezServerHandler {
    pub(crate) config: AppConfig,
    pub(crate) store: StoreCell,
    pub(crate) filter: OnceCell<FilterEngine>,
    pub(crate) prefs: PreferenceStore,
    pub(crate) auth: Box<dyn BiometricAuth>,
    pub(crate) reminders: Reminders,
}

impl AnjezServerHandler {
    /// Create a handler with headless collaborators
    ///
    /// # Example
    /// ```no_run
    /// # use anjez::{AnjezServerHandler, AppConfig};
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = AnjezServerHandler::new(AppConfig::new("tasks.toml"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_collaborators(config, Box::new(NoBiometrics), Arc::new(TracingNotifier))
    }

    pub fn with_collaborators(
        config: AppConfig,
        auth: Box<dyn BiometricAuth>,
        notifier: Arc<dyn ReminderNotifier>,
    ) -> Result<Self> {
        let storage = match &config.data_file {
            Some(path) => Storage::new(path, config.sync_git),
            None => Storage::memory(),
        };
        let prefs = match config.prefs_path() {
            Some(path) => PreferenceStore::new(path),
            None => PreferenceStore::memory(),
        };
        Ok(Self {
            config,
            store: StoreCell::new(storage),
            filter: OnceCell::new(),
            prefs,
            auth,
            reminders: Reminders::new(notifier),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Repository over the shared store, opening it on first use
    pub(crate) async fn repository(&self) -> McpResult<TaskRepository> {
        match self.store.get().await {
            Ok(store) => Ok(TaskRepository::new(store)),
            Err(e) => bail!("Failed to open task store: {}", e),
        }
    }

    pub(crate) async fn filter_engine(&self) -> McpResult<&FilterEngine> {
        let repo = self.repository().await?;
        Ok(self
            .filter
            .get_or_init(|| async move { FilterEngine::new(repo) })
            .await)
    }

    pub(crate) async fn ordering(&self) -> McpResult<OrderingService> {
        let repo = self.repository().await?;
        Ok(OrderingService::new(repo, self.config.reorder_scope))
    }
}

/// Map a library error to an MCP error; storage failures stay internal
pub(crate) fn fail<T>(e: AnjezError) -> McpResult<T> {
    match e {
        AnjezError::Storage(e) => {
            tracing::warn!(error = %e, "storage failure");
            bail!("Storage error: {}", e)
        }
        other => bail_public!(_, "{}", other),
    }
}

pub(crate) fn invalid<T>(e: ValidationError) -> McpResult<T> {
    bail_public!(_, "{}", e)
}

/// Task list with priorities, due dates, subtasks, filters and statistics.
///
/// Tasks move through new → in_progress → completed (toggle_status cycles back to new).
/// Filters: all, completed, in_progress, high_priority, overdue. Search text applies
/// only under the "all" filter and replaces it.
/// Dates: YYYY-MM-DD (end of day), YYYY-MM-DD HH:MM (local time) or RFC 3339.
#[mcp_server]
impl McpServer for AnjezServerHandler {
    /// **Create task**: add a task at the end of the list.
    #[tool]
    async fn add_task(
        &self,
        /// Title (required, non-empty)
        title: String,
        /// Description (optional)
        description: Option<String>,
        /// Priority: high/medium/low (default medium)
        priority: Option<String>,
        /// Due date (optional)
        due_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_task(title, description, priority, due_date)
            .await
    }

    /// **Edit task**: change any field. Use "" for due_date to clear it.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn edit_task(
        &self,
        /// Task ID
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// New description (optional)
        description: Option<String>,
        /// New priority: high/medium/low (optional)
        priority: Option<String>,
        /// New due date, ""=clear (optional)
        due_date: Option<String>,
        /// New status: new/in_progress/completed (optional)
        status: Option<String>,
    ) -> McpResult<String> {
        self.handle_edit_task(id, title, description, priority, due_date, status)
            .await
    }

    /// **Toggle status**: new → in_progress → completed → new.
    #[tool]
    async fn toggle_status(
        &self,
        /// Task ID
        id: String,
    ) -> McpResult<String> {
        self.handle_toggle_status(id).await
    }

    /// **Delete task**: removes the task and all of its subtasks. Requires confirm=true.
    #[tool]
    async fn delete_task(
        &self,
        /// Task ID
        id: String,
        /// Must be true to actually delete
        confirm: Option<bool>,
    ) -> McpResult<String> {
        self.handle_delete_task(id, confirm.unwrap_or(false)).await
    }

    /// **Reorder**: pass the displayed task IDs in their new order.
    #[tool]
    async fn reorder_tasks(
        &self,
        /// Task IDs in the desired order
        ids: Vec<String>,
    ) -> McpResult<String> {
        self.handle_reorder_tasks(ids).await
    }

    /// **List tasks**: select a filter and/or search text, then show the matching tasks.
    /// The selection is remembered between calls; omit both to repeat the last one.
    #[tool]
    async fn list_tasks(
        &self,
        /// Filter: all/completed/in_progress/high_priority/overdue (optional)
        filter: Option<String>,
        /// Search text over title and description, ""=clear (optional)
        search: Option<String>,
    ) -> McpResult<String> {
        self.handle_list_tasks(filter, search).await
    }

    /// **Statistics**: totals, completed, in progress, overdue and progress percentage.
    #[tool]
    async fn statistics(&self) -> McpResult<String> {
        self.handle_statistics().await
    }

    /// **Add subtask**: append a checklist item to a task.
    #[tool]
    async fn add_subtask(
        &self,
        /// Parent task ID
        task_id: String,
        /// Subtask title
        title: String,
    ) -> McpResult<String> {
        self.handle_add_subtask(task_id, title).await
    }

    /// **Toggle subtask**: flip a checklist item between done and not done.
    #[tool]
    async fn toggle_subtask(
        &self,
        /// Subtask ID
        id: String,
    ) -> McpResult<String> {
        self.handle_toggle_subtask(id).await
    }

    /// **Delete subtask**
    #[tool]
    async fn delete_subtask(
        &self,
        /// Subtask ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_subtask(id).await
    }

    /// **List subtasks** of a task with progress.
    #[tool]
    async fn list_subtasks(
        &self,
        /// Parent task ID
        task_id: String,
    ) -> McpResult<String> {
        self.handle_list_subtasks(task_id).await
    }

    /// **Reorder subtasks**: subtask IDs of one task in the desired order.
    #[tool]
    async fn reorder_subtasks(
        &self,
        /// Parent task ID
        task_id: String,
        /// Subtask IDs in the desired order
        ids: Vec<String>,
    ) -> McpResult<String> {
        self.handle_reorder_subtasks(task_id, ids).await
    }

    /// **Export**: write every task and subtask to a TOML file.
    #[tool]
    async fn export_tasks(
        &self,
        /// Destination file path
        path: String,
    ) -> McpResult<String> {
        self.handle_export(path).await
    }

    /// **Import**: read a TOML export; records with an existing ID are overwritten.
    #[tool]
    async fn import_tasks(
        &self,
        /// Source file path
        path: String,
    ) -> McpResult<String> {
        self.handle_import(path).await
    }

    /// **Settings**: show settings, or enable/disable the app lock.
    #[tool]
    async fn settings(
        &self,
        /// Enable (true) or disable (false) the app lock (optional)
        app_lock: Option<bool>,
    ) -> McpResult<String> {
        self.handle_settings(app_lock).await
    }

    /// **Remind**: send a reminder for one task, or for every open task due soon.
    #[tool]
    async fn remind(
        &self,
        /// Task ID; omit to remind about all tasks due within `within_hours`
        id: Option<String>,
        /// Window in hours for due-soon reminders (default 24)
        within_hours: Option<u32>,
    ) -> McpResult<String> {
        self.handle_remind(id, within_hours).await
    }
}
