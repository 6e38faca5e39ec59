//! Filter and search selection over the reactive task streams
//!
//! A selection is a `(filter, query)` pair. [`select_source`] maps it to the
//! store query that answers it plus any in-memory refinement, and
//! [`FilterEngine::filtered_tasks`] keeps serving the result of the latest
//! selection, switching the underlying stream whenever either half changes.

use chrono::{DateTime, Utc};
use std::str::FromStr;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::ValidationError;
use crate::model::{Priority, Task, TaskStatus};
use crate::repository::TaskRepository;
use crate::store::TaskQuery;

/// Named predicate selecting which tasks are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    InProgress,
    HighPriority,
    Overdue,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 5] = [
        TaskFilter::All,
        TaskFilter::Completed,
        TaskFilter::InProgress,
        TaskFilter::HighPriority,
        TaskFilter::Overdue,
    ];
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(TaskFilter::All),
            "completed" => Ok(TaskFilter::Completed),
            "in_progress" => Ok(TaskFilter::InProgress),
            "high_priority" => Ok(TaskFilter::HighPriority),
            "overdue" => Ok(TaskFilter::Overdue),
            _ => Err(ValidationError::InvalidFilter(s.to_string())),
        }
    }
}

/// Where a selection's rows come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub query: TaskQuery,
    /// Keep only overdue tasks, evaluated at emission time
    pub overdue_only: bool,
}

impl Source {
    fn store(query: TaskQuery) -> Self {
        Self {
            query,
            overdue_only: false,
        }
    }

    pub fn refine(&self, mut tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<Task> {
        if self.overdue_only {
            tasks.retain(|t| t.is_overdue(now));
        }
        tasks
    }
}

/// Map a selection to its source
///
/// Search only applies under `All` and then bypasses the filter entirely;
/// the other filters ignore the query.
pub fn select_source(filter: TaskFilter, query: &str) -> Source {
    let query = query.trim();
    match filter {
        TaskFilter::All if query.is_empty() => Source::store(TaskQuery::All),
        TaskFilter::All => Source::store(TaskQuery::search(query)),
        TaskFilter::Completed => Source::store(TaskQuery::ByStatus(TaskStatus::Completed)),
        TaskFilter::InProgress => Source::store(TaskQuery::ByStatus(TaskStatus::InProgress)),
        TaskFilter::HighPriority => Source::store(TaskQuery::ByPriority(Priority::High)),
        TaskFilter::Overdue => Source {
            query: TaskQuery::All,
            overdue_only: true,
        },
    }
}

/// Holds the current selection and derives filtered views from it
pub struct FilterEngine {
    repo: TaskRepository,
    filter: watch::Sender<TaskFilter>,
    query: watch::Sender<String>,
}

impl FilterEngine {
    pub fn new(repo: TaskRepository) -> Self {
        let (filter, _) = watch::channel(TaskFilter::All);
        let (query, _) = watch::channel(String::new());
        Self {
            repo,
            filter,
            query,
        }
    }

    pub fn set_filter(&self, filter: TaskFilter) {
        tracing::debug!(?filter, "filter selected");
        self.filter.send_replace(filter);
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.query.send_replace(query.into());
    }

    pub fn filter(&self) -> TaskFilter {
        *self.filter.borrow()
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// Evaluate the current selection once
    pub async fn current(&self) -> Vec<Task> {
        let source = select_source(self.filter(), &self.query());
        let tasks = self.repo.query(&source.query).await;
        source.refine(tasks, Utc::now())
    }

    /// Live view of the latest selection
    ///
    /// A background task combines the latest filter and query, subscribes to
    /// the matching source and republishes its snapshots. When the selection
    /// changes the old source is dropped before the new one is polled, so no
    /// stale emission reaches the view.
    pub fn filtered_tasks(&self) -> FilteredTasks {
        let mut filter_rx = self.filter.subscribe();
        let mut query_rx = self.query.subscribe();
        let repo = self.repo.clone();
        let (out_tx, out_rx) = watch::channel(Vec::new());

        let worker = tokio::spawn(async move {
            loop {
                let filter = *filter_rx.borrow_and_update();
                let query = query_rx.borrow_and_update().clone();
                let source = select_source(filter, &query);
                let mut stream = repo.stream(source.query.clone());

                loop {
                    tokio::select! {
                        changed = filter_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            break;
                        }
                        changed = query_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            break;
                        }
                        tasks = stream.next() => {
                            let Some(tasks) = tasks else {
                                return;
                            };
                            if out_tx.send(source.refine(tasks, Utc::now())).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        FilteredTasks {
            rx: out_rx,
            worker,
        }
    }
}

/// Handle on a live filtered view; dropping it stops the background task
pub struct FilteredTasks {
    rx: watch::Receiver<Vec<Task>>,
    worker: JoinHandle<()>,
}

impl FilteredTasks {
    /// Wait for the next emission
    pub async fn next(&mut self) -> Option<Vec<Task>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Most recent emission without waiting
    pub fn latest(&self) -> Vec<Task> {
        self.rx.borrow().clone()
    }
}

impl Drop for FilteredTasks {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
