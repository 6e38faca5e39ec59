use std::sync::{Arc, Weak};
use tokio::sync::watch;

use super::{Store, TaskQuery};
use crate::model::{SubTask, Task};

/// Push-style read stream over a task query
///
/// The first [`TaskStream::next`] yields the current rows immediately; each
/// later call waits for the next task write and yields a fresh full snapshot.
/// Writes that land while nobody is polling coalesce into one emission that
/// reflects the latest state. Once the store is dropped the stream ends.
pub struct TaskStream {
    store: Weak<Store>,
    query: TaskQuery,
    revisions: watch::Receiver<u64>,
    primed: bool,
}

impl TaskStream {
    pub(crate) fn new(store: &Arc<Store>, query: TaskQuery) -> Self {
        Self {
            store: Arc::downgrade(store),
            query,
            revisions: store.subscribe_tasks(),
            primed: false,
        }
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub async fn next(&mut self) -> Option<Vec<Task>> {
        if self.primed {
            self.revisions.changed().await.ok()?;
        } else {
            self.primed = true;
        }
        self.revisions.borrow_and_update();
        let store = self.store.upgrade()?;
        Some(store.tasks(&self.query).await)
    }
}

/// Push-style read stream over one task's subtasks
pub struct SubTaskStream {
    store: Weak<Store>,
    task_id: String,
    revisions: watch::Receiver<u64>,
    primed: bool,
}

impl SubTaskStream {
    pub(crate) fn new(store: &Arc<Store>, task_id: String) -> Self {
        Self {
            store: Arc::downgrade(store),
            task_id,
            revisions: store.subscribe_subtasks(),
            primed: false,
        }
    }

    pub async fn next(&mut self) -> Option<Vec<SubTask>> {
        if self.primed {
            self.revisions.changed().await.ok()?;
        } else {
            self.primed = true;
        }
        self.revisions.borrow_and_update();
        let store = self.store.upgrade()?;
        Some(store.subtasks_for(&self.task_id).await)
    }
}
