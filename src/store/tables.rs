use serde::{Deserialize, Serialize};

use crate::model::{SubTask, Task};

/// Current data file format
pub const FORMAT_VERSION: u32 = 1;

/// On-disk document: both tables in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub format_version: u32,
    pub tasks: Vec<Task>,
    pub subtasks: Vec<SubTask>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            tasks: Vec::new(),
            subtasks: Vec::new(),
        }
    }
}

impl Tables {
    pub(crate) fn task_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub(crate) fn subtask_index(&self, id: &str) -> Option<usize> {
        self.subtasks.iter().position(|s| s.id == id)
    }
}
