//! Common test utilities for integration tests
#![allow(dead_code)]

use anjez::{AnjezServerHandler, AppConfig, Store, TaskRepository};
use std::sync::Arc;
use tempfile::TempDir;

/// Handler backed by a data file in a fresh temporary directory
///
/// The directory also receives the default preferences file, so tests never
/// share state.
pub fn get_test_handler() -> (AnjezServerHandler, TempDir) {
    let dir = TempDir::new().unwrap();
    let handler = AnjezServerHandler::new(AppConfig::new(dir.path().join("tasks.toml"))).unwrap();
    (handler, dir)
}

pub fn memory_repository() -> TaskRepository {
    TaskRepository::new(Arc::new(Store::in_memory()))
}

/// Extract the id from an `add_task`/`add_subtask` response
/// Response format: "... created with ID: <id>\n..." or "... ID: <id> (task: ...)"
pub fn extract_id_from_response(response: &str) -> String {
    let start = response.find("ID: ").expect("response carries an id") + 4;
    response[start..]
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

pub fn titles(tasks: &[anjez::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.title.as_str()).collect()
}
