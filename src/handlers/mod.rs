//! MCP tool handlers
//!
//! Each file implements one group of tools as inherent `handle_*` methods on
//! `AnjezServerHandler`; the `#[tool]` methods in `lib.rs` only delegate.

pub mod list;
pub mod reorder;
pub mod settings;
pub mod subtasks;
pub mod tasks;
pub mod transfer;
