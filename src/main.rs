//! Anjez MCP server entry point
//!
//! The task store itself lives in the `anjez` library.

use anjez::{AnjezServerHandler, AppConfig, Locale, ReorderScope};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Anjez - to-do list with priorities, subtasks and statistics via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the task data file
    file: PathBuf,

    /// Commit every save to the git repository containing the data file
    #[arg(long)]
    sync_git: bool,

    /// Preferences file (default: anjez_prefs.toml next to the data file)
    #[arg(long)]
    prefs_file: Option<PathBuf>,

    /// Label language: en or ar
    #[arg(long, default_value = "en")]
    locale: Locale,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Renumber only the reordered tasks instead of the whole list
    #[arg(long)]
    legacy_reorder: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    // stdout carries the MCP protocol, so logs go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = AppConfig {
        data_file: Some(args.file),
        prefs_file: args.prefs_file,
        sync_git: args.sync_git,
        locale: args.locale,
        reorder_scope: if args.legacy_reorder {
            ReorderScope::VisibleOnly
        } else {
            ReorderScope::FullSet
        },
    };
    tracing::info!(
        data_file = ?config.data_file,
        sync_git = config.sync_git,
        "starting anjez MCP server"
    );

    let handler = AnjezServerHandler::new(config)?;
    serve_stdio(handler).await?;
    Ok(())
}
