//! Log subscriber installation.
//!
//! One-shot commands log to stderr. The TUI owns the terminal, so it logs to a file.

use crate::cli::Cli;
use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("todo-cli").join("todo-cli.log"))
}

/// Where logs go for this invocation; `None` means stderr.
fn log_target(args: &Cli) -> Option<PathBuf> {
    if args.log_file.is_some() {
        return args.log_file.clone();
    }
    if cfg!(feature = "tui") && args.command.is_none() {
        return default_log_path();
    }
    None
}

pub fn init(args: &Cli) -> Result<()> {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let res = match log_target(args) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    res.map_err(|e| anyhow!("install log subscriber: {e}"))
}
