use crate::api::HttpTodoResource;
use crate::model::{ClientConfig, TodoId};
use crate::orchestrator::{NotificationKind, TodoController};
use crate::text_summary;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/todos";

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "todo-cli",
    version,
    about = "Client for a remote todo list, with optional TUI"
)]
pub struct Cli {
    /// Collection root of the remote todo service
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Per-request timeout (e.g. 5s). Defaults to the HTTP transport's own behaviour
    #[arg(long, global = true)]
    pub timeout: Option<humantime::Duration>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file. The TUI logs to the platform data directory otherwise
    #[arg(long, global = true)]
    pub log_file: Option<std::path::PathBuf>,

    /// Run a single operation and exit instead of starting the TUI
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all todos
    List,
    /// Fetch a single todo by ID
    Get { id: String },
    /// Create a todo
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        completed: bool,
    },
    /// Update a todo. Omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, action = ArgAction::Set)]
        completed: Option<bool>,
    },
    /// Delete a todo by ID
    Delete { id: String },
}

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let resource = HttpTodoResource::new(&cfg)
        .with_context(|| format!("cannot use base URL {:?}", cfg.base_url))?;
    tracing::debug!(base_url = %resource.base_url(), "todo resource ready");

    match args.command.clone() {
        Some(command) => run_command(&args, command, resource).await,
        None => {
            #[cfg(feature = "tui")]
            {
                crate::tui::run(resource).await
            }
            #[cfg(not(feature = "tui"))]
            {
                // Fallback when built without TUI support.
                run_command(&args, Command::List, resource).await
            }
        }
    }
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.trim().to_string(),
        timeout: args.timeout.map(Duration::from),
        user_agent: format!("todo-cli/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// What a one-shot command prints on success.
enum Payload {
    List,
    SearchResult,
}

/// Run one controller operation, print its result, and fail on a failure notification.
async fn run_command(args: &Cli, command: Command, resource: HttpTodoResource) -> Result<()> {
    let mut ctl = TodoController::new(resource);

    let payload = match command {
        Command::List => {
            ctl.refresh().await;
            Payload::List
        }
        Command::Get { id } => {
            ctl.lookup_by_id(&id).await;
            Payload::SearchResult
        }
        Command::Add {
            title,
            description,
            completed,
        } => {
            let draft = &mut ctl.state_mut().draft;
            draft.title = title;
            draft.description = description;
            draft.completed = completed;
            ctl.submit_draft().await;
            Payload::List
        }
        Command::Update {
            id,
            title,
            description,
            completed,
        } => {
            ctl.lookup_by_id(&id).await;
            ensure_ok(&ctl)?;
            let target = ctl
                .state()
                .search_result
                .clone()
                .context("lookup returned no todo")?;
            ctl.begin_edit(&target);
            let draft = &mut ctl.state_mut().draft;
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(completed) = completed {
                draft.completed = completed;
            }
            ctl.submit_draft().await;
            Payload::List
        }
        Command::Delete { id } => {
            ctl.remove(&TodoId::from_input(&id)).await;
            Payload::List
        }
    };

    ensure_ok(&ctl)?;

    let (out_tx, out_handle) = spawn_output_writer();
    let state = ctl.state();
    if state.notification.visible {
        let _ = out_tx.send(OutputLine::Stderr(state.notification.message.clone()));
    }
    let lines = match payload {
        Payload::List => render(args.json, state.list.as_slice(), text_summary::list_lines)?,
        Payload::SearchResult => match state.search_result.as_ref() {
            Some(todo) => render(args.json, todo, text_summary::card_lines)?,
            None => Vec::new(),
        },
    };
    for line in lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

/// Turn a failure or hint notification into an error.
fn ensure_ok<R>(ctl: &TodoController<R>) -> Result<()>
where
    R: crate::api::TodoResource,
{
    let n = &ctl.state().notification;
    if n.visible && n.kind != NotificationKind::Success {
        anyhow::bail!("{}", n.message);
    }
    Ok(())
}

fn render<T, F>(json: bool, value: &T, text: F) -> Result<Vec<String>>
where
    T: serde::Serialize + ?Sized,
    F: Fn(&T) -> Vec<String>,
{
    if json {
        let out = serde_json::to_string_pretty(value).context("serialize output")?;
        Ok(vec![out])
    } else {
        Ok(text(value))
    }
}
