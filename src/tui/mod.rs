mod help;
mod keys;
mod state;
mod view;

use crate::api::HttpTodoResource;
use crate::orchestrator::{self, Outcome, Request, UiCommand, NOTIFICATION_TTL};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use keys::KeyAction;
use ratatui::{backend::CrosstermBackend, Terminal};
use state::UiState;
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

pub async fn run(resource: HttpTodoResource) -> Result<()> {
    // Unbounded channels keep the UI thread from ever blocking on the controller.
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
    let base_url = resource.base_url().to_string();
    info!(%base_url, "starting tui");

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(base_url, outcome_rx, cmd_tx));

    let res = orchestrator::run_controller(Arc::new(resource), outcome_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Send a request to the controller and count it as in flight.
fn dispatch(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>, request: Request) {
    debug!(?request, "dispatch");
    if cmd_tx.send(UiCommand::Dispatch(request)).is_ok() {
        state.in_flight += 1;
    }
}

fn local_clock() -> String {
    let now = time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(time::macros::format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| "now".into())
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    base_url: String,
    mut outcome_rx: UnboundedReceiver<Outcome>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(base_url);
    dispatch(&mut state, &cmd_tx, Request::FetchAll);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut redraw = true;

    let res = loop {
        // Drain outcomes in arrival order; the last fetch to land sets the list.
        while let Ok(outcome) = outcome_rx.try_recv() {
            if let Some(follow_up) = state.apply_outcome(outcome, local_clock) {
                dispatch(&mut state, &cmd_tx, follow_up);
            }
        }
        state.client.expire_notification(Instant::now(), NOTIFICATION_TTL);

        if redraw || last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| view::draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
            redraw = false;
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match keys::handle_key(&mut state, k) {
                    KeyAction::None => {}
                    KeyAction::Dispatch(request) => dispatch(&mut state, &cmd_tx, request),
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
                // Redraw right away so typing feels immediate.
                redraw = true;
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}
