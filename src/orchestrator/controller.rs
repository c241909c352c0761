//! Request execution.
//!
//! `TodoController` drives the state machine sequentially for one-shot commands.
//! `run_controller` serves the TUI: it executes requests concurrently and streams
//! outcomes back to the UI thread, which owns the state.

use super::state::{ClientState, Outcome, Request};
use crate::api::{ApiError, TodoResource};
use crate::model::{Todo, TodoId};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Dispatch(Request),
    Quit,
}

/// Perform one request against the resource. Never fails: errors travel inside the outcome.
pub(crate) async fn perform<R>(resource: &R, request: Request) -> Outcome
where
    R: TodoResource + ?Sized,
{
    debug!(?request, "performing request");
    let outcome = match request {
        Request::FetchAll => Outcome::Fetched(resource.list().await),
        Request::Create(draft) => Outcome::Created(resource.create(&draft).await),
        Request::Update { id, draft } => Outcome::Updated(resource.update(&id, &draft).await),
        Request::Delete(id) => Outcome::Deleted(resource.delete(&id).await),
        Request::Lookup(key) => Outcome::Found(resource.get(&key).await),
    };
    log_outcome(&outcome);
    outcome
}

fn log_outcome(outcome: &Outcome) {
    let (action, err): (&str, Option<&ApiError>) = match outcome {
        Outcome::Fetched(r) => ("fetch", r.as_ref().err()),
        Outcome::Created(r) => ("create", r.as_ref().err()),
        Outcome::Updated(r) => ("update", r.as_ref().err()),
        Outcome::Deleted(r) => ("delete", r.as_ref().err()),
        Outcome::Found(r) => ("lookup", r.as_ref().err()),
    };
    match err {
        Some(e) => warn!(action, kind = ?e.kind(), error = %e, "todo request failed"),
        None => debug!(action, "todo request succeeded"),
    }
}

/// Single-owner controller that awaits each request before returning.
pub(crate) struct TodoController<R> {
    resource: R,
    state: ClientState,
}

impl<R: TodoResource> TodoController<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            state: ClientState::default(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    pub async fn refresh(&mut self) {
        self.execute(Request::FetchAll).await;
    }

    pub async fn submit_draft(&mut self) {
        let request = self.state.submit_request();
        self.execute(request).await;
    }

    pub fn begin_edit(&mut self, todo: &Todo) {
        self.state.begin_edit(todo);
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    pub async fn remove(&mut self, id: &TodoId) {
        self.execute(Request::Delete(id.clone())).await;
    }

    pub async fn lookup_by_id(&mut self, id: &str) {
        self.state.search_id = id.to_string();
        if let Some(request) = self.state.lookup_request() {
            self.execute(request).await;
        }
    }

    /// Run a request and any follow-up it produces.
    async fn execute(&mut self, request: Request) {
        let mut next = Some(request);
        while let Some(request) = next {
            let outcome = perform(&self.resource, request).await;
            next = self.state.apply(outcome);
        }
    }
}

/// Execute UI requests concurrently and emit outcomes back to the UI thread.
///
/// Each request runs in its own task; outcomes are delivered in completion order, so
/// overlapping refreshes resolve as "last to finish wins". In-flight requests are
/// aborted on quit.
pub(crate) async fn run_controller(
    resource: Arc<dyn TodoResource>,
    outcome_tx: UnboundedSender<Outcome>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut in_flight: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Dispatch(request)) => {
                        let resource = resource.clone();
                        let tx = outcome_tx.clone();
                        in_flight.spawn(async move {
                            let outcome = perform(resource.as_ref(), request).await;
                            let _ = tx.send(outcome);
                        });
                    }
                    Some(UiCommand::Quit) | None => break,
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "request task ended abnormally");
                }
            }
        }
    }

    if !in_flight.is_empty() {
        info!(pending = in_flight.len(), "aborting in-flight requests");
    }
    in_flight.shutdown().await;
    Ok(())
}
