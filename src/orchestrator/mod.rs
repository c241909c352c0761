//! Application-level orchestration.
//!
//! This module owns the client synchronization state machine and the code that runs
//! its requests against the remote resource. UI/CLI layers call into this module to
//! keep responsibilities separated.

mod controller;
mod state;

pub(crate) use controller::{run_controller, TodoController, UiCommand};
pub(crate) use state::{
    ClientState, FormMode, NotificationKind, Outcome, Request, NOTIFICATION_TTL,
};
