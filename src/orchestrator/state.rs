//! Client-side synchronization state.
//!
//! `ClientState` owns everything the UI shows about the remote collection. All changes go
//! through the transition functions below; none of them perform I/O. Network work is
//! described by a `Request`, performed elsewhere, and folded back in with `apply`.

use crate::api::ApiError;
use crate::model::{Todo, TodoDraft, TodoId};
use std::time::{Duration, Instant};

/// How long a notification stays visible in the TUI.
pub(crate) const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

pub(crate) const MSG_ENTER_ID: &str = "Enter ID";
pub(crate) const MSG_FETCH_FAILED: &str = "Failed to fetch todos";
pub(crate) const MSG_CREATED: &str = "Todo created!";
pub(crate) const MSG_CREATE_FAILED: &str = "Failed to create todo";
pub(crate) const MSG_UPDATED: &str = "Todo updated!";
pub(crate) const MSG_UPDATE_FAILED: &str = "Failed to update todo";
pub(crate) const MSG_DELETED: &str = "Todo deleted!";
pub(crate) const MSG_DELETE_FAILED: &str = "Failed to delete todo";
pub(crate) const MSG_FOUND: &str = "Todo found!";
pub(crate) const MSG_NOT_FOUND: &str = "Todo not found";

/// A network operation against the remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    FetchAll,
    Create(TodoDraft),
    Update { id: TodoId, draft: TodoDraft },
    Delete(TodoId),
    Lookup(String),
}

/// Result of performing a `Request`.
#[derive(Debug)]
pub(crate) enum Outcome {
    Fetched(Result<Vec<Todo>, ApiError>),
    Created(Result<Todo, ApiError>),
    Updated(Result<Todo, ApiError>),
    Deleted(Result<(), ApiError>),
    Found(Result<Todo, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotificationKind {
    Success,
    Failure,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub visible: bool,
    pub shown_at: Option<Instant>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            message: String::new(),
            kind: NotificationKind::Success,
            visible: false,
            shown_at: None,
        }
    }
}

/// Form mode derived from the editing target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormMode {
    Creating,
    Editing(TodoId),
}

#[derive(Debug, Default)]
pub(crate) struct ClientState {
    pub list: Vec<Todo>,
    pub draft: TodoDraft,
    pub editing_target: Option<Todo>,
    pub search_id: String,
    pub search_result: Option<Todo>,
    pub notification: Notification,
}

impl ClientState {
    pub fn mode(&self) -> FormMode {
        match &self.editing_target {
            Some(todo) => FormMode::Editing(todo.id.clone()),
            None => FormMode::Creating,
        }
    }

    pub fn begin_edit(&mut self, todo: &Todo) {
        self.draft = TodoDraft::from(todo);
        self.editing_target = Some(todo.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.editing_target = None;
        self.draft = TodoDraft::default();
    }

    /// The request `submitDraft` issues: create in Creating mode, update in Editing mode.
    pub fn submit_request(&self) -> Request {
        match self.mode() {
            FormMode::Creating => Request::Create(self.draft.clone()),
            FormMode::Editing(id) => Request::Update {
                id,
                draft: self.draft.clone(),
            },
        }
    }

    /// Validate `search_id`. Blank input raises a hint and yields no request.
    pub fn lookup_request(&mut self) -> Option<Request> {
        let key = self.search_id.trim();
        if key.is_empty() {
            self.notify(MSG_ENTER_ID, NotificationKind::Hint);
            return None;
        }
        Some(Request::Lookup(key.to_string()))
    }

    /// Fold a network outcome into state. Returns the follow-up request, which is a full
    /// refresh after every successful mutation.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Request> {
        match outcome {
            Outcome::Fetched(Ok(todos)) => {
                self.list = todos;
                None
            }
            Outcome::Fetched(Err(_)) => {
                self.notify(MSG_FETCH_FAILED, NotificationKind::Failure);
                None
            }
            Outcome::Created(Ok(_)) => {
                self.draft = TodoDraft::default();
                self.notify(MSG_CREATED, NotificationKind::Success);
                Some(Request::FetchAll)
            }
            Outcome::Created(Err(_)) => {
                self.notify(MSG_CREATE_FAILED, NotificationKind::Failure);
                None
            }
            Outcome::Updated(Ok(_)) => {
                self.cancel_edit();
                self.notify(MSG_UPDATED, NotificationKind::Success);
                Some(Request::FetchAll)
            }
            Outcome::Updated(Err(_)) => {
                self.notify(MSG_UPDATE_FAILED, NotificationKind::Failure);
                None
            }
            Outcome::Deleted(Ok(())) => {
                self.notify(MSG_DELETED, NotificationKind::Success);
                Some(Request::FetchAll)
            }
            Outcome::Deleted(Err(_)) => {
                self.notify(MSG_DELETE_FAILED, NotificationKind::Failure);
                None
            }
            Outcome::Found(Ok(todo)) => {
                self.search_result = Some(todo);
                self.notify(MSG_FOUND, NotificationKind::Success);
                None
            }
            Outcome::Found(Err(_)) => {
                self.search_result = None;
                self.notify(MSG_NOT_FOUND, NotificationKind::Failure);
                None
            }
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notification.visible = false;
    }

    /// Hide the notification once it has been visible for `ttl`.
    pub fn expire_notification(&mut self, now: Instant, ttl: Duration) {
        if let Some(shown_at) = self.notification.shown_at {
            if self.notification.visible && now.duration_since(shown_at) >= ttl {
                self.notification.visible = false;
            }
        }
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.notification = Notification {
            message: message.to_string(),
            kind,
            visible: true,
            shown_at: Some(Instant::now()),
        };
    }
}
