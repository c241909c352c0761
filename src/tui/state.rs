use crate::model::Todo;
use crate::orchestrator::{ClientState, Outcome, Request};

/// Which widget receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Title,
    Description,
    Completed,
    Search,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::List,
        Focus::Title,
        Focus::Description,
        Focus::Completed,
        Focus::Search,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct UiState {
    pub client: ClientState,
    pub tab: usize, // 0 = todos, 1 = help
    pub focus: Focus,
    pub selected: usize,
    pub in_flight: usize,
    pub last_synced: Option<String>,
    pub base_url: String,
}

impl UiState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: ClientState::default(),
            tab: 0,
            focus: Focus::List,
            selected: 0,
            in_flight: 0,
            last_synced: None,
            base_url: base_url.into(),
        }
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.client.list.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.client.list.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The text buffer the focused widget edits, if any.
    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Title => Some(&mut self.client.draft.title),
            Focus::Description => Some(&mut self.client.draft.description),
            Focus::Search => Some(&mut self.client.search_id),
            Focus::List | Focus::Completed => None,
        }
    }

    /// Fold a controller outcome into state; returns the follow-up request to dispatch.
    pub fn apply_outcome(
        &mut self,
        outcome: Outcome,
        synced_at: impl FnOnce() -> String,
    ) -> Option<Request> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let fetched_ok = matches!(outcome, Outcome::Fetched(Ok(_)));
        let follow_up = self.client.apply(outcome);
        if fetched_ok {
            self.last_synced = Some(synced_at());
            if self.selected >= self.client.list.len() {
                self.selected = self.client.list.len().saturating_sub(1);
            }
        }
        follow_up
    }
}
