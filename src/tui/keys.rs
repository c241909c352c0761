//! Key handling for the TUI.
//!
//! Keys only change `UiState`; anything that needs the network comes back as a
//! `KeyAction::Dispatch` for the event loop to send to the controller.

use super::state::{Focus, UiState};
use crate::orchestrator::{FormMode, Request};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Dispatch(Request),
    Quit,
}

pub fn handle_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    if state.tab == 1 {
        return match key.code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Tab => {
                state.tab = 0;
                KeyAction::None
            }
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Tab => {
            state.focus = state.focus.next();
            return KeyAction::None;
        }
        KeyCode::BackTab => {
            state.focus = state.focus.prev();
            return KeyAction::None;
        }
        _ => {}
    }

    match state.focus {
        Focus::List => list_key(state, key.code),
        Focus::Completed => match key.code {
            KeyCode::Char(' ') => {
                state.client.draft.completed = !state.client.draft.completed;
                KeyAction::None
            }
            KeyCode::Enter => KeyAction::Dispatch(state.client.submit_request()),
            KeyCode::Esc => {
                leave_form(state);
                KeyAction::None
            }
            _ => KeyAction::None,
        },
        Focus::Title | Focus::Description | Focus::Search => text_key(state, key),
    }
}

fn list_key(state: &mut UiState, code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(todo) = state.selected_todo().cloned() {
                state.client.begin_edit(&todo);
                state.focus = Focus::Title;
            }
        }
        KeyCode::Char('d') => {
            if let Some(todo) = state.selected_todo() {
                return KeyAction::Dispatch(Request::Delete(todo.id.clone()));
            }
        }
        KeyCode::Char('r') => return KeyAction::Dispatch(Request::FetchAll),
        KeyCode::Char('n') => state.focus = Focus::Title,
        KeyCode::Char('/') => state.focus = Focus::Search,
        KeyCode::Char('?') => state.tab = 1,
        KeyCode::Esc => {
            if state.client.mode() != FormMode::Creating {
                state.client.cancel_edit();
            } else {
                state.client.dismiss_notification();
            }
        }
        _ => {}
    }
    KeyAction::None
}

fn text_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter if state.focus == Focus::Search => match state.client.lookup_request() {
            Some(request) => KeyAction::Dispatch(request),
            None => KeyAction::None,
        },
        KeyCode::Enter => KeyAction::Dispatch(state.client.submit_request()),
        KeyCode::Esc => {
            if state.focus == Focus::Search {
                state.focus = Focus::List;
            } else {
                leave_form(state);
            }
            KeyAction::None
        }
        KeyCode::Backspace => {
            if let Some(buf) = state.active_input_mut() {
                buf.pop();
            }
            KeyAction::None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(buf) = state.active_input_mut() {
                buf.push(c);
            }
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Esc from the form: drop any edit in progress and return to the list.
fn leave_form(state: &mut UiState) {
    if state.client.mode() != FormMode::Creating {
        state.client.cancel_edit();
    }
    state.focus = Focus::List;
}
