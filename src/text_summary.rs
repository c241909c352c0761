//! Text rendering of todos for CLI output.

use crate::model::Todo;

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// One line per todo, in list order.
pub(crate) fn list_lines(todos: &[Todo]) -> Vec<String> {
    if todos.is_empty() {
        return vec!["No todos".to_string()];
    }
    todos
        .iter()
        .map(|t| {
            let mark = if t.completed { "x" } else { " " };
            if t.description.trim().is_empty() {
                format!("[{mark}] {:>4}  {}", t.id, t.title)
            } else {
                format!("[{mark}] {:>4}  {}: {}", t.id, t.title, t.description)
            }
        })
        .collect()
}

/// Detail view of a single todo.
pub(crate) fn card_lines(todo: &Todo) -> Vec<String> {
    vec![
        format!("ID: {}", todo.id),
        format!("Title: {}", todo.title),
        format!("Description: {}", todo.description),
        format!("Completed: {}", yes_no(todo.completed)),
    ]
}
