use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

/// Server-assigned identifier. Opaque to the client: only compared and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(i64),
    Text(String),
}

impl TodoId {
    /// Interpret user input as an id. Integer text becomes `Number`.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => TodoId::Number(n),
            Err(_) => TodoId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => fmt::Display::fmt(n, f),
            TodoId::Text(s) => f.pad(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Pending create/edit form. Serialized as the request body, so it never carries an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl From<&Todo> for TodoDraft {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
