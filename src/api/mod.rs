//! Boundary to the remote todo resource.
//!
//! `TodoResource` is the only way the rest of the crate reaches the server. The HTTP
//! implementation lives in `http`; tests substitute in-memory fakes.

mod http;
#[cfg(test)]
mod tests;

use crate::model::{Todo, TodoDraft, TodoId};
use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpTodoResource;

/// Operations the remote collection exposes.
#[async_trait]
pub trait TodoResource: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;
    async fn create(&self, draft: &TodoDraft) -> Result<Todo, ApiError>;
    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, ApiError>;
    async fn delete(&self, id: &TodoId) -> Result<(), ApiError>;
    async fn get(&self, id: &str) -> Result<Todo, ApiError>;
}

#[async_trait]
impl<T: TodoResource + ?Sized> TodoResource for std::sync::Arc<T> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        (**self).list().await
    }
    async fn create(&self, draft: &TodoDraft) -> Result<Todo, ApiError> {
        (**self).create(draft).await
    }
    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, ApiError> {
        (**self).update(id, draft).await
    }
    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
    async fn get(&self, id: &str) -> Result<Todo, ApiError> {
        (**self).get(id).await
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("todo {id} not found")]
    NotFound { id: String },
    #[error("server returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("invalid response body from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Coarse classification of `ApiError` for logging and branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Server,
    Decode,
    InvalidInput,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Network,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Status { .. } => ErrorKind::Server,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::InvalidUrl(_) => ErrorKind::InvalidInput,
        }
    }
}
