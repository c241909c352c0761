//! Test doubles for the remote todo resource.

use crate::api::{ApiError, TodoResource};
use crate::model::{ClientConfig, Todo, TodoDraft, TodoId};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_string(),
        timeout: Some(std::time::Duration::from_secs(5)),
        user_agent: "todo-cli-tests".into(),
    }
}

fn make_todo(id: i64, draft: &TodoDraft) -> Todo {
    Todo {
        id: TodoId::Number(id),
        title: draft.title.clone(),
        description: draft.description.clone(),
        completed: draft.completed,
    }
}

#[derive(Default)]
struct Store {
    todos: BTreeMap<i64, Todo>,
    next_id: i64,
    requests: Vec<String>,
    fail_all: bool,
    empty_on_missing: bool,
}

impl Store {
    fn insert(&mut self, draft: &TodoDraft) -> Todo {
        self.next_id += 1;
        let todo = make_todo(self.next_id, draft);
        self.todos.insert(self.next_id, todo.clone());
        todo
    }
}

/// In-process HTTP server speaking the todo collection protocol under `/api/todos`.
#[derive(Clone, Default)]
pub struct TodoServer {
    store: Arc<Mutex<Store>>,
}

impl TodoServer {
    pub fn seeded(drafts: &[TodoDraft]) -> Self {
        let server = Self::default();
        {
            let mut store = server.store.lock().unwrap();
            for d in drafts {
                store.insert(d);
            }
        }
        server
    }

    /// Answer every request with 500.
    pub fn set_failing(&self, fail: bool) {
        self.store.lock().unwrap().fail_all = fail;
    }

    /// Answer GET on a missing id with an empty 200, like a backend returning null.
    pub fn set_empty_on_missing(&self, empty: bool) {
        self.store.lock().unwrap().empty_on_missing = empty;
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.store.lock().unwrap().todos.values().cloned().collect()
    }

    pub fn requests(&self) -> Vec<String> {
        self.store.lock().unwrap().requests.clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/api/todos", get(list_todos).post(create_todo))
            .route(
                "/api/todos/:id",
                get(get_todo).put(update_todo).delete(delete_todo),
            )
            .route("/broken", get(broken_body))
            .with_state(self.clone())
    }

    /// Bind to an ephemeral port and return the collection root URL.
    pub async fn spawn(&self) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = self.router();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/api/todos")
    }

    fn record(&self, line: String) -> Option<Response> {
        let mut store = self.store.lock().unwrap();
        store.requests.push(line);
        store
            .fail_all
            .then(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

async fn list_todos(State(server): State<TodoServer>) -> Response {
    if let Some(r) = server.record("GET /".into()) {
        return r;
    }
    Json(server.todos()).into_response()
}

async fn create_todo(State(server): State<TodoServer>, Json(draft): Json<TodoDraft>) -> Response {
    if let Some(r) = server.record("POST /".into()) {
        return r;
    }
    let todo = server.store.lock().unwrap().insert(&draft);
    (StatusCode::CREATED, Json(todo)).into_response()
}

async fn get_todo(State(server): State<TodoServer>, Path(id): Path<String>) -> Response {
    if let Some(r) = server.record(format!("GET /{id}")) {
        return r;
    }
    let store = server.store.lock().unwrap();
    match id.parse::<i64>().ok().and_then(|n| store.todos.get(&n)) {
        Some(todo) => Json(todo.clone()).into_response(),
        None if store.empty_on_missing => StatusCode::OK.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn update_todo(
    State(server): State<TodoServer>,
    Path(id): Path<String>,
    Json(draft): Json<TodoDraft>,
) -> Response {
    if let Some(r) = server.record(format!("PUT /{id}")) {
        return r;
    }
    let mut store = server.store.lock().unwrap();
    let Some(n) = id.parse::<i64>().ok().filter(|n| store.todos.contains_key(n)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let todo = make_todo(n, &draft);
    store.todos.insert(n, todo.clone());
    Json(todo).into_response()
}

async fn delete_todo(State(server): State<TodoServer>, Path(id): Path<String>) -> Response {
    if let Some(r) = server.record(format!("DELETE /{id}")) {
        return r;
    }
    let mut store = server.store.lock().unwrap();
    match id.parse::<i64>().ok().and_then(|n| store.todos.remove(&n)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn broken_body() -> impl IntoResponse {
    Bytes::from_static(b"{not json")
}

/// Which operation a `FakeResource` call was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(TodoDraft),
    Update(TodoId, TodoDraft),
    Delete(TodoId),
    Get(String),
}

#[derive(Default)]
struct FakeInner {
    todos: Vec<Todo>,
    next_id: i64,
    calls: Vec<Call>,
    fail_list: bool,
    fail_mutations: bool,
}

/// In-memory `TodoResource` that records every call.
#[derive(Default)]
pub struct FakeResource {
    inner: Mutex<FakeInner>,
}

impl FakeResource {
    pub fn with_todos(drafts: &[TodoDraft]) -> Self {
        let fake = Self::default();
        {
            let mut inner = fake.inner.lock().unwrap();
            for d in drafts {
                inner.next_id += 1;
                let todo = make_todo(inner.next_id, d);
                inner.todos.push(todo);
            }
        }
        fake
    }

    pub fn fail_list(&self, fail: bool) {
        self.inner.lock().unwrap().fail_list = fail;
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.inner.lock().unwrap().fail_mutations = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.inner.lock().unwrap().todos.clone()
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            url: "fake://todos".into(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
impl TodoResource for FakeResource {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::List);
        if inner.fail_list {
            return Err(Self::server_error());
        }
        Ok(inner.todos.clone())
    }

    async fn create(&self, draft: &TodoDraft) -> Result<Todo, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Create(draft.clone()));
        if inner.fail_mutations {
            return Err(Self::server_error());
        }
        inner.next_id += 1;
        let todo = make_todo(inner.next_id, draft);
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Update(id.clone(), draft.clone()));
        if inner.fail_mutations {
            return Err(Self::server_error());
        }
        let Some(todo) = inner.todos.iter_mut().find(|t| &t.id == id) else {
            return Err(ApiError::NotFound { id: id.to_string() });
        };
        todo.title = draft.title.clone();
        todo.description = draft.description.clone();
        todo.completed = draft.completed;
        Ok(todo.clone())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete(id.clone()));
        if inner.fail_mutations {
            return Err(Self::server_error());
        }
        let before = inner.todos.len();
        inner.todos.retain(|t| &t.id != id);
        if inner.todos.len() == before {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Todo, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Get(id.to_string()));
        let wanted = TodoId::from_input(id);
        inner
            .todos
            .iter()
            .find(|t| t.id == wanted)
            .cloned()
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }
}
