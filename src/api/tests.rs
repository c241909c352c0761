use super::*;
use crate::test_support::{config_for, TodoServer};

fn draft(title: &str, description: &str, completed: bool) -> TodoDraft {
    TodoDraft {
        title: title.into(),
        description: description.into(),
        completed,
    }
}

async fn resource_for(server: &TodoServer) -> HttpTodoResource {
    let url = server.spawn().await;
    HttpTodoResource::new(&config_for(&url)).expect("build resource")
}

#[tokio::test]
async fn create_then_get_round_trips_fields() {
    let server = TodoServer::default();
    let api = resource_for(&server).await;

    let created = api.create(&draft("A", "B", false)).await.expect("create");
    assert_eq!(created.title, "A");
    assert_eq!(created.description, "B");
    assert!(!created.completed);

    let fetched = api.get(&created.id.to_string()).await.expect("get");
    assert_eq!(fetched, created);
    assert_eq!(server.requests(), vec!["POST /".to_string(), format!("GET /{}", created.id)]);
}

#[tokio::test]
async fn list_returns_collection_in_server_order() {
    let server = TodoServer::seeded(&[draft("one", "", false), draft("two", "x", true)]);
    let api = resource_for(&server).await;

    let todos = api.list().await.expect("list");
    let titles: Vec<_> = todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["one", "two"]);
    assert_eq!(todos[0].id, TodoId::Number(1));
}

#[tokio::test]
async fn update_and_delete_hit_item_paths() {
    let server = TodoServer::seeded(&[draft("one", "", false)]);
    let api = resource_for(&server).await;
    let id = TodoId::Number(1);

    let updated = api.update(&id, &draft("one", "", true)).await.expect("update");
    assert!(updated.completed);
    api.delete(&id).await.expect("delete");

    assert!(server.todos().is_empty());
    assert_eq!(server.requests(), ["PUT /1", "DELETE /1"]);
}

#[tokio::test]
async fn missing_item_maps_to_not_found() {
    let server = TodoServer::default();
    let api = resource_for(&server).await;

    let err = api.get("999").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = api.delete(&TodoId::Number(999)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = api
        .update(&TodoId::Number(999), &draft("x", "", false))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn empty_lookup_body_is_not_found() {
    let server = TodoServer::default();
    server.set_empty_on_missing(true);
    let api = resource_for(&server).await;

    let err = api.get("999").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref id } if id == "999"));
}

#[tokio::test]
async fn server_errors_map_to_status() {
    let server = TodoServer::default();
    server.set_failing(true);
    let api = resource_for(&server).await;

    match api.list().await {
        Err(ApiError::Status { status, .. }) => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(
        api.create(&draft("x", "", false)).await.unwrap_err().kind(),
        ErrorKind::Server
    );
}

#[tokio::test]
async fn malformed_body_maps_to_decode() {
    let server = TodoServer::default();
    let url = server.spawn().await.replace("/api/todos", "/broken");
    let api = HttpTodoResource::new(&config_for(&url)).unwrap();

    assert_eq!(api.list().await.unwrap_err().kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_server_maps_to_network() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTodoResource::new(&config_for(&format!("http://{addr}/api/todos"))).unwrap();
    assert_eq!(api.list().await.unwrap_err().kind(), ErrorKind::Network);
}

#[test]
fn item_url_appends_one_encoded_segment() {
    let api = HttpTodoResource::new(&config_for("http://localhost:8080/api/todos/")).unwrap();
    assert_eq!(
        api.item_url("12").unwrap().as_str(),
        "http://localhost:8080/api/todos/12"
    );
    assert_eq!(
        api.item_url("a/b c").unwrap().as_str(),
        "http://localhost:8080/api/todos/a%2Fb%20c"
    );
}

#[tokio::test]
async fn blank_id_never_reaches_the_wire() {
    let server = TodoServer::seeded(&[draft("one", "", false)]);
    let api = resource_for(&server).await;
    let blank = TodoId::from_input("  ");

    assert_eq!(api.item_url("").unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(api.delete(&blank).await.unwrap_err().kind(), ErrorKind::InvalidInput);
    let err = api.update(&blank, &draft("x", "", false)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(api.get(" ").await.unwrap_err().kind(), ErrorKind::InvalidInput);

    assert!(server.requests().is_empty());
    assert_eq!(server.todos().len(), 1);
}

#[test]
fn rejects_unusable_base_urls() {
    for bad in ["not a url", "mailto:someone@example.com"] {
        let err = HttpTodoResource::new(&config_for(bad)).err().expect("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
