use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use zk_core::Animal;
use zk_hub::{AnimalStore, AppState, ServerConfig};
use zk_io::{AnimalDocument, DocumentStore, FileStore, MemoryStore};

fn aurora() -> Animal {
    Animal {
        id: "0".into(),
        name: "Aurora".into(),
        species: "Lion".into(),
        diet: "Carnivore".into(),
        personality_traits: vec!["Brave".into()],
    }
}

fn router_with(store: AnimalStore) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(store));
    let server = ServerConfig {
        public_dir: std::env::temp_dir().join("zk-hub-tests-no-public"),
        cors_permissive: false,
    };
    (zk_hub::app(state.clone(), &server), state)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = match router.clone().oneshot(request).await {
        Ok(response) => response,
        Err(err) => panic!("router request failed: {err}"),
    };
    let status = response.status();
    let bytes = match to_bytes(response.into_body(), 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(err) => panic!("failed to read response body: {err}"),
    };
    (status, bytes.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap_or_else(|err| panic!("failed to build request: {err}"))
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap_or_else(|err| panic!("failed to build request: {err}"))
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|err| panic!("response is not JSON: {err}"))
}

#[tokio::test]
async fn filter_by_diet_returns_matching_animals() {
    let (router, _) = router_with(AnimalStore::new(vec![aurora()], Box::new(MemoryStore::new())));

    let (status, body) = send(&router, get("/api/animals?diet=Carnivore")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!([{
            "id": "0",
            "name": "Aurora",
            "species": "Lion",
            "diet": "Carnivore",
            "personalityTraits": ["Brave"]
        }])
    );

    let (status, body) = send(&router, get("/api/animals?diet=Herbivore")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn repeated_traits_narrow_with_and() {
    let mut rex = aurora();
    rex.id = "1".into();
    rex.name = "Rex".into();
    rex.personality_traits = vec!["Brave".into(), "Loyal".into()];
    let (router, _) = router_with(AnimalStore::new(
        vec![aurora(), rex],
        Box::new(MemoryStore::new()),
    ));

    let (_, body) = send(&router, get("/api/animals?personalityTraits=Brave")).await;
    assert_eq!(json_body(&body).as_array().map(Vec::len), Some(2));

    let (_, body) = send(
        &router,
        get("/api/animals?personalityTraits=Brave&personalityTraits=Loyal&color=red"),
    )
    .await;
    let names: Vec<Value> = json_body(&body)
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|a| a["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Rex")]);
}

#[tokio::test]
async fn scalar_given_as_list_matches_nothing() {
    let (router, _) = router_with(AnimalStore::new(vec![aurora()], Box::new(MemoryStore::new())));

    for uri in [
        "/api/animals?diet=Carnivore&diet=Carnivore",
        "/api/animals?diet=Herbivore&diet=Carnivore",
        "/api/animals?diet%5B%5D=Carnivore",
        "/api/animals?name%5B%5D=Aurora",
    ] {
        let (status, body) = send(&router, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(json_body(&body), json!([]), "{uri}");
    }

    let (_, body) = send(&router, get("/api/animals?personalityTraits%5B%5D=Brave")).await;
    assert_eq!(json_body(&body).as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_id_is_404_with_empty_body() {
    let (router, _) = router_with(AnimalStore::new(vec![aurora()], Box::new(MemoryStore::new())));

    let (status, body) = send(&router, get("/api/animals/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (status, body) = send(&router, get("/api/animals/0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["name"], json!("Aurora"));
}

#[tokio::test]
async fn create_assigns_id_and_rewrites_document() {
    let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let path = dir.path().join("animals.json");
    let (router, state) = router_with(AnimalStore::new(
        vec![aurora()],
        Box::new(FileStore::new(&path)),
    ));

    let payload = json!({
        "name": "Rex",
        "species": "Dog",
        "diet": "Omnivore",
        "personalityTraits": ["Loyal"]
    });
    let (status, body) = send(&router, post("/api/animals", payload.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    let created = json_body(&body);
    assert_eq!(created["id"], json!("1"));
    assert_eq!(created["name"], json!("Rex"));

    let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("read doc: {err}"));
    let doc = AnimalDocument::decode(&text).unwrap_or_else(|err| panic!("parse doc: {err}"));
    assert_eq!(doc.animals.len(), 2);
    assert_eq!(doc.animals.len(), state.animals.len().await);
    assert!(text.starts_with("{\n  \"animals\": ["));

    let (status, body) = send(&router, get("/api/animals/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), created);
}

#[tokio::test]
async fn create_missing_diet_is_400_and_store_unchanged() {
    let backend = Arc::new(MemoryStore::new());
    let (router, state) = router_with(AnimalStore::new(vec![aurora()], Box::new(backend.clone())));

    let payload = json!({
        "name": "Rex",
        "species": "Dog",
        "personalityTraits": ["Loyal"]
    });
    let (status, body) = send(&router, post("/api/animals", payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"The animal is not properly formatted.".to_vec());
    assert_eq!(state.animals.len().await, 1);
    assert!(backend.contents().is_none());
}

#[tokio::test]
async fn create_with_garbage_body_is_400() {
    let (router, state) =
        router_with(AnimalStore::new(vec![aurora()], Box::new(MemoryStore::new())));

    for body in ["", "not json", "[1, 2]", "{\"personalityTraits\": \"Loyal\"}"] {
        let (status, text) = send(&router, post("/api/animals", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(text, b"The animal is not properly formatted.".to_vec());
    }
    assert_eq!(state.animals.len().await, 1);
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let (router, _) = router_with(AnimalStore::new(vec![aurora()], Box::new(MemoryStore::new())));

    let payload = json!({
        "id": "999",
        "name": "Rex",
        "species": "Dog",
        "diet": "Omnivore",
        "personalityTraits": []
    });
    let (status, body) = send(&router, post("/api/animals", payload.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["id"], json!("1"));
}

struct BrokenDisk;

impl DocumentStore for BrokenDisk {
    fn load(&self) -> Result<Option<Vec<Animal>>, zk_io::PersistError> {
        Ok(None)
    }

    fn save(&self, _animals: &[Animal]) -> Result<(), zk_io::PersistError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

#[tokio::test]
async fn persistence_failure_is_500() {
    let (router, state) = router_with(AnimalStore::new(vec![aurora()], Box::new(BrokenDisk)));

    let payload = json!({
        "name": "Rex",
        "species": "Dog",
        "diet": "Omnivore",
        "personalityTraits": ["Loyal"]
    });
    let (status, body) = send(&router, post("/api/animals", payload.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Failed to persist animal.".to_vec());
    // The append is kept in memory.
    assert_eq!(state.animals.len().await, 2);
}
