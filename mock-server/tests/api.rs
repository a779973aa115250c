use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_key, ErrorBody, Index, TaskSummary};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- indexes ---

#[tokio::test]
async fn list_indexes_empty() {
    let resp = app().oneshot(get("/indexes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = body_json(resp).await;
    assert_eq!(page["results"], serde_json::json!([]));
    assert_eq!(page["total"], 0);
    assert_eq!(page["limit"], 20);
}

#[tokio::test]
async fn create_index_returns_202_task() {
    let resp = app()
        .oneshot(json_request("POST", "/indexes", r#"{"uid":"books"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let task: TaskSummary = body_json(resp).await;
    assert_eq!(task.index_uid, "books");
    assert_eq!(task.kind, "indexCreation");
}

#[tokio::test]
async fn create_index_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/indexes", r#"{"primaryKey":"id"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_index_not_found() {
    let resp = app().oneshot(get("/indexes/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.code, "index_not_found");
}

#[tokio::test]
async fn delete_index_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/indexes/missing")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_unknown_index_not_found() {
    let resp = app()
        .oneshot(json_request("POST", "/indexes/missing/search", r#"{"q":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_has_empty_body() {
    let resp = app().oneshot(get("/nowhere")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn health_is_available() {
    let resp = app().oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "available");
}

// --- auth ---

#[tokio::test]
async fn missing_key_returns_401() {
    let resp = app_with_key(Some("secret")).oneshot(get("/indexes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.code, "missing_authorization_header");
    assert_eq!(err.kind, "auth");
}

#[tokio::test]
async fn wrong_key_returns_403() {
    let resp = app_with_key(Some("secret"))
        .oneshot(
            Request::builder()
                .uri("/indexes")
                .header(http::header::AUTHORIZATION, "Bearer nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn correct_key_is_accepted() {
    let resp = app_with_key(Some("secret"))
        .oneshot(
            Request::builder()
                .uri("/indexes")
                .header(http::header::AUTHORIZATION, "Bearer secret")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full index lifecycle ---

#[tokio::test]
async fn index_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create with explicit primary key
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/indexes",
            r#"{"uid":"books","primaryKey":"id"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let first: TaskSummary = body_json(resp).await;

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/indexes/books"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let index: Index = body_json(resp).await;
    assert_eq!(index.primary_key.as_deref(), Some("id"));

    // add documents, then replace one by primary key
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/indexes/books/documents",
            r#"[{"id":1,"title":"Dune"},{"id":2,"title":"Emma"},{"id":3,"title":"Ulysses"}]"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let second: TaskSummary = body_json(resp).await;
    assert!(second.task_uid > first.task_uid);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/indexes/books/documents",
            r#"[{"id":2,"title":"Emma (annotated)"}]"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    // paginated documents
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/indexes/books/documents?limit=1&offset=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = body_json(resp).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["results"][0]["title"], "Emma (annotated)");
    assert_eq!(page["results"].as_array().unwrap().len(), 1);

    // search
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/indexes/books/search", r#"{"q":"DUNE"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: Value = body_json(resp).await;
    assert_eq!(result["query"], "DUNE");
    assert_eq!(result["hits"][0]["id"], 1);
    assert_eq!(result["estimatedTotalHits"], 1);

    // settings are merged
    for body in [
        r#"{"searchableAttributes":["title"]}"#,
        r#"{"rankingRules":["words"]}"#,
    ] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("PATCH", "/indexes/books/settings", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/indexes/books/settings"))
        .await
        .unwrap();
    let settings: Value = body_json(resp).await;
    assert_eq!(settings["searchableAttributes"][0], "title");
    assert_eq!(settings["rankingRules"][0], "words");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/indexes/books")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let task: TaskSummary = body_json(resp).await;
    assert_eq!(task.kind, "indexDeletion");

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/indexes/books"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adding_documents_creates_index_and_infers_primary_key() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/indexes/movies/documents",
            r#"[{"title":"Alien","movieId":"m1"}]"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/indexes/movies"))
        .await
        .unwrap();
    let index: Index = body_json(resp).await;
    assert_eq!(index.primary_key.as_deref(), Some("movieId"));
}
