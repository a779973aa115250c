use std::{
    collections::BTreeMap,
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub uid: String,
    pub primary_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndex {
    pub uid: String,
    pub primary_key: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub task_uid: u64,
    pub index_uid: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
pub struct Pagination {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Default)]
struct IndexData {
    primary_key: Option<String>,
    documents: Vec<Value>,
    settings: Map<String, Value>,
}

#[derive(Default)]
pub struct Store {
    indexes: BTreeMap<String, IndexData>,
    next_task: u64,
}

impl Store {
    fn enqueue(&mut self, index_uid: &str, kind: &str) -> TaskSummary {
        let task_uid = self.next_task;
        self.next_task += 1;
        TaskSummary {
            task_uid,
            index_uid: index_uid.to_string(),
            status: "enqueued".to_string(),
            kind: kind.to_string(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    api_key: Option<Arc<str>>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

pub fn app() -> Router {
    app_with_key(None)
}

/// Build the router. With `api_key` set, every request must carry
/// `Authorization: Bearer {api_key}`.
pub fn app_with_key(api_key: Option<&str>) -> Router {
    let state = AppState {
        db: Db::default(),
        api_key: api_key.map(Arc::from),
    };
    Router::new()
        .route("/health", get(health))
        .route("/indexes", get(list_indexes).post(create_index))
        .route("/indexes/{uid}", get(get_index).delete(delete_index))
        .route(
            "/indexes/{uid}/documents",
            get(get_documents).post(add_documents),
        )
        .route("/indexes/{uid}/search", post(search))
        .route(
            "/indexes/{uid}/settings",
            get(get_settings).patch(update_settings),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_key(listener: TcpListener, api_key: Option<&str>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

fn error(status: StatusCode, code: &str, message: String) -> (StatusCode, Json<ErrorBody>) {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "auth",
        _ => "invalid_request",
    };
    (
        status,
        Json(ErrorBody {
            message,
            code: code.to_string(),
            kind: kind.to_string(),
        }),
    )
}

fn index_not_found(uid: &str) -> (StatusCode, Json<ErrorBody>) {
    error(
        StatusCode::NOT_FOUND,
        "index_not_found",
        format!("Index `{uid}` not found."),
    )
}

async fn require_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    match provided {
        None => error(
            StatusCode::UNAUTHORIZED,
            "missing_authorization_header",
            "The Authorization header is missing.".to_string(),
        )
        .into_response(),
        Some(value) if value.strip_prefix("Bearer ") == Some(expected) => next.run(request).await,
        Some(_) => error(
            StatusCode::FORBIDDEN,
            "invalid_api_key",
            "The provided API key is invalid.".to_string(),
        )
        .into_response(),
    }
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "available" }))
}

fn paginate(items: Vec<Value>, page: &Pagination) -> Value {
    let offset = page.offset.unwrap_or(0);
    let limit = page.limit.unwrap_or(DEFAULT_LIMIT);
    let total = items.len();
    let results: Vec<Value> = items.into_iter().skip(offset).take(limit).collect();
    serde_json::json!({
        "results": results,
        "offset": offset,
        "limit": limit,
        "total": total,
    })
}

async fn list_indexes(State(state): State<AppState>, Query(page): Query<Pagination>) -> Json<Value> {
    let store = state.db.read().await;
    let indexes = store
        .indexes
        .iter()
        .map(|(uid, data)| {
            serde_json::json!(Index {
                uid: uid.clone(),
                primary_key: data.primary_key.clone(),
            })
        })
        .collect();
    Json(paginate(indexes, &page))
}

async fn create_index(
    State(state): State<AppState>,
    Json(input): Json<CreateIndex>,
) -> (StatusCode, Json<TaskSummary>) {
    let mut store = state.db.write().await;
    if !store.indexes.contains_key(&input.uid) {
        store.indexes.insert(
            input.uid.clone(),
            IndexData {
                primary_key: input.primary_key,
                ..IndexData::default()
            },
        );
    }
    let task = store.enqueue(&input.uid, "indexCreation");
    (StatusCode::ACCEPTED, Json(task))
}

async fn get_index(State(state): State<AppState>, Path(uid): Path<String>) -> ApiResult<Json<Index>> {
    let store = state.db.read().await;
    let data = store.indexes.get(&uid).ok_or_else(|| index_not_found(&uid))?;
    Ok(Json(Index {
        primary_key: data.primary_key.clone(),
        uid,
    }))
}

async fn delete_index(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<(StatusCode, Json<TaskSummary>)> {
    let mut store = state.db.write().await;
    store.indexes.remove(&uid).ok_or_else(|| index_not_found(&uid))?;
    let task = store.enqueue(&uid, "indexDeletion");
    Ok((StatusCode::ACCEPTED, Json(task)))
}

/// First top-level field whose name ends in `id`, the way the service
/// guesses a primary key.
fn infer_primary_key(document: &Value) -> Option<String> {
    document
        .as_object()?
        .keys()
        .find(|key| key.to_ascii_lowercase().ends_with("id"))
        .cloned()
}

async fn add_documents(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(documents): Json<Vec<Value>>,
) -> (StatusCode, Json<TaskSummary>) {
    let mut store = state.db.write().await;
    let index = store.indexes.entry(uid.clone()).or_default();
    if index.primary_key.is_none() {
        index.primary_key = documents.first().and_then(infer_primary_key);
    }
    for document in documents {
        let existing = index.primary_key.as_ref().and_then(|pk| {
            let id = document.get(pk)?;
            index.documents.iter().position(|d| d.get(pk) == Some(id))
        });
        match existing {
            Some(pos) => index.documents[pos] = document,
            None => index.documents.push(document),
        }
    }
    let task = store.enqueue(&uid, "documentAdditionOrUpdate");
    (StatusCode::ACCEPTED, Json(task))
}

async fn get_documents(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Value>> {
    let store = state.db.read().await;
    let index = store.indexes.get(&uid).ok_or_else(|| index_not_found(&uid))?;
    Ok(Json(paginate(index.documents.clone(), &page)))
}

fn matches_query(document: &Value, query: &str) -> bool {
    match document {
        Value::String(s) => s.to_lowercase().contains(query),
        Value::Array(items) => items.iter().any(|v| matches_query(v, query)),
        Value::Object(fields) => fields.values().any(|v| matches_query(v, query)),
        _ => false,
    }
}

async fn search(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(input): Json<SearchQuery>,
) -> ApiResult<Json<Value>> {
    let store = state.db.read().await;
    let index = store.indexes.get(&uid).ok_or_else(|| index_not_found(&uid))?;
    let needle = input.q.to_lowercase();
    let hits: Vec<Value> = index
        .documents
        .iter()
        .filter(|doc| needle.is_empty() || matches_query(doc, &needle))
        .take(DEFAULT_LIMIT)
        .cloned()
        .collect();
    Ok(Json(serde_json::json!({
        "hits": hits,
        "query": input.q,
        "processingTimeMs": 0,
        "limit": DEFAULT_LIMIT,
        "offset": 0,
        "estimatedTotalHits": hits.len(),
    })))
}

async fn get_settings(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<Map<String, Value>>> {
    let store = state.db.read().await;
    let index = store.indexes.get(&uid).ok_or_else(|| index_not_found(&uid))?;
    Ok(Json(index.settings.clone()))
}

async fn update_settings(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(settings): Json<Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<TaskSummary>)> {
    let mut store = state.db.write().await;
    let index = store.indexes.get_mut(&uid).ok_or_else(|| index_not_found(&uid))?;
    index.settings.extend(settings);
    let task = store.enqueue(&uid, "settingsUpdate");
    Ok((StatusCode::ACCEPTED, Json(task)))
}
