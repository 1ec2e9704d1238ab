//! HTTP surface of the todo service.
//!
//! # Design
//! Handlers are thin: pull parameters out of the request, make exactly one
//! `TodoStore` call, and serialize the result. The store is injected as
//! router state, so tests can pass a `MemoryStore` where production passes a
//! `SqlStore`.
//!
//! Two request encodings reach the same store operations:
//! - form fields (query string, urlencoded or multipart body, see `form`):
//!   `POST /todo` (create) and `POST /todo/{id}` (completion-only update);
//! - JSON body: `POST /todo2` (create) and `POST /todo2/{id}` (full-field
//!   update).
//!
//! An unknown id is answered with `200` and a `false` flag plus
//! `"error": "Record Not Found"`, never with a 404.

pub mod config;
pub mod error;
pub mod form;

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use todo_core::{NewTodo, TodoItem, TodoPatch, TodoStore};

pub use error::ApiError;
pub use form::FormFields;

pub type SharedStore = Arc<dyn TodoStore>;

const NOT_FOUND: &str = "Record Not Found";

/// Body of the update endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Updated {
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of the delete endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Updated {
    fn from_outcome(found: bool) -> Self {
        Self {
            updated: found,
            error: (!found).then(|| NOT_FOUND.to_string()),
        }
    }
}

impl Deleted {
    fn from_outcome(found: bool) -> Self {
        Self {
            deleted: found,
            error: (!found).then(|| NOT_FOUND.to_string()),
        }
    }
}

pub fn app(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/todo", post(create_item))
        .route("/todo/{id}", post(complete_item).delete(delete_item))
        .route("/todo-completed", get(completed_items))
        .route("/todo-incomplete", get(incomplete_items))
        .route("/todo2", post(create_item_json))
        .route("/todo2/{id}", post(replace_item_json))
        .with_state(store)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// Like `run`, but stops accepting connections once `shutdown` resolves and
/// waits for in-flight requests to finish.
pub async fn run_until<F>(
    listener: TcpListener,
    store: SharedStore,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Ids that are not integers can never match a row.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Bodies are decoded whatever their content-type says.
fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Lenient boolean coercion: the usual spellings of true, everything else
/// (including a missing field) is false.
pub fn parse_completed(raw: Option<&str>) -> bool {
    matches!(raw, Some("1" | "t" | "T" | "TRUE" | "true" | "True"))
}

async fn healthz() -> Json<Value> {
    info!("API health is OK");
    Json(json!({ "alive": true }))
}

async fn create_item(
    State(store): State<SharedStore>,
    form: FormFields,
) -> Result<Json<TodoItem>, ApiError> {
    let input = NewTodo::new(
        form.value_or_empty("description"),
        form.value_or_empty("location"),
    );
    info!(
        description = %input.description,
        location = %input.location,
        "adding todo item"
    );
    let item = store.create(&input).await?;
    Ok(Json(item))
}

async fn complete_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    form: FormFields,
) -> Result<Json<Updated>, ApiError> {
    let Some(id) = parse_id(&id) else {
        warn!(id = %id, "todo item not found");
        return Ok(Json(Updated::from_outcome(false)));
    };
    let completed = parse_completed(form.value("completed"));

    info!(id, completed, "updating todo item");
    let found = store.set_completed(id, completed).await?.is_some();
    if !found {
        warn!(id, "todo item not found");
    }
    Ok(Json(Updated::from_outcome(found)))
}

async fn delete_item(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let Some(id) = parse_id(&id) else {
        warn!(id = %id, "todo item not found");
        return Ok(Json(Deleted::from_outcome(false)));
    };

    info!(id, "deleting todo item");
    let found = store.delete(id).await?;
    if !found {
        warn!(id, "todo item not found");
    }
    Ok(Json(Deleted::from_outcome(found)))
}

async fn completed_items(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    info!("listing completed todo items");
    Ok(Json(store.list_by_completion(true).await?))
}

async fn incomplete_items(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    info!("listing incomplete todo items");
    Ok(Json(store.list_by_completion(false).await?))
}

async fn create_item_json(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<Json<TodoItem>, ApiError> {
    let input: NewTodo = decode_json(&body)?;
    info!(
        description = %input.description,
        location = %input.location,
        "adding todo item"
    );
    Ok(Json(store.create(&input).await?))
}

async fn replace_item_json(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Updated>, ApiError> {
    let patch: TodoPatch = decode_json(&body)?;
    let Some(id) = parse_id(&id) else {
        warn!(id = %id, "todo item not found");
        return Ok(Json(Updated::from_outcome(false)));
    };

    info!(id, completed = patch.completed, "replacing todo item");
    let found = store.replace(id, &patch).await?.is_some();
    if !found {
        warn!(id, "todo item not found");
    }
    Ok(Json(Updated::from_outcome(found)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_accepts_true_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_completed(Some(raw)), "{raw} should be true");
        }
    }

    #[test]
    fn completed_falls_back_to_false() {
        for raw in ["0", "f", "false", "False", "yes", "", "tRuE"] {
            assert!(!parse_completed(Some(raw)), "{raw} should be false");
        }
        assert!(!parse_completed(None));
    }

    #[test]
    fn non_integer_ids_never_match() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
    }

    #[test]
    fn not_found_bodies_carry_the_error_text() {
        let json = serde_json::to_value(Updated::from_outcome(false)).unwrap();
        assert_eq!(json, json!({ "updated": false, "error": "Record Not Found" }));
        let json = serde_json::to_value(Deleted::from_outcome(false)).unwrap();
        assert_eq!(json, json!({ "deleted": false, "error": "Record Not Found" }));
    }

    #[test]
    fn success_bodies_omit_the_error_key() {
        let json = serde_json::to_value(Updated::from_outcome(true)).unwrap();
        assert_eq!(json, json!({ "updated": true }));
        let json = serde_json::to_value(Deleted::from_outcome(true)).unwrap();
        assert_eq!(json, json!({ "deleted": true }));
    }

    #[test]
    fn malformed_json_is_a_bad_request() {
        let err = decode_json::<NewTodo>(b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err = decode_json::<TodoPatch>(b"").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
