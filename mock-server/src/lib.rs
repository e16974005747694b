//! In-memory stand-in for the Apollo Portal OpenAPI.
//!
//! Implements just the item and release endpoints the client uses. Items are
//! kept per namespace in insertion order; a release snapshots the current
//! items so tests can tell written-but-unpublished values from published ones.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

const NAMESPACE_ROUTE: &str =
    "/openapi/v1/apps/{app_id}/envs/{env}/clusters/{cluster}/namespaces/{namespace}";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub data_change_created_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub release_title: String,
    pub released_by: String,
    #[serde(default)]
    pub release_comment: Option<String>,
    /// Key/value snapshot taken when the release was created.
    #[serde(default)]
    pub configurations: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct CreateRelease {
    #[serde(rename = "releaseTitle")]
    pub release_title: String,
    #[serde(rename = "releasedBy")]
    pub released_by: String,
    #[serde(rename = "releaseComment", default)]
    pub release_comment: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub operator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct NamespacePath {
    pub app_id: String,
    pub env: String,
    pub cluster: String,
    pub namespace: String,
}

#[derive(Deserialize)]
pub struct ItemPath {
    pub app_id: String,
    pub env: String,
    pub cluster: String,
    pub namespace: String,
    pub key: String,
}

impl ItemPath {
    fn split(self) -> (NamespacePath, String) {
        let ns = NamespacePath {
            app_id: self.app_id,
            env: self.env,
            cluster: self.cluster,
            namespace: self.namespace,
        };
        (ns, self.key)
    }
}

#[derive(Default)]
struct Namespace {
    items: Vec<Item>,
    releases: Vec<Release>,
}

/// Shared server state. When `token` is set, every request must carry
/// `Authorization: Bearer <token>`; otherwise any bearer token is accepted.
#[derive(Clone, Default)]
pub struct AppState {
    namespaces: Arc<RwLock<HashMap<NamespacePath, Namespace>>>,
    token: Option<Arc<str>>,
}

impl AppState {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(Arc::from(token)),
            ..Self::default()
        }
    }
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route(&format!("{NAMESPACE_ROUTE}/items"), get(list_items))
        .route(&format!("{NAMESPACE_ROUTE}/items/"), post(upsert_item))
        .route(
            &format!("{NAMESPACE_ROUTE}/items/{{key}}"),
            get(get_item).delete(delete_item),
        )
        .route(&format!("{NAMESPACE_ROUTE}/releases"), post(create_release))
        .route(
            &format!("{NAMESPACE_ROUTE}/releases/latest"),
            get(latest_release),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock portal serving");
    axum::serve(listener, app_with_state(state)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let authorized = match (presented, state.token.as_deref()) {
        (Some(got), Some(expected)) => got == expected,
        (Some(got), None) => !got.is_empty(),
        (None, _) => false,
    };
    if !authorized {
        debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    next.run(request).await
}

async fn list_items(State(state): State<AppState>, Path(ns): Path<NamespacePath>) -> Json<Vec<Item>> {
    let namespaces = state.namespaces.read().await;
    let items = namespaces.get(&ns).map(|n| n.items.clone()).unwrap_or_default();
    Json(items)
}

async fn upsert_item(
    State(state): State<AppState>,
    Path(ns): Path<NamespacePath>,
    Json(input): Json<Item>,
) -> Json<Item> {
    let mut namespaces = state.namespaces.write().await;
    let namespace = namespaces.entry(ns).or_default();
    match namespace.items.iter_mut().find(|i| i.key == input.key) {
        Some(existing) => *existing = input.clone(),
        None => namespace.items.push(input.clone()),
    }
    Json(input)
}

async fn get_item(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Result<Json<Item>, (StatusCode, &'static str)> {
    let (ns, key) = path.split();
    let namespaces = state.namespaces.read().await;
    namespaces
        .get(&ns)
        .and_then(|n| n.items.iter().find(|i| i.key == key))
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "item not found"))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let (ns, key) = path.split();
    let mut namespaces = state.namespaces.write().await;
    let namespace = namespaces
        .get_mut(&ns)
        .ok_or((StatusCode::NOT_FOUND, "item not found"))?;
    let index = namespace
        .items
        .iter()
        .position(|i| i.key == key)
        .ok_or((StatusCode::NOT_FOUND, "item not found"))?;
    namespace.items.remove(index);
    debug!(key = %key, operator = %params.operator, "item deleted");
    Ok(StatusCode::OK)
}

async fn create_release(
    State(state): State<AppState>,
    Path(ns): Path<NamespacePath>,
    Json(input): Json<CreateRelease>,
) -> Json<Release> {
    let mut namespaces = state.namespaces.write().await;
    let namespace = namespaces.entry(ns).or_default();
    let release = Release {
        release_title: input.release_title,
        released_by: input.released_by,
        release_comment: input.release_comment,
        configurations: namespace
            .items
            .iter()
            .map(|i| (i.key.clone(), i.value.clone()))
            .collect(),
    };
    namespace.releases.push(release.clone());
    Json(release)
}

async fn latest_release(
    State(state): State<AppState>,
    Path(ns): Path<NamespacePath>,
) -> Result<Json<Release>, (StatusCode, &'static str)> {
    let namespaces = state.namespaces.read().await;
    namespaces
        .get(&ns)
        .and_then(|n| n.releases.last())
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "release not found"))
}
