//! HTTP surface over one shared layout session
//!
//! The layout lives behind a `tokio::sync::Mutex`. A background task calls
//! [`ForceLayout::frame`] on a short interval and the engine's frame throttle
//! decides whether a tick actually runs. Every mutating endpoint is total:
//! unknown node ids leave the layout untouched and report `false`.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use crate::analytics::{self, AnalyticsConfig, AnalyticsSnapshot, Highlight};
use crate::cache::SnapshotCache;
use crate::config::AppConfig;
use crate::io::FormatRegistry;
use crate::layout::{Edge, ForceLayout, FrameOutcome, PositionedNode};
use crate::model::GraphSnapshot;
use crate::sample::{self, SampleOptions};

/// How often the frame driver offers a frame to the layout
const DRIVER_INTERVAL: Duration = Duration::from_millis(10);

/// Largest synthetic graph `POST /api/graph/sample` will build
pub const MAX_SAMPLE_NODES: usize = 10_000;
pub const MAX_SAMPLE_RELATIONSHIPS: usize = 50_000;

pub type SharedLayout = Arc<Mutex<ForceLayout>>;

#[derive(Clone)]
pub struct AppState {
    pub layout: SharedLayout,
    pub analytics: AnalyticsConfig,
    pub cache: Arc<Mutex<SnapshotCache>>,
}

impl AppState {
    pub fn new(layout: ForceLayout, analytics: AnalyticsConfig, cache: SnapshotCache) -> Self {
        Self {
            layout: Arc::new(Mutex::new(layout)),
            analytics,
            cache: Arc::new(Mutex::new(cache)),
        }
    }
}

/// Errors surfaced as a JSON `{"error": ...}` body
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
    pub running: bool,
    pub iterations: u32,
    pub selected: Option<String>,
    pub highlighted: Vec<String>,
}

impl GraphView {
    fn of(layout: &ForceLayout) -> Self {
        let mut highlighted: Vec<String> = layout.highlighted().iter().cloned().collect();
        highlighted.sort();
        Self {
            nodes: layout.nodes().to_vec(),
            edges: layout.edges().to_vec(),
            running: layout.is_running(),
            iterations: layout.iterations(),
            selected: layout.selected().map(str::to_string),
            highlighted,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddNodeRequest {
    pub label: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct SampleRequest {
    pub nodes: usize,
    pub relationships: Option<usize>,
    pub seed: Option<u64>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_graph(State(state): State<AppState>) -> Json<GraphView> {
    let layout = state.layout.lock().await;
    Json(GraphView::of(&layout))
}

async fn put_graph(
    State(state): State<AppState>,
    Json(snapshot): Json<GraphSnapshot>,
) -> Json<GraphView> {
    let (nodes, edges) = snapshot.to_layout_input();
    let mut layout = state.layout.lock().await;
    layout.load(nodes, edges);
    Json(GraphView::of(&layout))
}

impl SampleRequest {
    fn into_options(self) -> Result<SampleOptions, AppError> {
        if self.nodes > MAX_SAMPLE_NODES {
            return Err(AppError::BadRequest(format!(
                "nodes must be at most {MAX_SAMPLE_NODES}, got {}",
                self.nodes
            )));
        }
        let relationships = self
            .relationships
            .unwrap_or_else(|| SampleOptions::with_nodes(self.nodes).relationships);
        if relationships > MAX_SAMPLE_RELATIONSHIPS {
            return Err(AppError::BadRequest(format!(
                "relationships must be at most {MAX_SAMPLE_RELATIONSHIPS}, got {relationships}"
            )));
        }
        Ok(SampleOptions {
            nodes: self.nodes,
            relationships,
            seed: self.seed,
        })
    }
}

/// Replace the graph with a synthetic one. Seeded requests are cached.
async fn sample_graph(
    State(state): State<AppState>,
    Json(request): Json<SampleRequest>,
) -> Result<Json<GraphView>, AppError> {
    let options = request.into_options()?;

    let snapshot = match options.seed {
        Some(seed) => {
            let key = format!("sample:{}:{}:{seed}", options.nodes, options.relationships);
            let mut cache = state.cache.lock().await;
            let Ok(snapshot) = cache
                .get_or_load::<_, Infallible>(&key, || Ok(sample::generate(&options)));
            snapshot
        }
        None => sample::generate(&options),
    };

    let (nodes, edges) = snapshot.to_layout_input();
    let mut layout = state.layout.lock().await;
    layout.load(nodes, edges);
    Ok(Json(GraphView::of(&layout)))
}

async fn add_node(
    State(state): State<AppState>,
    Json(request): Json<AddNodeRequest>,
) -> impl IntoResponse {
    let mut layout = state.layout.lock().await;
    let id = layout.add_node(request.label, request.category.as_deref().unwrap_or(""));
    (StatusCode::CREATED, Json(json!({ "id": id })))
}

async fn remove_node(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Json<serde_json::Value> {
    let removed = state.layout.lock().await.remove_node(&id);
    Json(json!({ "removed": removed }))
}

async fn pin_node(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
    Json(request): Json<PinRequest>,
) -> Json<serde_json::Value> {
    let pinned = state.layout.lock().await.pin(&id, request.x, request.y);
    Json(json!({ "pinned": pinned }))
}

async fn unpin_node(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Json<serde_json::Value> {
    let unpinned = state.layout.lock().await.unpin(&id);
    Json(json!({ "unpinned": unpinned }))
}

async fn select_node(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Json<serde_json::Value> {
    let selected = state.layout.lock().await.select(&id);
    Json(json!({ "selected": selected }))
}

async fn node_neighbors(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let layout = state.layout.lock().await;
    let neighbors = layout
        .neighbors(&id)
        .ok_or_else(|| AppError::NotFound(format!("node {id} not found")))?;
    Ok(Json(neighbors.into_iter().map(str::to_string).collect()))
}

async fn restart_layout(State(state): State<AppState>) -> StatusCode {
    state.layout.lock().await.restart();
    StatusCode::NO_CONTENT
}

async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsSnapshot> {
    // copy under the lock; the delay and the analysis run without it
    let snapshot = state.layout.lock().await.snapshot();
    Json(analytics::analyze_delayed(snapshot, state.analytics.clone()).await)
}

async fn set_highlight(
    State(state): State<AppState>,
    Json(highlight): Json<Highlight>,
) -> Result<Json<Vec<String>>, AppError> {
    let mut layout = state.layout.lock().await;
    let summary = analytics::analyze(layout.nodes(), layout.edges(), &state.analytics);
    let ids = summary
        .highlight_ids(highlight)
        .ok_or_else(|| AppError::NotFound(format!("no such highlight: {highlight:?}")))?;

    let mut sorted: Vec<String> = ids.iter().cloned().collect();
    sorted.sort();
    layout.set_highlight(ids);
    Ok(Json(sorted))
}

async fn clear_highlight(State(state): State<AppState>) -> StatusCode {
    state.layout.lock().await.clear_highlight();
    StatusCode::NO_CONTENT
}

async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.lock().await.clear();
    StatusCode::NO_CONTENT
}

// ============================================================================
// Wiring
// ============================================================================

/// Build the application router. `static_dir`, when set, serves every
/// path outside `/api`.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/graph", get(get_graph).put(put_graph))
        .route("/graph/sample", post(sample_graph))
        .route("/nodes", post(add_node))
        .route("/nodes/{id}", delete(remove_node))
        .route("/nodes/{id}/pin", put(pin_node).delete(unpin_node))
        .route("/nodes/{id}/select", post(select_node))
        .route("/nodes/{id}/neighbors", get(node_neighbors))
        .route("/layout/restart", post(restart_layout))
        .route("/analytics", get(get_analytics))
        .route("/highlight", post(set_highlight).delete(clear_highlight))
        .route("/cache", delete(clear_cache));

    let app = Router::new().nest("/api", api).with_state(state);
    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

/// Offer a frame to the layout every few milliseconds until the task is aborted
pub fn spawn_frame_driver(layout: SharedLayout) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(DRIVER_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if let FrameOutcome::Stopped(reason) = layout.lock().await.frame(Instant::now()) {
                debug!(?reason, "frame driver saw layout stop");
            }
        }
    })
}

/// Load the initial graph, start the frame driver and serve until shutdown
pub async fn serve(config: AppConfig, input: Option<PathBuf>) -> anyhow::Result<()> {
    let mut cache = SnapshotCache::new();
    cache.initialize();

    let mut layout = ForceLayout::new(config.layout.clone());
    if let Some(input) = &input {
        let registry = FormatRegistry::with_defaults();
        let key = input.display().to_string();
        let snapshot = cache
            .get_or_load(&key, || registry.read_snapshot(input))
            .map_err(|e| anyhow::anyhow!("{}: {e}", input.display()))?;
        let (nodes, edges) = snapshot.to_layout_input();
        layout.load(nodes, edges);
        info!(path = %input.display(), nodes = layout.nodes().len(), "loaded initial graph");
    }

    let state = AppState::new(layout, config.analytics.clone(), cache);
    let driver = spawn_frame_driver(state.layout.clone());
    let app = router(state, config.server.static_dir.as_deref());

    let port = config.server.port;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("layout server running at http://localhost:{port}");

    let served = axum::serve(listener, app).await;
    driver.abort();
    served?;
    Ok(())
}
