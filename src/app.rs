use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::codec::decode_grid;
use crate::compiler::compile;
use crate::config::{MAX_SIZE, ServerConfig};
use crate::error::CrosswordError;
use crate::registry::{NewPuzzle, PublishRequest, PuzzleRegistry, PuzzleUpdate};
use crate::symmetry::{SymmetryMode, affected_cells};

pub struct AppState {
    registry: Mutex<PuzzleRegistry>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            registry: Mutex::new(PuzzleRegistry::new()),
        }
    }

    fn registry(&self) -> MutexGuard<'_, PuzzleRegistry> {
        // A panic while holding the lock leaves plain data behind; keep serving.
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct CompileRequest {
    size: usize,
    grid_b64: String,
}

#[derive(Deserialize)]
struct SymmetryRequest {
    size: usize,
    sym: Option<String>,
    index: usize,
}

#[derive(Serialize)]
struct SymmetryResponse {
    cells: Vec<usize>,
}

struct ApiError(CrosswordError);

impl From<CrosswordError> for ApiError {
    fn from(e: CrosswordError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CrosswordError::NotFound(_) => StatusCode::NOT_FOUND,
            CrosswordError::Io(_) | CrosswordError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/puzzles", get(list_puzzles).post(create_puzzle))
        .route("/api/puzzles/:code", get(get_puzzle).put(update_puzzle))
        .route("/api/puzzles/:code/publish", post(publish_puzzle))
        .route("/api/compile", post(compile_grid))
        .route("/api/symmetry", post(symmetry_cells))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(AppState::new()));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn list_puzzles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let items = state.registry().list_recent(10);
    Json(serde_json::json!({ "items": items }))
}

async fn create_puzzle(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPuzzle>,
) -> Result<impl IntoResponse, ApiError> {
    let code = state.registry().create(body)?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "code": code }))))
}

async fn get_puzzle(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let registry = state.registry();
    let record = registry.get(&code)?;
    Ok(Json(record.clone()))
}

async fn update_puzzle(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PuzzleUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let mut registry = state.registry();
    let record = registry.update(&code, body).map_err(|e| match e {
        CrosswordError::NotFound(_) => CrosswordError::InvalidPayload("update_failed".to_string()),
        other => other,
    })?;
    Ok(Json(record.clone()))
}

async fn publish_puzzle(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PublishRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = state.registry().publish(&code, body)?;
    Ok(Json(serde_json::json!({ "code": code })))
}

/// Grids arriving over HTTP are never larger than the editor allows.
fn check_size(size: usize) -> Result<(), CrosswordError> {
    if size > MAX_SIZE {
        return Err(CrosswordError::GridTooLarge { size });
    }
    Ok(())
}

async fn compile_grid(Json(body): Json<CompileRequest>) -> Result<impl IntoResponse, ApiError> {
    check_size(body.size)?;
    let blocks = decode_grid(&body.grid_b64, body.size)?;
    let grid = compile(&blocks, body.size)?;
    Ok(Json(grid))
}

async fn symmetry_cells(Json(body): Json<SymmetryRequest>) -> Result<impl IntoResponse, ApiError> {
    check_size(body.size)?;
    let mode = SymmetryMode::from_param_lenient(body.sym.as_deref(), SymmetryMode::None);
    let cells = affected_cells(body.index, body.size, mode.flags())?;
    Ok(Json(SymmetryResponse {
        cells: cells.into_iter().collect(),
    }))
}
