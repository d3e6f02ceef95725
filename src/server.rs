use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};

use crate::data::{
    GenerateRequest, GenerateResponse, PlacementRequest, PlacementResponse, ScheduleId,
    ScheduleRecord, ScheduleSummary,
};
use crate::error::ScheduleError;
use crate::generator::{ScheduleService, place_inline};
use crate::solver::PlacementLimits;

#[derive(Clone)]
pub struct AppState {
    pub service: ScheduleService,
    pub limits: PlacementLimits,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn reject(e: ScheduleError) -> (StatusCode, String) {
    let status = e.status_code();
    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        info!("Request rejected: {}", e);
    }
    (status, e.to_string())
}

// The engine never blocks, so handlers call it inline.
async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<GenerateResponse> {
    state.service.generate(&request).map(Json).map_err(reject)
}

async fn place_handler(
    State(state): State<AppState>,
    Json(request): Json<PlacementRequest>,
) -> ApiResult<PlacementResponse> {
    place_inline(&request, &state.limits).map(Json).map_err(reject)
}

async fn list_handler(State(state): State<AppState>) -> ApiResult<Vec<ScheduleSummary>> {
    state.service.schedules().map(Json).map_err(reject)
}

async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
) -> ApiResult<ScheduleRecord> {
    state.service.schedule(id).map(Json).map_err(reject)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/schedules/generate", post(generate_handler))
        .route("/v1/schedules", get(list_handler))
        .route("/v1/schedules/:id", get(get_handler))
        .route("/v1/schedule/place", post(place_handler))
        .with_state(state)
}

pub async fn run_server(addr: std::net::SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
