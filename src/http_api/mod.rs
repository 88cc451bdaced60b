use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::calculations::fixed_point::FixedPoint;
use crate::catalog::TaskCatalog;
use crate::duration::compute_durations;
use crate::schedule::{CalendarEntry, ScheduleError};

/// Shared state: the catalog, read by every scheduling request and only
/// written when a replacement catalog is uploaded. Scheduling state itself
/// is request-local.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<TaskCatalog>>,
}

impl AppState {
    pub fn new(catalog: TaskCatalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn with_shared(catalog: Arc<RwLock<TaskCatalog>>) -> Self {
        Self { catalog }
    }

    fn catalog(&self) -> Arc<RwLock<TaskCatalog>> {
        self.catalog.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    EmptySelection,
    Unschedulable {
        message: String,
        unscheduled: Vec<String>,
        cycle: Vec<String>,
    },
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::EmptySelection => ApiError::EmptySelection,
            ScheduleError::UnresolvedDependencies {
                ref unscheduled,
                ref cycle,
                ..
            } => ApiError::Unschedulable {
                message: value.to_string(),
                unscheduled: unscheduled.clone(),
                cycle: cycle.clone(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::EmptySelection => {
                let body = Json(ErrorBody {
                    error: "empty_selection",
                    message: "nothing to schedule: no tasks selected".to_string(),
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Unschedulable {
                message,
                unscheduled,
                cycle,
            } => {
                let body = Json(json!({
                    "error": "unresolved_dependencies",
                    "message": message,
                    "unscheduled": unscheduled,
                    "cycle": cycle,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub area_m2: f64,
    pub start_date: NaiveDate,
    pub tasks: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub scheduled_tasks: usize,
    pub entries: Vec<CalendarEntry>,
    pub starts_on: NaiveDate,
    pub finishes_on: NaiveDate,
    pub defaulted_tasks: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(get_catalog).put(put_catalog))
        .route("/schedule", post(post_schedule))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, catalog: TaskCatalog) -> std::io::Result<()> {
    let state = AppState::new(catalog);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_catalog(State(state): State<AppState>) -> Json<TaskCatalog> {
    let catalog = state.catalog();
    let snapshot = {
        let guard = catalog.read();
        guard.clone()
    };
    Json(snapshot)
}

async fn put_catalog(
    State(state): State<AppState>,
    Json(catalog): Json<TaskCatalog>,
) -> Result<Json<TaskCatalog>, ApiError> {
    catalog
        .validate()
        .map_err(|e| ApiError::invalid(e.to_string()))?;
    let shared = state.catalog();
    {
        let mut guard = shared.write();
        *guard = catalog.clone();
    }
    Ok(Json(catalog))
}

async fn post_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    if !request.area_m2.is_finite() || request.area_m2 <= 0.0 {
        return Err(ApiError::invalid(format!(
            "area_m2 must be a positive number (got {})",
            request.area_m2
        )));
    }

    let catalog = state.catalog();
    let guard = catalog.read();

    let durations = compute_durations(&guard, request.area_m2, &request.tasks);
    let calendar =
        FixedPoint::new(&guard).execute(&durations, request.start_date, &request.tasks)?;

    let (starts_on, finishes_on) = calendar
        .span()
        .unwrap_or((request.start_date, request.start_date));
    let defaulted_tasks: Vec<String> = durations
        .tasks()
        .filter(|t| !guard.contains(t))
        .map(str::to_string)
        .collect();

    Ok(Json(ScheduleResponse {
        scheduled_tasks: calendar.len(),
        entries: calendar.entries().to_vec(),
        starts_on,
        finishes_on,
        defaulted_tasks,
    }))
}
