use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    error::PlannerError,
    planner::TripPlanner,
    types::{TripPlan, TripRequest},
};

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
}

impl AppState {
    pub fn new(planner: TripPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

/// Planner failure rendered as `{"detail": ...}`
pub struct ApiError(PlannerError);

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PlannerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/plan", post(plan_trip))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Travel Crew API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "plan": "/api/plan",
            "health": "/health"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn plan_trip(
    State(state): State<AppState>,
    Json(request): Json<TripRequest>,
) -> Result<Json<TripPlan>, ApiError> {
    info!(
        destination = %request.destination,
        start = %request.start_date,
        end = %request.end_date,
        "Received plan request"
    );

    match state.planner.plan(&request).await {
        Ok(plan) => Ok(Json(plan)),
        Err(err) => {
            error!(code = err.error_code(), error = %err, "Plan request failed");
            Err(err.into())
        }
    }
}
