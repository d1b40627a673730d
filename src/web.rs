use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    api::{self, AppState},
    config::Settings,
    error::{PlannerError, Result},
    planner::TripPlanner,
};

/// Full application router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings) -> Result<()> {
    if settings.langfuse.is_configured() {
        tracing::info!(host = %settings.langfuse.host, "Langfuse credentials present");
    }

    let addr = settings.server.bind_address();
    let state = AppState::new(TripPlanner::new(settings.llm));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| PlannerError::Config(format!("failed to bind {addr}: {err}")))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app(state))
        .await
        .map_err(|err| PlannerError::Config(format!("server error: {err}")))
}
