use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing};

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/health", routing::get(health))
        .route("/ready", routing::get(ready))
}

async fn health() -> impl IntoResponse {
    "OK"
}

async fn ready(State(state): State<ServiceState>) -> impl IntoResponse {
    if let Err(error) = state.service.list_posts().await {
        tracing::warn!(
            error = &error as &dyn std::error::Error,
            "Data file unreadable, failing readiness"
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable");
    }

    (StatusCode::OK, "OK")
}
