// Metrics endpoint

use crate::core::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Returns JSON with the storefront counters:
/// - Logins, failed logins and registrations
/// - Cart mutations and the current cart size
/// - Products API failures, cached product count and loading flag
/// - Uptime
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.metrics.get_snapshot(&state.cart, &state.catalog);

    (StatusCode::OK, Json(snapshot)).into_response()
}
