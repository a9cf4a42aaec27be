use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{AddToCartRequest, CartResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

fn cart_response(state: &AppState) -> Response {
    (
        StatusCode::OK,
        Json(CartResponse {
            success: true,
            items: state.cart.lines(),
            count: state.cart.cart_count(),
            total: state.cart.cart_total(),
        }),
    )
        .into_response()
}

/// Cart lines with derived count and total
///
/// GET /cart
pub async fn cart_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.require_authenticated()?;
    Ok(cart_response(&state))
}

/// Add one unit of a catalog product
///
/// POST /cart/add
pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    let product = state.catalog.find(&request.product_id).ok_or_else(|| {
        warn!(product_id = %request.product_id, "Product not in catalog");
        ApiError::NotFound(format!("product {}", request.product_id))
    })?;

    state.cart.add_to_cart(&product)?;
    state.metrics.increment_cart_mutations();

    Ok(cart_response(&state))
}

/// Take one unit off a line, dropping the line at the last unit
///
/// POST /cart/decrement/{id}
pub async fn decrement_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    if state.cart.get(&product_id).is_none() {
        return Err(ApiError::NotFound(format!("cart line {}", product_id)));
    }

    state.cart.remove_from_cart(&product_id);
    state.metrics.increment_cart_mutations();

    Ok(cart_response(&state))
}

/// DELETE /cart/items/{id}
pub async fn remove_item_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    if !state.cart.remove_item_completely(&product_id) {
        return Err(ApiError::NotFound(format!("cart line {}", product_id)));
    }
    state.metrics.increment_cart_mutations();

    Ok(cart_response(&state))
}

/// DELETE /cart
pub async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    state.cart.clear_cart();
    state.metrics.increment_cart_mutations();

    Ok(cart_response(&state))
}
