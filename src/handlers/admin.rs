use crate::core::error::{ApiError, GatewayError};
use crate::core::state::AppState;
use crate::models::api::{ProductForm, ProductResponse, SuccessResponse};
use crate::validation::forms::validate_product;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Count a failed products API call before handing the error back
fn gateway_failure(state: &AppState, error: GatewayError) -> ApiError {
    if !matches!(error, GatewayError::MissingIdentifier) {
        state.metrics.increment_gateway_failures();
    }
    ApiError::Gateway(error)
}

/// Create a product through the products API
///
/// POST /admin/products
pub async fn create_product_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ProductForm>,
) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    let draft = validate_product(form).inspect_err(|e| {
        warn!(error = %e, "Rejected product form");
    })?;

    let product = state
        .catalog
        .add(draft)
        .await
        .map_err(|e| gateway_failure(&state, e))?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
        }),
    )
        .into_response())
}

/// Replace a product's fields, keeping its identifier
///
/// PUT /admin/products/{id}
pub async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    let draft = validate_product(form).inspect_err(|e| {
        warn!(product_id = %product_id, error = %e, "Rejected product form");
    })?;

    let product = state
        .catalog
        .update(&draft.into_product(Some(product_id)))
        .await
        .map_err(|e| gateway_failure(&state, e))?;

    Ok((
        StatusCode::OK,
        Json(ProductResponse {
            success: true,
            product,
        }),
    )
        .into_response())
}

/// DELETE /admin/products/{id}
pub async fn delete_product_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    state
        .catalog
        .delete(&product_id)
        .await
        .map_err(|e| gateway_failure(&state, e))?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("Product {} deleted", product_id),
        }),
    )
        .into_response())
}

/// Reload the whole catalog from the products API
///
/// POST /admin/reload
pub async fn reload_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.require_authenticated()?;

    info!("Reloading product catalog");

    let count = state
        .catalog
        .refresh()
        .await
        .map_err(|e| gateway_failure(&state, e))?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("Loaded {} products", count),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{create_test_state, read_json, signed_in_state};
    use crate::models::api::ErrorResponse;
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;

    fn form(name: &str, precio: Value, categoria: &str) -> Json<ProductForm> {
        Json(ProductForm {
            name: name.to_string(),
            precio,
            description: "Edición limitada".to_string(),
            categoria: categoria.to_string(),
            image_url: "https://img.example.com/p.png".to_string(),
        })
    }

    #[tokio::test]
    async fn test_admin_requires_login() {
        let (state, _) = create_test_state();

        let result =
            create_product_handler(State(state.clone()), form("Termo", json!(10), "boca")).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::UNAUTHORIZED);

        let result = reload_handler(State(state)).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_product() {
        let (state, _) = signed_in_state().await;

        let response = create_product_handler(
            State(state.clone()),
            form("Termo", json!("45.5"), "Merchandising"),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: ProductResponse = read_json(response).await;
        assert_eq!(body.product.id.as_deref(), Some("100"));
        assert_eq!(body.product.precio, Some(45.5));
        assert_eq!(body.product.categoria, "boca");
        assert_eq!(state.catalog.len(), 3);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_form() {
        let (state, _) = signed_in_state().await;

        let result =
            create_product_handler(State(state.clone()), form("", json!(1), "boca")).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_update_product() {
        let (state, _) = signed_in_state().await;

        let response = update_product_handler(
            State(state.clone()),
            Path("1".to_string()),
            form("Mate camionero", json!(50), "categoria 2"),
        )
        .await
        .unwrap();
        let body: ProductResponse = read_json(response).await;
        assert_eq!(body.product.id.as_deref(), Some("1"));

        let mate = state.catalog.find("1").unwrap();
        assert_eq!(mate.name, "Mate camionero");
        assert_eq!(mate.precio, Some(50.0));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let (state, _) = signed_in_state().await;

        delete_product_handler(State(state.clone()), Path("2".to_string()))
            .await
            .unwrap();
        assert!(state.catalog.find("2").is_none());

        let result = delete_product_handler(State(state.clone()), Path("2".to_string())).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = read_json(response).await;
        assert!(!body.success);
        assert_eq!(state.metrics.gateway_failures.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_catalog() {
        let (state, gateway) = signed_in_state().await;
        gateway.failing.store(true, Ordering::SeqCst);

        let result = reload_handler(State(state.clone())).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(state.catalog.len(), 2);
        assert!(state.catalog.last_error().is_some());

        gateway.failing.store(false, Ordering::SeqCst);
        let response = reload_handler(State(state)).await.unwrap();
        let body: SuccessResponse = read_json(response).await;
        assert_eq!(body.message, "Loaded 2 products");
    }
}
