use crate::catalog::categories::display_categories;
use crate::catalog::filters::{filter_products, paginate};
use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{CategoriesResponse, ProductPageResponse, ProductQuery, ProductResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Filtered, paginated view of the cached catalog
///
/// GET /products?search=&category=&page=
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Response {
    let products = state.catalog.products();
    let matching = filter_products(&products, &query.search, &query.category);
    let page = paginate(&matching, query.page, state.config.catalog.products_per_page);

    debug!(
        search = %query.search,
        category = %query.category,
        page = page.page,
        matches = page.total_items,
        "Product listing"
    );

    (
        StatusCode::OK,
        Json(ProductPageResponse {
            success: true,
            products: page.items,
            page: page.page,
            total_pages: page.total_pages,
            total_products: page.total_items,
            error: state.catalog.last_error(),
        }),
    )
        .into_response()
}

/// GET /products/categories
pub async fn categories_handler(State(state): State<Arc<AppState>>) -> Response {
    let categories = display_categories(&state.catalog.products());

    (
        StatusCode::OK,
        Json(CategoriesResponse {
            success: true,
            categories,
        }),
    )
        .into_response()
}

/// GET /products/{id}
pub async fn product_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Response, ApiError> {
    let product = state
        .catalog
        .find(&product_id)
        .ok_or_else(|| ApiError::NotFound(format!("product {}", product_id)))?;

    Ok((
        StatusCode::OK,
        Json(ProductResponse {
            success: true,
            product,
        }),
    )
        .into_response())
}
