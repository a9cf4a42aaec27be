// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{admin, auth, cart, fallback, health, metrics, products};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/health", get(health::health_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/session", get(auth::session_handler))
        .route("/products", get(products::list_handler))
        .route("/products/categories", get(products::categories_handler))
        .route("/products/{id}", get(products::product_handler))

        // Cart endpoints (require a signed-in user)
        .route("/cart", get(cart::cart_handler).delete(cart::clear_handler))
        .route("/cart/add", post(cart::add_handler))
        .route("/cart/decrement/{id}", post(cart::decrement_handler))
        .route("/cart/items/{id}", delete(cart::remove_item_handler))

        // Product management (require a signed-in user)
        .route("/admin/products", post(admin::create_product_handler))
        .route(
            "/admin/products/{id}",
            put(admin::update_product_handler).delete(admin::delete_product_handler),
        )
        .route("/admin/reload", post(admin::reload_handler))

        // 404 fallback for all unmatched routes
        .fallback(fallback::fallback_handler)

        .with_state(state)
}
