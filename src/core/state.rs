// Application state (AppState)

use crate::api::client::ProductGateway;
use crate::catalog::products::ProductCatalog;
use crate::core::config::Config;
use crate::core::error::ApiError;
use crate::metrics::collector::Metrics;
use crate::storage::KeyValueStore;
use crate::stores::{
    cart_store::CartStore,
    session_store::{SeedAccount, SessionStore},
};
use std::sync::Arc;

/// Shared application state
///
/// The stores receive their storage and gateway here, once, and handlers
/// reach them only through this struct.
#[derive(Clone)]
pub struct AppState {
    /// Authentication flag, current profile and user registry
    pub session: Arc<SessionStore>,

    /// Cart line items
    pub cart: Arc<CartStore>,

    /// Product list mirrored from the products API
    pub catalog: Arc<ProductCatalog>,

    pub metrics: Arc<Metrics>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ProductGateway>,
    ) -> Self {
        let seed = SeedAccount::from(&config.session);

        Self {
            session: Arc::new(SessionStore::new(Arc::clone(&storage), seed)),
            cart: Arc::new(CartStore::new(storage)),
            catalog: Arc::new(ProductCatalog::new(gateway)),
            metrics: Arc::new(Metrics::new()),
            config: Arc::new(config),
        }
    }

    /// Gate for the cart and product management routes
    pub fn require_authenticated(&self) -> Result<(), ApiError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}
