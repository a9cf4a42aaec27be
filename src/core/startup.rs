use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::config::{StorageBackend, StorageConfig};
use crate::core::state::AppState;
use crate::storage::{log::FileStorage, memory::MemoryStorage, KeyValueStore};

/// Open the configured storage backend
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::File => {
            let storage = FileStorage::open(config.path.clone()).context(format!(
                "Failed to open storage log: {}",
                config.path.display()
            ))?;
            info!(path = %storage.path().display(), "File storage opened");
            Ok(Arc::new(storage))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage, state will not survive a restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

/// Fill the product catalog from the products API
///
/// A failure is logged and recorded on the catalog; the storefront still
/// starts with an empty product list.
pub async fn populate_catalog(state: &AppState) {
    match state.catalog.refresh().await {
        Ok(count) => {
            info!(products = count, "Product catalog loaded");
        }
        Err(e) => {
            state.metrics.increment_gateway_failures();
            error!(
                error = %e,
                "Failed to load products from the API, starting with an empty catalog"
            );
        }
    }
}
