use crate::catalog::products::ProductCatalog;
use crate::stores::cart_store::CartStore;
use crate::utils::time::current_timestamp;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub logins: AtomicU64,
    pub failed_logins: AtomicU64,
    pub registrations: AtomicU64,
    pub cart_mutations: AtomicU64,
    pub gateway_failures: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub logins: u64,
    pub failed_logins: u64,
    pub registrations: u64,
    pub cart_mutations: u64,
    pub gateway_failures: u64,
    pub cart_lines: usize,
    pub cart_count: u32,
    #[serde(rename = "cached_products")]
    pub products: usize,
    pub catalog_loading: bool,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            logins: AtomicU64::new(0),
            failed_logins: AtomicU64::new(0),
            registrations: AtomicU64::new(0),
            cart_mutations: AtomicU64::new(0),
            gateway_failures: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment_logins(&self) {
        self.logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed_logins(&self) {
        self.failed_logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_registrations(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cart_mutations(&self) {
        self.cart_mutations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gateway_failures(&self) {
        self.gateway_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Counters plus the current cart and catalog figures
    pub fn get_snapshot(&self, cart: &CartStore, catalog: &ProductCatalog) -> MetricsSnapshot {
        MetricsSnapshot {
            logins: self.logins.load(Ordering::Relaxed),
            failed_logins: self.failed_logins.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            cart_mutations: self.cart_mutations.load(Ordering::Relaxed),
            gateway_failures: self.gateway_failures.load(Ordering::Relaxed),
            cart_lines: cart.lines().len(),
            cart_count: cart.cart_count(),
            products: catalog.len(),
            catalog_loading: catalog.is_loading(),
            uptime_seconds: current_timestamp() - self.start_time,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::products::tests::FakeGateway;
    use crate::models::product::Product;
    use crate::storage::memory::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn test_counters_show_in_snapshot() {
        let metrics = Metrics::new();
        let cart = CartStore::new(Arc::new(MemoryStorage::new()));
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::default()));

        metrics.increment_logins();
        metrics.increment_failed_logins();
        metrics.increment_failed_logins();
        metrics.increment_registrations();
        metrics.increment_gateway_failures();

        let snapshot = metrics.get_snapshot(&cart, &catalog);
        assert_eq!(snapshot.logins, 1);
        assert_eq!(snapshot.failed_logins, 2);
        assert_eq!(snapshot.registrations, 1);
        assert_eq!(snapshot.gateway_failures, 1);
        assert_eq!(snapshot.products, 0);
        assert!(snapshot.uptime_seconds >= 0);
    }

    #[test]
    fn test_snapshot_reflects_cart() {
        let metrics = Metrics::new();
        let cart = CartStore::new(Arc::new(MemoryStorage::new()));
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::default()));

        let product = Product {
            id: Some("1".to_string()),
            name: "Mate".to_string(),
            precio: Some(2.0),
            description: String::new(),
            categoria: String::new(),
            image_url: String::new(),
        };
        cart.add_to_cart(&product).unwrap();
        cart.add_to_cart(&product).unwrap();
        metrics.increment_cart_mutations();
        metrics.increment_cart_mutations();

        let snapshot = metrics.get_snapshot(&cart, &catalog);
        assert_eq!(snapshot.cart_lines, 1);
        assert_eq!(snapshot.cart_count, 2);
        assert_eq!(snapshot.cart_mutations, 2);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cached_products"], 0);
    }
}
