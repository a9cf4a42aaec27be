use crate::api::client::ProductGateway;
use crate::core::error::GatewayError;
use crate::models::product::{Product, ProductDraft};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    last_error: Option<String>,
}

/// In-memory product list kept in step with the remote API
///
/// Successful calls update the list; failed calls leave it as it was and
/// record a user-facing message in `last_error`. Calls are not cancelled
/// or ordered: when two overlap, whichever response lands last wins.
pub struct ProductCatalog {
    gateway: Arc<dyn ProductGateway>,
    state: RwLock<CatalogState>,
    in_flight: AtomicUsize,
}

/// Marks the catalog as loading for as long as it is alive
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ProductCatalog {
    pub fn new(gateway: Arc<dyn ProductGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(CatalogState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.read(|state| state.products.clone())
    }

    pub fn find(&self, id: &str) -> Option<Product> {
        self.read(|state| {
            state
                .products
                .iter()
                .find(|p| p.id.as_deref() == Some(id))
                .cloned()
        })
    }

    pub fn len(&self) -> usize {
        self.read(|state| state.products.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.read(|state| state.last_error.clone())
    }

    /// Replace the list with the API's current collection
    pub async fn refresh(&self) -> Result<usize, GatewayError> {
        let _loading = self.begin();

        match self.gateway.list().await {
            Ok(products) => {
                let count = products.len();
                self.write(|state| state.products = products);
                info!(products = count, "Product catalog refreshed");
                Ok(count)
            }
            Err(e) => Err(self.fail("list", e)),
        }
    }

    pub async fn add(&self, draft: ProductDraft) -> Result<Product, GatewayError> {
        let _loading = self.begin();

        match self.gateway.create(&draft).await {
            Ok(product) => {
                self.write(|state| state.products.push(product.clone()));
                info!(product_id = ?product.id, name = %product.name, "Product created");
                Ok(product)
            }
            Err(e) => Err(self.fail("create", e)),
        }
    }

    /// Send the product's fields to the API under its existing id
    pub async fn update(&self, product: &Product) -> Result<Product, GatewayError> {
        let _loading = self.begin();

        let Some(id) = product.id.clone() else {
            return Err(self.fail("update", GatewayError::MissingIdentifier));
        };

        match self.gateway.update(&id, &product.to_draft()).await {
            Ok(mut updated) => {
                if updated.id.is_none() {
                    updated.id = Some(id);
                }
                self.write(|state| {
                    for existing in state.products.iter_mut() {
                        if existing.id == updated.id {
                            *existing = updated.clone();
                        }
                    }
                });
                info!(product_id = ?updated.id, "Product updated");
                Ok(updated)
            }
            Err(e) => Err(self.fail("update", e)),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let _loading = self.begin();

        match self.gateway.delete(id).await {
            Ok(()) => {
                self.write(|state| state.products.retain(|p| p.id.as_deref() != Some(id)));
                info!(product_id = id, "Product deleted");
                Ok(())
            }
            Err(e) => Err(self.fail("delete", e)),
        }
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.write(|state| state.last_error = None);
        LoadingGuard::start(&self.in_flight)
    }

    fn fail(&self, operation: &'static str, error: GatewayError) -> GatewayError {
        warn!(operation, error = %error, "Products API call failed");
        let message = error.user_message().to_string();
        self.write(|state| state.last_error = Some(message));
        error
    }

    fn read<T>(&self, f: impl FnOnce(&CatalogState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut CatalogState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    /// Gateway double backed by a vector, with a switch to fail every call
    #[derive(Default)]
    pub(crate) struct FakeGateway {
        pub products: Mutex<Vec<Product>>,
        pub failing: AtomicBool,
        next_id: AtomicUsize,
    }

    impl FakeGateway {
        pub(crate) fn with_products(products: Vec<Product>) -> Self {
            let gateway = Self::default();
            gateway.next_id.store(100, Ordering::SeqCst);
            *gateway.products.lock().unwrap() = products;
            gateway
        }

        fn check(&self) -> Result<(), GatewayError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(GatewayError::Server { status: 500 });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProductGateway for FakeGateway {
        async fn list(&self) -> Result<Vec<Product>, GatewayError> {
            self.check()?;
            Ok(self.products.lock().unwrap().clone())
        }

        async fn create(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
            self.check()?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
            let product = draft.clone().into_product(Some(id));
            self.products.lock().unwrap().push(product.clone());
            Ok(product)
        }

        async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, GatewayError> {
            self.check()?;
            Ok(draft.clone().into_product(Some(id.to_string())))
        }

        async fn delete(&self, id: &str) -> Result<(), GatewayError> {
            self.check()?;
            let mut products = self.products.lock().unwrap();
            let before = products.len();
            products.retain(|p| p.id.as_deref() != Some(id));
            if products.len() == before {
                return Err(GatewayError::Server { status: 404 });
            }
            Ok(())
        }
    }

    pub(crate) fn sample_products() -> Vec<Product> {
        vec![
            Product {
                id: Some("1".to_string()),
                name: "Mate imperial".to_string(),
                precio: Some(35.0),
                description: "Calabaza forrada en cuero".to_string(),
                categoria: "categoria 2".to_string(),
                image_url: String::new(),
            },
            Product {
                id: Some("2".to_string()),
                name: "Camiseta".to_string(),
                precio: Some(80.0),
                description: "Azul y oro".to_string(),
                categoria: "boca".to_string(),
                image_url: String::new(),
            },
        ]
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            precio: 12.0,
            description: String::new(),
            categoria: "hola".to_string(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_products() {
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::with_products(sample_products())));
        assert!(catalog.is_empty());

        assert_eq!(catalog.refresh().await.unwrap(), 2);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_loading());
        assert!(catalog.last_error().is_none());
    }

    #[tokio::test]
    async fn test_add_appends_created_product() {
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::with_products(sample_products())));
        catalog.refresh().await.unwrap();

        let created = catalog.add(draft("Bombilla")).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("100"));
        assert_eq!(catalog.products().last().unwrap().name, "Bombilla");
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::with_products(sample_products())));
        catalog.refresh().await.unwrap();

        let mut mate = catalog.find("1").unwrap();
        mate.precio = Some(40.0);
        catalog.update(&mate).await.unwrap();

        assert_eq!(catalog.find("1").unwrap().precio, Some(40.0));
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_update_without_id() {
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::default()));
        let mut product = sample_products().remove(0);
        product.id = None;

        let result = catalog.update(&product).await;
        assert!(matches!(result, Err(GatewayError::MissingIdentifier)));
        assert!(catalog.last_error().is_some());
    }

    #[tokio::test]
    async fn test_delete_filters_product() {
        let catalog = ProductCatalog::new(Arc::new(FakeGateway::with_products(sample_products())));
        catalog.refresh().await.unwrap();

        catalog.delete("2").await.unwrap();
        assert!(catalog.find("2").is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_list_unchanged() {
        let gateway = Arc::new(FakeGateway::with_products(sample_products()));
        let catalog = ProductCatalog::new(gateway.clone());
        catalog.refresh().await.unwrap();

        gateway.failing.store(true, Ordering::SeqCst);

        assert!(catalog.add(draft("Nuevo")).await.is_err());
        assert!(catalog.delete("1").await.is_err());
        assert!(catalog.refresh().await.is_err());

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.last_error().as_deref(),
            Some(GatewayError::Server { status: 500 }.user_message())
        );
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let gateway = Arc::new(FakeGateway::with_products(sample_products()));
        let catalog = ProductCatalog::new(gateway.clone());

        gateway.failing.store(true, Ordering::SeqCst);
        assert!(catalog.refresh().await.is_err());
        assert!(catalog.last_error().is_some());

        gateway.failing.store(false, Ordering::SeqCst);
        catalog.refresh().await.unwrap();
        assert!(catalog.last_error().is_none());
    }
}
