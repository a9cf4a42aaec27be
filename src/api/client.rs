use crate::core::error::GatewayError;
use crate::models::product::{Product, ProductDraft};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// CRUD access to the remote products collection
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, GatewayError>;

    /// Create a product; the API assigns its identifier
    async fn create(&self, draft: &ProductDraft) -> Result<Product, GatewayError>;

    async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, GatewayError>;

    async fn delete(&self, id: &str) -> Result<(), GatewayError>;
}

/// reqwest implementation over a REST collection endpoint
///
/// list = GET base, create = POST base, update = PUT base/{id},
/// delete = DELETE base/{id}. No retries.
pub struct HttpProductGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpProductGateway {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn item_url(&self, id: &str) -> Result<String, GatewayError> {
        if id.trim().is_empty() {
            return Err(GatewayError::MissingIdentifier);
        }
        Ok(format!("{}/{}", self.endpoint, id))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = request.send().await.map_err(GatewayError::Network)?;

        if !response.status().is_success() {
            return Err(GatewayError::Server {
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    async fn send_for_product(&self, request: reqwest::RequestBuilder) -> Result<Product, GatewayError> {
        self.send(request)
            .await?
            .json::<Product>()
            .await
            .map_err(GatewayError::Decode)
    }
}

#[async_trait]
impl ProductGateway for HttpProductGateway {
    async fn list(&self) -> Result<Vec<Product>, GatewayError> {
        self.send(self.client.get(&self.endpoint))
            .await?
            .json::<Vec<Product>>()
            .await
            .map_err(GatewayError::Decode)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
        self.send_for_product(self.client.post(&self.endpoint).json(draft))
            .await
    }

    async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, GatewayError> {
        let url = self.item_url(id)?;
        self.send_for_product(self.client.put(url).json(draft)).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.item_url(id)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
