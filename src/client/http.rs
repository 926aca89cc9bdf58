use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{FilterQuery, InventoryApi};
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{InventoryItem, Product};
use crate::presentation::{SortDirection, SortKey};

/// `InventoryApi` over HTTP/JSON.
#[derive(Clone, Debug)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpInventoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(base_url)?;
        // Endpoints are joined relative to the base, which needs a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with {}", endpoint, status);
            return Err(ServiceError::UnexpectedStatus {
                status,
                endpoint: endpoint.to_string(),
            });
        }
        debug!("{} responded with {}", endpoint, status);
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Some endpoints answer an empty body or `null` when nothing matched.
    async fn decode_optional<T: DeserializeOwned>(
        response: Response,
    ) -> Result<Option<T>, ServiceError> {
        let body = response.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(trimmed)?))
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    #[instrument(skip(self))]
    async fn find_inventory(&self) -> Result<Vec<InventoryItem>, ServiceError> {
        let url = self.endpoint("inventory")?;
        let response = self.send(self.client.get(url), "GET /inventory").await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn find_sorted(
        &self,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<InventoryItem>, ServiceError> {
        let url = self.endpoint("inventorySorted")?;
        let request = self
            .client
            .get(url)
            .query(&[("sortVariable", key.as_str()), ("direction", direction.as_str())]);
        let response = self.send(request, "GET /inventorySorted").await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn retrieve(&self, id: &str) -> Result<Option<InventoryItem>, ServiceError> {
        let url = self.endpoint("retrieveInventory")?;
        let request = self.client.get(url).query(&[("id", id)]);
        let response = self.send(request, "GET /retrieveInventory").await?;
        Self::decode_optional(response).await
    }

    #[instrument(skip(self))]
    async fn filter(&self, query: &FilterQuery) -> Result<Vec<InventoryItem>, ServiceError> {
        let url = self.endpoint("filterRetrieve")?;
        let request = self.client.get(url).query(query);
        let response = self.send(request, "GET /filterRetrieve").await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    async fn create(&self, item: &InventoryItem) -> Result<InventoryItem, ServiceError> {
        let url = self.endpoint("inventory")?;
        let response = self
            .send(self.client.post(url).json(item), "POST /inventory")
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, item), fields(id = ?item.id))]
    async fn update(&self, item: &InventoryItem) -> Result<InventoryItem, ServiceError> {
        let url = self.endpoint("update")?;
        let response = self
            .send(self.client.post(url).json(item), "POST /update")
            .await?;
        Self::decode_optional(response).await?.ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Inventory {}",
                item.saved_id().unwrap_or("<unsaved>")
            ))
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, ids: &[String]) -> Result<Option<InventoryItem>, ServiceError> {
        let url = self.endpoint("inventory")?;
        let response = self
            .send(self.client.delete(url).json(ids), "DELETE /inventory")
            .await?;
        Self::decode_optional(response).await
    }

    #[instrument(skip(self))]
    async fn find_products(&self) -> Result<Vec<Product>, ServiceError> {
        let url = self.endpoint("products")?;
        let response = self.send(self.client.get(url), "GET /products").await?;
        Self::decode(response).await
    }
}
