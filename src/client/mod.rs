//! Access to the remote inventory service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::ServiceError;
use crate::models::{InventoryItem, Product, UnitOfMeasurement};
use crate::presentation::{SortDirection, SortKey};

pub mod http;

pub use http::HttpInventoryClient;

/// Optional criteria for `GET /filterRetrieve`; unset criteria are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<UnitOfMeasurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_before_date: Option<DateTime<Utc>>,
}

impl FilterQuery {
    pub fn is_empty(&self) -> bool {
        self.unit_of_measurement.is_none() && self.amount.is_none() && self.best_before_date.is_none()
    }
}

/// Operations offered by the inventory service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// `GET /inventory`
    async fn find_inventory(&self) -> Result<Vec<InventoryItem>, ServiceError>;

    /// `GET /inventorySorted`
    async fn find_sorted(
        &self,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<InventoryItem>, ServiceError>;

    /// `GET /retrieveInventory`; `None` when the id is unknown.
    async fn retrieve(&self, id: &str) -> Result<Option<InventoryItem>, ServiceError>;

    /// `GET /filterRetrieve`
    async fn filter(&self, query: &FilterQuery) -> Result<Vec<InventoryItem>, ServiceError>;

    /// `POST /inventory`; the service assigns the id.
    async fn create(&self, item: &InventoryItem) -> Result<InventoryItem, ServiceError>;

    /// `POST /update`
    async fn update(&self, item: &InventoryItem) -> Result<InventoryItem, ServiceError>;

    /// `DELETE /inventory`; returns the last record the service removed, if any.
    async fn delete(&self, ids: &[String]) -> Result<Option<InventoryItem>, ServiceError>;

    /// `GET /products`
    async fn find_products(&self) -> Result<Vec<Product>, ServiceError>;
}
