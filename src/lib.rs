//! Inventory administration library
//!
//! Client-side handling of an inventory kept behind a REST service: field
//! validation, the local cache and its reconciliation with mutation results,
//! list ordering and selection, the create/edit form flow and a typed client
//! for the service's endpoints.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod forms;
pub mod models;
pub mod notifications;
pub mod presentation;
pub mod services;
pub mod validation;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::client::HttpInventoryClient;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::forms::InventoryForm;
use crate::models::InventoryItem;
use crate::notifications::NotificationService;
use crate::services::InventoryService;
use crate::validation::InventorySchema;

/// Everything a front end needs, wired from one configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub inventory_service: InventoryService,
    pub schema: InventorySchema,
}

impl AppState {
    /// Builds the HTTP client and service described by `config`.
    pub fn from_config(
        config: config::AppConfig,
        notifier: Arc<dyn NotificationService>,
    ) -> Result<Self, ServiceError> {
        let client = HttpInventoryClient::from_config(&config)?;
        let inventory_service =
            InventoryService::new(Arc::new(client), notifier, EventSender::default());
        let schema = InventorySchema::new(config.validation);
        Ok(Self {
            config,
            inventory_service,
            schema,
        })
    }

    /// Form for a new record, validated against the cached product catalog.
    pub async fn create_form(&self) -> InventoryForm {
        let products = self.inventory_service.products().await;
        InventoryForm::create(self.schema.clone(), products, today())
    }

    pub async fn edit_form(&self, item: &InventoryItem) -> InventoryForm {
        let products = self.inventory_service.products().await;
        InventoryForm::edit(item, self.schema.clone(), products, today())
    }
}

/// Current calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
