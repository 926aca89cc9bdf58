//! Client-side view of the inventory service: records and product catalog

use crate::models::{product::product_names, InventoryItem, Product};

pub mod reconcile;

pub use reconcile::{apply_delete, apply_upsert, replace_all, DeleteSummary};

/// Cached inventory records plus whether a full list has been retrieved.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    all: Vec<InventoryItem>,
    fetched: bool,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[InventoryItem] {
        &self.all
    }

    pub fn is_fetched(&self) -> bool {
        self.fetched
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.all.iter().find(|item| item.saved_id() == Some(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// A new full fetch is starting.
    pub fn begin_fetch(&mut self) {
        self.fetched = false;
    }

    pub fn replace_all(&mut self, items: Vec<InventoryItem>) {
        self.all = replace_all(&self.all, items);
        self.fetched = true;
    }

    pub fn upsert(&mut self, saved: InventoryItem) {
        self.all = apply_upsert(&self.all, saved);
    }

    pub fn delete<S: AsRef<str>>(&mut self, ids: &[S]) -> DeleteSummary {
        let (kept, summary) = apply_delete(&self.all, ids);
        self.all = kept;
        summary
    }
}

/// Cached product catalog, used to offer and validate product types.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    all: Vec<Product>,
    fetched: bool,
}

impl ProductCatalog {
    pub fn all(&self) -> &[Product] {
        &self.all
    }

    pub fn names(&self) -> Vec<String> {
        product_names(&self.all)
    }

    pub fn is_fetched(&self) -> bool {
        self.fetched
    }

    pub fn begin_fetch(&mut self) {
        self.fetched = false;
    }

    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.all = products;
        self.fetched = true;
    }
}
