use std::sync::Arc;

use futures::future;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, instrument, warn};

use crate::{
    cache::{DeleteSummary, InventoryStore, ProductCatalog},
    client::{FilterQuery, InventoryApi},
    errors::ServiceError,
    events::{Event, EventSender},
    models::InventoryItem,
    notifications::{Notification, NotificationService},
    presentation::{SortDirection, SortKey},
};

/// Runs remote inventory calls and folds their results into the local cache.
///
/// Every mutation of the cache happens after the remote call settles, under
/// the store's write lock, against whatever the cache holds at that moment.
/// A failed call leaves the cache untouched and sends an error notification.
#[derive(Clone)]
pub struct InventoryService {
    api: Arc<dyn InventoryApi>,
    inventory: Arc<RwLock<InventoryStore>>,
    products: Arc<RwLock<ProductCatalog>>,
    notifier: Arc<dyn NotificationService>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(
        api: Arc<dyn InventoryApi>,
        notifier: Arc<dyn NotificationService>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            api,
            inventory: Arc::new(RwLock::new(InventoryStore::new())),
            products: Arc::new(RwLock::new(ProductCatalog::default())),
            notifier,
            event_sender,
        }
    }

    /// Fetches the inventory list and the product catalog concurrently.
    /// Each result is applied as soon as its own call completes, so one
    /// failing does not hold back the other.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ServiceError> {
        self.inventory.write().await.begin_fetch();
        self.products.write().await.begin_fetch();
        self.event_sender.send(Event::InventoryFetchStarted);

        let inventory = async {
            match self.api.find_inventory().await {
                Ok(items) => {
                    self.replace_inventory(items).await;
                    Ok(())
                }
                Err(err) => Err(self.report_failure("load inventory", err).await),
            }
        };
        let products = async {
            match self.api.find_products().await {
                Ok(products) => {
                    let count = products.len();
                    self.products.write().await.replace_all(products);
                    self.event_sender.send(Event::ProductsReplaced { count });
                    Ok(())
                }
                Err(err) => Err(self.report_failure("load products", err).await),
            }
        };

        let (inventory, products) = future::join(inventory, products).await;
        inventory.and(products)
    }

    /// True once both the inventory list and the product catalog are fetched.
    pub async fn is_loaded(&self) -> bool {
        self.inventory.read().await.is_fetched() && self.products.read().await.is_fetched()
    }

    /// Refetches the inventory ordered by the service and replaces the cache.
    #[instrument(skip(self))]
    pub async fn refresh_sorted(
        &self,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<InventoryItem>, ServiceError> {
        self.inventory.write().await.begin_fetch();
        self.event_sender.send(Event::InventoryFetchStarted);

        match self.api.find_sorted(key, direction).await {
            Ok(items) => {
                self.replace_inventory(items.clone()).await;
                Ok(items)
            }
            Err(err) => Err(self.report_failure("load sorted inventory", err).await),
        }
    }

    /// Looks a single record up on the service. The cache is not consulted.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, id: &str) -> Result<Option<InventoryItem>, ServiceError> {
        match self.api.retrieve(id).await {
            Ok(item) => Ok(item),
            Err(err) => Err(self.report_failure("retrieve inventory", err).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn filter(&self, query: &FilterQuery) -> Result<Vec<InventoryItem>, ServiceError> {
        match self.api.filter(query).await {
            Ok(items) => Ok(items),
            Err(err) => Err(self.report_failure("filter inventory", err).await),
        }
    }

    /// Creates a draft or updates a saved record, then upserts the result.
    #[instrument(skip(self, item), fields(id = ?item.id, name = %item.name))]
    pub async fn save(&self, item: InventoryItem) -> Result<InventoryItem, ServiceError> {
        let result = if item.is_draft() {
            self.api.create(&item).await
        } else {
            self.api.update(&item).await
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(err) => return Err(self.report_failure("save inventory", err).await),
        };

        self.inventory.write().await.upsert(saved.clone());
        self.event_sender.send(Event::InventoryUpserted {
            id: saved.saved_id().map(str::to_string),
        });
        info!("Saved inventory {:?}", saved.id);
        self.notify(Notification::success(format!(
            "{} successfully saved",
            saved.name
        )))
        .await;

        Ok(saved)
    }

    /// Deletes `ids` on the service, then drops them from the cache.
    #[instrument(skip(self))]
    pub async fn remove(&self, ids: &[String]) -> Result<DeleteSummary, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::InvalidInput(
                "at least one id is required".to_string(),
            ));
        }

        if let Err(err) = self.api.delete(ids).await {
            return Err(self.report_failure("remove inventory", err).await);
        }

        let summary = self.inventory.write().await.delete(ids);
        self.event_sender.send(Event::InventoryDeleted {
            ids: ids.to_vec(),
            removed: summary.removed,
        });
        info!("Removed {} inventory records", summary.removed);
        self.notify(Notification::success(summary.message())).await;

        Ok(summary)
    }

    /// Copy of the cached records, in cache order.
    pub async fn snapshot(&self) -> Vec<InventoryItem> {
        self.inventory.read().await.all().to_vec()
    }

    /// Names from the cached product catalog.
    pub async fn products(&self) -> Vec<String> {
        self.products.read().await.names()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_sender.subscribe()
    }

    async fn replace_inventory(&self, items: Vec<InventoryItem>) {
        let count = items.len();
        self.inventory.write().await.replace_all(items);
        self.event_sender.send(Event::InventoryReplaced { count });
    }

    async fn report_failure(&self, action: &str, err: ServiceError) -> ServiceError {
        error!("Failed to {}: {}", action, err);
        self.notify(Notification::error(err.notification_message()))
            .await;
        err
    }

    async fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.send(notification).await {
            warn!("Notification not delivered: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockInventoryApi;
    use crate::models::Product;
    use crate::notifications::{InMemoryNotificationService, NotificationType};
    use reqwest::StatusCode;

    fn item(id: &str, name: &str) -> InventoryItem {
        InventoryItem {
            id: Some(id.to_string()),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn service(api: MockInventoryApi) -> (InventoryService, InMemoryNotificationService) {
        let notifier = InMemoryNotificationService::new();
        let service = InventoryService::new(
            Arc::new(api),
            Arc::new(notifier.clone()),
            EventSender::default(),
        );
        (service, notifier)
    }

    fn server_error(endpoint: &str) -> ServiceError {
        ServiceError::UnexpectedStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            endpoint: endpoint.to_string(),
        }
    }

    #[tokio::test]
    async fn load_fills_both_stores() {
        let mut api = MockInventoryApi::new();
        api.expect_find_inventory()
            .times(1)
            .returning(|| Ok(vec![item("1", "Amber")]));
        api.expect_find_products()
            .times(1)
            .returning(|| Ok(vec![Product::new("Hops")]));
        let (service, _) = service(api);

        assert!(!service.is_loaded().await);
        service.load().await.unwrap();

        assert!(service.is_loaded().await);
        assert_eq!(service.snapshot().await, vec![item("1", "Amber")]);
        assert_eq!(service.products().await, vec!["Hops".to_string()]);
    }

    #[tokio::test]
    async fn product_failure_still_applies_inventory() {
        let mut api = MockInventoryApi::new();
        api.expect_find_inventory()
            .returning(|| Ok(vec![item("1", "Amber")]));
        api.expect_find_products()
            .returning(|| Err(server_error("GET /products")));
        let (service, notifier) = service(api);

        assert!(service.load().await.is_err());
        assert_eq!(service.snapshot().await.len(), 1);
        assert!(!service.is_loaded().await);
        assert_eq!(notifier.messages().await, vec!["Inventory service error"]);
    }

    #[tokio::test]
    async fn save_creates_drafts_and_upserts() {
        let mut api = MockInventoryApi::new();
        api.expect_create()
            .withf(|item| item.is_draft())
            .times(1)
            .returning(|item| {
                let mut saved = item.clone();
                saved.id = Some("42".into());
                Ok(saved)
            });
        api.expect_update().never();
        let (service, notifier) = service(api);
        let mut events = service.subscribe();

        let saved = service
            .save(InventoryItem {
                name: "Amber".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(saved.saved_id(), Some("42"));
        assert_eq!(service.snapshot().await, vec![saved]);
        assert_eq!(notifier.messages().await, vec!["Amber successfully saved"]);
        assert_eq!(
            events.recv().await.unwrap(),
            Event::InventoryUpserted {
                id: Some("42".into())
            }
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_cache_untouched() {
        let mut api = MockInventoryApi::new();
        api.expect_find_inventory()
            .returning(|| Ok(vec![item("1", "Amber")]));
        api.expect_find_products().returning(|| Ok(Vec::new()));
        api.expect_update()
            .returning(|_| Err(server_error("POST /update")));
        let (service, notifier) = service(api);
        service.load().await.unwrap();

        let result = service.save(item("1", "Renamed")).await;

        assert!(matches!(result, Err(ServiceError::UnexpectedStatus { .. })));
        assert_eq!(service.snapshot().await, vec![item("1", "Amber")]);
        let last = notifier.last().await.unwrap();
        assert_eq!(last.notification_type, NotificationType::Error);
    }

    #[tokio::test]
    async fn remove_reports_single_name_or_count() {
        let mut api = MockInventoryApi::new();
        api.expect_find_inventory().returning(|| {
            Ok(vec![item("1", "Amber"), item("2", "Stout"), item("3", "Lager")])
        });
        api.expect_find_products().returning(|| Ok(Vec::new()));
        api.expect_delete().times(2).returning(|_| Ok(None));
        let (service, notifier) = service(api);
        service.load().await.unwrap();

        service.remove(&["1".to_string()]).await.unwrap();
        let summary = service
            .remove(&["2".to_string(), "3".to_string()])
            .await
            .unwrap();

        assert_eq!(summary.removed, 2);
        assert!(service.snapshot().await.is_empty());
        assert_eq!(
            notifier.messages().await,
            vec!["Amber successfully removed", "2 successfully removed"]
        );
    }

    #[tokio::test]
    async fn remove_requires_ids() {
        let mut api = MockInventoryApi::new();
        api.expect_delete().never();
        let (service, _) = service(api);

        assert!(matches!(
            service.remove(&[]).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
