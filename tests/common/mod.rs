#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use inventory_admin::{
    client::HttpInventoryClient, events::EventSender,
    notifications::InMemoryNotificationService, services::InventoryService,
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// An inventory service stand-in plus a client and service pointed at it.
pub struct TestApp {
    pub server: MockServer,
    pub client: HttpInventoryClient,
    pub service: InventoryService,
    pub notifications: InMemoryNotificationService,
}

impl TestApp {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let client = HttpInventoryClient::new(&server.uri(), Duration::from_secs(2))
            .expect("mock server uri is a valid base url");
        let notifications = InMemoryNotificationService::new();
        let service = InventoryService::new(
            Arc::new(client.clone()),
            Arc::new(notifications.clone()),
            EventSender::default(),
        );

        Self {
            server,
            client,
            service,
            notifications,
        }
    }

    /// Answers `GET /inventory` and `GET /products` with the given bodies.
    pub async fn mount_catalog(&self, inventory: Value, products: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/inventory"))
            .respond_with(ResponseTemplate::new(200).set_body_json(inventory))
            .mount(&self.server)
            .await;

        let products: Vec<Value> = products.iter().map(|name| json!({ "name": name })).collect();
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products))
            .mount(&self.server)
            .await;
    }
}

/// Wire form of an inventory record.
pub fn item_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "productType": "Hops",
        "description": null,
        "amount": 10,
        "averagePrice": 2.5,
        "unitOfMeasurement": "POUND",
        "bestBeforeDate": "2030-01-31T00:00:00.000Z",
        "neverExpires": false,
        "version": 1
    })
}
