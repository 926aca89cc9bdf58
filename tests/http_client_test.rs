mod common;

use assert_matches::assert_matches;
use inventory_admin::{
    client::{FilterQuery, InventoryApi},
    errors::ServiceError,
    models::{InventoryItem, UnitOfMeasurement},
    presentation::{SortDirection, SortKey},
};
use reqwest::StatusCode;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param, query_param_is_missing},
    Mock, ResponseTemplate,
};

use common::{item_json, TestApp};

#[tokio::test]
async fn find_inventory_decodes_records() {
    let app = TestApp::new().await;
    app.mount_catalog(json!([item_json("1", "Amber"), item_json("2", "Stout")]), &[])
        .await;

    let items = app.client.find_inventory().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].saved_id(), Some("1"));
    assert_eq!(items[0].amount, dec!(10));
    assert_eq!(items[0].unit(), Some(UnitOfMeasurement::Pound));
    assert_eq!(items[1].version, Some(1));
}

#[tokio::test]
async fn find_sorted_sends_key_and_direction() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/inventorySorted"))
        .and(query_param("sortVariable", "averagePrice"))
        .and(query_param("direction", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item_json("3", "Lager")])))
        .expect(1)
        .mount(&app.server)
        .await;

    let items = app
        .client
        .find_sorted(SortKey::AveragePrice, SortDirection::Desc)
        .await
        .unwrap();
    assert_eq!(items[0].name, "Lager");
}

#[tokio::test]
async fn retrieve_treats_null_and_empty_bodies_as_absent() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/retrieveInventory"))
        .and(query_param("id", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/retrieveInventory"))
        .and(query_param("id", "gone"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/retrieveInventory"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("1", "Amber")))
        .mount(&app.server)
        .await;

    assert_eq!(app.client.retrieve("missing").await.unwrap(), None);
    assert_eq!(app.client.retrieve("gone").await.unwrap(), None);
    let found = app.client.retrieve("1").await.unwrap().unwrap();
    assert_eq!(found.name, "Amber");
}

#[tokio::test]
async fn filter_omits_unset_parameters() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/filterRetrieve"))
        .and(query_param("unitOfMeasurement", "PINT"))
        .and(query_param_is_missing("amount"))
        .and(query_param_is_missing("bestBeforeDate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&app.server)
        .await;

    let query = FilterQuery {
        unit_of_measurement: Some(UnitOfMeasurement::Pint),
        ..Default::default()
    };
    assert!(app.client.filter(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_posts_the_record() {
    let app = TestApp::new().await;
    let draft = InventoryItem {
        name: "Amber".into(),
        product_type: "Hops".into(),
        amount: dec!(10),
        unit_of_measurement: "POUND".into(),
        ..Default::default()
    };
    Mock::given(method("POST"))
        .and(path("/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("7", "Amber")))
        .expect(1)
        .mount(&app.server)
        .await;

    let saved = app.client.create(&draft).await.unwrap();
    assert_eq!(saved.saved_id(), Some("7"));
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/update"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&app.server)
        .await;

    let item = InventoryItem {
        id: Some("404".into()),
        name: "Ghost".into(),
        ..Default::default()
    };
    assert_matches!(app.client.update(&item).await, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn delete_sends_ids_as_json_body() {
    let app = TestApp::new().await;
    Mock::given(method("DELETE"))
        .and(path("/inventory"))
        .and(body_json(json!(["1", "2"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("2", "Stout")))
        .expect(1)
        .mount(&app.server)
        .await;

    let last = app
        .client
        .delete(&["1".to_string(), "2".to_string()])
        .await
        .unwrap();
    assert_eq!(last.map(|item| item.name), Some("Stout".to_string()));
}

#[tokio::test]
async fn non_success_status_is_reported_with_endpoint() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.server)
        .await;

    let err = app.client.find_products().await.unwrap_err();
    assert_matches!(
        &err,
        ServiceError::UnexpectedStatus { status, endpoint }
            if *status == StatusCode::SERVICE_UNAVAILABLE && endpoint == "GET /products"
    );
    assert_eq!(err.notification_message(), "Inventory service error");
}

#[tokio::test]
async fn malformed_body_is_a_serialization_error() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&app.server)
        .await;

    assert_matches!(
        app.client.find_inventory().await,
        Err(ServiceError::SerializationError(_))
    );
}
