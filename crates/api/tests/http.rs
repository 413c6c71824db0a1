//! HTTP surface tests driven through the router with `tower::ServiceExt`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;

use stockbook_api::app::build_app;
use stockbook_catalog::{Item, ItemId};
use stockbook_core::{Money, RecordId, TaxRate, TenantId};
use stockbook_store::{ApiKey, Database, TransactionError};

const KEY: &str = "test-key";

fn seeded_app(item_count: usize) -> (Router, TenantId, Vec<ItemId>) {
    let db = Arc::new(Database::new());
    let tenant_id = TenantId::new();
    db.insert_api_key(ApiKey::new(KEY, tenant_id, "test", Utc::now()))
        .unwrap();

    let mut item_ids = Vec::new();
    db.transaction(tenant_id, |state| {
        for i in 0..item_count {
            let item_id = ItemId::new(RecordId::new());
            let item = Item::new(
                item_id,
                tenant_id,
                format!("SKU-{i:03}"),
                format!("Item {i}"),
                Money::from_minor(100),
                Money::from_minor(250),
                TaxRate::ZERO,
                0,
                Utc::now(),
            )?;
            state.items.insert(item_id, item);
            item_ids.push(item_id);
        }
        Ok::<_, TransactionError>(())
    })
    .unwrap();

    (build_app(db), tenant_id, item_ids)
}

async fn get(app: &Router, uri: &str, key: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_requires_no_key() {
    let (app, _, _) = seeded_app(0);
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn missing_or_unknown_key_is_unauthorized() {
    let (app, _, _) = seeded_app(1);

    let (status, _) = get(&app, "/items", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/items", Some("wrong-key")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn items_default_to_page_one_of_ten() {
    let (app, _, _) = seeded_app(25);

    let (status, body) = get(&app, "/items", Some(KEY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["total"], 25);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 10);
    // SKU-sorted: the first page starts at SKU-000.
    assert_eq!(body["data"]["items"][0]["sku"], "SKU-000");
}

#[tokio::test]
async fn explicit_page_and_limit_are_honored() {
    let (app, _, _) = seeded_app(25);

    let (status, body) = get(&app, "/items?page=3&limit=10", Some(KEY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["items"][0]["sku"], "SKU-020");
}

#[tokio::test]
async fn single_item_round_trips() {
    let (app, _, item_ids) = seeded_app(3);

    let uri = format!("/items/{}", item_ids[0]);
    let (status, body) = get(&app, &uri, Some(KEY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sku"], "SKU-000");
}

#[tokio::test]
async fn unknown_item_is_a_404_envelope() {
    let (app, _, _) = seeded_app(1);

    let uri = format!("/items/{}", RecordId::new());
    let (status, body) = get(&app, &uri, Some(KEY)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_item_id_is_a_400() {
    let (app, _, _) = seeded_app(1);

    let (status, body) = get(&app, "/items/not-a-uuid", Some(KEY)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn organisation_listing_matches_the_keys_tenant() {
    let (app, tenant_id, _) = seeded_app(2);

    let uri = format!("/organisations/{tenant_id}/items");
    let (status, body) = get(&app, &uri, Some(KEY)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn foreign_organisation_id_reads_as_404() {
    let (app, _, _) = seeded_app(2);

    let uri = format!("/organisations/{}/items", TenantId::new());
    let (status, body) = get(&app, &uri, Some(KEY)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
