//! Admin mutations and reports over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use bazaar_integration_tests::{TestServer, client};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn admin_client(server: &TestServer) -> Client {
    let http = client();
    http.post(server.url("/unauthorized/simulate-admin"))
        .send()
        .await
        .unwrap();
    http
}

async fn shopper_client(server: &TestServer) -> Client {
    let http = client();
    http.post(server.url("/unauthorized/simulate-user"))
        .send()
        .await
        .unwrap();
    http
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["Id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_admin_api_rejects_non_admins() {
    let server = TestServer::start().await;
    let product = json!({ "name": "Sohan Halwa", "price": 900 });

    for http in [client(), shopper_client(&server).await] {
        let resp = http
            .post(server.url("/api/admin/products"))
            .json(&product)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Admin access required for product creation");
    }

    let resp = client()
        .get(server.url("/api/admin/bundles/analytics"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let all: Value = client()
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 19);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let server = TestServer::start().await;
    let http = admin_client(&server).await;

    let resp = http
        .post(server.url("/api/admin/products"))
        .json(&json!({ "Id": 1, "name": "Sohan Halwa", "price": 900, "stock": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["Id"], 20);
    assert!(created["createdAt"].is_string());

    let resp = http
        .patch(server.url("/api/admin/products/20"))
        .json(&json!({ "price": 950 }))
        .send()
        .await
        .unwrap();
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["price"], 950);
    assert_eq!(updated["name"], "Sohan Halwa");

    let resp = http
        .put(server.url("/api/admin/products/20/stock"))
        .json(&json!({ "stock": 40 }))
        .send()
        .await
        .unwrap();
    let stocked: Value = resp.json().await.unwrap();
    assert_eq!(stocked["stock"], 40);

    let resp = http
        .delete(server.url("/api/admin/products/20"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = http
        .get(server.url("/api/products/20"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Deleted ids are not handed out again.
    let created: Value = http
        .post(server.url("/api/admin/products"))
        .json(&json!({ "name": "Sajji Masala" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["Id"], 21);
}

#[tokio::test]
async fn test_admin_errors_map_to_status_codes() {
    let server = TestServer::start().await;
    let http = admin_client(&server).await;

    let resp = http
        .patch(server.url("/api/admin/products/999"))
        .json(&json!({ "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Product not found: 999");

    let resp = http
        .post(server.url("/api/admin/products"))
        .json(&json!({ "name": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = http
        .delete(server.url("/api/admin/categories/99"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inventory_reports_and_bulk_updates() {
    let server = TestServer::start().await;
    let http = admin_client(&server).await;

    let low: Value = http
        .get(server.url("/api/admin/products/low-stock"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&low), vec![3, 7, 11, 17]);

    let low: Value = http
        .get(server.url("/api/admin/products/low-stock?threshold=5"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&low), vec![11]);

    let updated: Value = http
        .post(server.url("/api/admin/products/bulk"))
        .json(&json!([
            { "Id": 3, "stock": 60 },
            { "Id": 999, "stock": 1 },
            { "stock": 1 }
        ]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&updated), vec![3]);
    assert_eq!(updated[0]["stock"], 60);
}

#[tokio::test]
async fn test_category_management() {
    let server = TestServer::start().await;
    let http = admin_client(&server).await;

    let resp = http
        .post(server.url("/api/admin/categories"))
        .json(&json!({ "name": "Bakery", "icon": "Croissant" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["Id"], 7);

    let updated: Value = http
        .patch(server.url("/api/admin/categories/7"))
        .json(&json!({ "description": "Naan and rusks" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["description"], "Naan and rusks");
    assert_eq!(updated["icon"], "Croissant");
}

#[tokio::test]
async fn test_bundle_management_and_analytics() {
    let server = TestServer::start().await;
    let http = admin_client(&server).await;

    let created: Value = http
        .post(server.url("/api/admin/bundles"))
        .json(&json!({
            "name": "Chapli Kabab Night",
            "category": "Main Course",
            "prepTime": 30,
            "status": "draft"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["Id"], 8);
    assert_eq!(created["status"], "active");
    assert_eq!(created["components"], json!([]));

    let changed: Value = http
        .post(server.url("/api/admin/bundles/status"))
        .json(&json!({ "ids": [5, 6, 99], "status": "archived" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&changed), vec![5, 6]);
    assert!(changed.as_array().unwrap().iter().all(|b| b["status"] == "archived"));

    let analytics: Value = http
        .get(server.url("/api/admin/bundles/analytics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(analytics["totalBundles"], 8);
    assert_eq!(analytics["activeBundles"], 6);
    assert_eq!(analytics["featuredBundles"], 4);
    assert_eq!(analytics["categoryCounts"]["Main Course"], 4);
    assert_eq!(analytics["categoryCounts"]["Drinks"], 2);
}
