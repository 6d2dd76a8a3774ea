//! Functional tests for the HTTP routes.
//!
//! Requests go through the full router (handlers, data service and the
//! in-memory store), so status codes and bodies are checked as clients see
//! them.

#![cfg(feature = "http-server")]

mod support;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use shopkeep::db::{DataService, LocalRepository};
use shopkeep::http::{create_router, AppState};
use shopkeep::models::{Balance, Campaign, CampaignId, Item, Shop, ShopId, User, UserId};

fn app() -> (Router, DataService, LocalRepository) {
    let (service, store) = support::local_service();
    let router = create_router(AppState::new(service.clone()));
    (router, service, store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_raw(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Owner, campaign "Curse of Strahd" and its open shop "The Small Stand".
async fn seed_strahd(service: &DataService) -> (Campaign, Shop) {
    let owner = User::new("dm");
    let mut campaign = Campaign::new("Curse of Strahd", owner.id);
    let shop = Shop::new("The Small Stand", campaign.id);
    campaign.active_shop = Some(shop.id);

    service.create(&owner).await.unwrap();
    service.create(&campaign).await.unwrap();
    service.create(&shop).await.unwrap();
    (campaign, shop)
}

// =========================================================
// Health
// =========================================================

#[tokio::test]
async fn test_health_ok() {
    let (app, _, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["message"], json!("It's healthy"));
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let (app, _, store) = app();
    store.set_healthy(false);

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["message"], json!("db down"));
    assert!(body["detail"].is_string());
}

// =========================================================
// Campaign routes
// =========================================================

#[tokio::test]
async fn test_get_current_shop_returns_active_shop() {
    let (app, service, _) = app();
    let (campaign, shop) = seed_strahd(&service).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/get-current-shop",
        Some(json!({ "campaignId": campaign.id.to_string() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(shop.id.to_string()));
    assert_eq!(body["name"], json!("The Small Stand"));
    assert_eq!(body["campaignId"], json!(campaign.id.to_string()));
    let decoded: Shop = serde_json::from_value(body).unwrap();
    assert_eq!(decoded, shop);
}

#[tokio::test]
async fn test_current_shop_end_to_end_over_http() {
    let (app, _, _) = app();
    let owner = UserId::generate();

    let (status, campaign) = send(
        &app,
        Method::POST,
        "/v1/campaigns",
        Some(json!({ "name": "Curse of Strahd", "ownerId": owner.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let campaign_id = campaign["id"].as_str().unwrap().to_string();

    let (status, shop) = send(
        &app,
        Method::POST,
        "/v1/shops",
        Some(json!({ "name": "The Small Stand", "campaignId": campaign_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/campaigns/{}", campaign_id),
        Some(json!({
            "name": "Curse of Strahd",
            "ownerId": owner.to_string(),
            "activeShop": shop["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // legacy clients send the body with GET
    let (status, current) = send(
        &app,
        Method::GET,
        "/get-current-shop",
        Some(json!({ "campaignId": campaign_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current, shop);
}

#[tokio::test]
async fn test_get_campaign_shops_lists_only_that_campaign() {
    let (app, service, _) = app();
    let (campaign, shop) = seed_strahd(&service).await;
    let inn = Shop::new("Blue Water Inn", campaign.id);
    service.create(&inn).await.unwrap();
    service
        .create(&Shop::new("Elsewhere", CampaignId::generate()))
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/get-campaign-shops",
        Some(json!({ "campaignId": campaign.id.to_string() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let shops: Vec<Shop> = serde_json::from_value(body).unwrap();
    assert_eq!(shops.len(), 2);
    assert!(shops.contains(&shop));
    assert!(shops.contains(&inn));
}

#[tokio::test]
async fn test_get_campaign_shops_accepts_body_on_get() {
    let (app, service, _) = app();
    let (campaign, shop) = seed_strahd(&service).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/get-campaign-shops",
        Some(json!({ "campaignId": campaign.id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let shops: Vec<Shop> = serde_json::from_value(body).unwrap();
    assert_eq!(shops, vec![shop]);

    let (status, _) = send(&app, Method::GET, "/get-campaign-shops", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_campaign_shops_unknown_campaign_is_empty() {
    let (app, _, _) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/get-campaign-shops",
        Some(json!({ "campaignId": CampaignId::generate().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_missing_campaign_id_is_404() {
    let (app, _, _) = app();
    for uri in ["/get-campaign-shops", "/get-current-shop"] {
        let (status, body) = send(&app, Method::POST, uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "error": "could not find campaignId value in request body" })
        );
    }
}

#[tokio::test]
async fn test_empty_or_garbled_body_is_404() {
    let (app, _, _) = app();
    for body in ["", "not json at all"] {
        let (status, value) = post_raw(&app, "/get-current-shop", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(value["error"].as_str().unwrap().contains("campaignId"));
    }
}

#[tokio::test]
async fn test_malformed_campaign_id_is_504() {
    let (app, _, _) = app();
    for uri in ["/get-campaign-shops", "/get-current-shop"] {
        let (status, body) =
            send(&app, Method::POST, uri, Some(json!({ "campaignId": "abc" }))).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }
}

#[tokio::test]
async fn test_current_shop_of_unknown_campaign_is_504() {
    let (app, _, _) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/get-current-shop",
        Some(json!({ "campaignId": CampaignId::generate().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_current_shop_without_active_shop_is_504() {
    let (app, service, _) = app();
    let campaign = Campaign::new("Lost Mine", UserId::generate());
    service.create(&campaign).await.unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/get-current-shop",
        Some(json!({ "campaignId": campaign.id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("no active shop"));
}

#[tokio::test]
async fn test_store_outage_is_504() {
    let (app, service, store) = app();
    let (campaign, _) = seed_strahd(&service).await;
    store.set_healthy(false);

    let (status, _) = send(
        &app,
        Method::POST,
        "/get-campaign-shops",
        Some(json!({ "campaignId": campaign.id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

// =========================================================
// /v1 CRUD
// =========================================================

#[tokio::test]
async fn test_crud_round_trip() {
    let (app, _, _) = app();
    let campaign = CampaignId::generate();

    let (status, created) = send(
        &app,
        Method::POST,
        "/v1/shops",
        Some(json!({ "name": "The Small Stand", "campaignId": campaign.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, fetched) = send(&app, Method::GET, &format!("/v1/shops/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/shops/{}", id),
        Some(json!({ "name": "The Large Stand", "campaignId": campaign.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(&app, Method::GET, &format!("/v1/shops/{}", id), None).await;
    assert_eq!(fetched["name"], json!("The Large Stand"));

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/shops/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/v1/shops/{}", id), None).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    // deleting an absent record is still a success
    let (status, _) = send(&app, Method::DELETE, &format!("/v1/shops/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_create_with_client_id_and_duplicate() {
    let (app, _, _) = app();
    let user = User::new("player one");
    let body = serde_json::to_value(&user).unwrap();

    let (status, created) = send(&app, Method::POST, "/v1/users", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], json!(user.id.to_string()));

    let (status, err) = send(&app, Method::POST, "/v1/users", Some(body)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(err["error"].as_str().unwrap().contains("Duplicate key"));
}

#[tokio::test]
async fn test_update_id_mismatch_is_400() {
    let (app, service, _) = app();
    let shop = Shop::new("Stand", CampaignId::generate());
    service.create(&shop).await.unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/shops/{}", shop.id),
        Some(json!({
            "id": ShopId::generate().to_string(),
            "name": "Stand",
            "campaignId": shop.campaign_id.to_string(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_record_is_504() {
    let (app, _, _) = app();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/shops/{}", ShopId::generate()),
        Some(json!({ "name": "Ghost", "campaignId": CampaignId::generate().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_invalid_body_is_400() {
    let (app, _, _) = app();
    let (status, body) = send(&app, Method::POST, "/v1/items", Some(json!({ "name": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_path_id_is_504() {
    let (app, _, _) = app();
    let (status, _) = send(&app, Method::GET, "/v1/campaigns/not-an-id", None).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

// =========================================================
// /v1 scoped lists
// =========================================================

#[tokio::test]
async fn test_scoped_lists() {
    let (app, service, _) = app();
    let (campaign, shop) = seed_strahd(&service).await;
    let sword = Item::new("Shortsword", shop.id, Balance::gold(10));
    service.create(&sword).await.unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/users/{}/campaigns", campaign.owner_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let campaigns: Vec<Campaign> = serde_json::from_value(body).unwrap();
    assert_eq!(campaigns, vec![campaign.clone()]);

    let (_, body) = send(&app, Method::GET, &format!("/v1/shops/{}/items", shop.id), None).await;
    let items: Vec<Item> = serde_json::from_value(body).unwrap();
    assert_eq!(items, vec![sword]);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/v1/campaigns/{}/shops", campaign.id),
        None,
    )
    .await;
    let shops: Vec<Shop> = serde_json::from_value(body).unwrap();
    assert_eq!(shops, vec![shop]);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/users/{}/characters", campaign.owner_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
