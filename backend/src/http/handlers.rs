//! HTTP handlers for the REST API.
//!
//! The legacy campaign routes read `campaignId` from the request body rather
//! than from the path, so they take the raw body and parse it leniently.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use super::dto::{entity_from_body, CampaignRequest};
use super::error::AppError;
use super::state::AppState;
use crate::db::HealthStatus;
use crate::models::{Campaign, CampaignId, Character, Entity, Item, Shop, ShopId, UserId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_id<E: Entity>(raw: &str) -> Result<E::Id, AppError> {
    Ok(raw.parse::<E::Id>()?)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// 200 when the store answers its ping, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.service.health().await;
    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

// =============================================================================
// Campaign routes
// =============================================================================

/// GET /get-campaign-shops
///
/// Body: `{"campaignId": "<hex>"}`. An unknown campaign yields `[]`.
pub async fn get_campaign_shops(
    State(state): State<AppState>,
    body: Bytes,
) -> HandlerResult<Vec<Shop>> {
    let campaign_id = CampaignRequest::from_body(&body).campaign_id()?;
    let shops = state.service.get_campaign_shops(campaign_id).await?;
    debug!(%campaign_id, count = shops.len(), "listed campaign shops");
    Ok(Json(shops))
}

/// GET /get-current-shop
///
/// Body: `{"campaignId": "<hex>"}`. Returns the campaign's active shop.
pub async fn get_current_shop(
    State(state): State<AppState>,
    body: Bytes,
) -> HandlerResult<Shop> {
    let campaign_id = CampaignRequest::from_body(&body).campaign_id()?;
    let shop = state.service.get_current_shop(campaign_id).await?;
    Ok(Json(shop))
}

// =============================================================================
// Generic CRUD
// =============================================================================

/// POST /v1/{collection}
pub async fn create_entity<E: Entity>(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<E>), AppError> {
    let entity: E = entity_from_body(&body, None)?;
    state.service.create(&entity).await?;
    info!(kind = %E::KIND, id = %entity.id(), "created record");
    Ok((StatusCode::CREATED, Json(entity)))
}

/// GET /v1/{collection}/{id}
pub async fn get_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<E> {
    let id = parse_id::<E>(&id)?;
    let entity = state.service.get::<E>(id).await?;
    Ok(Json(entity))
}

/// PUT /v1/{collection}/{id}
///
/// Full replacement. The body may omit `id`; if present it must match the path.
pub async fn update_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let id = parse_id::<E>(&id)?;
    let entity: E = entity_from_body(&body, Some(id))?;
    state.service.update(&entity).await?;
    info!(kind = %E::KIND, %id, "updated record");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/{collection}/{id}
pub async fn delete_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id::<E>(&id)?;
    state.service.delete::<E>(id).await?;
    info!(kind = %E::KIND, %id, "deleted record");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Scoped lists
// =============================================================================

/// GET /v1/users/{id}/campaigns
pub async fn list_user_campaigns(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Vec<Campaign>> {
    let user_id = id.parse::<UserId>()?;
    Ok(Json(state.service.get_user_campaigns(user_id).await?))
}

/// GET /v1/users/{id}/characters
pub async fn list_user_characters(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Vec<Character>> {
    let user_id = id.parse::<UserId>()?;
    Ok(Json(state.service.get_user_characters(user_id).await?))
}

/// GET /v1/shops/{id}/items
pub async fn list_shop_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Vec<Item>> {
    let shop_id = id.parse::<ShopId>()?;
    Ok(Json(state.service.get_shop_items(shop_id).await?))
}

/// GET /v1/campaigns/{id}/shops
pub async fn list_campaign_shops(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Vec<Shop>> {
    let campaign_id = id.parse::<CampaignId>()?;
    Ok(Json(state.service.get_campaign_shops(campaign_id).await?))
}
