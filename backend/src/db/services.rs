//! High-level data-access service.
//!
//! [`DataService`] is what handlers talk to. It owns the store handle and the
//! immutable [`ServiceConfig`], hands out a typed [`Repository`] per entity
//! kind, and names the queries the HTTP layer needs.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use shopkeep::db::{DataService, ServiceConfig, repositories::LocalRepository};
//! use shopkeep::models::{Campaign, User};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = DataService::new(Arc::new(LocalRepository::new()), ServiceConfig::default());
//!
//!     let owner = User::new("dm");
//!     service.create(&owner).await?;
//!     service.create(&Campaign::new("Curse of Strahd", owner.id)).await?;
//!
//!     let campaigns = service.get_user_campaigns(owner.id).await?;
//!     println!("{} owns {} campaign(s)", owner.username, campaigns.len());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::config::ServiceConfig;
use super::repository::{DocumentStore, Repository, RepositoryError, RepositoryResult};
use crate::models::{
    Campaign, CampaignId, Character, Entity, Item, Shop, ShopId, UserId, CAMPAIGN_ID_FIELD,
    OWNER_ID_FIELD, SHOP_ID_FIELD,
};

/// Outcome of the liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            ok: true,
            message: "It's healthy".to_string(),
            detail: None,
        }
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: "db down".to_string(),
            detail: Some(detail.into()),
        }
    }
}

/// Entity-level operations over a [`DocumentStore`].
#[derive(Clone)]
pub struct DataService {
    store: Arc<dyn DocumentStore>,
    config: ServiceConfig,
}

impl DataService {
    pub fn new(store: Arc<dyn DocumentStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Typed repository for `E`, bound to its configured collection.
    pub fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(
            Arc::clone(&self.store),
            self.config.collections.for_kind(E::KIND),
            self.config.operation_timeout,
        )
    }

    // ==================== CRUD ====================

    /// Insert a new record. Fails with `DuplicateKey` if the id is taken.
    pub async fn create<E: Entity>(&self, entity: &E) -> RepositoryResult<()> {
        self.repository::<E>().create(entity).await
    }

    /// Fetch a record. Fails with `NotFound` if absent.
    pub async fn get<E: Entity>(&self, id: E::Id) -> RepositoryResult<E> {
        self.repository::<E>().get(id).await
    }

    /// Replace a record in full. Fails with `NotFound` if absent.
    pub async fn update<E: Entity>(&self, entity: &E) -> RepositoryResult<()> {
        self.repository::<E>().update(entity).await
    }

    /// Delete a record; absent ids are a no-op.
    pub async fn delete<E: Entity>(&self, id: E::Id) -> RepositoryResult<()> {
        self.repository::<E>().delete(id).await
    }

    // ==================== Scoped queries ====================

    pub async fn get_user_campaigns(&self, user_id: UserId) -> RepositoryResult<Vec<Campaign>> {
        self.repository::<Campaign>()
            .list_by(OWNER_ID_FIELD, &user_id.to_string())
            .await
    }

    pub async fn get_user_characters(&self, user_id: UserId) -> RepositoryResult<Vec<Character>> {
        self.repository::<Character>()
            .list_by(OWNER_ID_FIELD, &user_id.to_string())
            .await
    }

    pub async fn get_shop_items(&self, shop_id: ShopId) -> RepositoryResult<Vec<Item>> {
        self.repository::<Item>()
            .list_by(SHOP_ID_FIELD, &shop_id.to_string())
            .await
    }

    /// Shops belonging to a campaign. An unknown campaign yields an empty list.
    pub async fn get_campaign_shops(&self, campaign_id: CampaignId) -> RepositoryResult<Vec<Shop>> {
        self.repository::<Shop>()
            .list_by(CAMPAIGN_ID_FIELD, &campaign_id.to_string())
            .await
    }

    /// The shop a campaign currently has open.
    ///
    /// Fails with `NotFound` if the campaign does not exist, has no active
    /// shop, or points at a shop that no longer exists.
    pub async fn get_current_shop(&self, campaign_id: CampaignId) -> RepositoryResult<Shop> {
        let campaign: Campaign = self.get(campaign_id).await?;
        let shop_id = campaign.active_shop.ok_or_else(|| {
            RepositoryError::not_found(format!("campaign {} has no active shop", campaign_id))
                .with_operation("get_current_shop")
                .with_entity("campaign")
                .with_entity_id(campaign_id)
        })?;
        self.get::<Shop>(shop_id).await
    }

    // ==================== Health ====================

    /// Ping the store within the configured health deadline.
    ///
    /// Never fails: an unreachable store is reported as `ok: false`.
    pub async fn health(&self) -> HealthStatus {
        let deadline = self.config.health_timeout;
        match tokio::time::timeout(deadline, self.store.health_check()).await {
            Ok(Ok(())) => HealthStatus::healthy(),
            Ok(Err(e)) => {
                warn!("Health check failed: {}", e);
                HealthStatus::unhealthy(e.to_string())
            }
            Err(_) => {
                warn!("Health check timed out after {} ms", deadline.as_millis());
                HealthStatus::unhealthy(format!(
                    "store did not answer within {} ms",
                    deadline.as_millis()
                ))
            }
        }
    }

    /// Log the configured collections once at startup.
    pub fn log_configuration(&self) {
        let names = &self.config.collections;
        info!(
            "Collections: users='{}' campaigns='{}' characters='{}' shops='{}' items='{}'",
            names.user, names.campaign, names.character, names.shop, names.item
        );
    }
}
