//! Campaign, character and shop records.
//!
//! Every record carries its own typed identifier and refers to other records
//! by identifier only. Nothing here enforces that a referenced record exists.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use crate::define_id_type;

define_id_type!(UserId, "user");
define_id_type!(CampaignId, "campaign");
define_id_type!(CharacterId, "character");
define_id_type!(ShopId, "shop");
define_id_type!(ItemId, "item");

/// Coin purse across the five standard denominations.
///
/// Not stored in a collection of its own; embedded in characters and items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub copper: u32,
    pub silver: u32,
    pub electrum: u32,
    pub gold: u32,
    pub platinum: u32,
}

impl Balance {
    pub fn new(copper: u32, silver: u32, electrum: u32, gold: u32, platinum: u32) -> Self {
        Self {
            copper,
            silver,
            electrum,
            gold,
            platinum,
        }
    }

    /// Shorthand for a price quoted in gold pieces only.
    pub fn gold(gold: u32) -> Self {
        Self {
            gold,
            ..Default::default()
        }
    }

    /// Total value expressed in copper pieces (1 sp = 10 cp, 1 ep = 50 cp,
    /// 1 gp = 100 cp, 1 pp = 1000 cp).
    pub fn total_in_copper(&self) -> u64 {
        u64::from(self.copper)
            + u64::from(self.silver) * 10
            + u64::from(self.electrum) * 50
            + u64::from(self.gold) * 100
            + u64::from(self.platinum) * 1000
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub owner_id: UserId,
    /// Shop currently open to the players, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_shop: Option<ShopId>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id: CampaignId::generate(),
            name: name.into(),
            owner_id,
            active_shop: None,
        }
    }
}

/// A player character.
///
/// Written as `isInUse` / `balance`. Older clients sent `IsInUse` / `Balance`
/// and older stored documents hold `isinuse`; all of these are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(default, alias = "IsInUse", alias = "isinuse")]
    pub is_in_use: bool,
    #[serde(default, alias = "Balance")]
    pub balance: Balance,
    pub campaign_id: CampaignId,
    pub owner_id: UserId,
}

impl Character {
    pub fn new(name: impl Into<String>, campaign_id: CampaignId, owner_id: UserId) -> Self {
        Self {
            id: CharacterId::generate(),
            name: name.into(),
            is_in_use: false,
            balance: Balance::default(),
            campaign_id,
            owner_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub campaign_id: CampaignId,
}

impl Shop {
    pub fn new(name: impl Into<String>, campaign_id: CampaignId) -> Self {
        Self {
            id: ShopId::generate(),
            name: name.into(),
            campaign_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub shop_id: ShopId,
    #[serde(default)]
    pub cost: Balance,
}

impl Item {
    pub fn new(name: impl Into<String>, shop_id: ShopId, cost: Balance) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.into(),
            shop_id,
            cost,
        }
    }
}

// Foreign-key field names as they appear in stored documents.
pub const OWNER_ID_FIELD: &str = "ownerId";
pub const CAMPAIGN_ID_FIELD: &str = "campaignId";
pub const SHOP_ID_FIELD: &str = "shopId";
pub const ACTIVE_SHOP_FIELD: &str = "activeShop";

impl Entity for User {
    type Id = UserId;
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> UserId {
        self.id
    }
}

impl Entity for Campaign {
    type Id = CampaignId;
    const KIND: EntityKind = EntityKind::Campaign;
    const REFERENCE_FIELDS: &'static [&'static str] = &[OWNER_ID_FIELD, ACTIVE_SHOP_FIELD];

    fn id(&self) -> CampaignId {
        self.id
    }
}

impl Entity for Character {
    type Id = CharacterId;
    const KIND: EntityKind = EntityKind::Character;
    const REFERENCE_FIELDS: &'static [&'static str] = &[CAMPAIGN_ID_FIELD, OWNER_ID_FIELD];

    fn id(&self) -> CharacterId {
        self.id
    }
}

impl Entity for Shop {
    type Id = ShopId;
    const KIND: EntityKind = EntityKind::Shop;
    const REFERENCE_FIELDS: &'static [&'static str] = &[CAMPAIGN_ID_FIELD];

    fn id(&self) -> ShopId {
        self.id
    }
}

impl Entity for Item {
    type Id = ItemId;
    const KIND: EntityKind = EntityKind::Item;
    const REFERENCE_FIELDS: &'static [&'static str] = &[SHOP_ID_FIELD];

    fn id(&self) -> ItemId {
        self.id
    }
}
