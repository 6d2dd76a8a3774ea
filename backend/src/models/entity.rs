//! Traits shared by every persisted record.
//!
//! The generic repository in [`crate::db`] only needs to know three things
//! about a record: which collection it lives in, how to read its identifier,
//! and how to (de)serialize it. [`Entity`] captures exactly that.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::{Deserializer, Serialize};

/// Error returned when an identifier string is not a valid object id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier '{value}': expected 24 hexadecimal characters")]
pub struct IdParseError {
    pub kind: &'static str,
    pub value: String,
}

impl IdParseError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Read an object id written either as a hex string (JSON, this service) or
/// as a native BSON object id, which BSON deserializers present as
/// `{"$oid": "<hex>"}`.
#[doc(hidden)]
pub fn deserialize_object_id<'de, D>(
    deserializer: D,
    kind: &'static str,
) -> Result<ObjectId, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ObjectIdVisitor { kind })
}

struct ObjectIdVisitor {
    kind: &'static str,
}

impl<'de> Visitor<'de> for ObjectIdVisitor {
    type Value = ObjectId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} identifier as hex string or object id", self.kind)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ObjectId, E> {
        ObjectId::parse_str(value).map_err(|_| E::custom(IdParseError::new(self.kind, value)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ObjectId, A::Error> {
        let key: Option<String> = map.next_key()?;
        if key.as_deref() != Some("$oid") {
            return Err(de::Error::custom(format!(
                "expected {} object id, found a document",
                self.kind
            )));
        }
        let hex: String = map.next_value()?;
        self.visit_str(&hex)
    }
}

/// The kinds of record the service persists, one collection each.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Campaign,
    Character,
    Shop,
    Item,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Campaign,
        EntityKind::Character,
        EntityKind::Shop,
        EntityKind::Item,
    ];

    /// Lowercase name used in logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Campaign => "campaign",
            EntityKind::Character => "character",
            EntityKind::Shop => "shop",
            EntityKind::Item => "item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed identifier of an entity. Implemented by `define_id_type!`.
pub trait EntityId:
    Copy
    + Eq
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = IdParseError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    fn generate() -> Self;
}

/// A record stored in its own collection and keyed by its identifier.
///
/// The serialized form must contain the identifier under [`Entity::ID_FIELD`];
/// the repository maps it onto the store's primary key.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: EntityId;

    const KIND: EntityKind;

    /// Name of the identifier field in the JSON representation.
    const ID_FIELD: &'static str = "id";

    /// Fields holding identifiers of other records. Stored as native object ids.
    const REFERENCE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Self::Id;
}
