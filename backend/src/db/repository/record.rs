//! Conversion between entities and stored documents.
//!
//! Entities serialize their identifier as `id` and every identifier as a hex
//! string. Stored documents keep the identifier under the store's primary key
//! `_id`, and hold it and every reference field as native object ids, so
//! records written by other clients of the same database read back.

use bson::oid::ObjectId;
use bson::{Bson, Document};

use super::error::{RepositoryError, RepositoryResult};
use super::PRIMARY_KEY;
use crate::models::Entity;

/// Stored form of an identifier given in hex.
///
/// Anything that is not a valid object id is kept as the string it was.
pub fn stored_id(hex: &str) -> Bson {
    match ObjectId::parse_str(hex) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(hex.to_string()),
    }
}

/// Both stored forms an identifier may have been written in.
///
/// Documents from this service hold object ids; documents written before
/// the switch may hold hex strings.
pub fn id_candidates(hex: &str) -> Vec<Bson> {
    match stored_id(hex) {
        oid @ Bson::ObjectId(_) => vec![oid, Bson::String(hex.to_string())],
        other => vec![other],
    }
}

/// Whether a stored value holds the identifier `hex`, in either form.
pub fn matches_id(value: &Bson, hex: &str) -> bool {
    match value {
        Bson::String(s) => s == hex,
        Bson::ObjectId(oid) => oid.to_hex().eq_ignore_ascii_case(hex),
        _ => false,
    }
}

fn to_object_id(record: &mut Document, field: &str) {
    if let Some(Bson::String(hex)) = record.get(field) {
        let value = stored_id(hex);
        record.insert(field, value);
    }
}

/// Serialize an entity into the document written to its collection.
pub fn to_record<E: Entity>(entity: &E) -> RepositoryResult<Document> {
    let mut record = bson::to_document(entity)?;
    let id = record.remove(E::ID_FIELD).ok_or_else(|| {
        RepositoryError::internal(format!(
            "{} serialized without an '{}' field",
            E::KIND,
            E::ID_FIELD
        ))
    })?;
    record.insert(PRIMARY_KEY, id);
    to_object_id(&mut record, PRIMARY_KEY);
    for field in E::REFERENCE_FIELDS {
        to_object_id(&mut record, field);
    }
    Ok(record)
}

/// Decode a stored document back into its entity.
///
/// Identifiers are accepted both as native object ids and as hex strings.
pub fn from_record<E: Entity>(mut record: Document) -> RepositoryResult<E> {
    let Some(id) = record.remove(PRIMARY_KEY) else {
        return Err(RepositoryError::decode(format!(
            "{} record has no '{}' field",
            E::KIND,
            PRIMARY_KEY
        )));
    };
    record.insert(E::ID_FIELD, id);
    bson::from_document(record)
        .map_err(|e| RepositoryError::decode(e.to_string()).with_entity(E::KIND.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Balance, Campaign, Item, Shop, ShopId};
    use bson::doc;

    #[test]
    fn test_to_record_moves_id_to_primary_key() {
        let shop_id = ShopId::generate();
        let item = Item::new("Shortsword", shop_id, Balance::gold(10));
        let record = to_record(&item).unwrap();

        assert_eq!(record.get_object_id(PRIMARY_KEY).unwrap(), item.id.value());
        assert!(record.get("id").is_none());
        assert_eq!(record.get_object_id("shopId").unwrap(), shop_id.value());
        assert!(record.get_document("cost").is_ok());
    }

    #[test]
    fn test_record_round_trip_preserves_entity() {
        let shop = Shop::new("The Small Stand", crate::models::CampaignId::generate());
        let decoded: Shop = from_record(to_record(&shop).unwrap()).unwrap();
        assert_eq!(decoded, shop);
    }

    #[test]
    fn test_from_record_accepts_native_object_id() {
        let oid = bson::oid::ObjectId::new();
        let campaign = crate::models::CampaignId::generate();
        let record = doc! {
            "_id": oid,
            "name": "Blue Water Inn",
            "campaignId": campaign.to_string(),
        };
        let shop: Shop = from_record(record).unwrap();
        assert_eq!(shop.id.value(), oid);
    }

    #[test]
    fn test_from_record_accepts_hex_string_keys() {
        let shop = Shop::new("Blue Water Inn", crate::models::CampaignId::generate());
        let record = doc! {
            "_id": shop.id.to_string(),
            "name": "Blue Water Inn",
            "campaignId": shop.campaign_id.to_string(),
        };
        assert_eq!(from_record::<Shop>(record).unwrap(), shop);
    }

    #[test]
    fn test_unset_optional_reference_is_not_stored() {
        let campaign = Campaign::new("Lost Mine", crate::models::UserId::generate());
        let record = to_record(&campaign).unwrap();
        assert!(record.get("activeShop").is_none());
        assert!(record.get_object_id("ownerId").is_ok());
    }

    #[test]
    fn test_matches_id_in_either_form() {
        let oid = bson::oid::ObjectId::new();
        let hex = oid.to_hex();
        assert!(matches_id(&Bson::ObjectId(oid), &hex));
        assert!(matches_id(&Bson::String(hex.clone()), &hex));
        assert!(!matches_id(&Bson::Int32(1), &hex));
        assert_eq!(id_candidates(&hex).len(), 2);
        assert_eq!(id_candidates("a"), vec![Bson::String("a".to_string())]);
    }

    #[test]
    fn test_from_record_rejects_missing_key() {
        let record = doc! { "name": "nameless" };
        let err = from_record::<Shop>(record).unwrap_err();
        assert!(matches!(err, RepositoryError::DecodeError { .. }));
    }

    #[test]
    fn test_from_record_rejects_malformed_fields() {
        let record = doc! { "_id": "65a1f0c2b3d4e5f601234567", "name": 42 };
        let err = from_record::<Shop>(record).unwrap_err();
        assert!(matches!(err, RepositoryError::DecodeError { .. }));
    }
}
