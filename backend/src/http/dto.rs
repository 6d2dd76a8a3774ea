//! Request bodies for the HTTP API.
//!
//! Responses reuse the domain records directly since they already derive
//! `Serialize`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::AppError;
use crate::models::{CampaignId, Entity, EntityId};

/// Body of the campaign-scoped legacy routes: `{"campaignId": "<hex>"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    #[serde(default)]
    pub campaign_id: Option<String>,
}

impl CampaignRequest {
    /// Parse a raw body. Empty or unparseable bodies yield an empty request,
    /// so the missing field is what gets reported.
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_else(|e| {
            debug!("ignoring unparseable request body: {}", e);
            Self::default()
        })
    }

    pub fn campaign_id(&self) -> Result<CampaignId, AppError> {
        let raw = self
            .campaign_id
            .as_deref()
            .ok_or(AppError::MissingField("campaignId"))?;
        Ok(raw.parse::<CampaignId>()?)
    }
}

/// Decode an entity from a CRUD request body.
///
/// The body may omit `id`: `assigned` is used when given (the path id of an
/// update), otherwise a fresh id is generated. A body `id` that disagrees
/// with `assigned` is rejected.
pub fn entity_from_body<E: Entity>(body: &[u8], assigned: Option<E::Id>) -> Result<E, AppError> {
    let mut value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| AppError::BadRequest(format!("{} body must be a JSON object", E::KIND)))?;

    let given = object.get(E::ID_FIELD).cloned();
    match (given, assigned) {
        (Some(_), None) => {}
        (Some(given), Some(expected)) => {
            if given.as_str() != Some(expected.to_string().as_str()) {
                return Err(AppError::BadRequest(format!(
                    "body id does not match {} {}",
                    E::KIND,
                    expected
                )));
            }
        }
        (None, assigned) => {
            let id = assigned.unwrap_or_else(E::Id::generate);
            object.insert(E::ID_FIELD.to_string(), Value::String(id.to_string()));
        }
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("invalid {} body: {}", E::KIND, e)))
}
