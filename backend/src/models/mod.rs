//! Domain records and their identifiers.

pub mod domain;
pub mod entity;
pub mod macros;

pub use domain::*;
pub use entity::{deserialize_object_id, Entity, EntityId, EntityKind, IdParseError};
