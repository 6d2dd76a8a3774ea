//! Storage abstraction for the data-access layer.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`record`]: Mapping between entities and stored documents
//! - [`typed`]: [`Repository`], the generic per-entity CRUD surface
//!
//! Backends implement the object-safe [`DocumentStore`] trait, which speaks in
//! raw documents and collection names. [`Repository<E>`] layers entity typing,
//! identifier handling and per-call deadlines on top, so the per-entity
//! operations are written once.
//!
//! ```ignore
//! let shops: Repository<Shop> = Repository::new(store, "shops", Duration::from_secs(5));
//! shops.create(&shop).await?;
//! let in_campaign = shops.list_by(CAMPAIGN_ID_FIELD, &campaign_id.to_string()).await?;
//! ```

use async_trait::async_trait;
use bson::Document;

pub mod error;
pub mod record;
pub mod typed;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use typed::Repository;

/// Key under which every stored document keeps its identifier.
pub const PRIMARY_KEY: &str = "_id";

/// A document store holding one collection per entity kind.
///
/// Identifiers are passed in as canonical hex. Stored documents may hold them
/// as native object ids or as hex strings, and implementations match both.
/// Each method maps to exactly one store round trip.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ping the store.
    ///
    /// # Returns
    /// * `Ok(())` if the store answered
    /// * `Err(RepositoryError)` otherwise
    async fn health_check(&self) -> RepositoryResult<()>;

    /// Insert a new document. The document must contain [`PRIMARY_KEY`].
    ///
    /// # Returns
    /// * `Err(RepositoryError::DuplicateKey)` - If the key is already taken
    async fn insert_one(&self, collection: &str, record: Document) -> RepositoryResult<()>;

    /// Point lookup by primary key.
    async fn find_by_id(&self, collection: &str, id: &str) -> RepositoryResult<Option<Document>>;

    /// All documents whose `field` holds the identifier `value`. Order is
    /// unspecified.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> RepositoryResult<Vec<Document>>;

    /// Replace the whole document stored under `id`.
    ///
    /// # Returns
    /// * `Ok(true)` if a document matched and was replaced
    /// * `Ok(false)` if no document has that key
    async fn replace_one(
        &self,
        collection: &str,
        id: &str,
        record: Document,
    ) -> RepositoryResult<bool>;

    /// Delete the document stored under `id`.
    ///
    /// # Returns
    /// * `Ok(true)` if a document was removed, `Ok(false)` if none existed
    async fn delete_one(&self, collection: &str, id: &str) -> RepositoryResult<bool>;
}
