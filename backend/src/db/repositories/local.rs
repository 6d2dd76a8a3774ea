//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`DocumentStore`] suitable
//! for unit testing and local development. All data is stored in memory using
//! HashMaps, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use bson::{Bson, Document};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::record::matches_id;
use crate::db::repository::{DocumentStore, RepositoryError, RepositoryResult, PRIMARY_KEY};

/// In-memory local repository.
///
/// Cloning shares the underlying data, so a test can keep a handle for
/// inspection or fault injection while the service owns another.
///
/// # Example
/// ```
/// use shopkeep::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.record_count("shops"), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    // collection name -> primary key -> document
    collections: HashMap<String, HashMap<String, Document>>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            collections: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy, every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        self.data.write().collections.clear();
    }

    /// Get the number of documents stored in a collection.
    pub fn record_count(&self, collection: &str) -> usize {
        self.data
            .read()
            .collections
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Store a raw document, bypassing entity serialization.
    ///
    /// Lets tests plant malformed records.
    pub fn insert_raw(&self, collection: &str, record: Document) -> RepositoryResult<()> {
        let key = primary_key(&record)?;
        self.data
            .write()
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(key, record);
        Ok(())
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(data: &LocalData) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn primary_key(record: &Document) -> RepositoryResult<String> {
    match record.get(PRIMARY_KEY) {
        Some(Bson::String(key)) => Ok(key.clone()),
        Some(Bson::ObjectId(oid)) => Ok(oid.to_hex()),
        Some(other) => Err(RepositoryError::query(format!(
            "unsupported primary key type: {:?}",
            other.element_type()
        ))),
        None => Err(RepositoryError::query(format!(
            "document has no '{}' field",
            PRIMARY_KEY
        ))),
    }
}

#[async_trait]
impl DocumentStore for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        Self::check_health(&self.data.read())
    }

    async fn insert_one(&self, collection: &str, record: Document) -> RepositoryResult<()> {
        let key = primary_key(&record)?;
        let mut data = self.data.write();
        Self::check_health(&data)?;

        let documents = data.collections.entry(collection.to_string()).or_default();
        if documents.contains_key(&key) {
            return Err(RepositoryError::duplicate_key(format!(
                "'{}' already holds a document with key {}",
                collection, key
            )));
        }
        documents.insert(key, record);
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> RepositoryResult<Option<Document>> {
        let data = self.data.read();
        Self::check_health(&data)?;
        Ok(data
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> RepositoryResult<Vec<Document>> {
        let data = self.data.read();
        Self::check_health(&data)?;
        let Some(documents) = data.collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .values()
            .filter(|record| record.get(field).is_some_and(|v| matches_id(v, value)))
            .cloned()
            .collect())
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: &str,
        mut record: Document,
    ) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;
        let Some(slot) = data
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
        else {
            return Ok(false);
        };
        // the primary key of a stored document never changes
        match slot.get(PRIMARY_KEY) {
            Some(key) => record.insert(PRIMARY_KEY, key.clone()),
            None => record.insert(PRIMARY_KEY, id),
        };
        *slot = record;
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, id: &str) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        Self::check_health(&data)?;
        Ok(data
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }
}
