//! Generic CRUD repository parameterized by entity type and collection name.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use super::error::{RepositoryError, RepositoryResult};
use super::record::{from_record, to_record};
use super::DocumentStore;
use crate::models::Entity;

/// CRUD access to one entity kind stored in one collection.
///
/// Every method issues exactly one store call, bounded by the repository's
/// deadline. Errors are tagged with the operation, entity kind and id.
pub struct Repository<E> {
    store: Arc<dyn DocumentStore>,
    collection: String,
    deadline: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            deadline: self.deadline,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        deadline: Duration,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            deadline,
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert a new record.
    ///
    /// # Returns
    /// * `Err(RepositoryError::DuplicateKey)` - If the identifier is taken
    pub async fn create(&self, entity: &E) -> RepositoryResult<()> {
        let id = entity.id();
        debug!("create {} {} in '{}'", E::KIND, id, self.collection);
        let record = to_record(entity)?;
        self.bounded(self.store.insert_one(&self.collection, record))
            .await
            .map_err(|e| tag::<E>(e, "create", Some(id.to_string())))
    }

    /// Fetch a record by identifier.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has that identifier
    /// * `Err(RepositoryError::DecodeError)` - If the stored record is malformed
    pub async fn get(&self, id: E::Id) -> RepositoryResult<E> {
        let key = id.to_string();
        let record = self
            .bounded(self.store.find_by_id(&self.collection, &key))
            .await
            .map_err(|e| tag::<E>(e, "get", Some(key.clone())))?;

        match record {
            Some(record) => from_record(record).map_err(|e| tag::<E>(e, "get", Some(key))),
            None => Err(tag::<E>(
                RepositoryError::not_found(format!("{} {} does not exist", E::KIND, key)),
                "get",
                Some(key),
            )),
        }
    }

    /// Replace the stored record with `entity` in full.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has the entity's identifier
    pub async fn update(&self, entity: &E) -> RepositoryResult<()> {
        let key = entity.id().to_string();
        debug!("replace {} {} in '{}'", E::KIND, key, self.collection);
        let record = to_record(entity)?;
        let matched = self
            .bounded(self.store.replace_one(&self.collection, &key, record))
            .await
            .map_err(|e| tag::<E>(e, "update", Some(key.clone())))?;

        if matched {
            Ok(())
        } else {
            Err(tag::<E>(
                RepositoryError::not_found(format!("{} {} does not exist", E::KIND, key)),
                "update",
                Some(key),
            ))
        }
    }

    /// Delete a record. Deleting an identifier that is not stored succeeds.
    pub async fn delete(&self, id: E::Id) -> RepositoryResult<()> {
        let key = id.to_string();
        let removed = self
            .bounded(self.store.delete_one(&self.collection, &key))
            .await
            .map_err(|e| tag::<E>(e, "delete", Some(key.clone())))?;
        if !removed {
            debug!("delete {} {}: nothing stored under that id", E::KIND, key);
        }
        Ok(())
    }

    /// All records whose `field` equals `value`. Order is store-defined.
    ///
    /// A single undecodable record fails the whole query.
    pub async fn list_by(&self, field: &str, value: &str) -> RepositoryResult<Vec<E>> {
        let records = self
            .bounded(self.store.find_by_field(&self.collection, field, value))
            .await
            .map_err(|e| tag::<E>(e, "list_by", None))?;

        records
            .into_iter()
            .map(from_record)
            .collect::<RepositoryResult<Vec<E>>>()
            .map_err(|e| tag::<E>(e, "list_by", None))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = RepositoryResult<T>>,
    ) -> RepositoryResult<T> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(RepositoryError::timeout(format!(
                "store did not answer within {} ms",
                self.deadline.as_millis()
            ))),
        }
    }
}

fn tag<E: Entity>(err: RepositoryError, operation: &str, id: Option<String>) -> RepositoryError {
    let err = err.with_operation(operation).with_entity(E::KIND.name());
    match id {
        Some(id) => err.with_entity_id(id),
        None => err,
    }
}
