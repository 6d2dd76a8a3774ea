//! MongoDB repository implementation.
//!
//! Each [`DocumentStore`] call maps to exactly one driver call on the
//! configured database. Pooling, server selection and wire-level retries are
//! left to the driver.
//!
//! ## Configuration
//!
//! See [`MongoConfig`]. Environment variables:
//! - `DB_HOST`: Server hostname (required)
//! - `DB_PORT`: Server port (default: 27017)
//! - `DB_DATABASE`: Database name (required)
//! - `DB_CONN_TIMEOUT_SEC`: Connect / server selection timeout (default: 10)

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

use crate::db::config::MongoConfig;
use crate::db::repository::record::id_candidates;
use crate::db::repository::{
    DocumentStore, ErrorContext, RepositoryError, RepositoryResult, PRIMARY_KEY,
};

/// MongoDB-backed repository.
#[derive(Clone, Debug)]
pub struct MongoRepository {
    client: Client,
    database: Database,
    config: MongoConfig,
}

impl MongoRepository {
    /// Build the client for `config`.
    ///
    /// The driver connects lazily; use [`DocumentStore::health_check`] to
    /// confirm the server is reachable.
    pub async fn connect(config: MongoConfig) -> RepositoryResult<Self> {
        let uri = config.uri();
        let mut options = ClientOptions::parse(&uri).await.map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("invalid MongoDB connection string: {}", e),
                context: ErrorContext::new("connect").with_details(uri.clone()),
            }
        })?;

        let timeout = Duration::from_secs(config.connect_timeout_sec);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        info!(
            "MongoDB repository configured for {} (database '{}')",
            uri, config.database
        );

        Ok(Self {
            client,
            database,
            config,
        })
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

/// `{field: {$in: [ObjectId(id), "id"]}}`: matches the identifier in either
/// stored form.
fn id_filter(field: &str, id: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(field, doc! { "$in": id_candidates(id) });
    filter
}

fn key_filter(id: &str) -> Document {
    id_filter(PRIMARY_KEY, id)
}

#[async_trait]
impl DocumentStore for MongoRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_one(&self, collection: &str, record: Document) -> RepositoryResult<()> {
        self.collection(collection).insert_one(record).await?;
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> RepositoryResult<Option<Document>> {
        Ok(self.collection(collection).find_one(key_filter(id)).await?)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> RepositoryResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(id_filter(field, value))
            .await?;
        let records: Vec<Document> = cursor.try_collect().await?;
        debug!(
            "'{}' where {} = {}: {} records",
            collection,
            field,
            value,
            records.len()
        );
        Ok(records)
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: &str,
        mut record: Document,
    ) -> RepositoryResult<bool> {
        // keep whatever form the stored primary key has
        record.remove(PRIMARY_KEY);
        let result = self
            .collection(collection)
            .replace_one(key_filter(id), record)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, collection: &str, id: &str) -> RepositoryResult<bool> {
        let result = self.collection(collection).delete_one(key_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
