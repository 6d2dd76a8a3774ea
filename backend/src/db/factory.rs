//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating store instances based on
//! runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::MongoConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "mongo-repo")]
use super::repositories::MongoRepository;
use super::repository::{DocumentStore, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// MongoDB implementation
    Mongo,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("mongo", "mongodb", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to Mongo if `DB_HOST` is present,
    /// otherwise Local.
    ///
    /// # Errors
    /// Returns an error if `REPOSITORY_TYPE` names no known backend.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse();
        }

        if std::env::var("DB_HOST").is_ok() {
            Ok(Self::Mongo)
        } else {
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating store instances.
///
/// # Example
/// ```ignore
/// use shopkeep::db::{MongoConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = MongoConfig::from_env()?;
///     let _mongo = RepositoryFactory::create(RepositoryType::Mongo, Some(&config)).await?;
///
///     let _local = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a store instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `mongo_config` - Connection settings (required for Mongo)
    pub async fn create(
        repo_type: RepositoryType,
        mongo_config: Option<&MongoConfig>,
    ) -> RepositoryResult<Arc<dyn DocumentStore>> {
        match repo_type {
            RepositoryType::Mongo => {
                let config = mongo_config.ok_or_else(|| {
                    RepositoryError::configuration("Mongo repository requires MongoConfig")
                })?;
                Self::create_mongo(config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a MongoDB-backed store.
    #[cfg(feature = "mongo-repo")]
    pub async fn create_mongo(config: &MongoConfig) -> RepositoryResult<Arc<dyn DocumentStore>> {
        let repo = MongoRepository::connect(config.clone()).await?;
        Ok(Arc::new(repo))
    }

    /// Create a MongoDB-backed store.
    #[cfg(not(feature = "mongo-repo"))]
    pub async fn create_mongo(_config: &MongoConfig) -> RepositoryResult<Arc<dyn DocumentStore>> {
        Err(RepositoryError::configuration(
            "Mongo repository feature not enabled",
        ))
    }

    /// Create an in-memory local store.
    pub fn create_local() -> Arc<dyn DocumentStore> {
        Arc::new(LocalRepository::new())
    }

    /// Create a store from environment configuration.
    ///
    /// See [`RepositoryType::from_env`] and [`MongoConfig::from_env`].
    pub async fn from_env() -> RepositoryResult<Arc<dyn DocumentStore>> {
        let repo_type = RepositoryType::from_env().map_err(|e| {
            RepositoryError::configuration(format!("Invalid REPOSITORY_TYPE: {}", e))
        })?;
        match repo_type {
            RepositoryType::Mongo => {
                let config = MongoConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create_mongo(&config).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a store from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn DocumentStore>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config).await
    }

    /// Create a store from a parsed [`RepositoryConfig`].
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn DocumentStore>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Mongo => {
                let mongo = config.to_mongo_config()?.ok_or_else(|| {
                    RepositoryError::configuration(
                        "Mongo repository requires a [mongo] section",
                    )
                })?;
                Self::create_mongo(&mongo).await
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }
}
