//! Repository configuration file support.
//!
//! This module provides utilities for reading store and service settings from
//! a `repository.toml` file:
//!
//! ```toml
//! [repository]
//! type = "mongo"
//!
//! [mongo]
//! host = "localhost"
//! port = 27017
//! database = "shopkeep"
//!
//! [collections]
//! shop = "shops"
//!
//! [timeouts]
//! operation_ms = 5000
//! health_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::config::{CollectionNames, MongoConfig, ServiceConfig};
use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub mongo: Option<MongoSettings>,
    #[serde(default)]
    pub collections: CollectionSettings,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// MongoDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

/// Per-kind collection name overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSettings {
    pub user: Option<String>,
    pub campaign: Option<String>,
    pub character: Option<String>,
    pub shop: Option<String>,
    pub item: Option<String>,
}

/// Store call deadlines in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutSettings {
    #[serde(default = "default_operation_ms")]
    pub operation_ms: u64,
    #[serde(default = "default_health_ms")]
    pub health_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            operation_ms: default_operation_ms(),
            health_ms: default_health_ms(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    27017
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_operation_ms() -> u64 {
    5000
}

fn default_health_ms() -> u64 {
    1000
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml(&content)
    }

    /// Parse repository configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to MongoConfig if this is a Mongo configuration.
    pub fn to_mongo_config(&self) -> Result<Option<MongoConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Mongo {
            return Ok(None);
        }

        let Some(settings) = &self.mongo else {
            return Ok(None);
        };

        if settings.database.is_empty() {
            return Err(RepositoryError::configuration(
                "Mongo repository requires 'mongo.database' setting",
            ));
        }

        Ok(Some(MongoConfig {
            host: settings.host.clone(),
            port: settings.port,
            database: settings.database.clone(),
            connect_timeout_sec: settings.connect_timeout,
            ..Default::default()
        }))
    }

    /// Build the data-access service settings described by this file.
    pub fn to_service_config(&self) -> Result<ServiceConfig, RepositoryError> {
        let defaults = CollectionNames::default();
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);
        let collections = CollectionNames {
            user: pick(&self.collections.user, defaults.user),
            campaign: pick(&self.collections.campaign, defaults.campaign),
            character: pick(&self.collections.character, defaults.character),
            shop: pick(&self.collections.shop, defaults.shop),
            item: pick(&self.collections.item, defaults.item),
        };
        collections
            .validate()
            .map_err(RepositoryError::configuration)?;

        Ok(ServiceConfig {
            collections,
            operation_timeout: Duration::from_millis(self.timeouts.operation_ms),
            health_timeout: Duration::from_millis(self.timeouts.health_ms),
        })
    }
}
