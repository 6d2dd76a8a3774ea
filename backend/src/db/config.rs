//! Store configuration and environment variable handling.
//!
//! Configuration is read once at startup and handed to constructors; nothing
//! below the binary reads the environment afterwards.

use std::env;
use std::time::Duration;

use crate::models::EntityKind;

/// Connection settings for the MongoDB backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    /// Server hostname
    pub host: String,
    /// Server port (default: 27017)
    pub port: u16,
    /// Database name
    pub database: String,
    /// Application name reported to the server
    pub app_name: String,
    /// Connect and server-selection timeout in seconds
    pub connect_timeout_sec: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: String::new(),
            app_name: "shopkeep".to_string(),
            connect_timeout_sec: 10,
        }
    }
}

impl MongoConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DB_HOST` (required): Server hostname
    /// - `DB_PORT` (optional, default: 27017): Server port
    /// - `DB_DATABASE` (required): Database name
    /// - `DB_CONN_TIMEOUT_SEC` (optional, default: 10)
    ///
    /// # Errors
    /// Returns an error if required variables are not set or malformed.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("DB_HOST")
            .map_err(|_| "DB_HOST environment variable not set".to_string())?;
        let database = env::var("DB_DATABASE")
            .map_err(|_| "DB_DATABASE environment variable not set".to_string())?;
        let port = env::var("DB_PORT")
            .unwrap_or_else(|_| "27017".to_string())
            .parse()
            .map_err(|_| "DB_PORT must be a valid port number".to_string())?;
        let connect_timeout_sec = match env::var("DB_CONN_TIMEOUT_SEC") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| "DB_CONN_TIMEOUT_SEC must be a whole number of seconds".to_string())?,
            Err(_) => Self::default().connect_timeout_sec,
        };

        Ok(Self {
            host,
            port,
            database,
            connect_timeout_sec,
            ..Default::default()
        })
    }

    /// Connection string for the driver.
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

/// Collection name for each entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub user: String,
    pub campaign: String,
    pub character: String,
    pub shop: String,
    pub item: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            user: "users".to_string(),
            campaign: "campaigns".to_string(),
            character: "characters".to_string(),
            shop: "shops".to_string(),
            item: "items".to_string(),
        }
    }
}

impl CollectionNames {
    /// Read overrides from `DB_<KIND>_COLLECTION`, keeping defaults otherwise.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: String| env::var(key).unwrap_or(default);
        Self {
            user: read("DB_USER_COLLECTION", defaults.user),
            campaign: read("DB_CAMPAIGN_COLLECTION", defaults.campaign),
            character: read("DB_CHARACTER_COLLECTION", defaults.character),
            shop: read("DB_SHOP_COLLECTION", defaults.shop),
            item: read("DB_ITEM_COLLECTION", defaults.item),
        }
    }

    pub fn for_kind(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::User => &self.user,
            EntityKind::Campaign => &self.campaign,
            EntityKind::Character => &self.character,
            EntityKind::Shop => &self.shop,
            EntityKind::Item => &self.item,
        }
    }

    /// Every entity kind must live in its own collection.
    pub fn validate(&self) -> Result<(), String> {
        for (i, a) in EntityKind::ALL.iter().enumerate() {
            let name = self.for_kind(*a);
            if name.trim().is_empty() {
                return Err(format!("collection name for {} is empty", a));
            }
            for b in &EntityKind::ALL[i + 1..] {
                if self.for_kind(*b) == name {
                    return Err(format!("{} and {} share collection '{}'", a, b, name));
                }
            }
        }
        Ok(())
    }
}

/// Settings for the data-access service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub collections: CollectionNames,
    /// Deadline applied to every store call
    pub operation_timeout: Duration,
    /// Deadline for the liveness probe
    pub health_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            collections: CollectionNames::default(),
            operation_timeout: Duration::from_secs(5),
            health_timeout: Duration::from_secs(1),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DB_<KIND>_COLLECTION` (optional): see [`CollectionNames::from_env`]
    /// - `DB_OPERATION_TIMEOUT_MS` (optional, default: 5000)
    /// - `DB_HEALTH_TIMEOUT_MS` (optional, default: 1000)
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let collections = CollectionNames::from_env();
        collections.validate()?;

        let operation_timeout = read_millis("DB_OPERATION_TIMEOUT_MS")?
            .unwrap_or(defaults.operation_timeout);
        let health_timeout =
            read_millis("DB_HEALTH_TIMEOUT_MS")?.unwrap_or(defaults.health_timeout);

        Ok(Self {
            collections,
            operation_timeout,
            health_timeout,
        })
    }
}

fn read_millis(key: &str) -> Result<Option<Duration>, String> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| format!("{} must be a whole number of milliseconds", key)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri() {
        let config = MongoConfig {
            host: "db.internal".to_string(),
            port: 27018,
            database: "shopkeep".to_string(),
            ..Default::default()
        };
        assert_eq!(config.uri(), "mongodb://db.internal:27018");
    }

    #[test]
    fn test_collections_for_kind() {
        let names = CollectionNames::default();
        assert_eq!(names.for_kind(EntityKind::Shop), "shops");
        assert_eq!(names.for_kind(EntityKind::Character), "characters");
        assert!(names.validate().is_ok());
    }

    #[test]
    fn test_collections_must_be_distinct() {
        let names = CollectionNames {
            item: "shops".to_string(),
            ..Default::default()
        };
        let err = names.validate().unwrap_err();
        assert!(err.contains("'shops'"));

        let names = CollectionNames {
            user: " ".to_string(),
            ..Default::default()
        };
        assert!(names.validate().is_err());
    }
}
