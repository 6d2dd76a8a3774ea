//! Database module for campaign, character and shop records.
//!
//! This module provides abstractions for database operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers                                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  DataService (services.rs)                              │
//! │  - create / get / update / delete per entity            │
//! │  - campaign, shop and user scoped queries               │
//! │  - liveness probe                                       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository<E> (repository/typed.rs)                    │
//! │  - entity <-> document mapping, per-call deadline       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  DocumentStore trait                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!     ┌───────────────┴────────────────┐
//! ┌───▼──────────────┐     ┌──────────▼──────────────┐
//! │ MongoRepository  │     │ LocalRepository         │
//! │ (mongo-repo)     │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use shopkeep::db::{DataService, RepositoryFactory, ServiceConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RepositoryFactory::from_env().await?;
//!     let service = DataService::new(store, ServiceConfig::from_env()?);
//!     let health = service.health().await;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "mongo-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


pub use config::{CollectionNames, MongoConfig, ServiceConfig};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "mongo-repo")]
pub use repositories::MongoRepository;
pub use repository::{
    DocumentStore, ErrorContext, Repository, RepositoryError, RepositoryResult,
};
pub use services::{DataService, HealthStatus};
