//! HTTP server module for the shop backend.
//!
//! Exposes [`DataService`](crate::db::DataService) over an axum router.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! │  - body / path parsing                                   │
//! │  - error envelope and status mapping                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  DataService (db/services.rs)                            │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  DocumentStore (MongoRepository / LocalRepository)       │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{AppError, ErrorEnvelope};
pub use router::create_router;
pub use state::AppState;
