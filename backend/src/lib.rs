//! # Shopkeep
//!
//! Backend for a tabletop shop tracker: users run campaigns, characters
//! carry coin balances, and each campaign has shops stocked with priced
//! items. One shop per campaign can be marked as currently open.
//!
//! ## Architecture
//!
//! - [`models`]: identifiers, records and the [`models::Entity`] trait
//! - [`db`]: document store abstraction, backends, and the [`db::DataService`]
//! - [`http`]: axum router and handlers (`http-server` feature)

// RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
