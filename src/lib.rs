//! Tunescore Server Library
//!
//! Song and artist reviews with running rating aggregates, user favorites and a
//! GraphQL surface over both.

pub mod catalog_store;
pub mod config;
pub mod review;
pub mod server;
pub mod sqlite_persistence;
pub mod user;

pub use catalog_store::{FullCatalogStore, SqliteCatalogStore};
pub use review::{ReviewError, ReviewManager};
pub use server::{run_server, RequestsLoggingLevel};
pub use user::{FavoritesManager, SqliteUserStore, UserManager, UserStore};
