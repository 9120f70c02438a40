mod import;
mod models;
mod schema;
mod store;
mod trait_def;

pub use import::{import_catalog, load_catalog_import};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use trait_def::{AggregateWrite, CatalogStore, FullCatalogStore, ReviewStore};
