use axum::extract::FromRef;

use crate::catalog_store::FullCatalogStore;
use std::sync::Arc;
use std::time::Instant;

use super::graphql::TunescoreSchema;

pub type GuardedCatalogStore = Arc<dyn FullCatalogStore>;

#[derive(Clone)]
pub struct ServerState {
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub schema: TunescoreSchema,
    pub hash: String,
}

impl FromRef<ServerState> for TunescoreSchema {
    fn from_ref(input: &ServerState) -> Self {
        input.schema.clone()
    }
}
