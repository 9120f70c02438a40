mod schema;
mod types;

pub use schema::{build_schema, GraphqlContext, MutationRoot, QueryRoot, TunescoreSchema};
