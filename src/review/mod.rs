pub mod aggregator;
mod error;
mod review_manager;

pub use error::{parse_target_kind, ReviewError, ReviewResult};
pub use review_manager::{ReviewManager, DEFAULT_MAX_AGGREGATE_RETRIES};
