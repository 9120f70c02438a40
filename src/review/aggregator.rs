//! Running mean bookkeeping for target ratings.
//!
//! Both functions are pure, persisting the result is up to the caller.

use crate::catalog_store::{Aggregate, Rating};

/// Folds one more rating into the aggregate.
pub fn apply_add(aggregate: Aggregate, rating: Rating) -> Aggregate {
    let n = aggregate.number_of_ratings as f64;
    let r = rating.value() as f64;
    Aggregate {
        average_rating: (aggregate.average_rating * n + r) / (n + 1.0),
        number_of_ratings: aggregate.number_of_ratings + 1,
    }
}

/// Takes one rating out of the aggregate.
///
/// The denominator is floored at 1, so removing the last rating leaves
/// `avg - r` as average rather than resetting it to 0. With consistent data
/// that value is 0 anyway.
pub fn apply_remove(aggregate: Aggregate, rating: Rating) -> Aggregate {
    let n = aggregate.number_of_ratings as i64;
    let r = rating.value() as f64;
    let denominator = (n - 1).max(1) as f64;
    Aggregate {
        average_rating: (aggregate.average_rating * n as f64 - r) / denominator,
        number_of_ratings: (n - 1).max(0) as u32,
    }
}
