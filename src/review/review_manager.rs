//! Review lifecycle: submitting and deleting a user's review of a target, keeping
//! the target aggregate in sync.

use super::aggregator::{apply_add, apply_remove};
use super::error::{parse_target_kind, ReviewError, ReviewResult};
use crate::catalog_store::{
    AggregateWrite, FullCatalogStore, Rating, Review, ReviewKey, TargetRef,
};
use crate::user::UserStore;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_AGGREGATE_RETRIES: usize = 16;

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub struct ReviewManager {
    users: Arc<dyn UserStore>,
    catalog: Arc<dyn FullCatalogStore>,
    max_aggregate_retries: usize,
}

impl ReviewManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn FullCatalogStore>,
        max_aggregate_retries: usize,
    ) -> Self {
        Self {
            users,
            catalog,
            max_aggregate_retries: max_aggregate_retries.max(1),
        }
    }

    fn require_user(&self, user_name: &str) -> ReviewResult<()> {
        match self.users.get_user_id(user_name)? {
            Some(_) => Ok(()),
            None => Err(ReviewError::UserNotFound(user_name.to_string())),
        }
    }

    /// Submits a new review and folds its rating into the target aggregate.
    ///
    /// Checks run in a fixed order and nothing is written unless all pass:
    /// target type, user, existing review, rating range, target existence.
    pub fn submit_review(
        &self,
        user_name: &str,
        content: Option<String>,
        rating: i64,
        target_type: &str,
        target_id: i64,
    ) -> ReviewResult<Review> {
        let kind = parse_target_kind(target_type)?;
        let target = TargetRef { kind, id: target_id };
        self.require_user(user_name)?;

        let key = ReviewKey {
            user_name: user_name.to_string(),
            target,
        };
        if self.catalog.get_review(&key)?.is_some() {
            return Err(ReviewError::DuplicateReview);
        }

        let rating = Rating::new(rating).ok_or(ReviewError::RatingOutOfRange(rating))?;

        let review = Review {
            user_name: user_name.to_string(),
            target,
            content,
            rating,
            created: now_secs(),
        };

        for attempt in 1..=self.max_aggregate_retries {
            let current = self
                .catalog
                .get_aggregate(target)?
                .ok_or(ReviewError::TargetNotFound { target })?;
            let updated = apply_add(current.aggregate, rating);

            match self
                .catalog
                .insert_review(&review, current.version, updated)?
            {
                AggregateWrite::Committed => {
                    info!(
                        "User {} rated {} with {}, aggregate now {:.3} over {}",
                        user_name,
                        target,
                        rating.value(),
                        updated.average_rating,
                        updated.number_of_ratings
                    );
                    return Ok(review);
                }
                AggregateWrite::DuplicateReview => return Err(ReviewError::DuplicateReview),
                AggregateWrite::VersionConflict | AggregateWrite::ReviewMissing => {
                    debug!(
                        "Aggregate of {} changed since version {}, attempt {}",
                        target, current.version, attempt
                    );
                }
            }
        }

        warn!("Giving up rating {} by {}", target, user_name);
        Err(ReviewError::ConcurrentModification {
            target,
            attempts: self.max_aggregate_retries,
        })
    }

    /// Deletes a review and takes its rating out of the target aggregate.
    pub fn delete_review(
        &self,
        user_name: &str,
        target_type: &str,
        target_id: i64,
    ) -> ReviewResult<bool> {
        let kind = parse_target_kind(target_type)?;
        let target = TargetRef { kind, id: target_id };
        let key = ReviewKey {
            user_name: user_name.to_string(),
            target,
        };

        for attempt in 1..=self.max_aggregate_retries {
            // Re-read every attempt, the review may have been replaced in the meantime.
            let review = self
                .catalog
                .get_review(&key)?
                .ok_or(ReviewError::ReviewNotFound)?;
            let current = self
                .catalog
                .get_aggregate(target)?
                .ok_or(ReviewError::TargetNotFound { target })?;
            let updated = apply_remove(current.aggregate, review.rating);

            match self
                .catalog
                .delete_review(&review, current.version, updated)?
            {
                AggregateWrite::Committed => {
                    info!(
                        "User {} deleted review of {}, aggregate now {:.3} over {}",
                        user_name, target, updated.average_rating, updated.number_of_ratings
                    );
                    return Ok(true);
                }
                AggregateWrite::ReviewMissing => {
                    debug!(
                        "Review of {} by {} changed before delete, attempt {}",
                        target, user_name, attempt
                    );
                }
                AggregateWrite::VersionConflict | AggregateWrite::DuplicateReview => {
                    debug!(
                        "Aggregate of {} changed since version {}, attempt {}",
                        target, current.version, attempt
                    );
                }
            }
        }

        warn!("Giving up deleting review of {} by {}", target, user_name);
        Err(ReviewError::ConcurrentModification {
            target,
            attempts: self.max_aggregate_retries,
        })
    }

    pub fn get_review(
        &self,
        user_name: &str,
        target_type: &str,
        target_id: i64,
    ) -> ReviewResult<Option<Review>> {
        let kind = parse_target_kind(target_type)?;
        Ok(self.catalog.get_review(&ReviewKey {
            user_name: user_name.to_string(),
            target: TargetRef { kind, id: target_id },
        })?)
    }

    /// Reviews of a target, newest first.
    pub fn get_target_reviews(&self, target_type: &str, target_id: i64) -> ReviewResult<Vec<Review>> {
        let kind = parse_target_kind(target_type)?;
        Ok(self
            .catalog
            .get_target_reviews(TargetRef { kind, id: target_id })?)
    }

    /// Reviews written by a user, newest first.
    pub fn get_user_reviews(&self, user_name: &str) -> ReviewResult<Vec<Review>> {
        self.require_user(user_name)?;
        Ok(self.catalog.get_user_reviews(user_name)?)
    }
}
