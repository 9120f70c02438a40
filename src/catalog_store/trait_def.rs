//! Storage traits for rateable targets and their reviews.

use super::models::{
    Aggregate, Artist, NewArtist, NewSong, Review, ReviewKey, Song, TargetRef, VersionedAggregate,
};
use anyhow::Result;

/// Outcome of a write that touches a review and the aggregate of its target together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateWrite {
    /// Both the review mutation and the aggregate update were committed.
    Committed,
    /// The target moved past the expected version, nothing was written.
    VersionConflict,
    /// A review with the same key already exists, nothing was written.
    DuplicateReview,
    /// The review to delete is gone or was replaced, nothing was written.
    ReviewMissing,
}

pub trait CatalogStore: Send + Sync {
    /// Returns Ok(None) if the song does not exist.
    fn get_song(&self, id: i64) -> Result<Option<Song>>;

    /// Returns Ok(None) if the artist does not exist.
    fn get_artist(&self, id: i64) -> Result<Option<Artist>>;

    /// Returns the aggregate of the given target along with its current row version.
    /// Returns Ok(None) if the target does not exist.
    fn get_aggregate(&self, target: TargetRef) -> Result<Option<VersionedAggregate>>;

    /// Inserts a new song without ratings.
    fn insert_song(&self, song: &NewSong) -> Result<Song>;

    /// Inserts a new artist without ratings.
    fn insert_artist(&self, artist: &NewArtist) -> Result<Artist>;

    fn get_songs_count(&self) -> Result<usize>;

    fn get_artists_count(&self) -> Result<usize>;
}

pub trait ReviewStore: Send + Sync {
    /// Returns Ok(None) if there's no review for the key.
    fn get_review(&self, key: &ReviewKey) -> Result<Option<Review>>;

    /// Returns all reviews of a target, newest first.
    fn get_target_reviews(&self, target: TargetRef) -> Result<Vec<Review>>;

    /// Returns all reviews written by a user, newest first.
    fn get_user_reviews(&self, user_name: &str) -> Result<Vec<Review>>;

    fn get_reviews_count(&self) -> Result<usize>;

    /// Inserts `review` and replaces the aggregate of its target with `aggregate`,
    /// atomically and only if the target is still at `expected_version`.
    fn insert_review(
        &self,
        review: &Review,
        expected_version: u64,
        aggregate: Aggregate,
    ) -> Result<AggregateWrite>;

    /// Deletes `review` and replaces the aggregate of its target with `aggregate`,
    /// atomically and only if the target is still at `expected_version`.
    /// The stored review must still carry `review.rating`, otherwise nothing is
    /// written and `ReviewMissing` is returned.
    fn delete_review(
        &self,
        review: &Review,
        expected_version: u64,
        aggregate: Aggregate,
    ) -> Result<AggregateWrite>;
}

/// Combined trait for the catalog database, targets and reviews live side by side
/// so that both can be written in one transaction.
pub trait FullCatalogStore: CatalogStore + ReviewStore {}

impl<T: CatalogStore + ReviewStore> FullCatalogStore for T {}
