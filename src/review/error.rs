use crate::catalog_store::TargetRef;
use thiserror::Error;

/// Errors surfaced by the review and favorites managers.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Invalid target type: {0}")]
    InvalidTarget(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Target not found: {target}")]
    TargetNotFound { target: TargetRef },

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Favorite not found")]
    FavoriteNotFound,

    #[error("User has already reviewed this target")]
    DuplicateReview,

    #[error("Target is already a favorite")]
    DuplicateFavorite,

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("Rating {0} is out of range, must be between 0 and 5")]
    RatingOutOfRange(i64),

    #[error("Aggregate of {target} kept changing, gave up after {attempts} attempts")]
    ConcurrentModification { target: TargetRef, attempts: usize },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ReviewError {
    /// Stable machine-readable name of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ReviewError::InvalidTarget(_) => "INVALID_TARGET",
            ReviewError::UserNotFound(_) => "USER_NOT_FOUND",
            ReviewError::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            ReviewError::ReviewNotFound => "REVIEW_NOT_FOUND",
            ReviewError::FavoriteNotFound => "FAVORITE_NOT_FOUND",
            ReviewError::DuplicateReview => "DUPLICATE_REVIEW",
            ReviewError::DuplicateFavorite => "DUPLICATE_FAVORITE",
            ReviewError::DuplicateUser(_) => "DUPLICATE_USER",
            ReviewError::InvalidUsername => "INVALID_USERNAME",
            ReviewError::RatingOutOfRange(_) => "RATING_OUT_OF_RANGE",
            ReviewError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            ReviewError::Store(_) => "STORE_ERROR",
        }
    }
}

pub type ReviewResult<T> = std::result::Result<T, ReviewError>;

/// Parses a target type coming from the outside world.
pub fn parse_target_kind(raw: &str) -> ReviewResult<crate::catalog_store::TargetKind> {
    raw.parse()
        .map_err(|_| ReviewError::InvalidTarget(raw.to_string()))
}
