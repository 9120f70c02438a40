//! Catalog models: rateable targets (songs and artists) and the reviews attached to them.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Targets
// =============================================================================

/// The kind of entity a review or a favorite points at.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Song,
    Artist,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Song => "song",
            TargetKind::Artist => "artist",
        }
    }

    /// Convert to database integer representation
    pub fn to_int(&self) -> i32 {
        match self {
            TargetKind::Song => 1,
            TargetKind::Artist => 2,
        }
    }

    /// Convert from database integer representation
    pub fn from_int(value: i32) -> Option<Self> {
        match value {
            1 => Some(TargetKind::Song),
            2 => Some(TargetKind::Artist),
            _ => None,
        }
    }
}

impl FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "song" => Ok(TargetKind::Song),
            "artist" => Ok(TargetKind::Artist),
            _ => bail!("Unknown target type {}", s),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical reference to a song or an artist, the only link between targets,
/// reviews and favorites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: i64,
}

impl TargetRef {
    pub fn song(id: i64) -> Self {
        Self {
            kind: TargetKind::Song,
            id,
        }
    }

    pub fn artist(id: i64) -> Self {
        Self {
            kind: TargetKind::Artist,
            id,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Running rating statistics stored on every target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub average_rating: f64,
    pub number_of_ratings: u32,
}

/// An aggregate as read from the store together with the row version it was read at.
/// Writes are accepted only if the row is still at `version`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VersionedAggregate {
    pub aggregate: Aggregate,
    pub version: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist_name: String,
    pub album: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub average_rating: f64,
    pub number_of_ratings: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub average_rating: f64,
    pub number_of_ratings: u32,
}

/// Song as provided on insertion, it starts without ratings.
#[derive(Clone, Debug, Deserialize)]
pub struct NewSong {
    pub id: i64,
    pub title: String,
    pub artist_name: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Artist as provided on insertion, it starts without ratings.
#[derive(Clone, Debug, Deserialize)]
pub struct NewArtist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Catalog import file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogImport {
    pub artists: Vec<NewArtist>,
    pub songs: Vec<NewSong>,
}

// =============================================================================
// Reviews
// =============================================================================

/// A star rating, 0 to 5 inclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Some(Rating(value as u8))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("Rating {} is out of range", value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

/// Identity of a review: at most one review per user per target.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ReviewKey {
    pub user_name: String,
    pub target: TargetRef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_name: String,
    pub target: TargetRef,
    pub content: Option<String>,
    pub rating: Rating,
    /// Seconds since UNIX epoch
    pub created: i64,
}
