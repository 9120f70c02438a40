use crate::catalog_store::TargetRef;
use serde::Serialize;

/// A user's bookmark of a song or an artist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub target: TargetRef,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: usize,
    pub username: String,
    /// In the order they were added.
    pub favorites: Vec<Favorite>,
}
