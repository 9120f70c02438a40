//! GraphQL output objects.

use crate::catalog_store;
use crate::review::{ReviewError, ReviewManager};
use crate::user;
use async_graphql::{ComplexObject, Context, ErrorExtensions, SimpleObject};
use std::sync::Arc;

impl ErrorExtensions for ReviewError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Maps a manager result into a GraphQL result carrying the error code.
pub(super) fn gql<T>(result: Result<T, ReviewError>) -> async_graphql::Result<T> {
    result.map_err(|err| err.extend())
}

#[derive(SimpleObject)]
#[graphql(name = "Review")]
pub struct ReviewObject {
    pub user_name: String,
    pub content: Option<String>,
    pub rating: i32,
    pub target_type: String,
    pub target_id: i64,
    /// Seconds since UNIX epoch
    pub created: i64,
}

impl From<catalog_store::Review> for ReviewObject {
    fn from(review: catalog_store::Review) -> Self {
        ReviewObject {
            user_name: review.user_name,
            content: review.content,
            rating: review.rating.value() as i32,
            target_type: review.target.kind.to_string(),
            target_id: review.target.id,
            created: review.created,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Song", complex)]
pub struct SongObject {
    pub id: i64,
    pub title: String,
    pub artist_name: String,
    pub album: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub average_rating: f64,
    pub number_of_ratings: u32,
}

#[ComplexObject]
impl SongObject {
    /// Reviews of this song, newest first.
    async fn reviews(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ReviewObject>> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        let reviews = gql(manager.get_target_reviews("song", self.id))?;
        Ok(reviews.into_iter().map(ReviewObject::from).collect())
    }
}

impl From<catalog_store::Song> for SongObject {
    fn from(song: catalog_store::Song) -> Self {
        SongObject {
            id: song.id,
            title: song.title,
            artist_name: song.artist_name,
            album: song.album,
            release_year: song.release_year,
            genre: song.genre,
            average_rating: song.average_rating,
            number_of_ratings: song.number_of_ratings,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Artist", complex)]
pub struct ArtistObject {
    pub id: i64,
    pub name: String,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub average_rating: f64,
    pub number_of_ratings: u32,
}

#[ComplexObject]
impl ArtistObject {
    /// Reviews of this artist, newest first.
    async fn reviews(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ReviewObject>> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        let reviews = gql(manager.get_target_reviews("artist", self.id))?;
        Ok(reviews.into_iter().map(ReviewObject::from).collect())
    }
}

impl From<catalog_store::Artist> for ArtistObject {
    fn from(artist: catalog_store::Artist) -> Self {
        ArtistObject {
            id: artist.id,
            name: artist.name,
            genre: artist.genre,
            country: artist.country,
            average_rating: artist.average_rating,
            number_of_ratings: artist.number_of_ratings,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Favorite")]
pub struct FavoriteObject {
    #[graphql(name = "type")]
    pub target_type: String,
    pub target_id: i64,
}

impl From<user::Favorite> for FavoriteObject {
    fn from(favorite: user::Favorite) -> Self {
        FavoriteObject {
            target_type: favorite.target.kind.to_string(),
            target_id: favorite.target.id,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub username: String,
    pub favorites: Vec<FavoriteObject>,
}

impl From<user::User> for UserObject {
    fn from(user: user::User) -> Self {
        UserObject {
            username: user.username,
            favorites: user
                .favorites
                .into_iter()
                .map(FavoriteObject::from)
                .collect(),
        }
    }
}
