use super::types::{gql, ArtistObject, FavoriteObject, ReviewObject, SongObject, UserObject};
use crate::catalog_store::FullCatalogStore;
use crate::review::{ReviewError, ReviewManager};
use crate::user::{FavoritesManager, UserManager};
use async_graphql::{Context, EmptySubscription, Object, Schema};
use std::sync::Arc;

pub type TunescoreSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Everything resolvers reach for, registered as schema data.
#[derive(Clone)]
pub struct GraphqlContext {
    pub catalog_store: Arc<dyn FullCatalogStore>,
    pub review_manager: Arc<ReviewManager>,
    pub favorites_manager: Arc<FavoritesManager>,
    pub user_manager: Arc<UserManager>,
}

pub fn build_schema(context: GraphqlContext) -> TunescoreSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(context.catalog_store)
        .data(context.review_manager)
        .data(context.favorites_manager)
        .data(context.user_manager)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn song(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<Option<SongObject>> {
        let store = ctx.data::<Arc<dyn FullCatalogStore>>()?;
        let song = gql(store.get_song(id).map_err(ReviewError::from))?;
        Ok(song.map(SongObject::from))
    }

    async fn artist(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<ArtistObject>> {
        let store = ctx.data::<Arc<dyn FullCatalogStore>>()?;
        let artist = gql(store.get_artist(id).map_err(ReviewError::from))?;
        Ok(artist.map(ArtistObject::from))
    }

    async fn user(&self, ctx: &Context<'_>, username: String) -> async_graphql::Result<Option<UserObject>> {
        let manager = ctx.data::<Arc<UserManager>>()?;
        Ok(gql(manager.get_user(&username))?.map(UserObject::from))
    }

    /// Whether the target is among the user's favorites, false for unknown users.
    async fn check_if_favorite(
        &self,
        ctx: &Context<'_>,
        username: String,
        #[graphql(name = "type")] target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<bool> {
        let manager = ctx.data::<Arc<FavoritesManager>>()?;
        gql(manager.check_favorite(&username, &target_type, target_id))
    }

    async fn get_favorites(
        &self,
        ctx: &Context<'_>,
        username: String,
    ) -> async_graphql::Result<Vec<FavoriteObject>> {
        let manager = ctx.data::<Arc<FavoritesManager>>()?;
        let favorites = gql(manager.get_favorites(&username))?;
        Ok(favorites.into_iter().map(FavoriteObject::from).collect())
    }

    async fn review(
        &self,
        ctx: &Context<'_>,
        user_name: String,
        target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<Option<ReviewObject>> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        let review = gql(manager.get_review(&user_name, &target_type, target_id))?;
        Ok(review.map(ReviewObject::from))
    }

    /// Reviews of a target, newest first.
    async fn reviews(
        &self,
        ctx: &Context<'_>,
        target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<Vec<ReviewObject>> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        let reviews = gql(manager.get_target_reviews(&target_type, target_id))?;
        Ok(reviews.into_iter().map(ReviewObject::from).collect())
    }

    /// Reviews written by a user, newest first.
    async fn user_reviews(
        &self,
        ctx: &Context<'_>,
        user_name: String,
    ) -> async_graphql::Result<Vec<ReviewObject>> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        let reviews = gql(manager.get_user_reviews(&user_name))?;
        Ok(reviews.into_iter().map(ReviewObject::from).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn add_review(
        &self,
        ctx: &Context<'_>,
        user_name: String,
        content: Option<String>,
        rating: i64,
        target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<ReviewObject> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        let review = gql(manager.submit_review(&user_name, content, rating, &target_type, target_id))?;
        Ok(review.into())
    }

    async fn delete_review(
        &self,
        ctx: &Context<'_>,
        user_name: String,
        target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<bool> {
        let manager = ctx.data::<Arc<ReviewManager>>()?;
        gql(manager.delete_review(&user_name, &target_type, target_id))
    }

    async fn add_favorite(
        &self,
        ctx: &Context<'_>,
        username: String,
        #[graphql(name = "type")] target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<UserObject> {
        let manager = ctx.data::<Arc<FavoritesManager>>()?;
        Ok(gql(manager.add_favorite(&username, &target_type, target_id))?.into())
    }

    async fn remove_favorite(
        &self,
        ctx: &Context<'_>,
        username: String,
        #[graphql(name = "type")] target_type: String,
        target_id: i64,
    ) -> async_graphql::Result<UserObject> {
        let manager = ctx.data::<Arc<FavoritesManager>>()?;
        Ok(gql(manager.remove_favorite(&username, &target_type, target_id))?.into())
    }

    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> async_graphql::Result<UserObject> {
        let manager = ctx.data::<Arc<UserManager>>()?;
        Ok(gql(manager.create_user(&username, &password))?.into())
    }
}
