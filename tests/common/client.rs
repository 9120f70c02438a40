//! GraphQL client for end-to-end tests
//!
//! Wraps reqwest and exposes one method per GraphQL operation.
//! When the schema changes, update only this file.

use super::constants::*;
use serde_json::{json, Value};
use std::time::Duration;

/// Decoded GraphQL response.
#[derive(Debug)]
pub struct GraphqlResponse {
    pub data: Value,
    pub errors: Vec<Value>,
}

impl GraphqlResponse {
    /// `extensions.code` of the first error, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.errors.first()?["extensions"]["code"].as_str()
    }

    /// Panics with the errors if the operation failed.
    pub fn ok(self) -> Value {
        assert!(self.errors.is_empty(), "GraphQL errors: {:?}", self.errors);
        self.data
    }
}

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// POST /graphql
    pub async fn graphql(&self, query: &str, variables: Value) -> GraphqlResponse {
        let response = self
            .client
            .post(format!("{}/graphql", self.base_url))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .expect("GraphQL request failed");
        assert!(response.status().is_success(), "{:?}", response.status());
        let body: Value = response.json().await.expect("Invalid GraphQL response");
        GraphqlResponse {
            data: body["data"].clone(),
            errors: body["errors"].as_array().cloned().unwrap_or_default(),
        }
    }

    /// GET /
    pub async fn get_stats(&self) -> Value {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
            .json()
            .await
            .expect("Invalid stats response")
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    pub async fn add_review(
        &self,
        user_name: &str,
        content: Option<&str>,
        rating: i64,
        target_type: &str,
        target_id: i64,
    ) -> GraphqlResponse {
        self.graphql(
            r#"mutation AddReview($userName: String!, $content: String, $rating: Int!, $targetType: String!, $targetId: Int!) {
                addReview(userName: $userName, content: $content, rating: $rating, targetType: $targetType, targetId: $targetId) {
                    userName content rating targetType targetId created
                }
            }"#,
            json!({
                "userName": user_name,
                "content": content,
                "rating": rating,
                "targetType": target_type,
                "targetId": target_id,
            }),
        )
        .await
    }

    pub async fn delete_review(
        &self,
        user_name: &str,
        target_type: &str,
        target_id: i64,
    ) -> GraphqlResponse {
        self.graphql(
            r#"mutation DeleteReview($userName: String!, $targetType: String!, $targetId: Int!) {
                deleteReview(userName: $userName, targetType: $targetType, targetId: $targetId)
            }"#,
            json!({ "userName": user_name, "targetType": target_type, "targetId": target_id }),
        )
        .await
    }

    pub async fn get_reviews(&self, target_type: &str, target_id: i64) -> GraphqlResponse {
        self.graphql(
            r#"query Reviews($targetType: String!, $targetId: Int!) {
                reviews(targetType: $targetType, targetId: $targetId) { userName rating content }
            }"#,
            json!({ "targetType": target_type, "targetId": target_id }),
        )
        .await
    }

    pub async fn get_user_reviews(&self, user_name: &str) -> GraphqlResponse {
        self.graphql(
            r#"query UserReviews($userName: String!) {
                userReviews(userName: $userName) { targetType targetId rating }
            }"#,
            json!({ "userName": user_name }),
        )
        .await
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn get_song(&self, id: i64) -> GraphqlResponse {
        self.graphql(
            r#"query Song($id: Int!) {
                song(id: $id) { id title artistName averageRating numberOfRatings }
            }"#,
            json!({ "id": id }),
        )
        .await
    }

    pub async fn get_artist(&self, id: i64) -> GraphqlResponse {
        self.graphql(
            r#"query Artist($id: Int!) {
                artist(id: $id) { id name averageRating numberOfRatings reviews { userName rating } }
            }"#,
            json!({ "id": id }),
        )
        .await
    }

    // ========================================================================
    // Users and favorites
    // ========================================================================

    pub async fn create_user(&self, username: &str, password: &str) -> GraphqlResponse {
        self.graphql(
            r#"mutation CreateUser($username: String!, $password: String!) {
                createUser(username: $username, password: $password) { username favorites { type targetId } }
            }"#,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn get_user(&self, username: &str) -> GraphqlResponse {
        self.graphql(
            r#"query User($username: String!) {
                user(username: $username) { username favorites { type targetId } }
            }"#,
            json!({ "username": username }),
        )
        .await
    }

    pub async fn add_favorite(&self, username: &str, kind: &str, target_id: i64) -> GraphqlResponse {
        self.graphql(
            r#"mutation AddFavorite($username: String!, $type: String!, $targetId: Int!) {
                addFavorite(username: $username, type: $type, targetId: $targetId) { username favorites { type targetId } }
            }"#,
            json!({ "username": username, "type": kind, "targetId": target_id }),
        )
        .await
    }

    pub async fn remove_favorite(
        &self,
        username: &str,
        kind: &str,
        target_id: i64,
    ) -> GraphqlResponse {
        self.graphql(
            r#"mutation RemoveFavorite($username: String!, $type: String!, $targetId: Int!) {
                removeFavorite(username: $username, type: $type, targetId: $targetId) { username favorites { type targetId } }
            }"#,
            json!({ "username": username, "type": kind, "targetId": target_id }),
        )
        .await
    }

    pub async fn check_if_favorite(
        &self,
        username: &str,
        kind: &str,
        target_id: i64,
    ) -> GraphqlResponse {
        self.graphql(
            r#"query CheckIfFavorite($username: String!, $type: String!, $targetId: Int!) {
                checkIfFavorite(username: $username, type: $type, targetId: $targetId)
            }"#,
            json!({ "username": username, "type": kind, "targetId": target_id }),
        )
        .await
    }

    pub async fn get_favorites(&self, username: &str) -> GraphqlResponse {
        self.graphql(
            r#"query GetFavorites($username: String!) {
                getFavorites(username: $username) { type targetId }
            }"#,
            json!({ "username": username }),
        )
        .await
    }
}
