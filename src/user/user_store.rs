use super::auth::PasswordCredentials;
use super::user_models::Favorite;
use crate::catalog_store::TargetRef;
use anyhow::Result;

pub trait UserCredentialsStore: Send + Sync {
    /// Returns Ok(None) if the user has no password set.
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>>;

    /// Inserts or replaces the password credentials of a user.
    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()>;
}

pub trait UserStore: UserCredentialsStore + Send + Sync {
    /// Creates a new user and returns its id.
    /// Returns Ok(None) if a user with the same name already exists.
    fn create_user(&self, username: &str) -> Result<Option<usize>>;

    /// Deletes a user along with its credentials and favorites.
    fn delete_user(&self, user_id: usize) -> Result<()>;

    /// Returns Ok(None) if the user does not exist.
    fn get_user_id(&self, username: &str) -> Result<Option<usize>>;

    fn get_users_count(&self) -> Result<usize>;

    /// Appends a favorite to the user's list.
    /// Returns Ok(false) if the target already is a favorite of the user.
    fn add_favorite(&self, user_id: usize, target: TargetRef) -> Result<bool>;

    /// Returns Ok(false) if the target was not a favorite of the user.
    fn remove_favorite(&self, user_id: usize, target: TargetRef) -> Result<bool>;

    fn is_favorite(&self, user_id: usize, target: TargetRef) -> Result<bool>;

    /// Returns the favorites of a user in insertion order.
    fn get_favorites(&self, user_id: usize) -> Result<Vec<Favorite>>;
}
