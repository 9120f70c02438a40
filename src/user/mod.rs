pub mod auth;
mod favorites_manager;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{PasswordCredentials, PasswordHasher};
pub use favorites_manager::FavoritesManager;
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::UserManager;
pub use user_models::{Favorite, User};
pub use user_store::{UserCredentialsStore, UserStore};
