use super::auth::PasswordCredentials;
use super::user_models::User;
use super::user_store::UserStore;
use crate::review::{ReviewError, ReviewResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Loads a user together with its favorites, Ok(None) if there's no such user.
pub(super) fn load_user(store: &dyn UserStore, username: &str) -> ReviewResult<Option<User>> {
    let user_id = match store.get_user_id(username)? {
        Some(id) => id,
        None => return Ok(None),
    };
    Ok(Some(User {
        id: user_id,
        username: username.to_string(),
        favorites: store.get_favorites(user_id)?,
    }))
}

pub struct UserManager {
    user_store: Arc<dyn UserStore>,
}

impl UserManager {
    pub fn new(user_store: Arc<dyn UserStore>) -> Self {
        Self { user_store }
    }

    /// Creates a user with password credentials.
    pub fn create_user(&self, username: &str, password: &str) -> ReviewResult<User> {
        if username.trim().is_empty() {
            return Err(ReviewError::InvalidUsername);
        }

        let user_id = self
            .user_store
            .create_user(username)?
            .ok_or_else(|| ReviewError::DuplicateUser(username.to_string()))?;
        let stored = PasswordCredentials::generate(user_id, password)
            .and_then(|credentials| self.user_store.set_password_credentials(&credentials));
        if let Err(err) = stored {
            warn!("Failed to store credentials of {}, removing user: {:?}", username, err);
            self.user_store.delete_user(user_id)?;
            return Err(err.into());
        }

        info!("Created user {} with id {}", username, user_id);
        Ok(User {
            id: user_id,
            username: username.to_string(),
            favorites: vec![],
        })
    }

    pub fn get_user(&self, username: &str) -> ReviewResult<Option<User>> {
        load_user(self.user_store.as_ref(), username)
    }

    /// Returns false for unknown users and users without a password.
    pub fn check_password(&self, username: &str, password: &str) -> ReviewResult<bool> {
        let user_id = match self.user_store.get_user_id(username)? {
            Some(id) => id,
            None => return Ok(false),
        };
        match self.user_store.get_password_credentials(user_id)? {
            Some(credentials) => Ok(credentials.matches(password)?),
            None => Ok(false),
        }
    }

    pub fn get_users_count(&self) -> ReviewResult<usize> {
        Ok(self.user_store.get_users_count()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::TargetRef;
    use crate::user::{Favorite, SqliteUserStore, UserCredentialsStore};
    use tempfile::TempDir;

    fn create_manager() -> (UserManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteUserStore::new(temp_dir.path().join("user.db")).unwrap();
        (UserManager::new(Arc::new(store)), temp_dir)
    }

    #[test]
    fn creates_user_with_password() {
        let (manager, _temp_dir) = create_manager();

        let user = manager.create_user("alice", "s3cret").unwrap();

        assert_eq!(user.username, "alice");
        assert!(user.favorites.is_empty());
        assert_eq!(manager.get_user("alice").unwrap(), Some(user));
        assert!(manager.check_password("alice", "s3cret").unwrap());
        assert!(!manager.check_password("alice", "wrong").unwrap());
        assert!(!manager.check_password("bob", "s3cret").unwrap());
    }

    #[test]
    fn rejects_duplicate_and_empty_usernames() {
        let (manager, _temp_dir) = create_manager();
        manager.create_user("alice", "pw").unwrap();

        assert!(matches!(
            manager.create_user("alice", "other"),
            Err(ReviewError::DuplicateUser(name)) if name == "alice"
        ));
        assert!(matches!(
            manager.create_user("  ", "pw"),
            Err(ReviewError::InvalidUsername)
        ));
        assert_eq!(manager.get_users_count().unwrap(), 1);
    }

    /// User store whose credential writes fail.
    struct FailingCredentials(SqliteUserStore);

    impl UserCredentialsStore for FailingCredentials {
        fn get_password_credentials(
            &self,
            user_id: usize,
        ) -> anyhow::Result<Option<PasswordCredentials>> {
            self.0.get_password_credentials(user_id)
        }
        fn set_password_credentials(&self, _credentials: &PasswordCredentials) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    impl UserStore for FailingCredentials {
        fn create_user(&self, username: &str) -> anyhow::Result<Option<usize>> {
            self.0.create_user(username)
        }
        fn delete_user(&self, user_id: usize) -> anyhow::Result<()> {
            self.0.delete_user(user_id)
        }
        fn get_user_id(&self, username: &str) -> anyhow::Result<Option<usize>> {
            self.0.get_user_id(username)
        }
        fn get_users_count(&self) -> anyhow::Result<usize> {
            self.0.get_users_count()
        }
        fn add_favorite(&self, user_id: usize, target: TargetRef) -> anyhow::Result<bool> {
            self.0.add_favorite(user_id, target)
        }
        fn remove_favorite(&self, user_id: usize, target: TargetRef) -> anyhow::Result<bool> {
            self.0.remove_favorite(user_id, target)
        }
        fn is_favorite(&self, user_id: usize, target: TargetRef) -> anyhow::Result<bool> {
            self.0.is_favorite(user_id, target)
        }
        fn get_favorites(&self, user_id: usize) -> anyhow::Result<Vec<Favorite>> {
            self.0.get_favorites(user_id)
        }
    }

    #[test]
    fn failed_credentials_leave_no_user_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user.db");
        let failing = UserManager::new(Arc::new(FailingCredentials(
            SqliteUserStore::new(&path).unwrap(),
        )));

        assert!(matches!(
            failing.create_user("alice", "pw"),
            Err(ReviewError::Store(_))
        ));
        assert_eq!(failing.get_user("alice").unwrap(), None);
        assert_eq!(failing.get_users_count().unwrap(), 0);

        let manager = UserManager::new(Arc::new(SqliteUserStore::new(&path).unwrap()));
        manager.create_user("alice", "pw").unwrap();
        assert!(manager.check_password("alice", "pw").unwrap());
    }

    #[test]
    fn missing_user_is_none() {
        let (manager, _temp_dir) = create_manager();
        assert_eq!(manager.get_user("ghost").unwrap(), None);
    }
}
