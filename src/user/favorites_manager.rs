use super::user_manager::load_user;
use super::user_models::{Favorite, User};
use super::user_store::UserStore;
use crate::catalog_store::TargetRef;
use crate::review::{parse_target_kind, ReviewError, ReviewResult};
use std::sync::Arc;
use tracing::info;

/// Per-user favorite sets. Membership is a single row guarded by a unique
/// constraint, so racing adds of the same favorite cannot both succeed.
pub struct FavoritesManager {
    user_store: Arc<dyn UserStore>,
}

impl FavoritesManager {
    pub fn new(user_store: Arc<dyn UserStore>) -> Self {
        Self { user_store }
    }

    fn require_user_id(&self, username: &str) -> ReviewResult<usize> {
        self.user_store
            .get_user_id(username)?
            .ok_or_else(|| ReviewError::UserNotFound(username.to_string()))
    }

    fn updated_user(&self, username: &str) -> ReviewResult<User> {
        load_user(self.user_store.as_ref(), username)?
            .ok_or_else(|| ReviewError::UserNotFound(username.to_string()))
    }

    pub fn add_favorite(
        &self,
        username: &str,
        target_type: &str,
        target_id: i64,
    ) -> ReviewResult<User> {
        let kind = parse_target_kind(target_type)?;
        let user_id = self.require_user_id(username)?;
        let target = TargetRef { kind, id: target_id };

        if !self.user_store.add_favorite(user_id, target)? {
            return Err(ReviewError::DuplicateFavorite);
        }
        info!("User {} added favorite {}", username, target);
        self.updated_user(username)
    }

    pub fn remove_favorite(
        &self,
        username: &str,
        target_type: &str,
        target_id: i64,
    ) -> ReviewResult<User> {
        let kind = parse_target_kind(target_type)?;
        let user_id = self.require_user_id(username)?;
        let target = TargetRef { kind, id: target_id };

        if !self.user_store.remove_favorite(user_id, target)? {
            return Err(ReviewError::FavoriteNotFound);
        }
        info!("User {} removed favorite {}", username, target);
        self.updated_user(username)
    }

    /// A missing user is not an error here, it just has no favorites.
    pub fn check_favorite(
        &self,
        username: &str,
        target_type: &str,
        target_id: i64,
    ) -> ReviewResult<bool> {
        let kind = parse_target_kind(target_type)?;
        match self.user_store.get_user_id(username)? {
            Some(user_id) => Ok(self
                .user_store
                .is_favorite(user_id, TargetRef { kind, id: target_id })?),
            None => Ok(false),
        }
    }

    pub fn get_favorites(&self, username: &str) -> ReviewResult<Vec<Favorite>> {
        let user_id = self.require_user_id(username)?;
        Ok(self.user_store.get_favorites(user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::SqliteUserStore;
    use tempfile::TempDir;

    fn create_manager() -> (FavoritesManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteUserStore::new(temp_dir.path().join("user.db")).unwrap();
        store.create_user("alice").unwrap();
        (FavoritesManager::new(Arc::new(store)), temp_dir)
    }

    fn targets(favorites: &[Favorite]) -> Vec<TargetRef> {
        favorites.iter().map(|f| f.target).collect()
    }

    #[test]
    fn add_returns_user_with_favorites_in_order() {
        let (manager, _temp_dir) = create_manager();

        manager.add_favorite("alice", "song", 1).unwrap();
        manager.add_favorite("alice", "artist", 2).unwrap();
        let user = manager.add_favorite("alice", "song", 3).unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(
            targets(&user.favorites),
            vec![TargetRef::song(1), TargetRef::artist(2), TargetRef::song(3)]
        );
        assert_eq!(manager.get_favorites("alice").unwrap(), user.favorites);
    }

    #[test]
    fn duplicate_add_fails_and_keeps_one_entry() {
        let (manager, _temp_dir) = create_manager();
        manager.add_favorite("alice", "song", 1).unwrap();

        assert!(matches!(
            manager.add_favorite("alice", "song", 1),
            Err(ReviewError::DuplicateFavorite)
        ));
        assert_eq!(manager.get_favorites("alice").unwrap().len(), 1);
    }

    #[test]
    fn removing_absent_favorite_fails_and_keeps_set() {
        let (manager, _temp_dir) = create_manager();
        manager.add_favorite("alice", "artist", 4).unwrap();

        assert!(matches!(
            manager.remove_favorite("alice", "song", 4),
            Err(ReviewError::FavoriteNotFound)
        ));
        assert_eq!(
            targets(&manager.get_favorites("alice").unwrap()),
            vec![TargetRef::artist(4)]
        );

        let user = manager.remove_favorite("alice", "artist", 4).unwrap();
        assert!(user.favorites.is_empty());
    }

    #[test]
    fn check_favorite_for_missing_user_is_false() {
        let (manager, _temp_dir) = create_manager();
        manager.add_favorite("alice", "song", 1).unwrap();

        assert!(manager.check_favorite("alice", "song", 1).unwrap());
        assert!(!manager.check_favorite("alice", "artist", 1).unwrap());
        assert!(!manager.check_favorite("ghost", "song", 1).unwrap());
    }

    #[test]
    fn unknown_user_and_type_are_rejected() {
        let (manager, _temp_dir) = create_manager();

        assert!(matches!(
            manager.add_favorite("ghost", "song", 1),
            Err(ReviewError::UserNotFound(name)) if name == "ghost"
        ));
        assert!(matches!(
            manager.remove_favorite("ghost", "song", 1),
            Err(ReviewError::UserNotFound(_))
        ));
        assert!(matches!(
            manager.get_favorites("ghost"),
            Err(ReviewError::UserNotFound(_))
        ));
        assert!(matches!(
            manager.add_favorite("alice", "album", 1),
            Err(ReviewError::InvalidTarget(t)) if t == "album"
        ));
        assert!(matches!(
            manager.check_favorite("alice", "album", 1),
            Err(ReviewError::InvalidTarget(_))
        ));
    }
}
