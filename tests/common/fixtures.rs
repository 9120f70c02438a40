//! Test fixture creation for the catalog and user databases

use super::constants::*;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tunescore_server::catalog_store::{CatalogStore, NewArtist, NewSong, SqliteCatalogStore};
use tunescore_server::user::{SqliteUserStore, UserManager};

fn song(id: i64, title: &str, artist_name: &str) -> NewSong {
    NewSong {
        id,
        title: title.to_string(),
        artist_name: artist_name.to_string(),
        album: None,
        release_year: None,
        genre: None,
    }
}

fn artist(id: i64, name: &str, country: &str) -> NewArtist {
    NewArtist {
        id,
        name: name.to_string(),
        genre: None,
        country: Some(country.to_string()),
    }
}

/// Creates a temporary db dir with both databases populated.
/// Returns (temp_dir, catalog_db_path, user_db_path)
pub fn create_test_dbs() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");
    let user_db_path = dir.path().join("user.db");

    {
        let store = SqliteCatalogStore::new(&catalog_db_path)?;
        store.insert_artist(&artist(ARTIST_1_ID, "Radiohead", "UK"))?;
        store.insert_artist(&artist(ARTIST_2_ID, "Massive Attack", "UK"))?;
        store.insert_song(&song(SONG_1_ID, "Paranoid Android", "Radiohead"))?;
        store.insert_song(&song(SONG_2_ID, "Teardrop", "Massive Attack"))?;
        store.insert_song(&song(SEEDED_SONG_ID, "Popular Song", "Someone"))?;
    }

    // The seeded aggregate has no reviews behind it, set it directly.
    let conn = Connection::open(&catalog_db_path)?;
    conn.execute(
        "UPDATE song SET average_rating = ?1, number_of_ratings = ?2 WHERE id = ?3",
        params![4.5, 100, SEEDED_SONG_ID],
    )?;
    drop(conn);

    let user_manager = UserManager::new(Arc::new(SqliteUserStore::new(&user_db_path)?));
    user_manager.create_user(TEST_USER, TEST_PASS)?;
    user_manager.create_user(OTHER_USER, OTHER_PASS)?;

    Ok((dir, catalog_db_path, user_db_path))
}
