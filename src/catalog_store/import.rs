//! Bulk loading of songs and artists from a JSON file.

use super::models::CatalogImport;
use super::trait_def::CatalogStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub fn load_catalog_import(path: &Path) -> Result<CatalogImport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {:?}", path))
}

/// Inserts all artists, then all songs. Stops at the first failing insert,
/// whatever was inserted before stays.
/// Returns the number of (artists, songs) inserted.
pub fn import_catalog(store: &dyn CatalogStore, import: &CatalogImport) -> Result<(usize, usize)> {
    for artist in &import.artists {
        store.insert_artist(artist)?;
    }
    for song in &import.songs {
        store.insert_song(song)?;
    }
    info!(
        "Imported {} artists and {} songs",
        import.artists.len(),
        import.songs.len()
    );
    Ok((import.artists.len(), import.songs.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::SqliteCatalogStore;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn imports_file_into_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db")).unwrap();
        let path = temp_dir.path().join("catalog.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "artists": [{{"id": 1, "name": "Portishead", "country": "UK"}}],
                "songs": [
                    {{"id": 1, "title": "Roads", "artist_name": "Portishead", "album": "Dummy"}},
                    {{"id": 2, "title": "Glory Box", "artist_name": "Portishead"}}
                ]
            }}"#
        )
        .unwrap();

        let import = load_catalog_import(&path).unwrap();
        let counts = import_catalog(&store, &import).unwrap();

        assert_eq!(counts, (1, 2));
        assert_eq!(store.get_songs_count().unwrap(), 2);
        assert_eq!(
            store.get_song(1).unwrap().unwrap().album.as_deref(),
            Some("Dummy")
        );
    }

    #[test]
    fn duplicate_ids_fail() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db")).unwrap();
        let import: CatalogImport = serde_json::from_str(
            r#"{"songs": [
                {"id": 1, "title": "A", "artist_name": "X"},
                {"id": 1, "title": "B", "artist_name": "X"}
            ]}"#,
        )
        .unwrap();

        assert!(import_catalog(&store, &import).is_err());
        assert_eq!(store.get_songs_count().unwrap(), 1);
    }
}
