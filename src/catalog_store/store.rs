//! SQLite-backed catalog store, holds songs, artists and reviews.

use super::models::*;
use super::schema::{target_table_name, CATALOG_VERSIONED_SCHEMAS, REVIEW_TABLE_V_0};
use super::trait_def::{AggregateWrite, CatalogStore, ReviewStore};
use crate::sqlite_persistence::{is_unique_violation, open_versioned_db};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

const REVIEW_COLUMNS: &str = "user_name, target_type, target_id, content, rating, created";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, CATALOG_VERSIONED_SCHEMAS)
            .context("Failed to open catalog database")?;
        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn invalid_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Integer,
        message.into(),
    )
}

fn review_from_row(row: &Row) -> rusqlite::Result<Review> {
    let raw_kind: i32 = row.get(1)?;
    let kind = TargetKind::from_int(raw_kind)
        .ok_or_else(|| invalid_column(1, format!("Unknown target type {}", raw_kind)))?;
    let raw_rating: i64 = row.get(4)?;
    let rating = Rating::new(raw_rating)
        .ok_or_else(|| invalid_column(4, format!("Rating {} out of range", raw_rating)))?;
    Ok(Review {
        user_name: row.get(0)?,
        target: TargetRef {
            kind,
            id: row.get(2)?,
        },
        content: row.get(3)?,
        rating,
        created: row.get(5)?,
    })
}

fn song_from_row(row: &Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist_name: row.get(2)?,
        album: row.get(3)?,
        release_year: row.get(4)?,
        genre: row.get(5)?,
        average_rating: row.get(6)?,
        number_of_ratings: row.get(7)?,
    })
}

fn artist_from_row(row: &Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        genre: row.get(2)?,
        country: row.get(3)?,
        average_rating: row.get(4)?,
        number_of_ratings: row.get(5)?,
    })
}

/// Compare-and-swap of a target aggregate, returns false when the row is not at
/// `expected_version` anymore (or doesn't exist).
fn swap_aggregate(
    tx: &Transaction,
    target: TargetRef,
    expected_version: u64,
    aggregate: Aggregate,
) -> Result<bool> {
    let updated = tx.execute(
        &format!(
            "UPDATE {} SET average_rating = ?1, number_of_ratings = ?2, version = version + 1 WHERE id = ?3 AND version = ?4",
            target_table_name(target.kind)
        ),
        params![
            aggregate.average_rating,
            aggregate.number_of_ratings,
            target.id,
            expected_version as i64
        ],
    )?;
    Ok(updated == 1)
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count as usize)
}

impl CatalogStore for SqliteCatalogStore {
    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, title, artist_name, album, release_year, genre, average_rating, number_of_ratings FROM song WHERE id = ?1",
                params![id],
                song_from_row,
            )
            .optional()?)
    }

    fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, name, genre, country, average_rating, number_of_ratings FROM artist WHERE id = ?1",
                params![id],
                artist_from_row,
            )
            .optional()?)
    }

    fn get_aggregate(&self, target: TargetRef) -> Result<Option<VersionedAggregate>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT average_rating, number_of_ratings, version FROM {} WHERE id = ?1",
                    target_table_name(target.kind)
                ),
                params![target.id],
                |row| {
                    Ok(VersionedAggregate {
                        aggregate: Aggregate {
                            average_rating: row.get(0)?,
                            number_of_ratings: row.get(1)?,
                        },
                        version: row.get::<_, i64>(2)? as u64,
                    })
                },
            )
            .optional()?)
    }

    fn insert_song(&self, song: &NewSong) -> Result<Song> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO song (id, title, artist_name, album, release_year, genre) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                song.id,
                song.title,
                song.artist_name,
                song.album,
                song.release_year,
                song.genre
            ],
        )
        .with_context(|| format!("Failed to insert song {}", song.id))?;
        debug!("Inserted song {} \"{}\"", song.id, song.title);
        Ok(Song {
            id: song.id,
            title: song.title.clone(),
            artist_name: song.artist_name.clone(),
            album: song.album.clone(),
            release_year: song.release_year,
            genre: song.genre.clone(),
            average_rating: 0.0,
            number_of_ratings: 0,
        })
    }

    fn insert_artist(&self, artist: &NewArtist) -> Result<Artist> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO artist (id, name, genre, country) VALUES (?1, ?2, ?3, ?4)",
            params![artist.id, artist.name, artist.genre, artist.country],
        )
        .with_context(|| format!("Failed to insert artist {}", artist.id))?;
        debug!("Inserted artist {} \"{}\"", artist.id, artist.name);
        Ok(Artist {
            id: artist.id,
            name: artist.name.clone(),
            genre: artist.genre.clone(),
            country: artist.country.clone(),
            average_rating: 0.0,
            number_of_ratings: 0,
        })
    }

    fn get_songs_count(&self) -> Result<usize> {
        count_rows(&self.conn.lock().unwrap(), target_table_name(TargetKind::Song))
    }

    fn get_artists_count(&self) -> Result<usize> {
        count_rows(
            &self.conn.lock().unwrap(),
            target_table_name(TargetKind::Artist),
        )
    }
}

impl ReviewStore for SqliteCatalogStore {
    fn get_review(&self, key: &ReviewKey) -> Result<Option<Review>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE user_name = ?1 AND target_type = ?2 AND target_id = ?3",
                    REVIEW_COLUMNS, REVIEW_TABLE_V_0.name
                ),
                params![key.user_name, key.target.kind.to_int(), key.target.id],
                review_from_row,
            )
            .optional()?)
    }

    fn get_target_reviews(&self, target: TargetRef) -> Result<Vec<Review>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE target_type = ?1 AND target_id = ?2 ORDER BY created DESC, id DESC",
            REVIEW_COLUMNS, REVIEW_TABLE_V_0.name
        ))?;
        let reviews = stmt
            .query_map(params![target.kind.to_int(), target.id], review_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    fn get_user_reviews(&self, user_name: &str) -> Result<Vec<Review>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE user_name = ?1 ORDER BY created DESC, id DESC",
            REVIEW_COLUMNS, REVIEW_TABLE_V_0.name
        ))?;
        let reviews = stmt
            .query_map(params![user_name], review_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    fn get_reviews_count(&self) -> Result<usize> {
        count_rows(&self.conn.lock().unwrap(), REVIEW_TABLE_V_0.name)
    }

    fn insert_review(
        &self,
        review: &Review,
        expected_version: u64,
        aggregate: Aggregate,
    ) -> Result<AggregateWrite> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        if !swap_aggregate(&tx, review.target, expected_version, aggregate)? {
            return Ok(AggregateWrite::VersionConflict);
        }

        let inserted = tx.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                REVIEW_TABLE_V_0.name, REVIEW_COLUMNS
            ),
            params![
                review.user_name,
                review.target.kind.to_int(),
                review.target.id,
                review.content,
                review.rating.value(),
                review.created
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => return Ok(AggregateWrite::DuplicateReview),
            Err(err) => return Err(err.into()),
        }

        tx.commit()?;
        Ok(AggregateWrite::Committed)
    }

    fn delete_review(
        &self,
        review: &Review,
        expected_version: u64,
        aggregate: Aggregate,
    ) -> Result<AggregateWrite> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        if !swap_aggregate(&tx, review.target, expected_version, aggregate)? {
            return Ok(AggregateWrite::VersionConflict);
        }

        // The aggregate was computed from this rating, a resubmitted review must not be
        // taken out with it.
        let deleted = tx.execute(
            &format!(
                "DELETE FROM {} WHERE user_name = ?1 AND target_type = ?2 AND target_id = ?3 AND rating = ?4",
                REVIEW_TABLE_V_0.name
            ),
            params![
                review.user_name,
                review.target.kind.to_int(),
                review.target.id,
                review.rating.value()
            ],
        )?;
        if deleted == 0 {
            return Ok(AggregateWrite::ReviewMissing);
        }

        tx.commit()?;
        Ok(AggregateWrite::Committed)
    }
}
