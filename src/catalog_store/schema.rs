//! Catalog database schema.

use crate::catalog_store::models::TargetKind;
use crate::sqlite_column;
use crate::sqlite_persistence::{SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};
use rusqlite::Connection;

/// V 0
const SONG_TABLE_V_0: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_name", &SqlType::Text, non_null = true),
        sqlite_column!("album", &SqlType::Text),
        sqlite_column!("release_year", &SqlType::Integer),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!(
            "average_rating",
            &SqlType::Real,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "number_of_ratings",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

const ARTIST_TABLE_V_0: Table = Table {
    name: "artist",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!("country", &SqlType::Text),
        sqlite_column!(
            "average_rating",
            &SqlType::Real,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "number_of_ratings",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const REVIEW_TABLE_V_0: Table = Table {
    name: "review",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("user_name", &SqlType::Text, non_null = true),
        sqlite_column!("target_type", &SqlType::Integer, non_null = true),
        sqlite_column!("target_id", &SqlType::Integer, non_null = true),
        sqlite_column!("content", &SqlType::Text),
        sqlite_column!("rating", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_review_target", "target_type, target_id"),
        ("idx_review_user_name", "user_name"),
    ],
    unique_constraints: &[&["user_name", "target_type", "target_id"]],
};

/// V 1: targets carry a version counter used for optimistic concurrency on aggregates.
pub const SONG_TABLE_V_1: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_name", &SqlType::Text, non_null = true),
        sqlite_column!("album", &SqlType::Text),
        sqlite_column!("release_year", &SqlType::Integer),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!(
            "average_rating",
            &SqlType::Real,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "number_of_ratings",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "version",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const ARTIST_TABLE_V_1: Table = Table {
    name: "artist",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!("country", &SqlType::Text),
        sqlite_column!(
            "average_rating",
            &SqlType::Real,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "number_of_ratings",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "version",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[SONG_TABLE_V_0, ARTIST_TABLE_V_0, REVIEW_TABLE_V_0],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[SONG_TABLE_V_1, ARTIST_TABLE_V_1, REVIEW_TABLE_V_0],
        migration: Some(|conn: &Connection| {
            conn.execute(
                "ALTER TABLE song ADD COLUMN version INTEGER NOT NULL DEFAULT 0",
                [],
            )?;
            conn.execute(
                "ALTER TABLE artist ADD COLUMN version INTEGER NOT NULL DEFAULT 0",
                [],
            )?;
            Ok(())
        }),
    },
];

/// Name of the table holding targets of the given kind.
pub fn target_table_name(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Song => SONG_TABLE_V_1.name,
        TargetKind::Artist => ARTIST_TABLE_V_1.name,
    }
}
