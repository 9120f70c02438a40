use super::auth::{PasswordCredentials, PasswordHasher};
use super::user_models::Favorite;
use super::user_store::{UserCredentialsStore, UserStore};
use crate::catalog_store::{TargetKind, TargetRef};
use crate::sqlite_column;
use crate::sqlite_persistence::{
    is_unique_violation, open_versioned_db, ForeignKey, ForeignKeyOnChange, SqlType, Table,
    VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("handle", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_user_handle", "handle")],
    unique_constraints: &[],
};

const USER_PASSWORD_CREDENTIALS_TABLE_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            is_primary_key = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

const FAVORITE_TABLE_V_0: Table = Table {
    name: "favorite",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("target_type", &SqlType::Integer, non_null = true),
        sqlite_column!("target_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_favorite_user_id", "user_id")],
    unique_constraints: &[&["user_id", "target_type", "target_id"]],
};

const USER_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE_V_0,
        USER_PASSWORD_CREDENTIALS_TABLE_V_0,
        FAVORITE_TABLE_V_0,
    ],
    migration: None,
}];

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, USER_VERSIONED_SCHEMAS)
            .context("Failed to open user database")?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, username: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        match conn.execute(
            &format!("INSERT INTO {} (handle) VALUES (?1)", USER_TABLE_V_0.name),
            params![username],
        ) {
            Ok(_) => Ok(Some(conn.last_insert_rowid() as usize)),
            Err(err) if is_unique_violation(&err) => Ok(None),
            Err(err) => {
                Err(anyhow::Error::new(err).context(format!("Failed to create user {}", username)))
            }
        }
    }

    fn delete_user(&self, user_id: usize) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", USER_TABLE_V_0.name),
            params![user_id],
        )?;
        Ok(())
    }

    fn get_user_id(&self, username: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        let id: Option<i64> = conn
            .query_row(
                &format!("SELECT id FROM {} WHERE handle = ?1", USER_TABLE_V_0.name),
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.map(|id| id as usize))
    }

    fn get_users_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", USER_TABLE_V_0.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn add_favorite(&self, user_id: usize, target: TargetRef) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        match conn.execute(
            &format!(
                "INSERT INTO {} (user_id, target_type, target_id) VALUES (?1, ?2, ?3)",
                FAVORITE_TABLE_V_0.name
            ),
            params![user_id, target.kind.to_int(), target.id],
        ) {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => {
                debug!("User {} already has {} as favorite", user_id, target);
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn remove_favorite(&self, user_id: usize, target: TargetRef) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE user_id = ?1 AND target_type = ?2 AND target_id = ?3",
                FAVORITE_TABLE_V_0.name
            ),
            params![user_id, target.kind.to_int(), target.id],
        )?;
        Ok(deleted > 0)
    }

    fn is_favorite(&self, user_id: usize, target: TargetRef) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE user_id = ?1 AND target_type = ?2 AND target_id = ?3",
                FAVORITE_TABLE_V_0.name
            ),
            params![user_id, target.kind.to_int(), target.id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get_favorites(&self, user_id: usize) -> Result<Vec<Favorite>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT target_type, target_id FROM {} WHERE user_id = ?1 ORDER BY id",
            FAVORITE_TABLE_V_0.name
        ))?;
        let favorites = stmt
            .query_map(params![user_id], |row| {
                let raw_kind: i32 = row.get(0)?;
                let kind = TargetKind::from_int(raw_kind).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Integer,
                        format!("Unknown target type {}", raw_kind).into(),
                    )
                })?;
                Ok(Favorite {
                    target: TargetRef {
                        kind,
                        id: row.get(1)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }
}

impl UserCredentialsStore for SqliteUserStore {
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(String, String, String)> = conn
            .query_row(
                &format!(
                    "SELECT salt, hash, hasher FROM {} WHERE user_id = ?1",
                    USER_PASSWORD_CREDENTIALS_TABLE_V_0.name
                ),
                params![user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        match row {
            Some((salt, hash, hasher)) => Ok(Some(PasswordCredentials {
                user_id,
                salt,
                hash,
                hasher: PasswordHasher::from_str(&hasher)?,
            })),
            None => Ok(None),
        }
    }

    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (user_id, salt, hash, hasher) VALUES (?1, ?2, ?3, ?4)",
                USER_PASSWORD_CREDENTIALS_TABLE_V_0.name
            ),
            params![
                credentials.user_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string()
            ],
        )
        .with_context(|| format!("Failed to set credentials of user {}", credentials.user_id))?;
        Ok(())
    }
}
