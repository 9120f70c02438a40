mod file_config;

pub use file_config::{FileConfig, ReviewsConfig};

use crate::review::DEFAULT_MAX_AGGREGATE_RETRIES;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub max_aggregate_retries: Option<usize>,
    pub graphiql: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub graphiql: bool,
    pub reviews: ReviewsSettings,
}

#[derive(Debug, Clone)]
pub struct ReviewsSettings {
    pub max_aggregate_retries: usize,
}

impl Default for ReviewsSettings {
    fn default() -> Self {
        Self {
            max_aggregate_retries: DEFAULT_MAX_AGGREGATE_RETRIES,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let graphiql = file.graphiql.unwrap_or(cli.graphiql);

        let max_aggregate_retries = file
            .reviews
            .unwrap_or_default()
            .max_aggregate_retries
            .or(cli.max_aggregate_retries)
            .unwrap_or(DEFAULT_MAX_AGGREGATE_RETRIES);
        if max_aggregate_retries == 0 {
            bail!("max_aggregate_retries must be at least 1");
        }

        Ok(Self {
            db_dir,
            port,
            logging_level,
            frontend_dir_path,
            graphiql,
            reviews: ReviewsSettings {
                max_aggregate_retries,
            },
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
