use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunescore_server::catalog_store::{
    import_catalog, load_catalog_import, CatalogStore, NewArtist, NewSong, ReviewStore,
    SqliteCatalogStore,
};
use tunescore_server::user::{SqliteUserStore, UserManager};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser)]
#[command(name = "cli-admin", about = "Administration of a tunescore database directory")]
struct CliArgs {
    /// Directory holding catalog.db and user.db.
    #[clap(long, value_parser = parse_path)]
    db_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Creates a user with the given name and password.
    AddUser { username: String, password: String },

    /// Verifies the password of a given user, it doesn't make any
    /// persistent change, it just compares the password hash.
    CheckPassword { username: String, password: String },

    /// Adds a song without ratings.
    AddSong {
        #[clap(long)]
        id: i64,
        #[clap(long)]
        title: String,
        #[clap(long)]
        artist_name: String,
        #[clap(long)]
        album: Option<String>,
        #[clap(long)]
        release_year: Option<i32>,
        #[clap(long)]
        genre: Option<String>,
    },

    /// Adds an artist without ratings.
    AddArtist {
        #[clap(long)]
        id: i64,
        #[clap(long)]
        name: String,
        #[clap(long)]
        genre: Option<String>,
        #[clap(long)]
        country: Option<String>,
    },

    /// Imports artists and songs from a JSON file shaped as
    /// {"artists": [...], "songs": [...]}.
    Import {
        #[clap(value_parser = parse_path)]
        path: PathBuf,
    },

    /// Shows the number of users, songs, artists and reviews.
    Stats,

    /// Shows the paths of the databases.
    Where,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if !cli_args.db_dir.is_dir() {
        bail!("Database directory does not exist: {:?}", cli_args.db_dir);
    }
    let catalog_db_path = cli_args.db_dir.join("catalog.db");
    let user_db_path = cli_args.db_dir.join("user.db");

    match cli_args.command {
        Command::AddUser { username, password } => {
            let user_manager = UserManager::new(Arc::new(SqliteUserStore::new(&user_db_path)?));
            let user = user_manager.create_user(&username, &password)?;
            println!("Created user {} with id {}", user.username, user.id);
        }
        Command::CheckPassword { username, password } => {
            let user_manager = UserManager::new(Arc::new(SqliteUserStore::new(&user_db_path)?));
            if user_manager.check_password(&username, &password)? {
                println!("Password is correct.");
            } else {
                bail!("Wrong password or unknown user {}", username);
            }
        }
        Command::AddSong {
            id,
            title,
            artist_name,
            album,
            release_year,
            genre,
        } => {
            let store = SqliteCatalogStore::new(&catalog_db_path)?;
            let song = store.insert_song(&NewSong {
                id,
                title,
                artist_name,
                album,
                release_year,
                genre,
            })?;
            println!("{:#?}", song);
        }
        Command::AddArtist {
            id,
            name,
            genre,
            country,
        } => {
            let store = SqliteCatalogStore::new(&catalog_db_path)?;
            let artist = store.insert_artist(&NewArtist {
                id,
                name,
                genre,
                country,
            })?;
            println!("{:#?}", artist);
        }
        Command::Import { path } => {
            let store = SqliteCatalogStore::new(&catalog_db_path)?;
            let import = load_catalog_import(&path)?;
            let (artists, songs) = import_catalog(&store, &import)?;
            println!("Imported {} artists and {} songs.", artists, songs);
        }
        Command::Stats => {
            let store = SqliteCatalogStore::new(&catalog_db_path)?;
            let user_manager = UserManager::new(Arc::new(SqliteUserStore::new(&user_db_path)?));
            println!("Users:   {}", user_manager.get_users_count()?);
            println!("Songs:   {}", store.get_songs_count()?);
            println!("Artists: {}", store.get_artists_count()?);
            println!("Reviews: {}", store.get_reviews_count()?);
        }
        Command::Where => {
            println!("{}", catalog_db_path.display());
            println!("{}", user_db_path.display());
        }
    }

    Ok(())
}
