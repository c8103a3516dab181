use clap::Parser;
use std::{fs, io, path::PathBuf};

use crate::{DATABASE_NAME, SCHEMA_VERSION};

#[derive(Debug, Clone, Parser)]
pub struct StoreConfig {
    #[arg(
        long,
        env = "MOVIES_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db or sqlite::memory:, default is sqlite://[data-dir]/[database-name].db"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "MOVIES_DATA_DIR",
        help = "Data directory for the database file, default is system default like ~/.local/share/movies",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "MOVIES_DATABASE_NAME",
        default_value = DATABASE_NAME,
        help = "Name of the database, used for the default database file"
    )]
    pub database_name: String,

    #[arg(
        long,
        env = "MOVIES_SCHEMA_VERSION",
        default_value_t = SCHEMA_VERSION,
        help = "Schema version to open the database with"
    )]
    pub schema_version: u32,

    #[arg(
        long,
        env = "MOVIES_MAX_CONNECTIONS",
        default_value_t = 5,
        help = "Maximum number of pooled connections"
    )]
    pub max_connections: u32,
}

fn default_data_dir() -> String {
    let dir = dirs::data_dir()
        .map(|p| p.join("movies"))
        .unwrap_or_else(|| PathBuf::from("movies"));
    dir.to_string_lossy().to_string()
}

impl StoreConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            format!(
                "sqlite://{}",
                self.data_dir().join(format!("{}.db", self.database_name)).display()
            )
        })
    }

    /// Creates data directory if needed, no-op when explicit database URL is given
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        if self.database_url.is_some() {
            return Ok(());
        }
        let dir = self.data_dir();
        if !fs::exists(&dir)? {
            fs::create_dir_all(&dir)
        } else if !dir.is_dir() {
            Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("Data directory {} is not a directory", dir.display()),
            ))
        } else {
            Ok(())
        }
    }
}
