//! Versioned open of the movies database.
//!
//! The schema version lives in `PRAGMA user_version`. Opening with a newer
//! version runs the missing upgrade steps in one transaction, opening with an
//! older version than stored is a conflict.

use std::str::FromStr as _;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, error, info};

use crate::{Pool, SCHEMA_VERSION, error::OpenError, store::StoreOptions};

/// Upgrade steps, index 0 upgrades to version 1
const UPGRADES: &[&[&str]] = &[&[r#"
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        director TEXT NOT NULL,
        summary TEXT NOT NULL,
        genres TEXT NOT NULL DEFAULT '[]'
    )
    "#]];

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub(crate) async fn open(options: &StoreOptions) -> Result<Pool, OpenError> {
    if options.version == 0 || options.version > SCHEMA_VERSION {
        return Err(OpenError::UnsupportedVersion(options.version));
    }
    debug!("Opening database {} version {}", options.url, options.version);
    let connect_options = SqliteConnectOptions::from_str(&options.url)
        .map_err(OpenError::Connect)?
        .create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(options.max_connections.max(1));
    if is_memory_url(&options.url) {
        // every connection would get its own empty database
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_options
        .connect_with(connect_options)
        .await
        .map_err(OpenError::Connect)?;

    if let Err(e) = upgrade(&pool, options.version).await {
        error!("Failed to open database {}: {e}", options.url);
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

async fn stored_version(pool: &Pool) -> Result<u32, OpenError> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(OpenError::Connect)?;
    // negative value can only be written by someone else
    Ok(u32::try_from(version).unwrap_or(u32::MAX))
}

async fn upgrade(pool: &Pool, requested: u32) -> Result<(), OpenError> {
    let stored = stored_version(pool).await?;
    if stored > requested {
        return Err(OpenError::VersionConflict { stored, requested });
    }
    if stored == requested {
        return Ok(());
    }

    let failed = |version: u32| move |source: sqlx::Error| OpenError::Upgrade { version, source };
    let mut transaction = pool.begin().await.map_err(failed(stored + 1))?;
    for version in stored + 1..=requested {
        info!("Upgrading movies database to version {version}");
        for statement in UPGRADES[version as usize - 1] {
            sqlx::query(statement)
                .execute(&mut *transaction)
                .await
                .map_err(failed(version))?;
        }
    }
    sqlx::query(&format!("PRAGMA user_version = {requested}"))
        .execute(&mut *transaction)
        .await
        .map_err(failed(requested))?;
    transaction.commit().await.map_err(failed(requested))?;
    Ok(())
}
