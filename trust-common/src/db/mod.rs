//! Database initialization and access layer

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub mod models;
pub mod store;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await
        .map_err(crate::Error::read)?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Connection pragmas: referential integrity, WAL for concurrent readers,
/// bounded lock waits.
async fn configure(pool: &SqlitePool) -> Result<()> {
    for pragma in [
        "PRAGMA foreign_keys = ON",
        "PRAGMA journal_mode = WAL",
        "PRAGMA busy_timeout = 5000",
    ] {
        sqlx::query(pragma)
            .execute(pool)
            .await
            .map_err(crate::Error::write)?;
    }
    Ok(())
}

/// Create all tables (idempotent - safe to call multiple times)
///
/// Public so tests can run against an in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_artists_table(pool).await?;
    create_votes_table(pool).await?;
    create_demo_purchases_table(pool).await?;
    create_tracks_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            telegram_id TEXT NOT NULL UNIQUE,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            role TEXT NOT NULL CHECK (role IN ('fan', 'artist')),
            fan_level INTEGER NOT NULL DEFAULT 1,
            fan_hp INTEGER NOT NULL DEFAULT 0,
            stars_balance INTEGER NOT NULL DEFAULT 0,
            entry_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(crate::Error::write)?;
    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE REFERENCES users(id),
            project_name TEXT NOT NULL,
            currency_name TEXT NOT NULL,
            comment TEXT NOT NULL DEFAULT '',
            private_link TEXT NOT NULL DEFAULT '',
            trust_score INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            hp INTEGER NOT NULL DEFAULT 0,
            votes_total INTEGER NOT NULL DEFAULT 0,
            supporters_count INTEGER NOT NULL DEFAULT 0,
            trend TEXT NOT NULL CHECK (trend IN ('up', 'down', 'flat')),
            last_activity_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(crate::Error::write)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_trust_score ON artists(trust_score DESC)")
        .execute(pool)
        .await
        .map_err(crate::Error::write)?;
    Ok(())
}

async fn create_votes_table(pool: &SqlitePool) -> Result<()> {
    // Append-only; deliberately no uniqueness so repeated support counts
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id TEXT PRIMARY KEY,
            fan_user_id TEXT NOT NULL REFERENCES users(id),
            artist_id TEXT NOT NULL REFERENCES artists(id),
            amount INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(crate::Error::write)?;
    Ok(())
}

async fn create_demo_purchases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS demo_purchases (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            artist_id TEXT NOT NULL REFERENCES artists(id),
            stars_amount INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, artist_id)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(crate::Error::write)?;
    Ok(())
}

async fn create_tracks_table(pool: &SqlitePool) -> Result<()> {
    // Populated out-of-band; read-only from the service
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id TEXT PRIMARY KEY,
            artist_id TEXT NOT NULL REFERENCES artists(id),
            title TEXT NOT NULL,
            storage_path TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(crate::Error::write)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// In-memory pool with the full schema, for adapter tests
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .expect("pragma");
        create_schema(&pool).await.expect("schema");
        pool
    }
}
