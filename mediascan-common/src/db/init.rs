//! Database initialization
//!
//! Creates the `media_category` and `media` tables on first run and seeds the
//! fixed category set. Every step is idempotent, so opening an existing
//! database runs the same sequence.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Category names seeded at bootstrap
pub const MEDIA_CATEGORIES: [&str; 3] = ["video", "audio", "image"];

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Open a database, create the schema and seed categories
pub async fn init_database(db_url: &str) -> Result<SqlitePool> {
    let pool = connect(db_url).await?;

    create_schema_version_table(&pool).await?;
    create_media_category_table(&pool).await?;
    create_media_table(&pool).await?;
    seed_media_categories(&pool).await?;
    record_schema_version(&pool).await?;

    info!("Database ready (schema version {})", SCHEMA_VERSION);

    Ok(pool)
}

/// Open a connection pool without touching the schema
///
/// Foreign keys are enabled on every connection. In-memory databases are
/// pinned to one long-lived connection, since each SQLite connection to
/// `:memory:` sees its own private database.
pub async fn connect(db_url: &str) -> Result<SqlitePool> {
    let in_memory = is_memory_url(db_url);

    let mut options = SqliteConnectOptions::from_str(db_url)?
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    debug!("Connecting to database: {}", db_url);
    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn record_schema_version(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the media_category table
///
/// One row per category; `name` is the lookup key used by the scanner.
pub async fn create_media_category_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media_category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the media table
///
/// `file_path` uniqueness and the category foreign key are enforced here,
/// not in application code.
pub async fn create_media_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_path TEXT NOT NULL UNIQUE,
            file_size INTEGER NOT NULL CHECK (file_size >= 0),
            category_id INTEGER NOT NULL REFERENCES media_category(id),
            duration REAL NOT NULL DEFAULT 0 CHECK (duration >= 0),
            resolution TEXT NOT NULL DEFAULT 'Unknown',
            codec TEXT NOT NULL DEFAULT 'Unknown',
            bit_rate INTEGER NOT NULL DEFAULT 0 CHECK (bit_rate >= 0),
            date_created TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_media_category_id ON media(category_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert the fixed category set, leaving existing rows untouched
pub async fn seed_media_categories(pool: &SqlitePool) -> Result<()> {
    for name in MEDIA_CATEGORIES {
        let result = sqlx::query("INSERT OR IGNORE INTO media_category (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Seeded media category '{}'", name);
        }
    }

    Ok(())
}
