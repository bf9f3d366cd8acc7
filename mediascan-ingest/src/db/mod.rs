//! Database access for mediascan-ingest

pub mod media;

pub use media::{MediaRepository, RepositoryError, RepositoryResult};

use anyhow::Result;
use sqlx::SqlitePool;

/// Open the catalog database for a resolved location (path or sqlite URL)
///
/// Creates the schema and seeds categories if this is a new database.
pub async fn open_database(location: &str) -> Result<SqlitePool> {
    let db_url = mediascan_common::config::database_url(location)?;
    tracing::debug!("Opening database: {}", db_url);

    let pool = mediascan_common::db::init_database(&db_url).await?;

    Ok(pool)
}
