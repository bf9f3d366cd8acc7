//! Media record persistence
//!
//! Uniqueness of `file_path` and the category foreign key are enforced by
//! SQLite, as are the CHECK constraints on sizes and durations; this module
//! translates constraint violations into typed errors.
//! Inserts and updates each run in their own transaction.

use mediascan_common::db::{MediaCategory, MediaRecord, MediaUpdate, NewMediaRecord};
use sqlx::error::ErrorKind;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A record with this file path is already stored
    #[error("Media with path {0} already exists in the database")]
    AlreadyExists(String),

    /// Category name (or id) has no `media_category` row
    #[error("Media category '{0}' not found")]
    CategoryNotFound(String),

    /// Field values rejected by a CHECK or NOT NULL constraint
    #[error("Invalid media record: {0}")]
    InvalidRecord(String),

    /// Connection or query failure
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

const MEDIA_COLUMNS: &str =
    "id, file_path, file_size, category_id, duration, resolution, codec, bit_rate, date_created";

/// Repository over the `media` and `media_category` tables
#[derive(Debug, Clone)]
pub struct MediaRepository {
    pool: SqlitePool,
}

impl MediaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new record
    ///
    /// Duplicate paths are detected by the UNIQUE constraint, not by a prior
    /// lookup, so concurrent writers cannot both succeed. On any failure the
    /// transaction is rolled back and nothing is written.
    pub async fn add(&self, record: &NewMediaRecord) -> RepositoryResult<MediaRecord> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO media (file_path, file_size, category_id, duration, resolution, codec, bit_rate, date_created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        );

        let result = sqlx::query(&sql)
            .bind(&record.file_path)
            .bind(record.file_size)
            .bind(record.category_id)
            .bind(record.duration)
            .bind(&record.resolution)
            .bind(&record.codec)
            .bind(record.bit_rate)
            .bind(record.date_created)
            .fetch_one(&mut *tx)
            .await;

        match result {
            Ok(row) => {
                let stored = media_from_row(&row)?;
                tx.commit().await?;
                debug!(id = stored.id, path = %stored.file_path, "Media added");
                Ok(stored)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback after failed insert failed: {}", rollback_err);
                }
                Err(map_write_error(e, &record.file_path, record.category_id))
            }
        }
    }

    /// Load a record by id
    pub async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<MediaRecord>> {
        let sql = format!("SELECT {} FROM media WHERE id = ?", MEDIA_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        row.map(|r| media_from_row(&r)).transpose().map_err(Into::into)
    }

    /// Load a record by file path
    pub async fn get_by_path(&self, file_path: &str) -> RepositoryResult<Option<MediaRecord>> {
        let sql = format!("SELECT {} FROM media WHERE file_path = ?", MEDIA_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(file_path)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| media_from_row(&r)).transpose().map_err(Into::into)
    }

    /// All records of a category, by id
    pub async fn get_by_category(&self, category_name: &str) -> RepositoryResult<Vec<MediaRecord>> {
        let category_id = self.category_id(category_name).await?;

        let sql = format!(
            "SELECT {} FROM media WHERE category_id = ? ORDER BY id",
            MEDIA_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(media_from_row(&row)?);
        }

        Ok(records)
    }

    /// Apply a partial update
    ///
    /// Returns `None` if no record has this id. Moving a record onto a path
    /// that is already stored fails with `AlreadyExists`.
    pub async fn update(&self, id: i64, update: &MediaUpdate) -> RepositoryResult<Option<MediaRecord>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE media SET
                file_path = COALESCE(?, file_path),
                file_size = COALESCE(?, file_size),
                category_id = COALESCE(?, category_id),
                duration = COALESCE(?, duration),
                resolution = COALESCE(?, resolution),
                codec = COALESCE(?, codec),
                bit_rate = COALESCE(?, bit_rate),
                date_created = COALESCE(?, date_created)
            WHERE id = ?
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        );

        let result = sqlx::query(&sql)
            .bind(&update.file_path)
            .bind(update.file_size)
            .bind(update.category_id)
            .bind(update.duration)
            .bind(&update.resolution)
            .bind(&update.codec)
            .bind(update.bit_rate)
            .bind(update.date_created)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await;

        match result {
            Ok(row) => {
                let updated = row.map(|r| media_from_row(&r)).transpose()?;
                tx.commit().await?;
                if updated.is_some() {
                    info!("Media with ID {} updated", id);
                }
                Ok(updated)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback after failed update failed: {}", rollback_err);
                }
                let path = update.file_path.as_deref().unwrap_or_default();
                let category_id = update.category_id.unwrap_or_default();
                Err(map_write_error(e, path, category_id))
            }
        }
    }

    /// Delete a record; false if no record has this id
    pub async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Media with ID {} deleted", id);
        }

        Ok(deleted)
    }

    /// Resolve a category name to its id
    ///
    /// A missing row is `CategoryNotFound`; there is no default id.
    pub async fn category_id(&self, category_name: &str) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM media_category WHERE name = ?")
            .bind(category_name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::CategoryNotFound(category_name.to_string()))
    }

    /// All categories, by id
    pub async fn list_categories(&self) -> RepositoryResult<Vec<MediaCategory>> {
        let rows = sqlx::query("SELECT id, name FROM media_category ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            categories.push(MediaCategory {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }

        Ok(categories)
    }

    /// Count stored records
    pub async fn count(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn media_from_row(row: &SqliteRow) -> Result<MediaRecord, sqlx::Error> {
    Ok(MediaRecord {
        id: row.try_get("id")?,
        file_path: row.try_get("file_path")?,
        file_size: row.try_get("file_size")?,
        category_id: row.try_get("category_id")?,
        duration: row.try_get("duration")?,
        resolution: row.try_get("resolution")?,
        codec: row.try_get("codec")?,
        bit_rate: row.try_get("bit_rate")?,
        date_created: row.try_get("date_created")?,
    })
}

/// Translate a constraint violation on insert/update into a typed error
fn map_write_error(err: sqlx::Error, file_path: &str, category_id: i64) -> RepositoryError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return RepositoryError::AlreadyExists(file_path.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::CategoryNotFound(format!("id {}", category_id));
        }
        if db_err.is_check_violation() || matches!(db_err.kind(), ErrorKind::NotNullViolation) {
            return RepositoryError::InvalidRecord(db_err.message().to_string());
        }
    }

    RepositoryError::StorageUnavailable(err)
}
