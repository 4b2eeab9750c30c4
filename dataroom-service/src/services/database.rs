//! SQLite repository for OAuth tokens and imported files.

use crate::models::{NewFile, OAuthToken, StoredFile};
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use sqlx::sqlite::SqlitePool;

/// SQLite database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== Token Operations ====================

    /// Most recently created token, if any.
    pub async fn latest_token(&self) -> Result<Option<OAuthToken>, AppError> {
        sqlx::query_as::<_, OAuthToken>("SELECT * FROM oauth_tokens ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Store a freshly granted token.
    ///
    /// Updates the existing row when there is one, keeping its refresh token if
    /// Google did not issue a new one; inserts otherwise.
    pub async fn save_token(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expiry: Option<DateTime<Utc>>,
    ) -> Result<OAuthToken, AppError> {
        let now = Utc::now();

        match self.latest_token().await? {
            Some(existing) => {
                let refresh_token = refresh_token
                    .map(str::to_string)
                    .or(existing.refresh_token);

                sqlx::query_as::<_, OAuthToken>(
                    r#"
                    UPDATE oauth_tokens
                    SET access_token = ?1, refresh_token = ?2, token_expiry = ?3, updated_at = ?4
                    WHERE id = ?5
                    RETURNING *
                    "#,
                )
                .bind(access_token)
                .bind(refresh_token)
                .bind(token_expiry)
                .bind(now)
                .bind(existing.id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::from)
            }
            None => sqlx::query_as::<_, OAuthToken>(
                r#"
                INSERT INTO oauth_tokens (access_token, refresh_token, token_expiry, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?4)
                RETURNING *
                "#,
            )
            .bind(access_token)
            .bind(refresh_token)
            .bind(token_expiry)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from),
        }
    }

    /// Remove every stored token. Returns the number of rows removed.
    pub async fn delete_tokens(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM oauth_tokens")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ==================== File Operations ====================

    /// All imported files, newest first.
    pub async fn list_files(&self) -> Result<Vec<StoredFile>, AppError> {
        sqlx::query_as::<_, StoredFile>("SELECT * FROM files ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Files whose name contains `query`, case-insensitively, newest first.
    ///
    /// `%` and `_` in the query match literally.
    pub async fn search_files(&self, query: &str) -> Result<Vec<StoredFile>, AppError> {
        let pattern = format!("%{}%", escape_like(query));

        sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT * FROM files
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn find_file(&self, id: i64) -> Result<Option<StoredFile>, AppError> {
        sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_file_by_drive_id(
        &self,
        google_drive_id: &str,
    ) -> Result<Option<StoredFile>, AppError> {
        sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE google_drive_id = ?1")
            .bind(google_drive_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Insert a new file record.
    ///
    /// Returns `Ok(None)` when a record for the same Drive file already exists.
    pub async fn insert_file(&self, file: &NewFile) -> Result<Option<StoredFile>, AppError> {
        let result = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files (name, mime_type, size, google_drive_id, storage_key, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(&file.name)
        .bind(&file.mime_type)
        .bind(file.size)
        .bind(&file.google_drive_id)
        .bind(&file.storage_key)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(stored) => Ok(Some(stored)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Delete a file record. Returns whether a row was removed.
    pub async fn delete_file(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
