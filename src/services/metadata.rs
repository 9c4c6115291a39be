use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::FileRecord;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("metadata store error: {0}")]
    Store(String),
}

/// Fields supplied by the confirmation pipeline; id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub key: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub owner_id: String,
}

/// Durable create/find/delete over file records, keyed by the unique object
/// key. Uniqueness on `key` is the store's job: a duplicate create must fail,
/// never overwrite.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn create(&self, file: NewFileRecord) -> Result<FileRecord, MetadataError>;
    async fn find_by_key(&self, key: &str) -> Result<Option<FileRecord>, MetadataError>;
    async fn delete_by_key(&self, key: &str) -> Result<(), MetadataError>;
}

pub struct SqlxMetadataStore {
    db: SqlitePool,
}

impl SqlxMetadataStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for SqlxMetadataStore {
    async fn create(&self, file: NewFileRecord) -> Result<FileRecord, MetadataError> {
        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4().to_string(),
            key: file.key,
            filename: file.filename,
            content_type: file.content_type,
            size: file.size,
            owner_id: file.owner_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO files (id, key, filename, content_type, size, owner_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.key)
        .bind(&record.filename)
        .bind(&record.content_type)
        .bind(record.size)
        .bind(&record.owner_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                MetadataError::Duplicate(record.key.clone())
            }
            _ => MetadataError::Store(e.to_string()),
        })?;

        Ok(record)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<FileRecord>, MetadataError> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT id, key, filename, content_type, size, owner_id, created_at, updated_at \
             FROM files WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| MetadataError::Store(e.to_string()))
    }

    async fn delete_by_key(&self, key: &str) -> Result<(), MetadataError> {
        sqlx::query("DELETE FROM files WHERE key = ?")
            .bind(key)
            .execute(&self.db)
            .await
            .map_err(|e| MetadataError::Store(e.to_string()))?;
        Ok(())
    }
}
