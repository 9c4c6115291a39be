use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use thiserror::Error;
use tokio::io::AsyncRead;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Metadata-only view of a stored object, as reported by a HEAD probe.
#[derive(Debug, Clone, Copy)]
pub struct ObjectHead {
    pub size: i64,
}

/// Adapter over a single logical bucket. Pure plumbing, no business rules;
/// every method is one fallible network round trip.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// HEAD probe: `Ok(None)` means the object does not exist.
    async fn head(&self, key: &str) -> Result<Option<ObjectHead>, StorageError>;

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, StorageError>;

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;

    async fn open_object(
        &self,
        key: &str,
    ) -> Result<Pin<Box<dyn AsyncRead + Send>>, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

pub struct S3StorageGateway {
    client: Client,
    bucket: String,
}

impl S3StorageGateway {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn presigning(ttl: Duration) -> Result<PresigningConfig, StorageError> {
        PresigningConfig::expires_in(ttl).map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl StorageGateway for S3StorageGateway {
    async fn head(&self, key: &str) -> Result<Option<ObjectHead>, StorageError> {
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match res {
            Ok(output) => Ok(Some(ObjectHead {
                size: output.content_length().unwrap_or(0),
            })),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(None)
                } else {
                    Err(StorageError::Unavailable(service_error.to_string()))
                }
            }
        }
    }

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(Self::presigning(ttl)?)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(Self::presigning(ttl)?)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn open_object(
        &self,
        key: &str,
    ) -> Result<Pin<Box<dyn AsyncRead + Send>>, StorageError> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match res {
            Ok(output) => Ok(Box::pin(output.body.into_async_read())),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Err(StorageError::NotFound(key.to_string()))
                } else {
                    Err(StorageError::Unavailable(service_error.to_string()))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
