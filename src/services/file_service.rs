use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::VaultConfig;
use crate::models::FileRecord;
use crate::services::metadata::{MetadataError, MetadataStore, NewFileRecord};
use crate::services::notifier::Notifier;
use crate::services::scanner::{ScanClient, Verdict};
use crate::services::storage::{StorageError, StorageGateway};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("scan service unavailable: {0}")]
    ScanUnavailable(String),

    #[error("storage unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("metadata persistence failed: {0}")]
    Persistence(String),
}

impl From<StorageError> for VaultError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(key) => VaultError::NotFound(key),
            StorageError::Unavailable(msg) => VaultError::UpstreamUnavailable(msg),
        }
    }
}

/// Presigned upload slot handed to the client: PUT to `url`, then confirm
/// with `key`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadIntent {
    pub url: String,
    pub key: String,
}

/// Inputs to the confirmation pipeline. Size is deliberately absent: the
/// authoritative byte length always comes from storage.
#[derive(Debug, Clone)]
pub struct ConfirmUpload {
    pub key: String,
    pub filename: String,
    pub content_type: String,
    pub owner_id: String,
}

/// Confirmation resolves to exactly one of these. Infection is an expected
/// branch, not a fault, so it is a variant rather than an error.
#[derive(Debug)]
pub enum ConfirmOutcome {
    Admitted(FileRecord),
    Rejected { threat_name: String },
}

/// Orchestrates the upload-confirmation gate. There is no cross-store
/// transaction between object storage and the metadata store; consistency is
/// procedural: a metadata record is never written before a clean verdict,
/// and the infected path deletes the object before (and independently of)
/// scrubbing metadata.
pub struct FileService {
    storage: Arc<dyn StorageGateway>,
    scanner: Arc<dyn ScanClient>,
    metadata: Arc<dyn MetadataStore>,
    notifier: Arc<dyn Notifier>,
    config: VaultConfig,
}

impl FileService {
    pub fn new(
        storage: Arc<dyn StorageGateway>,
        scanner: Arc<dyn ScanClient>,
        metadata: Arc<dyn MetadataStore>,
        notifier: Arc<dyn Notifier>,
        config: VaultConfig,
    ) -> Self {
        Self {
            storage,
            scanner,
            metadata,
            notifier,
            config,
        }
    }

    /// Issue a time-boxed presigned PUT URL for a fresh, collision-resistant
    /// key. No object or record is created here; the key only becomes real
    /// once the client uploads and confirms.
    pub async fn issue_upload_intent(
        &self,
        owner_id: &str,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadIntent, VaultError> {
        let key = format!("{}/{}-{}", owner_id, filename, Uuid::new_v4());

        let url = self
            .storage
            .presign_put(
                &key,
                content_type,
                Duration::from_secs(self.config.upload_url_ttl_secs),
            )
            .await?;

        Ok(UploadIntent { url, key })
    }

    /// The gating sequence: existence check, scan, verdict branch. Strict
    /// order, no step skipped. A transport failure anywhere aborts with no
    /// state change; the object stays unconfirmed and the client may retry.
    pub async fn confirm_upload(&self, req: ConfirmUpload) -> Result<ConfirmOutcome, VaultError> {
        // 1. The client asserted it uploaded to this key; verify before
        // doing anything else, so garbage keys never reach the scanner.
        if self.storage.head(&req.key).await?.is_none() {
            return Err(VaultError::NotFound(req.key));
        }

        // 2. Block for a verdict. A timeout or scanner-side error must not
        // be interpreted as either verdict.
        let verdict = self
            .scanner
            .scan(&req.key)
            .await
            .map_err(|e| VaultError::ScanUnavailable(e.to_string()))?;

        match verdict {
            Verdict::Infected { threat_name } => {
                self.purge_infected(&req, &threat_name).await?;
                Ok(ConfirmOutcome::Rejected { threat_name })
            }
            Verdict::Clean => {
                // Authoritative size comes from storage, never the client.
                let head = self
                    .storage
                    .head(&req.key)
                    .await?
                    .ok_or_else(|| VaultError::NotFound(req.key.clone()))?;

                let record = self
                    .metadata
                    .create(NewFileRecord {
                        key: req.key.clone(),
                        filename: req.filename,
                        content_type: req.content_type,
                        size: head.size,
                        owner_id: req.owner_id,
                    })
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            key = %req.key,
                            "clean object has no metadata record, reconciliation required: {e}"
                        );
                        match e {
                            MetadataError::Duplicate(key) => {
                                VaultError::Persistence(format!("record already exists for {key}"))
                            }
                            MetadataError::Store(msg) => VaultError::Persistence(msg),
                        }
                    })?;

                Ok(ConfirmOutcome::Admitted(record))
            }
        }
    }

    /// Issue a time-boxed presigned GET URL for an object that exists.
    pub async fn issue_read_url(&self, key: &str) -> Result<String, VaultError> {
        if self.storage.head(key).await?.is_none() {
            return Err(VaultError::NotFound(key.to_string()));
        }

        Ok(self
            .storage
            .presign_get(key, Duration::from_secs(self.config.read_url_ttl_secs))
            .await?)
    }

    /// Infected branch: delete the object, scrub any stray record, notify.
    /// The three side effects are attempted independently; a notify failure
    /// never masks a successful delete and never reaches the caller.
    async fn purge_infected(&self, req: &ConfirmUpload, threat_name: &str) -> Result<(), VaultError> {
        tracing::warn!(
            key = %req.key,
            threat = %threat_name,
            "scan verdict: infected, purging object"
        );

        let deleted = self.storage.delete(&req.key).await;

        // Normally no record exists before the verdict; scrub defensively.
        let scrubbed = self.metadata.delete_by_key(&req.key).await;

        if let Err(e) = self
            .notifier
            .file_rejected(&req.owner_id, &req.filename)
            .await
        {
            tracing::warn!(key = %req.key, "infected-file notification failed: {e}");
        }

        if let Err(e) = deleted {
            tracing::error!(
                key = %req.key,
                "infected object was not deleted, reconciliation required: {e}"
            );
            return Err(VaultError::Persistence(e.to_string()));
        }

        if let Err(e) = scrubbed {
            tracing::error!(
                key = %req.key,
                "stale metadata record was not deleted, reconciliation required: {e}"
            );
            return Err(VaultError::Persistence(e.to_string()));
        }

        Ok(())
    }
}
