#![allow(dead_code)]

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncRead;
use uuid::Uuid;
use vault_backend::models::FileRecord;
use vault_backend::services::metadata::{MetadataError, MetadataStore, NewFileRecord};
use vault_backend::services::notifier::Notifier;
use vault_backend::services::scanner::{ScanClient, ScanError, Verdict};
use vault_backend::services::storage::{ObjectHead, StorageError, StorageGateway};

/// In-memory stand-in for the S3 gateway
pub struct MemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub delete_calls: AtomicUsize,
    pub fail_deletes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            delete_calls: AtomicUsize::new(0),
            fail_deletes: false,
        }
    }

    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::new()
        }
    }

    pub fn put(&self, key: &str, bytes: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn head(&self, key: &str) -> Result<Option<ObjectHead>, StorageError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .map(|bytes| ObjectHead {
                size: bytes.len() as i64,
            }))
    }

    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        Ok(format!(
            "https://storage.test/{}?X-Amz-Expires={}",
            key,
            ttl.as_secs()
        ))
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        Ok(format!(
            "https://storage.test/{}?X-Amz-Expires={}&read=1",
            key,
            ttl.as_secs()
        ))
    }

    async fn open_object(
        &self,
        key: &str,
    ) -> Result<Pin<Box<dyn AsyncRead + Send>>, StorageError> {
        let bytes = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(Box::pin(std::io::Cursor::new(bytes)))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(StorageError::Unavailable("simulated outage".to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Scan client that replays a scripted outcome and counts invocations
pub enum ScanScript {
    Clean,
    Infected(&'static str),
    Fail,
}

pub struct ScriptedScanner {
    pub script: ScanScript,
    pub calls: AtomicUsize,
}

impl ScriptedScanner {
    pub fn new(script: ScanScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ScanClient for ScriptedScanner {
    async fn scan(&self, _key: &str) -> Result<Verdict, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            ScanScript::Clean => Ok(Verdict::Clean),
            ScanScript::Infected(threat) => Ok(Verdict::Infected {
                threat_name: threat.to_string(),
            }),
            ScanScript::Fail => Err(ScanError::Unavailable("simulated timeout".to_string())),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Metadata store backed by a map, enforcing key uniqueness like the DB does
pub struct MemoryMetadataStore {
    pub records: Mutex<HashMap<String, FileRecord>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn create(&self, file: NewFileRecord) -> Result<FileRecord, MetadataError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&file.key) {
            return Err(MetadataError::Duplicate(file.key));
        }
        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4().to_string(),
            key: file.key.clone(),
            filename: file.filename,
            content_type: file.content_type,
            size: file.size,
            owner_id: file.owner_id,
            created_at: now,
            updated_at: now,
        };
        records.insert(file.key, record.clone());
        Ok(record)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<FileRecord>, MetadataError> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    async fn delete_by_key(&self, key: &str) -> Result<(), MetadataError> {
        self.records.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Notifier that records events, optionally failing delivery
pub struct RecordingNotifier {
    pub events: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn file_rejected(&self, owner_id: &str, filename: &str) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((owner_id.to_string(), filename.to_string()));
        if self.fail {
            anyhow::bail!("simulated delivery failure");
        }
        Ok(())
    }
}
