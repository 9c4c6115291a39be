use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::services::storage::{StorageError, StorageGateway};

/// Verdict of a malware scan for a given object key
#[derive(Debug, Clone)]
pub enum Verdict {
    /// No threats detected
    Clean,
    /// Malware detected
    Infected { threat_name: String },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan service unavailable: {0}")]
    Unavailable(String),
}

/// Trait for scan clients. The pipeline only deals in object identity;
/// implementations fetch the bytes themselves. A timeout is an error, never
/// a verdict.
#[async_trait]
pub trait ScanClient: Send + Sync {
    /// Obtain a single clean/infected verdict for the object at `key`
    async fn scan(&self, key: &str) -> Result<Verdict, ScanError>;

    /// Check if the scanner is available/healthy
    async fn health_check(&self) -> bool;
}

/// ClamAV scan client using TCP socket (clamd). Pulls object bytes from the
/// storage gateway by key and streams them to clamd.
///
/// Docker command to run ClamAV:
/// ```bash
/// docker run -d --name clamav -p 3310:3310 clamav/clamav:latest
/// ```
pub struct ClamAvScanner {
    storage: Arc<dyn StorageGateway>,
    host: String,
    port: u16,
    timeout: Duration,
}

impl ClamAvScanner {
    pub fn new(storage: Arc<dyn StorageGateway>, host: String, port: u16, timeout: Duration) -> Self {
        Self {
            storage,
            host,
            port,
            timeout,
        }
    }

    async fn connect(&self) -> Result<TcpStream, ScanError> {
        let addr = format!("{}:{}", self.host, self.port);
        TcpStream::connect(&addr)
            .await
            .map_err(|e| ScanError::Unavailable(format!("failed to connect to clamd at {addr}: {e}")))
    }

    async fn stream_to_clamd(&self, key: &str) -> Result<String, ScanError> {
        let mut reader = match self.storage.open_object(key).await {
            Ok(reader) => reader,
            Err(StorageError::NotFound(key)) => {
                return Err(ScanError::Unavailable(format!(
                    "object {key} disappeared before scan"
                )));
            }
            Err(e) => return Err(ScanError::Unavailable(e.to_string())),
        };

        let mut stream = self.connect().await?;

        // INSTREAM command for streaming data to clamd
        // Format: zINSTREAM\0 <length:u32 big-endian> <data> ... <0:u32>
        stream
            .write_all(b"zINSTREAM\0")
            .await
            .map_err(|e| ScanError::Unavailable(e.to_string()))?;

        const CHUNK_SIZE: usize = 1024 * 1024;
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            let n = reader
                .read(&mut buffer)
                .await
                .map_err(|e| ScanError::Unavailable(format!("object read failed: {e}")))?;
            if n == 0 {
                break;
            }

            let len = (n as u32).to_be_bytes();
            stream
                .write_all(&len)
                .await
                .map_err(|e| ScanError::Unavailable(e.to_string()))?;
            stream
                .write_all(&buffer[..n])
                .await
                .map_err(|e| ScanError::Unavailable(e.to_string()))?;
        }

        // Zero-length chunk terminates the stream
        stream
            .write_all(&0u32.to_be_bytes())
            .await
            .map_err(|e| ScanError::Unavailable(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| ScanError::Unavailable(e.to_string()))?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .await
            .map_err(|e| ScanError::Unavailable(e.to_string()))?;

        Ok(String::from_utf8_lossy(&response)
            .trim_end_matches('\0')
            .trim()
            .to_string())
    }
}

#[async_trait]
impl ScanClient for ClamAvScanner {
    async fn scan(&self, key: &str) -> Result<Verdict, ScanError> {
        let response = tokio::time::timeout(self.timeout, self.stream_to_clamd(key))
            .await
            .map_err(|_| {
                ScanError::Unavailable(format!("scan timed out after {:?}", self.timeout))
            })??;

        tracing::debug!("clamd response for {}: {}", key, response);

        if response.ends_with("OK") {
            Ok(Verdict::Clean)
        } else if response.contains("FOUND") {
            let parts: Vec<&str> = response.split(':').collect();
            let threat_name = if parts.len() > 1 {
                parts[1].trim().replace(" FOUND", "")
            } else {
                "Unknown threat".to_string()
            };
            Ok(Verdict::Infected { threat_name })
        } else {
            // ERROR replies and anything unparseable: never guess a verdict
            Err(ScanError::Unavailable(format!(
                "unexpected clamd response: {response}"
            )))
        }
    }

    async fn health_check(&self) -> bool {
        match self.connect().await {
            Ok(mut stream) => {
                if stream.write_all(b"zPING\0").await.is_err() {
                    return false;
                }
                if stream.flush().await.is_err() {
                    return false;
                }

                let mut response = [0u8; 16];
                match stream.read(&mut response).await {
                    Ok(n) => {
                        let resp = String::from_utf8_lossy(&response[..n]);
                        resp.contains("PONG")
                    }
                    Err(_) => false,
                }
            }
            Err(_) => false,
        }
    }
}

/// No-op scan client for development/testing
pub struct NoOpScanner;

#[async_trait]
impl ScanClient for NoOpScanner {
    async fn scan(&self, _key: &str) -> Result<Verdict, ScanError> {
        tracing::warn!("NoOpScanner: skipping virus scan (development mode)");
        Ok(Verdict::Clean)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_scanner() {
        let scanner = NoOpScanner;
        let verdict = scanner.scan("u1/file.txt-abc").await.unwrap();
        assert!(matches!(verdict, Verdict::Clean));
        assert!(scanner.health_check().await);
    }
}
