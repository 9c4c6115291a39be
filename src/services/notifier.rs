use async_trait::async_trait;

/// Best-effort side channel for "file rejected" events. Delivery failures
/// are logged by the caller and never fail the pipeline.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn file_rejected(&self, owner_id: &str, filename: &str) -> anyhow::Result<()>;
}

/// Stub notifier until a real delivery channel (mail, webhook) lands.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn file_rejected(&self, owner_id: &str, filename: &str) -> anyhow::Result<()> {
        tracing::warn!(
            owner_id = %owner_id,
            filename = %filename,
            "infected file was rejected and deleted"
        );
        Ok(())
    }
}
