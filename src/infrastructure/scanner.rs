use crate::config::VaultConfig;
use crate::services::scanner::{ClamAvScanner, NoOpScanner, ScanClient};
use crate::services::storage::StorageGateway;
use std::sync::Arc;
use std::time::Duration;

/// Create the scan client configured for this deployment
pub fn setup_scanner(
    config: &VaultConfig,
    storage: Arc<dyn StorageGateway>,
) -> Arc<dyn ScanClient> {
    if !config.enable_virus_scan {
        tracing::warn!("Virus scanning is DISABLED");
        return Arc::new(NoOpScanner);
    }

    match config.virus_scanner_type.to_lowercase().as_str() {
        "clamav" => Arc::new(ClamAvScanner::new(
            storage,
            config.clamav_host.clone(),
            config.clamav_port,
            Duration::from_secs(config.scan_timeout_secs),
        )),
        "noop" | "none" | "disabled" => Arc::new(NoOpScanner),
        other => {
            tracing::warn!("Unknown scanner type '{}', using NoOpScanner", other);
            Arc::new(NoOpScanner)
        }
    }
}
