use std::env;

/// Vault configuration for upload gating and presigned URL issuance
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// TTL for presigned upload (PUT) URLs in seconds (default: 300)
    pub upload_url_ttl_secs: u64,

    /// TTL for presigned read (GET) URLs in seconds (default: 300)
    pub read_url_ttl_secs: u64,

    /// Enable virus scanning (default: true)
    pub enable_virus_scan: bool,

    /// Virus scanner type: "clamav" or "noop" (default: "clamav")
    pub virus_scanner_type: String,

    /// ClamAV host (default: "127.0.0.1")
    pub clamav_host: String,

    /// ClamAV port (default: 3310)
    pub clamav_port: u16,

    /// Upper bound for a whole scan round trip in seconds (default: 60)
    pub scan_timeout_secs: u64,

    /// Timeout for individual storage/service calls in seconds (default: 5)
    pub upstream_timeout_secs: u64,

    /// HS256 secret for bearer tokens (default: "secret", override in prod)
    pub jwt_secret: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            upload_url_ttl_secs: 300,
            read_url_ttl_secs: 300,
            enable_virus_scan: true,
            virus_scanner_type: "clamav".to_string(),
            clamav_host: "127.0.0.1".to_string(),
            clamav_port: 3310,
            scan_timeout_secs: 60,
            upstream_timeout_secs: 5,
            jwt_secret: "secret".to_string(),
        }
    }
}

impl VaultConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_url_ttl_secs: env::var("UPLOAD_URL_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.upload_url_ttl_secs),

            read_url_ttl_secs: env::var("READ_URL_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.read_url_ttl_secs),

            enable_virus_scan: env::var("ENABLE_VIRUS_SCAN")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.enable_virus_scan),

            virus_scanner_type: env::var("VIRUS_SCANNER_TYPE")
                .unwrap_or(default.virus_scanner_type),

            clamav_host: env::var("CLAMAV_HOST").unwrap_or(default.clamav_host),

            clamav_port: env::var("CLAMAV_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.clamav_port),

            scan_timeout_secs: env::var("SCAN_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.scan_timeout_secs),

            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.upstream_timeout_secs),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),
        }
    }

    /// Create config for development (no virus scanning)
    pub fn development() -> Self {
        Self {
            enable_virus_scan: false,
            virus_scanner_type: "noop".to_string(),
            ..Self::default()
        }
    }

    /// Create config for production (scanning on, env-provided clamd address)
    pub fn production() -> Self {
        Self {
            clamav_host: env::var("CLAMAV_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            clamav_port: env::var("CLAMAV_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3310),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.upload_url_ttl_secs, 300);
        assert_eq!(config.read_url_ttl_secs, 300);
        assert!(config.enable_virus_scan);
        assert_eq!(config.virus_scanner_type, "clamav");
        assert_eq!(config.upstream_timeout_secs, 5);
        assert_eq!(config.jwt_secret, "secret");
    }

    #[test]
    fn test_development_config() {
        let config = VaultConfig::development();
        assert!(!config.enable_virus_scan);
        assert_eq!(config.virus_scanner_type, "noop");
    }

    #[test]
    fn test_production_config() {
        let config = VaultConfig::production();
        assert!(config.enable_virus_scan);
        assert_eq!(config.virus_scanner_type, "clamav");
    }
}
