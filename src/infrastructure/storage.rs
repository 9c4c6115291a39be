use crate::config::VaultConfig;
use crate::services::storage::S3StorageGateway;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::config::Region;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn setup_storage(config: &VaultConfig) -> Arc<S3StorageGateway> {
    let endpoint_url = env::var("S3_ENDPOINT").expect("S3_ENDPOINT must be set");
    let access_key = env::var("S3_ACCESS_KEY").expect("S3_ACCESS_KEY must be set");
    let secret_key = env::var("S3_SECRET_KEY").expect("S3_SECRET_KEY must be set");
    let bucket = env::var("S3_BUCKET").expect("S3_BUCKET must be set");

    info!("☁️  S3 Storage: {} (Bucket: {})", endpoint_url, bucket);

    let timeouts = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build();

    let aws_config = aws_config::from_env()
        .endpoint_url(&endpoint_url)
        .region(Region::new("us-east-1"))
        .timeout_config(timeouts)
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            access_key, secret_key, None, None, "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3StorageGateway::new(s3_client, bucket))
}
