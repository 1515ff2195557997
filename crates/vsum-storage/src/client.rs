//! S3 client implementation.

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use aws_types::region::Region;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use vsum_models::ObjectDescriptor;

use crate::error::{StorageError, StorageResult};
use crate::store::ObjectStore;

/// Configuration for the S3 client.
///
/// Built once at startup and handed to [`S3Client::new`]; nothing here is global.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket shared with the analysis pipeline
    pub bucket_name: String,
    /// AWS region
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, LocalStack)
    pub endpoint_url: Option<String>,
    /// Static access key ID (falls back to the default credential chain)
    pub access_key_id: Option<String>,
    /// Static secret access key
    pub secret_access_key: Option<String>,
}

impl S3Config {
    /// Minimal config using the default AWS credential chain.
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: region.into(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// `VIDEO_BUCKET` and `AWS_REGION` are required.
    pub fn from_env() -> StorageResult<Self> {
        let bucket_name = std::env::var("VIDEO_BUCKET")
            .map_err(|_| StorageError::config_error("VIDEO_BUCKET not set"))?;
        let region = std::env::var("AWS_REGION")
            .map_err(|_| StorageError::config_error("AWS_REGION not set"))?;

        Ok(Self {
            bucket_name,
            region,
            endpoint_url: non_empty_env("S3_ENDPOINT_URL"),
            access_key_id: non_empty_env("S3_ACCESS_KEY_ID"),
            secret_access_key: non_empty_env("S3_SECRET_ACCESS_KEY"),
        })
    }

    fn static_credentials(&self) -> StorageResult<Option<Credentials>> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Ok(Some(Credentials::new(id, secret, None, None, "vsum-env"))),
            (None, None) => Ok(None),
            _ => Err(StorageError::config_error(
                "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set together",
            )),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// S3 storage client.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
}

impl S3Client {
    /// Create a new S3 client from configuration.
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        let credentials = config.static_credentials()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(credentials) = credentials {
            loader = loader.credentials_provider(credentials);
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(
            bucket = %config.bucket_name,
            region = %config.region,
            custom_endpoint = config.endpoint_url.is_some(),
            "S3 client configured"
        );

        Ok(Self {
            client,
            bucket: config.bucket_name,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        let config = S3Config::from_env()?;
        Self::new(config).await
    }

    /// Bucket this client reads and writes.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// List objects with a prefix.
    pub async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<ObjectDescriptor>> {
        debug!("Listing objects with prefix: {}", prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StorageError::ListFailed(e.to_string()))?;

            for obj in response.contents() {
                let Some(key) = obj.key() else { continue };
                let last_modified = obj
                    .last_modified()
                    .and_then(|t| t.to_millis().ok())
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

                objects.push(ObjectDescriptor {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0).max(0) as u64,
                    last_modified,
                });
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(str::to_string);
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!(prefix = %prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    /// Download object as bytes.
    pub async fn download_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        debug!("Downloading {}", key);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let is_missing = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if is_missing {
                    StorageError::not_found(key)
                } else {
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }

    /// Upload a file.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        info!("Uploaded {} to {}", path.display(), key);
        Ok(())
    }

    /// Check connectivity by performing a head bucket operation.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::AwsSdk(format!("S3 connectivity check failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectDescriptor>> {
        self.list_objects(prefix).await
    }

    async fn get_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.download_bytes(key).await
    }

    async fn put_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()> {
        self.upload_file(path, key, content_type).await
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        S3Client::check_connectivity(self).await
    }
}
