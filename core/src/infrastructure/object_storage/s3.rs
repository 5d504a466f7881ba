use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
};
use bytes::Bytes;
use tracing::instrument;

use crate::domain::{
    common::{ObjectStorageConfig, entities::app_errors::CoreError},
    snap::ports::ObjectStoragePort,
};

/// S3-compatible storage: Supabase Storage's S3 endpoint or MinIO.
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    pub fn new(config: &ObjectStorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "dachef",
        );

        let endpoint = config.endpoint.trim_end_matches('/');

        tracing::info!(
            endpoint = %endpoint,
            region = %config.region,
            "Initializing object storage client"
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
        }
    }
}

fn classify_upload_error(message: &str) -> &'static str {
    if message.contains("dispatch failure") {
        "HTTP client dispatch failure - check endpoint URL and network connectivity"
    } else if message.contains("timeout") {
        "Request timeout - check network connection and storage server status"
    } else if message.contains("connection") {
        "Connection error - check storage endpoint and network"
    } else if message.contains("NoSuchBucket") {
        "Bucket does not exist"
    } else {
        "Unknown error"
    }
}

impl ObjectStoragePort for S3ObjectStorage {
    #[instrument(skip(self, payload))]
    async fn put_object(
        &self,
        bucket: &str,
        object_key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> Result<(), CoreError> {
        let payload_size = payload.len();

        tracing::info!(
            bucket = %bucket,
            object_key = %object_key,
            size = payload_size,
            content_type = %content_type,
            "Uploading object to storage"
        );

        self.client
            .put_object()
            .bucket(bucket)
            .key(object_key)
            .content_type(content_type)
            .body(ByteStream::from(payload))
            .send()
            .await
            .map_err(|e| {
                let error_kind = classify_upload_error(&format!("{:?}", e));

                tracing::error!(
                    error = %e,
                    error_kind = %error_kind,
                    bucket = %bucket,
                    object_key = %object_key,
                    payload_size = payload_size,
                    "Failed to upload object"
                );
                CoreError::ObjectStorageError(format!(
                    "Failed to upload object: {} ({})",
                    e, error_kind
                ))
            })?;

        tracing::info!(
            bucket = %bucket,
            object_key = %object_key,
            "Object uploaded successfully"
        );

        Ok(())
    }
}
