use crate::error::PipelineError;
use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::time::Duration;

/// Key-addressed blob storage used by the extractor and the formatter.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError>;

    /// Time-limited GET link for an object
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PipelineError>;
}

pub struct S3Store {
    client: S3Client,
}

impl S3Store {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Storage(format!("Failed to get s3://{}/{}: {}", bucket, key, e))
            })?;

        let bytes = output.body.collect().await.map_err(|e| {
            PipelineError::Storage(format!("Failed to read s3://{}/{}: {}", bucket, key, e))
        })?;

        Ok(bytes.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Storage(format!("Failed to upload s3://{}/{}: {}", bucket, key, e))
            })?;

        tracing::debug!("Uploaded s3://{}/{}", bucket, key);
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PipelineError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| PipelineError::Presign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| PipelineError::Presign(format!("s3://{}/{}: {}", bucket, key, e)))?;

        Ok(presigned.uri().to_string())
    }
}
