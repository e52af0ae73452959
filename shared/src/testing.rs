//! In-memory fakes for handler tests.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::model::{ModelClient, ModelOutput};
use crate::s3::ObjectStore;
use crate::AppState;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
}

impl MemoryStore {
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError> {
        self.object(bucket, key)
            .map(|o| o.body)
            .ok_or_else(|| PipelineError::Storage(format!("NoSuchKey: s3://{}/{}", bucket, key)))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError> {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, PipelineError> {
        Ok(format!(
            "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }
}

/// Records every prompt and answers with a fixed body
pub struct RecordingModel {
    response: Value,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    pub fn answering(response: Value) -> Self {
        Self {
            response,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for RecordingModel {
    async fn invoke(&self, prompt: &str) -> Result<ModelOutput, PipelineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(ModelOutput::from_body(self.response.clone()))
    }
}

/// Always fails, for checking fault propagation
pub struct FailingModel;

#[async_trait]
impl ModelClient for FailingModel {
    async fn invoke(&self, _prompt: &str) -> Result<ModelOutput, PipelineError> {
        Err(PipelineError::Model("ThrottlingException".to_string()))
    }
}

pub fn offline_config() -> PipelineConfig {
    PipelineConfig {
        offline: true,
        ..PipelineConfig::default()
    }
}

pub fn state_with(
    config: PipelineConfig,
    store: Arc<MemoryStore>,
    model: Arc<dyn ModelClient>,
) -> Arc<AppState> {
    AppState::new(config, store, model)
}
