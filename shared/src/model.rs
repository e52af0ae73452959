//! Hosted language model access.
//!
//! Every handler that talks to the model goes through [`ModelClient`]; the
//! production implementation calls Bedrock `InvokeModel` with a
//! `{"prompt": ..}` JSON body.

use crate::error::PipelineError;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use serde_json::Value;

const JSON_MIME: &str = "application/json";

/// Decoded model response.
///
/// `Structured` carries the `content` field of an object response. Anything
/// else (no `content` key, or a non-object body) is kept whole as `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Structured(Value),
    Raw(Value),
}

impl ModelOutput {
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut map) => match map.remove("content") {
                Some(content) => ModelOutput::Structured(content),
                None => ModelOutput::Raw(Value::Object(map)),
            },
            other => ModelOutput::Raw(other),
        }
    }

    /// Payload handed downstream. Raw bodies pass through, but are logged so
    /// an unexpected response shape is visible.
    pub fn into_payload(self, purpose: &str) -> Value {
        match self {
            ModelOutput::Structured(content) => content,
            ModelOutput::Raw(body) => {
                tracing::warn!("{}: model response has no content field, using raw body", purpose);
                body
            }
        }
    }
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<ModelOutput, PipelineError>;
}

pub struct BedrockModel {
    client: BedrockClient,
    model_id: String,
}

impl BedrockModel {
    pub fn new(client: BedrockClient, model_id: String) -> Self {
        Self { client, model_id }
    }
}

#[async_trait]
impl ModelClient for BedrockModel {
    async fn invoke(&self, prompt: &str) -> Result<ModelOutput, PipelineError> {
        let payload = serde_json::to_vec(&serde_json::json!({ "prompt": prompt }))?;

        tracing::debug!(
            "Invoking {} with {} prompt chars",
            self.model_id,
            prompt.chars().count()
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .accept(JSON_MIME)
            .content_type(JSON_MIME)
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| PipelineError::Model(format!("InvokeModel {} failed: {}", self.model_id, e)))?;

        let body: Value = serde_json::from_slice(response.body().as_ref()).map_err(|e| {
            PipelineError::Model(format!("{} returned a non-JSON body: {}", self.model_id, e))
        })?;

        Ok(ModelOutput::from_body(body))
    }
}
