pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
pub mod prompts;
pub mod s3;
pub mod types;

pub mod cover_letter;
pub mod cv_extractor;
pub mod cv_formatter;
pub mod cv_rewriter;
pub mod jd_analyzer;

#[cfg(test)]
pub(crate) mod testing;

pub use config::PipelineConfig;
pub use envelope::Envelope;
pub use error::PipelineError;

use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_s3::Client as S3Client;
use model::{BedrockModel, ModelClient};
use s3::{ObjectStore, S3Store};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shared application state, built once per cold start
pub struct AppState {
    pub config: PipelineConfig,
    pub store: Arc<dyn ObjectStore>,
    pub model: Arc<dyn ModelClient>,
}

impl AppState {
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn ObjectStore>,
        model: Arc<dyn ModelClient>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            model,
        })
    }

    /// Wire the S3 and Bedrock clients from a loaded AWS config
    pub fn from_aws(sdk_config: &aws_config::SdkConfig, config: PipelineConfig) -> Arc<Self> {
        let store = Arc::new(S3Store::new(S3Client::new(sdk_config)));
        let model = Arc::new(BedrockModel::new(
            BedrockClient::new(sdk_config),
            config.model_id.clone(),
        ));
        Self::new(config, store, model)
    }
}

/// Install the fmt subscriber used by every Lambda. CloudWatch stamps the
/// time, so it is left out here.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();
}
