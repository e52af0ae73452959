use fitmycv_shared::{jd_analyzer, AppState, Envelope, PipelineConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    fitmycv_shared::init_tracing();

    // Clients and config are resolved once per cold start
    let config = PipelineConfig::from_env();
    if config.offline {
        tracing::warn!("OFFLINE is set, model calls are stubbed");
    }
    let sdk_config = aws_config::load_from_env().await;
    let state = AppState::from_aws(&sdk_config, config);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let state = Arc::clone(&state);
        async move { function_handler(event, state).await }
    }))
    .await
}

async fn function_handler(event: LambdaEvent<Value>, state: Arc<AppState>) -> Result<Envelope, Error> {
    tracing::info!("JD analyzer invoked (request {})", event.context.request_id);

    match jd_analyzer::handle(&state, event.payload).await {
        Ok(envelope) => Ok(envelope),
        Err(e) => {
            tracing::error!("JD analyzer failed: {}", e);
            Err(e.into())
        }
    }
}
