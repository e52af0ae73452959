use crate::envelope::{parse_request, Envelope};
use crate::error::{MissingInput, PipelineError};
use crate::prompts;
use crate::types::{AnalyzeRequest, JdAnalysis};
use crate::AppState;
use serde_json::Value;

/// Turn a free-text job description into a structured analysis.
///
/// The model answer is passed through unvalidated. In offline mode the fixed
/// [`JdAnalysis::offline_stub`] is returned instead.
pub async fn handle(state: &AppState, event: Value) -> Result<Envelope, PipelineError> {
    let request: AnalyzeRequest = match parse_request(event) {
        Ok(r) => r,
        Err(rejected) => return Ok(rejected),
    };

    let job_description = request.job_description.unwrap_or_default();
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Ok(MissingInput::new(&["job_description"]).into());
    }

    if state.config.offline {
        tracing::info!("OFFLINE set, returning stub JD analysis");
        return Envelope::ok(&JdAnalysis::offline_stub());
    }

    let prompt = prompts::jd_analysis(job_description);
    let analysis = state.model.invoke(&prompt).await?.into_payload("jd_analyzer");

    tracing::info!("JD analysis complete");
    Envelope::ok(&analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{offline_config, state_with, FailingModel, MemoryStore, RecordingModel};
    use crate::PipelineConfig;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_blank_description_is_400() {
        let state = state_with(
            offline_config(),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingModel::answering(json!({}))),
        );

        for event in [json!({}), json!({"job_description": "   \n\t"})] {
            let response = handle(&state, event).await.unwrap();
            assert_eq!(response.status_code, 400);
            assert_eq!(
                response.body_json().unwrap()["message"],
                "job_description is required"
            );
        }
    }

    #[tokio::test]
    async fn test_offline_returns_fixed_stub() {
        let model = Arc::new(RecordingModel::answering(json!({"content": "unused"})));
        let state = state_with(offline_config(), Arc::new(MemoryStore::default()), model.clone());

        for jd in ["anything", "We need an ML engineer on AWS."] {
            let response = handle(&state, json!({"job_description": jd})).await.unwrap();
            assert_eq!(response.status_code, 200);
            assert_eq!(
                response.body_json().unwrap(),
                json!({
                    "target_title": "Senior Machine Learning Engineer",
                    "required_skills": ["python", "mlops", "aws"],
                    "good_to_have_skills": ["langchain"],
                    "keyword_list": ["sagemaker", "pytorch"],
                    "role_alignment_points": ["own ml lifecycle", "deploy to production"],
                    "tone": "professional"
                })
            );
        }
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_model_content_is_passed_through() {
        let analysis = json!({"target_title": "Data Engineer", "tone": "casual"});
        let model = Arc::new(RecordingModel::answering(json!({"content": analysis})));
        let state = state_with(PipelineConfig::default(), Arc::new(MemoryStore::default()), model.clone());

        let response = handle(&state, json!({"job_description": "  Build pipelines  "}))
            .await
            .unwrap();
        assert_eq!(response.body_json().unwrap(), analysis);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("\nJD:\nBuild pipelines"));
    }

    #[tokio::test]
    async fn test_body_without_content_is_returned_whole() {
        let body = json!({"completion": "text"});
        let state = state_with(
            PipelineConfig::default(),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingModel::answering(body.clone())),
        );

        let response = handle(&state, json!({"job_description": "x"})).await.unwrap();
        assert_eq!(response.body_json().unwrap(), body);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let state = state_with(
            PipelineConfig::default(),
            Arc::new(MemoryStore::default()),
            Arc::new(FailingModel),
        );
        let err = handle(&state, json!({"job_description": "x"})).await.unwrap_err();
        assert!(matches!(err, PipelineError::Model(_)));
    }
}
