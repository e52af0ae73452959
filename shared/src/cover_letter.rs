use crate::envelope::{parse_request, Envelope};
use crate::error::{MissingInput, PipelineError};
use crate::prompts;
use crate::types::{CoverLetterRequest, CoverLetterResponse, DEFAULT_CANDIDATE_NAME};
use crate::AppState;
use serde_json::Value;

/// Draft a cover letter from the tailored CV and JD analysis
pub async fn handle(state: &AppState, event: Value) -> Result<Envelope, PipelineError> {
    let request: CoverLetterRequest = match parse_request(event) {
        Ok(r) => r,
        Err(rejected) => return Ok(rejected),
    };

    let tailored_cv = match request.tailored_cv {
        Some(cv) => cv,
        None => return Ok(MissingInput::new(&["tailored_cv"]).into()),
    };
    let jd_analysis = request
        .jd_analysis
        .unwrap_or_else(|| Value::Object(Default::default()));
    let name = request
        .name
        .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());

    let cover_letter = if state.config.offline {
        tracing::info!("OFFLINE set, returning template cover letter");
        Value::String(offline_letter(&name))
    } else {
        let prompt = prompts::cover_letter(&name, &tailored_cv, &jd_analysis);
        state.model.invoke(&prompt).await?.into_payload("cover_letter")
    };

    Envelope::ok(&CoverLetterResponse { cover_letter })
}

fn offline_letter(name: &str) -> String {
    format!("Dear Hiring Manager, {} is excited to apply.", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::MAX_PROMPT_CHARS;
    use crate::testing::{offline_config, state_with, MemoryStore, RecordingModel};
    use crate::PipelineConfig;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_tailored_cv_is_400() {
        let state = state_with(
            offline_config(),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingModel::answering(json!({}))),
        );

        for event in [json!({}), json!({"tailored_cv": null, "name": "Ada"})] {
            let response = handle(&state, event).await.unwrap();
            assert_eq!(response.status_code, 400);
            assert_eq!(response.body_json().unwrap()["message"], "tailored_cv is required");
        }
    }

    #[tokio::test]
    async fn test_offline_letter_uses_name_or_default() {
        let state = state_with(
            offline_config(),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingModel::answering(json!({}))),
        );

        let response = handle(&state, json!({"tailored_cv": {"summary": "builder"}, "name": "Ada"}))
            .await
            .unwrap();
        assert_eq!(
            response.body_json().unwrap(),
            json!({"cover_letter": "Dear Hiring Manager, Ada is excited to apply."})
        );

        let response = handle(&state, json!({"tailored_cv": {"summary": "builder"}}))
            .await
            .unwrap();
        assert_eq!(
            response.body_json().unwrap()["cover_letter"],
            "Dear Hiring Manager, Candidate is excited to apply."
        );
    }

    #[tokio::test]
    async fn test_online_prompt_is_capped() {
        let model = Arc::new(RecordingModel::answering(json!({"content": "Dear team, ..."})));
        let state = state_with(PipelineConfig::default(), Arc::new(MemoryStore::default()), model.clone());

        let long = "x".repeat(30_000);
        let response = handle(&state, json!({"tailored_cv": {"experience": long}, "name": "Ada"}))
            .await
            .unwrap();
        assert_eq!(response.body_json().unwrap()["cover_letter"], "Dear team, ...");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].chars().count(), MAX_PROMPT_CHARS);
        assert!(prompts[0].contains("\nNAME:Ada\nCV:"));
    }
}
