use crate::envelope::{parse_request, Envelope};
use crate::error::{MissingInput, PipelineError};
use crate::prompts;
use crate::types::{CanonicalSection, RewriteRequest, RewriteResponse, TailoredCv};
use crate::AppState;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::{Map, Value};

/// Rewrite each canonical CV section against the JD analysis.
///
/// Sections are independent, so model calls run concurrently up to
/// `rewrite_concurrency`. The output always carries all six canonical keys.
pub async fn handle(state: &AppState, event: Value) -> Result<Envelope, PipelineError> {
    let request: RewriteRequest = match parse_request(event) {
        Ok(r) => r,
        Err(rejected) => return Ok(rejected),
    };

    let (cv_sections, jd_analysis) = match (request.cv_sections, request.jd_analysis) {
        (Some(cv), Some(jd)) => (cv, jd),
        _ => return Ok(MissingInput::new(&["cv_sections", "jd_analysis"]).into()),
    };

    let tailored_cv = if state.config.offline {
        tracing::info!("OFFLINE set, passing sections through unchanged");
        CanonicalSection::ALL
            .iter()
            .map(|section| {
                (
                    section.as_str().to_string(),
                    resolve_section(&cv_sections, *section),
                )
            })
            .collect()
    } else {
        rewrite_sections(state, &cv_sections, &jd_analysis).await?
    };

    Envelope::ok(&RewriteResponse { tailored_cv })
}

async fn rewrite_sections(
    state: &AppState,
    cv_sections: &Map<String, Value>,
    jd_analysis: &Value,
) -> Result<TailoredCv, PipelineError> {
    let model = state.model.as_ref();

    let jobs = CanonicalSection::ALL.into_iter().map(|section| {
        let content = resolve_section(cv_sections, section);
        async move {
            let prompt = prompts::section_rewrite(section.as_str(), &content, jd_analysis);
            let rewritten = model
                .invoke(&prompt)
                .await?
                .into_payload(section.as_str());
            tracing::debug!("Rewrote section {}", section.as_str());
            Ok::<_, PipelineError>((section.as_str().to_string(), rewritten))
        }
    });

    let tailored: TailoredCv = stream::iter(jobs)
        .buffer_unordered(state.config.rewrite_concurrency.max(1))
        .try_collect()
        .await?;

    tracing::info!("Rewrote {} sections", tailored.len());
    Ok(tailored)
}

/// Look up a section by canonical name, then by its legacy alias. Empty
/// values (`null`, `""`, `[]`, `{}`) fall through to the alias.
pub fn resolve_section(cv_sections: &Map<String, Value>, section: CanonicalSection) -> Value {
    let canonical = cv_sections.get(section.as_str()).filter(|v| !is_empty(v));
    let alias = || {
        section
            .legacy_alias()
            .and_then(|alias| cv_sections.get(alias))
            .filter(|v| !is_empty(v))
    };

    canonical
        .or_else(alias)
        .or_else(|| cv_sections.get(section.as_str()))
        .cloned()
        .unwrap_or(Value::Null)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
