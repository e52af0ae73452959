use crate::envelope::{parse_request, Envelope};
use crate::error::{MissingInput, PipelineError};
use crate::types::{RenderRequest, RenderResponse, DEFAULT_CANDIDATE_NAME};
use crate::AppState;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TEMPLATE_ID: &str = "template-modern";
const TEMPLATE_FILE: &str = "index.html";
const URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Render the tailored CV into a template, upload it, and hand back a
/// presigned download link.
pub async fn handle(state: &AppState, event: Value) -> Result<Envelope, PipelineError> {
    let request: RenderRequest = match parse_request(event) {
        Ok(r) => r,
        Err(rejected) => return Ok(rejected),
    };

    let tailored_cv = match request.tailored_cv {
        Some(cv) => cv,
        None => return Ok(MissingInput::new(&["tailored_cv"]).into()),
    };
    let template_id = request
        .template_id
        .unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string());
    if !is_valid_template_id(&template_id) {
        return Ok(Envelope::bad_request("template_id is invalid"));
    }
    let name = request
        .name
        .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());

    let template = load_template(&state.config.template_dir, &template_id)?;
    let rendered = render(&template, &payload(tailored_cv, name))?;

    // PDF conversion is not wired up yet; the rendered markup is stored as-is
    let key = rendered_key(&template_id);
    let bucket = &state.config.assets_bucket;
    state
        .store
        .put_object(bucket, &key, rendered.into_bytes(), "application/pdf")
        .await?;

    let cv_pdf_url = state
        .store
        .presigned_get_url(bucket, &key, URL_EXPIRY)
        .await?;

    tracing::info!("Rendered {} to s3://{}/{}", template_id, bucket, key);
    Envelope::ok(&RenderResponse { cv_pdf_url })
}

pub fn rendered_key(template_id: &str) -> String {
    format!("rendered/{}/cv.pdf", template_id)
}

/// Tailored CV fields plus the injected `NAME`, which takes precedence over
/// any CV key that upper-cases to the same placeholder.
fn payload(mut tailored_cv: Map<String, Value>, name: String) -> Map<String, Value> {
    tailored_cv.retain(|key, _| key.to_uppercase() != "NAME");
    tailored_cv.insert("NAME".to_string(), Value::String(name));
    tailored_cv
}

/// Replace every `{{KEY}}` with its value. Strings are inserted verbatim,
/// anything else as two-space indented JSON. Values are not escaped.
pub fn render(template: &str, payload: &Map<String, Value>) -> Result<String, PipelineError> {
    let mut output = template.to_string();
    for (key, value) in payload {
        let placeholder = format!("{{{{{}}}}}", key.to_uppercase());
        let replacement = match value {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other)?,
        };
        output = output.replace(&placeholder, &replacement);
    }
    Ok(output)
}

fn load_template(template_dir: &Path, template_id: &str) -> Result<String, PipelineError> {
    let path: PathBuf = template_dir.join(template_id).join(TEMPLATE_FILE);
    std::fs::read_to_string(&path).map_err(|source| PipelineError::Template { path, source })
}

// template ids name a single directory under TEMPLATE_DIR
fn is_valid_template_id(template_id: &str) -> bool {
    !template_id.is_empty()
        && !template_id.contains(['/', '\\'])
        && !template_id.contains("..")
}
