use crate::envelope::{parse_request, Envelope};
use crate::error::{MissingInput, PipelineError};
use crate::types::{ExtractRequest, ExtractedSections, ExtractionReference, ExtractionResult};
use crate::AppState;
use serde_json::Value;

const EXTRACTION_PREFIX: &str = "cv_extractions";

/// Extract text from an uploaded CV and park the result in S3.
///
/// The extraction is written to `cv_extractions/<object_key>.json` and only a
/// reference is returned, keeping the orchestrator payload under its 256 KB
/// limit.
pub async fn handle(state: &AppState, event: Value) -> Result<Envelope, PipelineError> {
    let request: ExtractRequest = match parse_request(event) {
        Ok(r) => r,
        Err(rejected) => return Ok(rejected),
    };

    let object_key = match request.object_key.filter(|k| !k.is_empty()) {
        Some(k) => k,
        None => return Ok(MissingInput::new(&["object_key"]).into()),
    };

    let bucket = &state.config.upload_bucket;
    tracing::info!("Extracting s3://{}/{}", bucket, object_key);

    let raw_bytes = state.store.get_object(bucket, &object_key).await?;

    // TODO: real PDF/DOCX parsing; uploads are treated as plain text for now
    let raw_text = decode_text(&raw_bytes);
    let result = ExtractionResult {
        sections: ExtractedSections::from_raw_text(&raw_text),
        raw_text,
        success: true,
    };

    let extraction_key = extraction_key(&object_key);
    state
        .store
        .put_object(
            bucket,
            &extraction_key,
            serde_json::to_vec(&result)?,
            "application/json",
        )
        .await?;

    tracing::info!(
        "Stored extraction ({} chars) at s3://{}/{}",
        result.raw_text.chars().count(),
        bucket,
        extraction_key
    );

    Envelope::ok(&ExtractionReference {
        extraction_bucket: bucket.clone(),
        raw_text_s3_uri: format!("s3://{}/{}", bucket, extraction_key),
        extraction_key,
        success: true,
    })
}

pub fn extraction_key(object_key: &str) -> String {
    format!("{}/{}.json", EXTRACTION_PREFIX, object_key)
}

/// Best-effort UTF-8 decode: invalid byte sequences are dropped
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
