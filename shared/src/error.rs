use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Faults that abort an invocation. These are not recovered; the Lambda
/// runtime reports them to the orchestrator as a function error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("S3 error: {0}")]
    Storage(String),

    #[error("Failed to generate presigned URL: {0}")]
    Presign(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Failed to read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Required request fields the caller left out. Turned into a 400 envelope
/// by the handler, never propagated as a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInput {
    pub fields: Vec<&'static str>,
}

impl MissingInput {
    pub fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.fields.len() == 1 { "is" } else { "are" };
        write!(f, "{} {} required", self.fields.join(" and "), verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        assert_eq!(
            MissingInput::new(&["object_key"]).to_string(),
            "object_key is required"
        );
        assert_eq!(
            MissingInput::new(&["cv_sections", "jd_analysis"]).to_string(),
            "cv_sections and jd_analysis are required"
        );
    }
}
