use crate::error::{MissingInput, PipelineError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response shape returned by every handler: `{"statusCode": .., "body": "<json>"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Envelope {
    /// 200 with the serialized payload as body
    pub fn ok<T: Serialize>(payload: &T) -> Result<Self, PipelineError> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(payload)?,
        })
    }

    /// 400 with `{"message": ..}` as body
    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!("Rejecting request: {}", message);
        Self {
            status_code: 400,
            body: serde_json::json!({ "message": message }).to_string(),
        }
    }

    /// Decode the body back into JSON
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl From<MissingInput> for Envelope {
    fn from(missing: MissingInput) -> Self {
        Envelope::bad_request(missing.to_string())
    }
}

/// Decode a raw invocation payload into a request type. A `null` payload is
/// treated as `{}` so every field reads as absent; a payload of the wrong
/// shape yields a 400 envelope.
pub fn parse_request<T: DeserializeOwned>(event: Value) -> Result<T, Envelope> {
    let event = match event {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(event)
        .map_err(|e| Envelope::bad_request(format!("invalid request payload: {}", e)))
}
