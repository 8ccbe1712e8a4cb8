use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Pixel dimensions reported for image uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Normalized success payload of an upload. Matches the `data` field of
/// `POST /images/upload`.
///
/// Fields the server adds beyond the known ones are preserved in `extra`, so
/// the value handed back to the caller is the server's payload unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    #[serde(default, alias = "thumbnail_url", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub filename: String,
    #[serde(alias = "size_bytes")]
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Envelope returned by the upload endpoints on a 2xx status.
#[derive(Debug, Deserialize)]
pub struct UploadEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<UploadResult>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope returned by the delete endpoint on a 2xx status.
#[derive(Debug, Deserialize)]
pub struct DeleteEnvelope {
    pub success: bool,
}

/// Structured error body the backend sends with non-2xx statuses.
///
/// `detail` is usually a string; request validation failures send a list of
/// objects instead, which is rendered as JSON.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: JsonValue,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
