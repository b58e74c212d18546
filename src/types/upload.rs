//! File blobs embedded in GraphQL variables.
//!
//! JSON has no binary type, so a file travels inside `variables` as a marker
//! object until the upload option builder lifts it out into its own multipart
//! field:
//!
//! ```json
//! { "$upload": { "fileName": "a.txt", "contentType": "text/plain", "base64": "aGk=" } }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde_json::{json, Value};

/// Key identifying an embedded file inside variables.
pub const UPLOAD_MARKER: &str = "$upload";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Marker value to place inside request variables.
    pub fn to_value(&self) -> Value {
        let mut inner = json!({
            "fileName": self.file_name,
            "base64": STANDARD.encode(&self.data),
        });
        if let (Some(ct), Value::Object(map)) = (&self.content_type, &mut inner) {
            map.insert("contentType".to_string(), Value::String(ct.clone()));
        }
        json!({ UPLOAD_MARKER: inner })
    }

    /// Decode a marker value. Returns `None` for anything that is not a
    /// well-formed marker, including markers with invalid base64 content.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        if map.len() != 1 {
            return None;
        }
        let inner = map.get(UPLOAD_MARKER)?.as_object()?;
        let file_name = inner.get("fileName")?.as_str()?.to_string();
        let data = STANDARD.decode(inner.get("base64")?.as_str()?).ok()?;
        let content_type = inner
            .get("contentType")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            file_name,
            content_type,
            data: Bytes::from(data),
        })
    }
}

impl From<FileUpload> for Value {
    fn from(upload: FileUpload) -> Self {
        upload.to_value()
    }
}
