use reqwest::header::HeaderMap;
use serde_json::Value;

/// Transport response as seen by afterware.
///
/// `raw` is always the full body text. `parsed` is the decoded JSON body, or
/// `None` when decoding failed; afterware may set it to rescue a response.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    pub url: String,
    pub raw: String,
    pub parsed: Option<Value>,
}

impl ParsedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
