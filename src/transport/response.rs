use super::TransportError;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

enum ResponseBody {
    Text(String),
    Reqwest(reqwest::Response),
}

/// Response handed back by a [`super::Transport`].
///
/// Metadata is available immediately; the body is read separately with
/// [`TransportResponse::text`].
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    pub url: String,
    body: ResponseBody,
}

impl TransportResponse {
    /// In-memory response, mainly for custom transports and tests. The status
    /// text defaults to the canonical reason phrase.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: canonical_reason(status),
            headers: HeaderMap::new(),
            url: String::new(),
            body: ResponseBody::Text(body.into()),
        }
    }

    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        Self {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers: response.headers().clone(),
            url: response.url().to_string(),
            body: ResponseBody::Reqwest(response),
        }
    }

    /// Split into metadata and the body text.
    pub async fn text(self) -> std::result::Result<(ResponseHead, String), TransportError> {
        let head = ResponseHead {
            status: self.status,
            status_text: self.status_text,
            headers: self.headers,
            url: self.url,
        };
        let raw = match self.body {
            ResponseBody::Text(text) => text,
            ResponseBody::Reqwest(response) => response.text().await?,
        };
        Ok((head, raw))
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Response metadata once the body has been taken.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    pub url: String,
}

fn canonical_reason(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}
