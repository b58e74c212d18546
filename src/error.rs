use crate::interceptors::Phase;
use crate::transport::TransportError;
use crate::types::ParsedResponse;
use thiserror::Error;

/// Boxed error type carried by interceptor-raised failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Structured error context for configuration problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Setting that caused the error (e.g., "uri", "GRAPHQL_FETCH_PROXY_URL")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the rejected value)
    pub details: Option<String>,
    /// Source of the error (e.g., "builder", "http_transport")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A response arrived but could not be turned into usable data.
///
/// Carries everything a caller needs to recover manually: the response
/// metadata, the raw body text and the JSON parse error (if decoding failed).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    pub message: String,
    pub response: ParsedResponse,
    #[source]
    pub parse_error: Option<serde_json::Error>,
}

impl HttpError {
    /// Classify an unusable response. An error status takes priority over the
    /// parse failure when both are present.
    pub fn new(response: ParsedResponse, parse_error: Option<serde_json::Error>) -> Self {
        let message = if response.status >= 300 {
            format!(
                "Network request failed with status {} - \"{}\"",
                response.status, response.status_text
            )
        } else {
            "Network request failed to return valid JSON".to_string()
        };
        Self {
            message,
            response,
            parse_error,
        }
    }

    /// Raw response body text.
    pub fn raw(&self) -> &str {
        &self.response.raw
    }
}

/// Unified error type for the request pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network request failed. Payload is not serializable: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Http(Box<HttpError>),

    #[error("A batched operation expected an array of results, got HTTP {} with a non-array body", .0.status)]
    BatchShape(Box<ParsedResponse>),

    #[error("Response is not a GraphQL result object: {message}")]
    ResultShape { message: String },

    #[error("Registration error: {message}")]
    Registration { message: String },

    #[error("{phase} chain halted: handler #{index} returned without calling next")]
    ChainHalted { phase: Phase, index: usize },

    #[error("Interceptor error: {0}")]
    Interceptor(BoxError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Wrap an arbitrary error raised inside a middleware or afterware.
    pub fn interceptor<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Interceptor(err.into())
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        Error::Registration {
            message: msg.into(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub(crate) fn http(response: ParsedResponse, parse_error: Option<serde_json::Error>) -> Self {
        Error::Http(Box::new(HttpError::new(response, parse_error)))
    }

    /// The response attached to `Http` and `BatchShape` errors.
    pub fn response(&self) -> Option<&ParsedResponse> {
        match self {
            Error::Http(e) => Some(&e.response),
            Error::BatchShape(response) => Some(response),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
