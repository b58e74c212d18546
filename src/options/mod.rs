//! Transport options and the builders that finalize them.
//!
//! Middleware edits a partial [`FetchOptions`]; an [`OptionBuilder`] then
//! serializes the operation into a body and fills in defaults. The builder is
//! swappable so upload support or request signing can replace the default
//! JSON encoding without touching the rest of the pipeline.

mod default;
mod multipart;
#[cfg(feature = "upload")]
mod upload;

pub use default::{construct_default_options, default_headers, DefaultOptionBuilder};
pub use multipart::{FormPart, MultipartForm, PartValue};
#[cfg(feature = "upload")]
pub use upload::{
    construct_upload_options, ExtractedFile, FileExtractor, MarkedFileExtractor,
    UploadOptionBuilder,
};

use crate::types::Operation;
use crate::Result;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::{Map, Value};

/// Request settings threaded through middleware and handed to the transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    /// `None` until a builder or middleware picks one.
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    /// Open map of custom settings. Delivered to the transport untouched; the
    /// default HTTP transport does not put them on the wire.
    pub extra: Map<String, Value>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The serialized JSON body, if this is a JSON request.
    pub fn json_body(&self) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Json(bytes)) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn multipart_body(&self) -> Option<&MultipartForm> {
        match &self.body {
            Some(RequestBody::Multipart(form)) => Some(form),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON text. Reference counted, so cloned options share it.
    Json(Bytes),
    /// multipart/form-data; the encoder supplies the boundary header.
    Multipart(MultipartForm),
}

/// Produces final transport options from the post-middleware operation.
pub trait OptionBuilder: Send + Sync {
    fn build(&self, operation: Operation, options: FetchOptions) -> Result<FetchOptions>;
}

/// Adapts a closure into an [`OptionBuilder`].
pub struct FnOptionBuilder<F> {
    func: F,
}

impl<F> FnOptionBuilder<F>
where
    F: Fn(Operation, FetchOptions) -> Result<FetchOptions> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> OptionBuilder for FnOptionBuilder<F>
where
    F: Fn(Operation, FetchOptions) -> Result<FetchOptions> + Send + Sync,
{
    fn build(&self, operation: Operation, options: FetchOptions) -> Result<FetchOptions> {
        (self.func)(operation, options)
    }
}
