//! Transport capability: `(uri, options) -> response`.
//!
//! The orchestrator always receives a transport at construction, either the
//! default [`HttpTransport`] or a caller-supplied one. There is no ambient
//! global lookup.

mod http;
mod response;

pub use http::{HttpTransport, HttpTransportConfig};
pub use response::{ResponseHead, TransportResponse};

use crate::error::BoxError;
use crate::options::FetchOptions;
use async_trait::async_trait;
use std::future::Future;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP exchange. Cancellation and timeouts are the
    /// transport's business.
    async fn fetch(
        &self,
        uri: &str,
        options: FetchOptions,
    ) -> std::result::Result<TransportResponse, TransportError>;

    fn name(&self) -> &str {
        "custom"
    }
}

/// Adapts an async closure into a [`Transport`].
pub struct FnTransport<F> {
    func: F,
}

impl<F, Fut> FnTransport<F>
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<TransportResponse, TransportError>> + Send,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<TransportResponse, TransportError>> + Send + 'static,
{
    async fn fetch(
        &self,
        uri: &str,
        options: FetchOptions,
    ) -> std::result::Result<TransportResponse, TransportError> {
        (self.func)(uri.to_string(), options).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Error raised by a caller-supplied transport, kept intact for downcasting.
    #[error(transparent)]
    Custom(BoxError),
}

impl TransportError {
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        TransportError::Custom(err.into())
    }
}
