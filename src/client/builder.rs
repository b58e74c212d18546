use super::core::GraphQLFetch;
use crate::error::ErrorContext;
use crate::options::{DefaultOptionBuilder, FetchOptions, FnOptionBuilder, OptionBuilder};
use crate::transport::{
    FnTransport, HttpTransport, HttpTransportConfig, Transport, TransportError, TransportResponse,
};
use crate::types::Operation;
use crate::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Endpoint used when neither `uri()` nor `GRAPHQL_FETCH_URI` is set.
pub const DEFAULT_URI: &str = "/graphql";

/// Builder for [`GraphQLFetch`].
///
/// Unset values fall back to the environment at `build()` time:
/// - `GRAPHQL_FETCH_URI` (default `/graphql`)
/// - `GRAPHQL_FETCH_BASE_URL`, used to resolve a relative URI for the default transport
/// - the `GRAPHQL_FETCH_*` transport knobs read by [`HttpTransportConfig::from_env`]
pub struct GraphQLFetchBuilder {
    uri: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
    option_builder: Option<Arc<dyn OptionBuilder>>,
}

impl GraphQLFetchBuilder {
    pub fn new() -> Self {
        Self {
            uri: None,
            base_url: None,
            timeout: None,
            transport: None,
            option_builder: None,
        }
    }

    /// GraphQL endpoint.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Base URL for resolving a relative endpoint (default transport only).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the default reqwest transport. The URI is then passed through
    /// verbatim.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the default transport with an async closure.
    pub fn custom_fetch<F, Fut>(self, func: F) -> Self
    where
        F: Fn(String, FetchOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<TransportResponse, TransportError>>
            + Send
            + 'static,
    {
        self.transport(Arc::new(FnTransport::new(func)))
    }

    /// Replace the default JSON option builder.
    pub fn construct_options(mut self, builder: Arc<dyn OptionBuilder>) -> Self {
        self.option_builder = Some(builder);
        self
    }

    pub fn construct_options_fn<F>(self, func: F) -> Self
    where
        F: Fn(Operation, FetchOptions) -> Result<FetchOptions> + Send + Sync + 'static,
    {
        self.construct_options(Arc::new(FnOptionBuilder::new(func)))
    }

    /// Build the client.
    ///
    /// With the default transport the endpoint is resolved here, so a
    /// relative URI without a base URL fails now rather than on first call.
    pub fn build(self) -> Result<GraphQLFetch> {
        let uri = self
            .uri
            .or_else(|| std::env::var("GRAPHQL_FETCH_URI").ok())
            .unwrap_or_else(|| DEFAULT_URI.to_string());

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut config = HttpTransportConfig::from_env();
                if let Some(timeout) = self.timeout {
                    config.timeout = timeout;
                }
                let mut http = HttpTransport::with_config(config)?;

                let base_url = self
                    .base_url
                    .or_else(|| std::env::var("GRAPHQL_FETCH_BASE_URL").ok());
                if let Some(base_url) = base_url {
                    let parsed = Url::parse(&base_url).map_err(|e| {
                        Error::configuration_with_context(
                            format!("invalid base URL: {}", e),
                            ErrorContext::new()
                                .with_field_path("base_url")
                                .with_details(base_url.clone())
                                .with_source("builder"),
                        )
                    })?;
                    http = http.with_base_url(parsed);
                }

                http.resolve(&uri).map_err(|e| {
                    Error::configuration_with_context(
                        e.to_string(),
                        ErrorContext::new()
                            .with_field_path("uri")
                            .with_details(uri.clone())
                            .with_source("builder"),
                    )
                })?;
                Arc::new(http)
            }
        };

        let option_builder = self
            .option_builder
            .unwrap_or_else(|| Arc::new(DefaultOptionBuilder));

        tracing::debug!(
            target: "graphql_fetch",
            uri = uri.as_str(),
            transport = transport.name(),
            "graphql client built"
        );

        Ok(GraphQLFetch::from_parts(uri, transport, option_builder))
    }
}

impl Default for GraphQLFetchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
