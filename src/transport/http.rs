use super::{Transport, TransportError, TransportResponse};
use crate::error::ErrorContext;
use crate::options::{FetchOptions, MultipartForm, PartValue, RequestBody};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Proxy};
use std::env;
use std::time::Duration;
use url::Url;

/// Settings for the default transport.
///
/// [`HttpTransportConfig::from_env`] reads:
/// - `GRAPHQL_FETCH_TIMEOUT_SECS` (default 30)
/// - `GRAPHQL_FETCH_POOL_MAX_IDLE_PER_HOST` (default 32)
/// - `GRAPHQL_FETCH_POOL_IDLE_TIMEOUT_SECS` (default 90)
/// - `GRAPHQL_FETCH_PROXY_URL` (optional)
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy_url: Option<String>,
}

impl HttpTransportConfig {
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(env_parse("GRAPHQL_FETCH_TIMEOUT_SECS").unwrap_or(30)),
            pool_max_idle_per_host: env_parse("GRAPHQL_FETCH_POOL_MAX_IDLE_PER_HOST")
                .unwrap_or(32),
            pool_idle_timeout: Duration::from_secs(
                env_parse("GRAPHQL_FETCH_POOL_IDLE_TIMEOUT_SECS").unwrap_or(90),
            ),
            proxy_url: env::var("GRAPHQL_FETCH_PROXY_URL").ok(),
        }
    }
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}

/// Default transport backed by a pooled `reqwest::Client`.
///
/// Relative URIs (such as the default `/graphql`) are resolved against the
/// optional base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::from_env())
    }

    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout))
            // Conservative HTTP/2 keepalive defaults for long-lived connections.
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("GRAPHQL_FETCH_PROXY_URL")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("failed to build HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Use an already configured client (shared pools, custom TLS, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Turn the configured URI into an absolute URL.
    pub fn resolve(&self, uri: &str) -> std::result::Result<Url, TransportError> {
        match Url::parse(uri) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(uri).map_err(|e| TransportError::InvalidUri {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                }),
                None => Err(TransportError::InvalidUri {
                    uri: uri.to_string(),
                    reason: "relative URI and no base URL configured".to_string(),
                }),
            },
            Err(e) => Err(TransportError::InvalidUri {
                uri: uri.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

fn into_reqwest_form(form: MultipartForm) -> std::result::Result<Form, TransportError> {
    let mut out = Form::new();
    for part in form.into_parts() {
        out = match part.value {
            PartValue::Text(text) => out.text(part.name, text),
            PartValue::File(file) => {
                let content_type = file.content_type_or_default().to_string();
                let body = Part::bytes(file.data.to_vec())
                    .file_name(file.file_name)
                    .mime_str(&content_type)?;
                out.part(part.name, body)
            }
        };
    }
    Ok(out)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        uri: &str,
        options: FetchOptions,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = self.resolve(uri)?;
        // Same default as a browser fetch when no builder set a method.
        let method = options.method.unwrap_or(Method::GET);

        let mut request = self.client.request(method, url).headers(options.headers);
        request = match options.body {
            Some(RequestBody::Json(bytes)) => request.body(bytes),
            Some(RequestBody::Multipart(form)) => request.multipart(into_reqwest_form(form)?),
            None => request,
        };

        let response = request.send().await?;
        Ok(TransportResponse::from_reqwest(response))
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
