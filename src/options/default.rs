use super::{FetchOptions, OptionBuilder, RequestBody};
use crate::types::Operation;
use crate::{Error, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;

/// `Accept: */*` and `Content-Type: application/json`.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// JSON encoding of an operation.
///
/// Method and body set by middleware win over the defaults; caller headers
/// replace default headers of the same name.
pub fn construct_default_options(
    operation: &Operation,
    options: FetchOptions,
) -> Result<FetchOptions> {
    let body = serde_json::to_string(operation).map_err(Error::Serialization)?;

    let FetchOptions {
        method,
        headers: caller_headers,
        body: caller_body,
        extra,
    } = options;

    let mut headers = default_headers();
    for name in caller_headers.keys() {
        headers.remove(name);
    }
    for (name, value) in caller_headers.iter() {
        headers.append(name.clone(), value.clone());
    }

    Ok(FetchOptions {
        method: Some(method.unwrap_or(Method::POST)),
        headers,
        body: Some(caller_body.unwrap_or(RequestBody::Json(Bytes::from(body)))),
        extra,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOptionBuilder;

impl OptionBuilder for DefaultOptionBuilder {
    fn build(&self, operation: Operation, options: FetchOptions) -> Result<FetchOptions> {
        construct_default_options(&operation, options)
    }
}
