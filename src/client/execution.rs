//! Invocation pipeline: middleware, option building, transport, decoding,
//! afterware, extraction.

use crate::interceptors::{RequestEnvelope, ResponseEnvelope};
use crate::options::FetchOptions;
use crate::types::result::json_kind;
use crate::types::{FetchResponse, FetchResult, GraphQLRequest, Operation, ParsedResponse};
use crate::{Error, Result};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::core::GraphQLFetch;

/// Decoded response plus the parse failure, if there was one.
struct Received {
    envelope: ResponseEnvelope,
    parse_error: Option<serde_json::Error>,
}

impl GraphQLFetch {
    /// Run one operation or one batch through the pipeline.
    ///
    /// A single request resolves to [`FetchResponse::Single`] and a batch to
    /// [`FetchResponse::Batch`] with one result per request, in order.
    pub async fn invoke(&self, operation: impl Into<Operation>) -> Result<FetchResponse> {
        match operation.into() {
            Operation::Single(request) => self.fetch(request).await.map(FetchResponse::Single),
            Operation::Batch(requests) => {
                self.fetch_batch(requests).await.map(FetchResponse::Batch)
            }
        }
    }

    /// Send a single operation. Only the non-batched chains run.
    pub async fn fetch(&self, request: GraphQLRequest) -> Result<FetchResult> {
        let invocation_id = Uuid::new_v4().to_string();
        debug!(
            target: "graphql_fetch",
            invocation_id = invocation_id.as_str(),
            batched = false,
            handlers = self.middleware.len(),
            "running middleware"
        );
        let RequestEnvelope { request, options } =
            self.middleware.run(RequestEnvelope::new(request)).await?;

        let received = self
            .send(&invocation_id, Operation::Single(request), options, false)
            .await?;

        debug!(
            target: "graphql_fetch",
            invocation_id = invocation_id.as_str(),
            handlers = self.afterware.len(),
            "running afterware"
        );
        let envelope = self.afterware.run(received.envelope).await?;
        extract_single(envelope.response, received.parse_error)
    }

    /// Send several operations as one JSON array. Only the batched chains run.
    pub async fn fetch_batch(&self, requests: Vec<GraphQLRequest>) -> Result<Vec<FetchResult>> {
        let invocation_id = Uuid::new_v4().to_string();
        debug!(
            target: "graphql_fetch",
            invocation_id = invocation_id.as_str(),
            batched = true,
            operations = requests.len(),
            handlers = self.batch_middleware.len(),
            "running batch middleware"
        );
        let RequestEnvelope { request, options } =
            self.batch_middleware.run(RequestEnvelope::new(requests)).await?;

        let received = self
            .send(&invocation_id, Operation::Batch(request), options, true)
            .await?;

        debug!(
            target: "graphql_fetch",
            invocation_id = invocation_id.as_str(),
            handlers = self.batch_afterware.len(),
            "running batch afterware"
        );
        let envelope = self.batch_afterware.run(received.envelope).await?;
        extract_batch(envelope.response, received.parse_error)
    }

    async fn send(
        &self,
        invocation_id: &str,
        operation: Operation,
        options: FetchOptions,
        batched: bool,
    ) -> Result<Received> {
        let options = self.option_builder.build(operation, options)?;

        let start = Instant::now();
        let fetched = match self.transport.fetch(&self.uri, options.clone()).await {
            Ok(response) => response.text().await,
            Err(e) => Err(e),
        };
        let (head, raw) = match fetched {
            Ok(parts) => parts,
            Err(e) => {
                info!(
                    target: "graphql_fetch",
                    invocation_id,
                    batched,
                    transport = self.transport.name(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "graphql request failed"
                );
                return Err(e.into());
            }
        };

        info!(
            target: "graphql_fetch",
            invocation_id,
            batched,
            http_status = head.status,
            transport = self.transport.name(),
            duration_ms = start.elapsed().as_millis() as u64,
            "graphql request completed"
        );

        let (parsed, parse_error) = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Null) => (None, None),
            Ok(value) => (Some(value), None),
            Err(e) => {
                warn!(
                    target: "graphql_fetch",
                    invocation_id,
                    http_status = head.status,
                    error = %e,
                    "response body is not valid JSON"
                );
                (None, Some(e))
            }
        };

        Ok(Received {
            envelope: ResponseEnvelope {
                response: ParsedResponse {
                    status: head.status,
                    status_text: head.status_text,
                    headers: head.headers,
                    url: head.url,
                    raw,
                    parsed,
                },
                options,
            },
            parse_error,
        })
    }
}

/// Afterware may have replaced `parsed`, so it is read only here.
fn take_parsed(response: &mut ParsedResponse) -> Option<Value> {
    match response.parsed.take() {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn extract_single(
    mut response: ParsedResponse,
    parse_error: Option<serde_json::Error>,
) -> Result<FetchResult> {
    match take_parsed(&mut response) {
        Some(value) => FetchResult::try_from(value),
        None => Err(Error::http(response, parse_error)),
    }
}

fn extract_batch(
    mut response: ParsedResponse,
    parse_error: Option<serde_json::Error>,
) -> Result<Vec<FetchResult>> {
    match take_parsed(&mut response) {
        Some(Value::Array(items)) => items.into_iter().map(FetchResult::try_from).collect(),
        Some(other) => {
            debug!(
                target: "graphql_fetch",
                http_status = response.status,
                body = json_kind(&other),
                "batched response is not an array"
            );
            response.parsed = Some(other);
            Err(Error::BatchShape(Box::new(response)))
        }
        None => Err(Error::http(response, parse_error)),
    }
}
