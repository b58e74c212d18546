use crate::options::FetchOptions;
use crate::types::{GraphQLRequest, ParsedResponse};

/// Mutable unit of the middleware chain.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope<R = GraphQLRequest> {
    pub request: R,
    pub options: FetchOptions,
}

/// Envelope seen by batch middleware.
pub type BatchRequestEnvelope = RequestEnvelope<Vec<GraphQLRequest>>;

impl<R> RequestEnvelope<R> {
    pub fn new(request: R) -> Self {
        Self {
            request,
            options: FetchOptions::default(),
        }
    }
}

/// Mutable unit of the afterware chain (single and batched alike).
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub response: ParsedResponse,
    /// The options the request was sent with.
    pub options: FetchOptions,
}
