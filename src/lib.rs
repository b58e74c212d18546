//! # graphql-fetch
//!
//! A GraphQL-over-HTTP client pipeline with ordered, asynchronous interceptor
//! chains.
//!
//! ## Overview
//!
//! Every call runs through the same fixed sequence of phases:
//!
//! 1. the **middleware** chain mutates the outgoing request and its options,
//! 2. an [`options::OptionBuilder`] turns them into final transport options,
//! 3. a [`transport::Transport`] performs the HTTP exchange,
//! 4. the body is read as text and decoded as JSON on a best-effort basis,
//! 5. the **afterware** chain inspects (and may repair) the response,
//! 6. the result is extracted or a classified [`Error`] is returned.
//!
//! Single operations and batches (a `Vec` of operations sent as one JSON
//! array) have separate middleware/afterware lists; routing happens once, at
//! call entry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graphql_fetch::interceptors::{from_fn, Next, RequestEnvelope};
//! use graphql_fetch::{GraphQLFetch, GraphQLRequest};
//! use reqwest::header::{HeaderValue, AUTHORIZATION};
//!
//! #[tokio::main]
//! async fn main() -> graphql_fetch::Result<()> {
//!     let client = GraphQLFetch::builder()
//!         .uri("https://api.example.com/graphql")
//!         .build()?;
//!
//!     client.use_middleware(from_fn(
//!         |envelope: &mut RequestEnvelope, next: Next<'_>| {
//!             envelope
//!                 .options
//!                 .headers
//!                 .insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
//!             next.proceed();
//!             Ok(())
//!         },
//!     ));
//!
//!     let result = client
//!         .fetch(GraphQLRequest::new("query { viewer { login } }"))
//!         .await?;
//!     println!("{:?}", result.data());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The orchestrator, its builder and the registration surface |
//! | [`interceptors`] | Handler capability, envelopes and the chain runner |
//! | [`options`] | Transport options and option builders (JSON, multipart uploads) |
//! | [`transport`] | Transport capability and the default reqwest transport |
//! | [`types`] | Operations, results, parsed responses and file uploads |

pub mod client;
pub mod interceptors;
pub mod options;
pub mod transport;
pub mod types;

pub mod error;

pub use client::{GraphQLFetch, GraphQLFetchBuilder};
pub use error::{BoxError, Error, ErrorContext, HttpError};
pub use interceptors::{Interceptor, Next, Phase};
pub use options::{FetchOptions, OptionBuilder, RequestBody};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use types::{FetchResponse, FetchResult, FileUpload, GraphQLRequest, Operation, ParsedResponse};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
