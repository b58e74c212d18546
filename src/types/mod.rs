//! # Types Module
//!
//! Core data types flowing through the pipeline.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GraphQLRequest`] | One GraphQL operation (`query`, `variables`, `operationName`, extras) |
//! | [`Operation`] | A single request or an ordered batch of requests |
//! | [`FetchResult`] | One GraphQL result object (`data`, `errors`, `extensions`) |
//! | [`FetchResponse`] | The result of an invocation: single or batched |
//! | [`ParsedResponse`] | Transport response metadata plus `raw` and `parsed` body |
//! | [`FileUpload`] | A file blob embedded in request variables |
//!
//! ## Example
//!
//! ```rust
//! use graphql_fetch::types::{GraphQLRequest, Operation};
//! use serde_json::json;
//!
//! let request = GraphQLRequest::new("query people($n: Int!) { allPeople(first: $n) { name } }")
//!     .with_variables(json!({ "n": 1 }))
//!     .with_operation_name("people");
//!
//! let batch = Operation::from(vec![request.clone(), request]);
//! assert!(batch.is_batched());
//! ```

pub mod operation;
pub mod response;
pub mod result;
pub mod upload;

pub use operation::{GraphQLRequest, Operation};
pub use response::ParsedResponse;
pub use result::{FetchResponse, FetchResult};
pub use upload::FileUpload;
