//! The request orchestrator.
//!
//! Keep the public surface small: construct with [`GraphQLFetchBuilder`],
//! register handlers, then call [`GraphQLFetch::invoke`] (or the typed
//! [`GraphQLFetch::fetch`] / [`GraphQLFetch::fetch_batch`]).

pub mod builder;
pub mod core;
mod execution;

pub use builder::GraphQLFetchBuilder;
pub use self::core::GraphQLFetch;
