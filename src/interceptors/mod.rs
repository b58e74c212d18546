//! Middleware and afterware.
//!
//! Both kinds are the same capability, an [`Interceptor`] over some envelope
//! type: middleware sees a [`RequestEnvelope`] before the request is built,
//! afterware sees a [`ResponseEnvelope`] after the body was read and decoded.
//! Each handler receives the envelope by `&mut` plus a one-shot [`Next`]
//! token; calling [`Next::proceed`] lets the chain continue, returning an
//! error aborts the whole invocation with that error.
//!
//! Object style handlers implement the trait; function style handlers are
//! plain closures wrapped with [`from_fn`].

mod chain;
mod envelope;

pub use chain::{run_chain, InterceptorChain};
pub use envelope::{BatchRequestEnvelope, RequestEnvelope, ResponseEnvelope};

use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// Which chain is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Middleware,
    Afterware,
    BatchMiddleware,
    BatchAfterware,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Middleware => "middleware",
            Phase::Afterware => "afterware",
            Phase::BatchMiddleware => "batch middleware",
            Phase::BatchAfterware => "batch afterware",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Continuation handed to each handler.
///
/// Consumed by [`Next::proceed`], so it can be called at most once. A handler
/// that returns `Ok` without calling it halts the chain with
/// [`crate::Error::ChainHalted`].
pub struct Next<'a> {
    continued: &'a mut bool,
}

impl<'a> Next<'a> {
    pub(crate) fn new(continued: &'a mut bool) -> Self {
        Self { continued }
    }

    pub fn proceed(self) {
        *self.continued = true;
    }
}

#[async_trait]
pub trait Interceptor<E: Send>: Send + Sync {
    async fn intercept(&self, envelope: &mut E, next: Next<'_>) -> Result<()>;

    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Closure-backed [`Interceptor`].
pub struct FnInterceptor<F> {
    name: String,
    func: F,
}

impl<F> FnInterceptor<F> {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Wrap a synchronous closure as a handler.
///
/// ```rust
/// use graphql_fetch::interceptors::{from_fn, Next, ResponseEnvelope};
///
/// let afterware = from_fn(|envelope: &mut ResponseEnvelope, next: Next<'_>| {
///     if envelope.response.status == 204 {
///         envelope.response.parsed = Some(serde_json::json!({ "data": null }));
///     }
///     next.proceed();
///     Ok(())
/// })
/// .named("no-content");
/// # let _ = afterware;
/// ```
pub fn from_fn<E, F>(func: F) -> FnInterceptor<F>
where
    E: Send,
    F: Fn(&mut E, Next<'_>) -> Result<()> + Send + Sync,
{
    FnInterceptor {
        name: "fn".to_string(),
        func,
    }
}

#[async_trait]
impl<E, F> Interceptor<E> for FnInterceptor<F>
where
    E: Send,
    F: Fn(&mut E, Next<'_>) -> Result<()> + Send + Sync,
{
    async fn intercept(&self, envelope: &mut E, next: Next<'_>) -> Result<()> {
        (self.func)(envelope, next)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
