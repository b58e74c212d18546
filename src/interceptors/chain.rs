//! Sequential chain runner and the registration lists it runs over.

use super::{Interceptor, Next, Phase};
use crate::{Error, Result};
use std::sync::{Arc, PoisonError, RwLock};

/// Run `handlers` in order over one envelope.
///
/// Each handler gets the same envelope by `&mut`; the next one starts only
/// after the previous one called [`Next::proceed`] and returned. The first
/// error stops the run and is returned unchanged. An empty list hands the
/// envelope straight back.
pub async fn run_chain<E: Send>(
    phase: Phase,
    handlers: &[Arc<dyn Interceptor<E>>],
    mut envelope: E,
) -> Result<E> {
    for (index, handler) in handlers.iter().enumerate() {
        tracing::trace!(
            target: "graphql_fetch",
            %phase,
            index,
            handler = handler.name(),
            "running handler"
        );

        let mut continued = false;
        handler.intercept(&mut envelope, Next::new(&mut continued)).await?;
        if !continued {
            tracing::debug!(
                target: "graphql_fetch",
                %phase,
                index,
                handler = handler.name(),
                "handler returned without calling next"
            );
            return Err(Error::ChainHalted { phase, index });
        }
    }
    Ok(envelope)
}

/// Append-only, ordered list of handlers for one phase.
///
/// Registration takes `&self` so a shared client can keep accepting handlers
/// while invocations are in flight. Every run works on a snapshot taken when
/// it starts.
pub struct InterceptorChain<E: Send> {
    phase: Phase,
    handlers: RwLock<Vec<Arc<dyn Interceptor<E>>>>,
}

impl<E: Send> InterceptorChain<E> {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn push(&self, handler: Arc<dyn Interceptor<E>>) {
        tracing::debug!(
            target: "graphql_fetch",
            phase = %self.phase,
            handler = handler.name(),
            "registered handler"
        );
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Append several handlers in the order given. At least one is required.
    pub fn extend<I>(&self, handlers: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<dyn Interceptor<E>>>,
    {
        let handlers: Vec<_> = handlers.into_iter().collect();
        if handlers.is_empty() {
            return Err(Error::registration(format!(
                "at least one {} handler is required",
                self.phase
            )));
        }
        for handler in handlers {
            self.push(handler);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn Interceptor<E>>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the current handlers over `envelope`.
    pub async fn run(&self, envelope: E) -> Result<E> {
        let handlers = self.snapshot();
        run_chain(self.phase, &handlers, envelope).await
    }
}
