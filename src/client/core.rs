use crate::interceptors::{
    BatchRequestEnvelope, Interceptor, InterceptorChain, Phase, RequestEnvelope, ResponseEnvelope,
};
use crate::options::OptionBuilder;
use crate::transport::Transport;
use crate::Result;
use std::sync::Arc;

/// GraphQL-over-HTTP client with middleware and afterware chains.
///
/// Owns four independent, append-only handler lists. Single operations only
/// ever consult the non-batched lists and batches only the batched ones.
/// Cheap to share behind an `Arc`; invocations may run concurrently.
pub struct GraphQLFetch {
    pub(crate) uri: String,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) option_builder: Arc<dyn OptionBuilder>,
    pub(crate) middleware: InterceptorChain<RequestEnvelope>,
    pub(crate) afterware: InterceptorChain<ResponseEnvelope>,
    pub(crate) batch_middleware: InterceptorChain<BatchRequestEnvelope>,
    pub(crate) batch_afterware: InterceptorChain<ResponseEnvelope>,
}

impl GraphQLFetch {
    pub fn builder() -> super::GraphQLFetchBuilder {
        super::GraphQLFetchBuilder::new()
    }

    /// Builder with the upload-aware option builder preinstalled.
    #[cfg(feature = "upload")]
    pub fn upload_builder() -> super::GraphQLFetchBuilder {
        super::GraphQLFetchBuilder::new()
            .construct_options(Arc::new(crate::options::UploadOptionBuilder::new()))
    }

    pub(crate) fn from_parts(
        uri: String,
        transport: Arc<dyn Transport>,
        option_builder: Arc<dyn OptionBuilder>,
    ) -> Self {
        Self {
            uri,
            transport,
            option_builder,
            middleware: InterceptorChain::new(Phase::Middleware),
            afterware: InterceptorChain::new(Phase::Afterware),
            batch_middleware: InterceptorChain::new(Phase::BatchMiddleware),
            batch_afterware: InterceptorChain::new(Phase::BatchAfterware),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Append a middleware for single operations.
    ///
    /// Values that are not handlers do not compile:
    ///
    /// ```compile_fail
    /// let client = graphql_fetch::GraphQLFetch::builder()
    ///     .uri("http://localhost/graphql")
    ///     .build()
    ///     .unwrap();
    /// client.use_middleware(42);
    /// ```
    pub fn use_middleware<I>(&self, middleware: I) -> &Self
    where
        I: Interceptor<RequestEnvelope> + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append an afterware for single operations.
    pub fn use_afterware<I>(&self, afterware: I) -> &Self
    where
        I: Interceptor<ResponseEnvelope> + 'static,
    {
        self.afterware.push(Arc::new(afterware));
        self
    }

    /// Append a middleware for batched operations.
    pub fn batch_use<I>(&self, middleware: I) -> &Self
    where
        I: Interceptor<BatchRequestEnvelope> + 'static,
    {
        self.batch_middleware.push(Arc::new(middleware));
        self
    }

    /// Append an afterware for batched operations.
    pub fn batch_use_after<I>(&self, afterware: I) -> &Self
    where
        I: Interceptor<ResponseEnvelope> + 'static,
    {
        self.batch_afterware.push(Arc::new(afterware));
        self
    }

    /// Append several middleware in order. Fails on an empty list.
    pub fn use_all<I>(&self, middleware: I) -> Result<&Self>
    where
        I: IntoIterator<Item = Arc<dyn Interceptor<RequestEnvelope>>>,
    {
        self.middleware.extend(middleware)?;
        Ok(self)
    }

    pub fn use_after_all<I>(&self, afterware: I) -> Result<&Self>
    where
        I: IntoIterator<Item = Arc<dyn Interceptor<ResponseEnvelope>>>,
    {
        self.afterware.extend(afterware)?;
        Ok(self)
    }

    pub fn batch_use_all<I>(&self, middleware: I) -> Result<&Self>
    where
        I: IntoIterator<Item = Arc<dyn Interceptor<BatchRequestEnvelope>>>,
    {
        self.batch_middleware.extend(middleware)?;
        Ok(self)
    }

    pub fn batch_use_after_all<I>(&self, afterware: I) -> Result<&Self>
    where
        I: IntoIterator<Item = Arc<dyn Interceptor<ResponseEnvelope>>>,
    {
        self.batch_afterware.extend(afterware)?;
        Ok(self)
    }

    /// Registered handler counts, in `[middleware, afterware, batch
    /// middleware, batch afterware]` order.
    pub fn handler_counts(&self) -> [usize; 4] {
        [
            self.middleware.len(),
            self.afterware.len(),
            self.batch_middleware.len(),
            self.batch_afterware.len(),
        ]
    }
}

impl std::fmt::Debug for GraphQLFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLFetch")
            .field("uri", &self.uri)
            .field("transport", &self.transport.name())
            .field("handlers", &self.handler_counts())
            .finish_non_exhaustive()
    }
}
