mod builder;
mod error;

pub use builder::ExecutionRequestBuilder;
pub use error::RequestBuildError;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sonic_rs::Value;

use crate::cache_control::CacheControl;
use crate::context::{ContextValue, KeyedContext};
use crate::dataloader::DataLoaderRegistry;
use crate::execution_id::ExecutionId;
use crate::locale::Locale;

/// Immutable configuration for one execution of a GraphQL operation.
///
/// Everything an invocation needs is assembled here once, through
/// [`ExecutionRequestBuilder`], and read by the engine and by data fetchers
/// for the rest of the request's lifetime. Mutable collaborators (the
/// data-loader registry, the cache-control handle, the contexts) are held
/// behind `Arc`, so the value is safe to share across however many threads
/// the engine fans out to, and [`transform`] can hand untouched fields to a
/// derived request without copying them.
///
/// [`transform`]: ExecutionRequest::transform
pub struct ExecutionRequest {
    query: Arc<str>,
    variables: Arc<HashMap<String, Value>>,
    root: Option<ContextValue>,
    context: ContextValue,
    graphql_context: Arc<KeyedContext>,
    data_loader_registry: Arc<DataLoaderRegistry>,
    cache_control: Arc<CacheControl>,
    locale: Option<Locale>,
    extensions: Arc<HashMap<String, Value>>,
    execution_id: Option<ExecutionId>,
}

impl ExecutionRequest {
    pub fn builder() -> ExecutionRequestBuilder {
        ExecutionRequestBuilder::new()
    }

    /// Shorthand for `builder().query(query)`.
    pub fn builder_with_query(query: impl Into<Arc<str>>) -> ExecutionRequestBuilder {
        ExecutionRequestBuilder::new().query(query)
    }

    /// The operation text. May be empty; rejecting an absent query is the
    /// engine's call, not this crate's.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn variables(&self) -> &Arc<HashMap<String, Value>> {
        &self.variables
    }

    pub fn root(&self) -> Option<&ContextValue> {
        self.root.as_ref()
    }

    /// The legacy opaque context slot. Prefer [`graphql_context`] in new
    /// code.
    ///
    /// [`graphql_context`]: ExecutionRequest::graphql_context
    pub fn context(&self) -> &ContextValue {
        &self.context
    }

    /// Typed view of the legacy context slot. Returns `None` when the slot
    /// holds a value of a different type.
    pub fn context_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.downcast_ref::<T>()
    }

    pub fn graphql_context(&self) -> &Arc<KeyedContext> {
        &self.graphql_context
    }

    pub fn data_loader_registry(&self) -> &Arc<DataLoaderRegistry> {
        &self.data_loader_registry
    }

    pub fn cache_control(&self) -> &Arc<CacheControl> {
        &self.cache_control
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn extensions(&self) -> &Arc<HashMap<String, Value>> {
        &self.extensions
    }

    pub fn execution_id(&self) -> Option<&ExecutionId> {
        self.execution_id.as_ref()
    }

    /// Produces a new request from this one: a builder pre-seeded with every
    /// current field is passed to `modify`, then built. `self` is never
    /// mutated, and fields `modify` does not touch end up sharing the same
    /// allocations as this request's.
    pub fn transform<F>(&self, modify: F) -> Result<ExecutionRequest, RequestBuildError>
    where
        F: FnOnce(ExecutionRequestBuilder) -> ExecutionRequestBuilder,
    {
        tracing::trace!(
            execution_id = self.execution_id.as_ref().map(|id| id.as_str()),
            "transforming execution request"
        );
        modify(ExecutionRequestBuilder::from_request(self)).build()
    }
}

impl fmt::Debug for ExecutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionRequest")
            .field("query", &self.query)
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .field("graphql_context", &self.graphql_context)
            .field("locale", &self.locale)
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .field("execution_id", &self.execution_id)
            .finish_non_exhaustive()
    }
}
