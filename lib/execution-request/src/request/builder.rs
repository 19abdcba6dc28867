use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use sonic_rs::Value;

use crate::cache_control::CacheControl;
use crate::context::{ContextValue, KeyedContext, KeyedContextBuilder};
use crate::dataloader::DataLoaderRegistry;
use crate::execution_id::ExecutionId;
use crate::locale::Locale;
use crate::request::error::RequestBuildError;
use crate::request::ExecutionRequest;

/// Builder slot that tells "never touched" apart from "explicitly assigned
/// `None`", so [`ExecutionRequestBuilder::build`] can default the former and
/// reject the latter.
enum Slot<T> {
    Unset,
    Explicit(Option<T>),
}

/// Accumulates the fields of an [`ExecutionRequest`] and is consumed exactly
/// once by [`build`].
///
/// Setters store the given value unchanged and perform no validation; all
/// defaulting and the single precondition check happen in `build`. Obtained
/// fresh via [`ExecutionRequest::builder`], or pre-seeded with an existing
/// request's fields via [`ExecutionRequest::transform`].
///
/// [`build`]: ExecutionRequestBuilder::build
pub struct ExecutionRequestBuilder {
    query: Option<Arc<str>>,
    variables: Option<Arc<HashMap<String, Value>>>,
    root: Option<ContextValue>,
    context: Option<ContextValue>,
    graphql_context: Slot<Arc<KeyedContext>>,
    data_loader_registry: Option<Arc<DataLoaderRegistry>>,
    cache_control: Option<Arc<CacheControl>>,
    locale: Option<Locale>,
    extensions: Option<Arc<HashMap<String, Value>>>,
    execution_id: Option<ExecutionId>,
}

impl Default for ExecutionRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionRequestBuilder {
    pub fn new() -> Self {
        Self {
            query: None,
            variables: None,
            root: None,
            context: None,
            graphql_context: Slot::Unset,
            data_loader_registry: None,
            cache_control: None,
            locale: None,
            extensions: None,
            execution_id: None,
        }
    }

    /// Seeds a builder with every field of `source`, sharing (not copying)
    /// its collaborators. Backs [`ExecutionRequest::transform`].
    pub(crate) fn from_request(source: &ExecutionRequest) -> Self {
        Self {
            query: Some(Arc::clone(&source.query)),
            variables: Some(Arc::clone(&source.variables)),
            root: source.root.clone(),
            context: Some(Arc::clone(&source.context)),
            graphql_context: Slot::Explicit(Some(Arc::clone(&source.graphql_context))),
            data_loader_registry: Some(Arc::clone(&source.data_loader_registry)),
            cache_control: Some(Arc::clone(&source.cache_control)),
            locale: source.locale.clone(),
            extensions: Some(Arc::clone(&source.extensions)),
            execution_id: source.execution_id.clone(),
        }
    }

    pub fn query(mut self, query: impl Into<Arc<str>>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn variables(mut self, variables: impl Into<Arc<HashMap<String, Value>>>) -> Self {
        self.variables = Some(variables.into());
        self
    }

    /// Stores the root value the engine starts execution from.
    pub fn root(mut self, root: impl Any + Send + Sync) -> Self {
        self.root = Some(Arc::new(root));
        self
    }

    /// Stores an already-shared root value without wrapping it again.
    pub fn root_value(mut self, root: ContextValue) -> Self {
        self.root = Some(root);
        self
    }

    /// Stores an opaque value in the legacy context slot.
    pub fn context(mut self, context: impl Any + Send + Sync) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// Stores an already-shared legacy context value without wrapping it
    /// again.
    pub fn context_value(mut self, context: ContextValue) -> Self {
        self.context = Some(context);
        self
    }

    /// Functional form of [`context`]: applies `modify` to a fresh empty
    /// [`KeyedContextBuilder`] and stores the built context in the legacy
    /// slot. Whatever was stored there before, keyed context or not, is
    /// never visible to `modify`.
    ///
    /// [`context`]: ExecutionRequestBuilder::context
    pub fn context_with<F>(mut self, modify: F) -> Self
    where
        F: FnOnce(KeyedContextBuilder) -> KeyedContextBuilder,
    {
        let context = modify(KeyedContext::builder()).build();
        self.context = Some(Arc::new(context) as ContextValue);
        self
    }

    /// Stores the typed context. Passing `None` marks the slot as explicitly
    /// null, which [`build`] rejects; leaving the slot untouched defaults it
    /// to an empty context instead.
    ///
    /// [`build`]: ExecutionRequestBuilder::build
    pub fn graphql_context(mut self, context: impl Into<Option<Arc<KeyedContext>>>) -> Self {
        self.graphql_context = Slot::Explicit(context.into());
        self
    }

    /// Functional form of [`graphql_context`], with the same fresh-builder
    /// rule as [`context_with`].
    ///
    /// [`graphql_context`]: ExecutionRequestBuilder::graphql_context
    /// [`context_with`]: ExecutionRequestBuilder::context_with
    pub fn graphql_context_with<F>(mut self, modify: F) -> Self
    where
        F: FnOnce(KeyedContextBuilder) -> KeyedContextBuilder,
    {
        let context = modify(KeyedContext::builder()).build();
        self.graphql_context = Slot::Explicit(Some(Arc::new(context)));
        self
    }

    pub fn data_loader_registry(mut self, registry: impl Into<Arc<DataLoaderRegistry>>) -> Self {
        self.data_loader_registry = Some(registry.into());
        self
    }

    pub fn cache_control(mut self, cache_control: impl Into<Arc<CacheControl>>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn extensions(mut self, extensions: impl Into<Arc<HashMap<String, Value>>>) -> Self {
        self.extensions = Some(extensions.into());
        self
    }

    pub fn execution_id(mut self, execution_id: impl Into<ExecutionId>) -> Self {
        self.execution_id = Some(execution_id.into());
        self
    }

    /// Finalizes the builder into an immutable [`ExecutionRequest`],
    /// defaulting every untouched field.
    pub fn build(self) -> Result<ExecutionRequest, RequestBuildError> {
        let graphql_context = match self.graphql_context {
            Slot::Unset => Arc::new(KeyedContext::default()),
            Slot::Explicit(Some(context)) => context,
            Slot::Explicit(None) => return Err(RequestBuildError::ExplicitNullGraphQLContext),
        };

        let request = ExecutionRequest {
            query: self.query.unwrap_or_else(|| Arc::from("")),
            variables: self.variables.unwrap_or_default(),
            root: self.root,
            context: self
                .context
                .unwrap_or_else(|| Arc::new(KeyedContext::default()) as ContextValue),
            graphql_context,
            data_loader_registry: self.data_loader_registry.unwrap_or_default(),
            cache_control: self.cache_control.unwrap_or_default(),
            locale: self.locale,
            extensions: self.extensions.unwrap_or_default(),
            execution_id: self.execution_id,
        };
        tracing::trace!(
            execution_id = request.execution_id.as_ref().map(|id| id.as_str()),
            "built execution request"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::context::KeyedContext;
    use crate::request::{ExecutionRequest, RequestBuildError};

    #[test]
    fn explicit_none_graphql_context_fails_build() {
        let result = ExecutionRequest::builder_with_query("{ me { id } }")
            .graphql_context(None)
            .build();

        assert_eq!(
            result.unwrap_err(),
            RequestBuildError::ExplicitNullGraphQLContext
        );
    }

    #[test]
    fn setting_graphql_context_after_none_recovers() {
        let context = Arc::new(KeyedContext::builder().insert("k", 1u32).build());

        let request = ExecutionRequest::builder_with_query("{ me { id } }")
            .graphql_context(None)
            .graphql_context(Arc::clone(&context))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(request.graphql_context(), &context));
    }

    #[test]
    fn untouched_graphql_context_defaults_to_empty() {
        let request = ExecutionRequest::builder().build().unwrap();
        assert!(request.graphql_context().is_empty());
    }

    #[test]
    fn context_update_fn_never_sees_prior_state() {
        struct OpaqueLegacy;

        let request = ExecutionRequest::builder_with_query("{ me { id } }")
            .context(OpaqueLegacy)
            .context_with(|builder| builder.insert("k1", "v1".to_string()))
            .build()
            .unwrap();

        let context = request.context_as::<KeyedContext>().unwrap();
        assert_eq!(context.get::<String>("k1").unwrap(), "v1");
        // only the entry added by the update fn is present
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn graphql_context_update_fn_starts_from_empty_builder() {
        let prior = Arc::new(KeyedContext::builder().insert("old", 1u32).build());

        let request = ExecutionRequest::builder()
            .graphql_context(prior)
            .graphql_context_with(|builder| builder.insert("new", 2u32))
            .build()
            .unwrap();

        let context = request.graphql_context();
        assert!(!context.has_key("old"));
        assert_eq!(*context.get::<u32>("new").unwrap(), 2);
    }
}
