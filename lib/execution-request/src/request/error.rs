/// Raised by [`ExecutionRequestBuilder::build`] when a precondition on the
/// assembled request does not hold. No partially built request is observable
/// after a failure.
///
/// [`ExecutionRequestBuilder::build`]: crate::request::ExecutionRequestBuilder::build
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestBuildError {
    /// The typed context slot was explicitly assigned `None`. A slot that
    /// was never touched defaults to an empty context instead.
    #[error("graphql_context must not be explicitly set to None")]
    ExplicitNullGraphQLContext,
}
