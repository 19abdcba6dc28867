pub mod cache_control;
pub mod context;
pub mod dataloader;
pub mod execution_id;
pub mod locale;
pub mod request;

pub use cache_control::{CacheControl, CacheHint, CacheScope};
pub use context::{ContextValue, KeyedContext, KeyedContextBuilder};
pub use dataloader::DataLoaderRegistry;
pub use execution_id::ExecutionId;
pub use locale::Locale;
pub use request::{ExecutionRequest, ExecutionRequestBuilder, RequestBuildError};
