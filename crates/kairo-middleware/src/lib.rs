//! # Kairo Middleware
//!
//! Middleware components hook into four phases of request handling:
//!
//! - **request** - before the view is resolved; may answer directly
//! - **view** - with the resolved view; may answer instead of the view
//! - **response** - on every produced response
//! - **exception** - when the view fails; may answer with a recovery response
//!
//! The [`MiddlewarePipeline`] is built once from the configured identifiers
//! through a [`MiddlewareRegistry`].

pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod registry;

pub use logging::LoggingMiddleware;
pub use middleware::{HookSet, Middleware, MiddlewareOutcome};
pub use pipeline::{MiddlewareEntry, MiddlewarePipeline};
pub use registry::{MiddlewareFactory, MiddlewareRegistry};
