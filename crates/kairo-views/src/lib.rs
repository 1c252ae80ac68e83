//! # Kairo Views
//!
//! The [`View`] trait, endpoint-to-view references and the invoker that
//! calls a view at a panic-safe boundary.
//!
//! An endpoint maps to a [`ViewReference`]:
//!
//! - `Direct` - a view object
//! - `Lazy` - a dotted path looked up in the [`SymbolRegistry`]
//! - `Construct` - a registered view class instantiated with stored arguments
//!
//! Resolution failures become a 500 [`HttpError`](kairo_exception::HttpError)
//! carrying the cause.

pub mod error;
pub mod group;
pub mod invoker;
pub mod reference;
pub mod registry;
pub mod view;

pub use error::ViewResolutionError;
pub use group::{RouteGroup, ViewGroup};
pub use invoker::invoke;
pub use reference::ViewReference;
pub use registry::{Symbol, SymbolRegistry, ViewClass, ViewRegistry};
pub use view::{FnView, View, view_fn};
