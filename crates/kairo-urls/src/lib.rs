//! # Kairo URLs
//!
//! URL rules, the ordered [`UrlMap`] and the per-request [`MapAdapter`]
//! that resolves a path to an endpoint identifier.
//!
//! ## Examples
//!
//! ```
//! use kairo_urls::{ParamValue, Rule, UrlMap, submount};
//! use http::Method;
//! use std::sync::Arc;
//!
//! let mut map = UrlMap::new();
//! map.extend(submount("/blog", vec![
//!     Rule::new("/", "blog/index"),
//!     Rule::new("/{year:int}/{slug}/", "blog/post"),
//! ])).unwrap();
//! let map = Arc::new(map);
//!
//! let route = map
//!     .bind(Some("example.com"), "/blog/2024/hello/", "", "http")
//!     .match_route(&Method::GET)
//!     .unwrap();
//! assert_eq!(route.endpoint, "blog/post");
//! assert_eq!(route.params["year"], ParamValue::Int(2024));
//! ```

pub mod adapter;
pub mod converter;
pub mod error;
pub mod map;
pub mod pattern;
pub mod rule;

pub use adapter::{MapAdapter, ResolvedRoute};
pub use converter::{Converter, ParamValue, ViewParams};
pub use error::{Result, RoutingError, UrlError};
pub use map::UrlMap;
pub use pattern::{PathPattern, PatternMatch};
pub use rule::{Rule, endpoint_prefix, submount};
