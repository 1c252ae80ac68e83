//! # Kairo HTTP
//!
//! Request and response types shared by every Kairo crate, plus the
//! [`Handler`] trait through which the server hands requests to an
//! application.
//!
//! ## Examples
//!
//! ```
//! use kairo_http::{Request, Response};
//! use http::Method;
//!
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .uri("/blog/?page=2")
//!     .build()
//!     .unwrap();
//! assert_eq!(request.path(), "/blog/");
//! assert_eq!(request.query("page"), Some("2"));
//!
//! let response = Response::ok().with_body("hello");
//! assert_eq!(response.body_text(), "hello");
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod session;

pub use handler::Handler;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use session::Session;

pub use kairo_exception::{Error, Result};
