//! HTTP/1.1 server for Kairo.
//!
//! Adapts raw hyper connections to the [`Handler`](kairo_http::Handler)
//! trait: every request body is collected, turned into a
//! [`Request`](kairo_http::Request) carrying the peer address, and the
//! handler's [`Response`](kairo_http::Response) is written back.
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use kairo_server::{serve_with_shutdown, shutdown_signal};
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! let addr: SocketAddr = "127.0.0.1:8000".parse()?;
//! serve_with_shutdown(addr, Arc::new(application), shutdown_signal()).await?;
//! ```

pub mod http;

pub use http::{HttpServer, ServerError, ServerResult, serve, serve_with_shutdown, shutdown_signal};
