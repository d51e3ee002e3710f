//! Torii resolves a partially filled server configuration (TLS material,
//! protocol version, port, custom security options) into a ready
//! [`WebServer`] with a decided [`ConnectionMode`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use torii::{config::ServerConfigurator, handler_fn, Response};
//!
//! let mut server = ServerConfigurator::new()
//!     .set_cert(include_str!("server.pem"))
//!     .set_key(include_str!("server.key.pem"))
//!     .set_port(8443)
//!     .resolve()
//!     .await?;
//!
//! server.on_request(handler_fn(|_request| async move {
//!     Ok(Response::new(http_body_util::Full::new(bytes::Bytes::from("Hello"))))
//! }));
//! server.start().await?;
//! ```
use std::{future::Future, pin::Pin, sync::Arc};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;

use crate::errors::ToriiError;

pub mod config;
pub mod errors;
pub mod server;

mod tests;

pub use crate::{
    config::{Credential, Protocol, ServerConfigurator, ServerPort},
    server::{ConnectionMode, Transport, WebServer},
};

pub type Request = http::Request<Incoming>;

pub type Response = http::Response<Full<Bytes>>;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, ToriiError>> + Send>>;

/// Shared request handler registered on a [`Transport`].
///
/// Handlers are reference counted so the same handler can be observed,
/// compared and dispatched to from every connection.
pub type RequestHandler = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

/// Creates a [`RequestHandler`] from an async function.
///
/// # Examples
///
/// ```rust,ignore
/// use torii::{handler_fn, Request, Response, errors::ToriiError};
///
/// async fn hello(_request: Request) -> Result<Response, ToriiError> {
///     Ok(Response::new(http_body_util::Full::new(bytes::Bytes::from("Hello!"))))
/// }
///
/// let handler = handler_fn(hello);
/// ```
pub fn handler_fn<F, Fut>(f: F) -> RequestHandler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, ToriiError>> + Send + 'static,
{
    Arc::new(move |request| Box::pin(f(request)))
}
