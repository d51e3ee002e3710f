//! Server bootstrap configuration.
//!
//! [`ServerConfigurator`] accumulates TLS material, protocol version, port and
//! custom security options, then resolves them into a [`WebServer`]:
//!
//! 1. certificate and key present: TLS built from the material,
//! 2. otherwise custom security options present: TLS built from those options,
//! 3. otherwise: plaintext.
//!
//! # Examples
//!
//! ```rust,ignore
//! use torii::config::{credential::CredentialFile, ServerConfigurator};
//!
//! let server = ServerConfigurator::new()
//!     .set_cert(CredentialFile::open("server.pem").await?)
//!     .set_key(CredentialFile::open("server.key.pem").await?)
//!     .use_http1()
//!     .resolve()
//!     .await?;
//!
//! assert_eq!(server.port().to_string(), "443");
//! ```

use std::{fmt, sync::Arc};

use futures_util::future::try_join3;
use log::debug;
use serde::Deserialize;

use crate::{
    errors::{ConfigError, ToriiError},
    server::{
        conn::http::HttpTransport,
        mock::{MockTransport, RequestObserver},
        tls::{TlsFactory, TlsMaterial},
        ConnectionMode, WebServer,
    },
};

pub mod credential;
pub mod file;

pub use credential::{Credential, CredentialFile, FileHandle};

/// Port used by both TLS branches when none was set.
pub const DEFAULT_SECURE_PORT: u16 = 443;

/// Port used by the plaintext branch when none was set.
pub const DEFAULT_PLAIN_PORT: u16 = 80;

/// Supported HTTP protocol versions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
pub enum Protocol {
    /// HTTP/1.1
    Http1,
    /// HTTP/2, with HTTP/1.1 fallback when TLS material is provided
    #[default]
    Http2,
}

/// Port as given by the caller, either numeric or textual.
///
/// Textual ports are only parsed when the server starts listening.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServerPort {
    Number(u16),
    Text(String),
}

impl ServerPort {
    pub fn number(&self) -> Result<u16, ToriiError> {
        match self {
            ServerPort::Number(port) => Ok(*port),
            ServerPort::Text(text) => text
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Port(text.clone()).into()),
        }
    }
}

impl fmt::Display for ServerPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerPort::Number(port) => write!(f, "{}", port),
            ServerPort::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<u16> for ServerPort {
    fn from(port: u16) -> Self {
        ServerPort::Number(port)
    }
}

impl From<&str> for ServerPort {
    fn from(port: &str) -> Self {
        ServerPort::Text(port.to_string())
    }
}

impl From<String> for ServerPort {
    fn from(port: String) -> Self {
        ServerPort::Text(port)
    }
}

/// Builder resolving TLS inputs, protocol and port into a [`WebServer`].
///
/// Setters overwrite one slot each and never validate; problems surface when
/// [`resolve`](ServerConfigurator::resolve) runs.
#[derive(Clone, Debug, Default)]
pub struct ServerConfigurator {
    cert: Option<Credential>,
    key: Option<Credential>,
    ca: Option<Credential>,
    port: Option<ServerPort>,
    protocol: Protocol,
    custom_options: Option<Arc<rustls::ServerConfig>>,
    development_messages: bool,
}

impl ServerConfigurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server certificate (PEM or DER, as text, bytes or file).
    pub fn set_cert<C: Into<Credential>>(mut self, cert: C) -> Self {
        self.cert = Some(cert.into());
        self
    }

    /// Sets the private key (PEM or DER, as text, bytes or file).
    pub fn set_key<C: Into<Credential>>(mut self, key: C) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the certificate authority used to verify client certificates.
    pub fn set_ca<C: Into<Credential>>(mut self, ca: C) -> Self {
        self.ca = Some(ca.into());
        self
    }

    /// Sets the listening port as a number or as text parsed on start.
    /// Integers must fit in a `u16`.
    pub fn set_port<P: Into<ServerPort>>(mut self, port: P) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Switches the protocol selector to HTTP/1.1. HTTP/2 is the default.
    pub fn use_http1(mut self) -> Self {
        self.protocol = Protocol::Http1;
        self
    }

    /// Sets a ready rustls configuration, used verbatim when no certificate
    /// and key pair is available.
    pub fn set_custom_security_options<O: Into<Arc<rustls::ServerConfig>>>(
        mut self,
        options: O,
    ) -> Self {
        self.custom_options = Some(options.into());
        self
    }

    /// Makes handler errors visible in response bodies.
    pub fn enable_development_messages(mut self) -> Self {
        self.development_messages = true;
        self
    }

    pub fn cert(&self) -> Option<&Credential> {
        self.cert.as_ref()
    }

    pub fn key(&self) -> Option<&Credential> {
        self.key.as_ref()
    }

    pub fn ca(&self) -> Option<&Credential> {
        self.ca.as_ref()
    }

    pub fn port(&self) -> Option<&ServerPort> {
        self.port.as_ref()
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn custom_security_options(&self) -> Option<&Arc<rustls::ServerConfig>> {
        self.custom_options.as_ref()
    }

    pub fn development_messages_enabled(&self) -> bool {
        self.development_messages
    }

    /// Resolves the configuration into a [`WebServer`].
    ///
    /// Certificate, key and CA are materialized concurrently; the first
    /// failure is returned as is. A certificate without key (or the other
    /// way around) is not an error, it just does not select the TLS from
    /// material branch.
    ///
    /// Resolving again is allowed, but file handle credentials are closed
    /// after their first read and fail the second time.
    pub async fn resolve(&self) -> Result<WebServer, ToriiError> {
        let (cert, key, ca) = try_join3(
            credential::materialize(self.cert.as_ref()),
            credential::materialize(self.key.as_ref()),
            credential::materialize(self.ca.as_ref()),
        )
        .await?;

        let server = match (cert, key) {
            (Some(cert), Some(key)) => {
                let mode = ConnectionMode::with_material(self.protocol);
                let material = TlsMaterial { cert, key, ca };
                let tls_config = TlsFactory::create_tls_config(&material, mode.alpn_protocols())?;
                let port = self.port_or(DEFAULT_SECURE_PORT);
                debug!("Resolved TLS from certificate and key: {:?} on port {}", mode, port);
                WebServer::new(
                    Box::new(HttpTransport::secure(mode, Arc::new(tls_config))),
                    port,
                    mode,
                    self.development_messages,
                )
            }
            _ => match &self.custom_options {
                Some(options) => {
                    let mode = ConnectionMode::with_custom_options(self.protocol);
                    let port = self.port_or(DEFAULT_SECURE_PORT);
                    debug!("Resolved TLS from custom options: {:?} on port {}", mode, port);
                    WebServer::new(
                        Box::new(HttpTransport::secure(mode, options.clone())),
                        port,
                        mode,
                        self.development_messages,
                    )
                }
                None => {
                    let mode = ConnectionMode::plain(self.protocol);
                    let port = self.port_or(DEFAULT_PLAIN_PORT);
                    debug!("Resolved plaintext: {:?} on port {}", mode, port);
                    WebServer::new(
                        Box::new(HttpTransport::plain(mode)),
                        port,
                        mode,
                        self.development_messages,
                    )
                }
            },
        };

        Ok(server)
    }

    /// Creates a server whose transport never binds a socket and hands the
    /// registered request handler to `observer`.
    ///
    /// The server always reports port 443, [`ConnectionMode::Https2`] and
    /// development messages enabled.
    pub fn create_mock<F>(observer: F) -> WebServer
    where
        F: Fn(crate::RequestHandler) + Send + Sync + 'static,
    {
        let observer: RequestObserver = Box::new(observer);
        WebServer::new(
            Box::new(MockTransport::new(observer)),
            ServerPort::Number(DEFAULT_SECURE_PORT),
            ConnectionMode::Https2,
            true,
        )
    }

    fn port_or(&self, default: u16) -> ServerPort {
        self.port
            .clone()
            .unwrap_or(ServerPort::Number(default))
    }
}
