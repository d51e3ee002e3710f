use std::{future::Future, net::SocketAddr, pin::Pin};

use log::info;

use crate::{
    config::{Protocol, ServerPort},
    errors::ToriiError,
    RequestHandler,
};

pub mod conn;
pub mod mock;
pub mod tls;

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ToriiError>> + Send + 'a>>;

pub const ALPN_HTTP1: &[u8] = b"http/1.1";
pub const ALPN_HTTP2: &[u8] = b"h2";

/// Anything able to take a request handler and serve it on a port.
pub trait Transport: Send {
    fn on_request(&mut self, handler: RequestHandler);

    fn listen(&mut self, port: u16) -> TransportFuture<'_>;

    fn stop(&mut self) -> TransportFuture<'_>;

    fn set_development_messages(&mut self, _enabled: bool) {}

    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }
}

/// How a resolved server talks to its clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectionMode {
    /// Plaintext HTTP/1.1
    Http1,
    /// Plaintext HTTP/2 with prior knowledge
    Http2,
    /// HTTP/1.1 over TLS
    Https1,
    /// HTTP/2 over TLS, HTTP/1.1 clients accepted on the same port
    Https2WithHttp1Fallback,
    /// HTTP/2 over TLS, fallback decided by the custom security options
    Https2,
}

impl ConnectionMode {
    /// Mode for TLS built from certificate and key.
    pub fn with_material(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Http1 => ConnectionMode::Https1,
            Protocol::Http2 => ConnectionMode::Https2WithHttp1Fallback,
        }
    }

    /// Mode for TLS built from custom security options.
    pub fn with_custom_options(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Http1 => ConnectionMode::Https1,
            Protocol::Http2 => ConnectionMode::Https2,
        }
    }

    pub fn plain(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Http1 => ConnectionMode::Http1,
            Protocol::Http2 => ConnectionMode::Http2,
        }
    }

    pub fn is_secure(&self) -> bool {
        !matches!(self, ConnectionMode::Http1 | ConnectionMode::Http2)
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            ConnectionMode::Http1 | ConnectionMode::Https1 => Protocol::Http1,
            _ => Protocol::Http2,
        }
    }

    /// ALPN identifiers a TLS context for this mode advertises. Plaintext
    /// modes negotiate nothing and get an empty list.
    pub fn alpn_protocols(&self) -> Vec<Vec<u8>> {
        match self {
            ConnectionMode::Http1 | ConnectionMode::Http2 => Vec::new(),
            ConnectionMode::Https1 => vec![ALPN_HTTP1.to_vec()],
            ConnectionMode::Https2 => vec![ALPN_HTTP2.to_vec()],
            ConnectionMode::Https2WithHttp1Fallback => {
                vec![ALPN_HTTP2.to_vec(), ALPN_HTTP1.to_vec()]
            }
        }
    }
}

/// A resolved server: one transport, one port, one connection mode.
pub struct WebServer {
    transport: Box<dyn Transport>,
    port: ServerPort,
    mode: ConnectionMode,
    development_messages: bool,
}

impl WebServer {
    pub fn new(
        mut transport: Box<dyn Transport>,
        port: ServerPort,
        mode: ConnectionMode,
        development_messages: bool,
    ) -> Self {
        transport.set_development_messages(development_messages);
        Self { transport, port, mode, development_messages }
    }

    pub fn port(&self) -> &ServerPort {
        &self.port
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn development_messages_enabled(&self) -> bool {
        self.development_messages
    }

    /// Address the transport is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn on_request(&mut self, handler: RequestHandler) {
        self.transport
            .on_request(handler);
    }

    pub async fn start(&mut self) -> Result<(), ToriiError> {
        let port = self.port.number()?;
        self.transport
            .listen(port)
            .await?;
        info!("Server listening on port {} ({:?})", port, self.mode);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), ToriiError> {
        self.transport
            .stop()
            .await
    }
}
