use std::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use hyper::{
    server::conn::{http1, http2},
    service::service_fn,
};
use hyper_util::rt::{TokioExecutor, TokioIo};
use log::error;
use rt_gate::{spawn_server, spawn_worker, GateTask};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
};
use tokio_rustls::TlsAcceptor;

use crate::{
    config::Protocol,
    errors::{ToriiError, TransportError},
    server::{
        conn::error_response, ConnectionMode, Transport, TransportFuture, ALPN_HTTP1,
    },
    RequestHandler,
};

type ToriiTcpListener = TcpListener;
type ToriiTlsAcceptor = TlsAcceptor;
type ToriiIo<T> = TokioIo<T>;
type ToriiExecutor = TokioExecutor;

/// TCP transport serving HTTP/1.1 or HTTP/2, with or without TLS.
pub struct HttpTransport {
    mode: ConnectionMode,
    tls_config: Option<Arc<rustls::ServerConfig>>,
    handler: Option<RequestHandler>,
    development_messages: bool,
    local_addr: Option<SocketAddr>,
    task: Option<GateTask>,
}

impl HttpTransport {
    pub fn plain(mode: ConnectionMode) -> Self {
        Self::new(mode, None)
    }

    pub fn secure(mode: ConnectionMode, tls_config: Arc<rustls::ServerConfig>) -> Self {
        Self::new(mode, Some(tls_config))
    }

    fn new(mode: ConnectionMode, tls_config: Option<Arc<rustls::ServerConfig>>) -> Self {
        Self {
            mode,
            tls_config,
            handler: None,
            development_messages: false,
            local_addr: None,
            task: None,
        }
    }

    fn handle_connections(
        &self,
        listener: ToriiTcpListener,
        tls_acceptor: Option<ToriiTlsAcceptor>,
        handler: RequestHandler,
    ) -> GateTask {
        let mode = self.mode;
        let development_messages = self.development_messages;

        spawn_server(async move {
            loop {
                let (stream, peer) = match listener
                    .accept()
                    .await
                {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        error!("Cannot accept connection: {:?}", err);
                        continue;
                    }
                };

                if let Err(err) = stream.set_nodelay(true) {
                    error!("Cannot set TCP_NODELAY: {}", err);
                    continue;
                }

                let handler = handler.clone();
                if let Some(acceptor) = &tls_acceptor {
                    let acceptor = acceptor.clone();
                    spawn_worker(async move {
                        let tls_stream = match acceptor
                            .accept(stream)
                            .await
                        {
                            Ok(tls_stream) => tls_stream,
                            Err(err) => {
                                error!("Cannot accept TLS connection from {}: {:?}", peer, err);
                                return;
                            }
                        };

                        let protocol = negotiated_protocol(
                            mode,
                            tls_stream
                                .get_ref()
                                .1
                                .alpn_protocol(),
                        );
                        serve_connection(
                            ToriiIo::new(tls_stream),
                            protocol,
                            handler,
                            development_messages,
                        )
                        .await;
                    });
                } else {
                    spawn_worker(async move {
                        serve_connection(
                            ToriiIo::new(stream),
                            mode.protocol(),
                            handler,
                            development_messages,
                        )
                        .await;
                    });
                }
            }
        })
    }
}

impl Transport for HttpTransport {
    fn on_request(&mut self, handler: RequestHandler) {
        self.handler = Some(handler);
    }

    fn listen(&mut self, port: u16) -> TransportFuture<'_> {
        Box::pin(async move {
            if self.task.is_some() {
                return Err(TransportError::AlreadyListening.into());
            }

            let handler = self
                .handler
                .clone()
                .ok_or(TransportError::NoHandler)?;

            let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
            let listener = ToriiTcpListener::bind(addr)
                .await
                .map_err(|e| ToriiError::Bind(format!("{}: {}", addr, e)))?;
            self.local_addr = listener
                .local_addr()
                .ok();

            let tls_acceptor = self
                .tls_config
                .clone()
                .map(ToriiTlsAcceptor::from);

            let task = self.handle_connections(listener, tls_acceptor, handler);
            self.task = Some(task);

            Ok(())
        })
    }

    fn stop(&mut self) -> TransportFuture<'_> {
        Box::pin(async move {
            if let Some(mut task) = self.task.take() {
                task.cancel().await;
            }
            self.local_addr = None;
            Ok(())
        })
    }

    fn set_development_messages(&mut self, enabled: bool) {
        self.development_messages = enabled;
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

/// Picks the HTTP version for a connection.
///
/// TLS HTTP/2 modes follow the ALPN outcome so HTTP/1.1 clients are served
/// whenever the TLS context let them negotiate `http/1.1`.
pub(crate) fn negotiated_protocol(mode: ConnectionMode, alpn: Option<&[u8]>) -> Protocol {
    match mode {
        ConnectionMode::Http1 | ConnectionMode::Https1 => Protocol::Http1,
        ConnectionMode::Http2 => Protocol::Http2,
        ConnectionMode::Https2 | ConnectionMode::Https2WithHttp1Fallback => match alpn {
            Some(protocol) if protocol == ALPN_HTTP1 => Protocol::Http1,
            _ => Protocol::Http2,
        },
    }
}

async fn serve_connection<T>(
    io: ToriiIo<T>,
    protocol: Protocol,
    handler: RequestHandler,
    development_messages: bool,
) where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let service = service_fn(move |request| {
        let handler = handler.clone();
        async move {
            let response = match handler(request).await {
                Ok(response) => response,
                Err(err) => error_response(&err, development_messages),
            };
            Ok::<_, Infallible>(response)
        }
    });

    let result = match protocol {
        Protocol::Http1 => {
            http1::Builder::new()
                .serve_connection(io, service)
                .await
        }
        Protocol::Http2 => {
            http2::Builder::new(ToriiExecutor::new())
                .serve_connection(io, service)
                .await
        }
    };

    if let Err(err) = result {
        error!("Error serving connection: {:?}", err);
    }
}
