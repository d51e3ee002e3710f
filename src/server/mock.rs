use crate::{
    server::{Transport, TransportFuture},
    RequestHandler,
};

pub type RequestObserver = Box<dyn Fn(RequestHandler) + Send + Sync>;

/// Transport stand-in that binds nothing and hands every registered request
/// handler to an observer.
pub struct MockTransport {
    observer: RequestObserver,
}

impl MockTransport {
    pub fn new(observer: RequestObserver) -> Self {
        Self { observer }
    }
}

impl Transport for MockTransport {
    fn on_request(&mut self, handler: RequestHandler) {
        (self.observer)(handler);
    }

    fn listen(&mut self, _port: u16) -> TransportFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn stop(&mut self) -> TransportFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}
