use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http_body_util::Full;

use crate::{
    config::{ServerConfigurator, ServerPort},
    errors::ToriiError,
    handler_fn,
    server::ConnectionMode,
    RequestHandler, Response,
};

fn hello_handler() -> RequestHandler {
    handler_fn(|_request| async move {
        Ok::<_, ToriiError>(Response::new(Full::new(Bytes::from_static(b"Hello"))))
    })
}

fn same_handler(a: &RequestHandler, b: &RequestHandler) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[test]
fn test_mock_reports_fixed_mode() {
    let server = ServerConfigurator::create_mock(|_handler| {});

    assert_eq!(server.port(), &ServerPort::Number(443));
    assert_eq!(server.mode(), ConnectionMode::Https2);
    assert!(server.development_messages_enabled());
    assert!(server
        .local_addr()
        .is_none());
}

#[test]
fn test_mock_hands_handler_to_observer() {
    let observed: Arc<Mutex<Vec<RequestHandler>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    let mut server = ServerConfigurator::create_mock(move |handler| {
        sink.lock()
            .unwrap()
            .push(handler);
    });

    let handler = hello_handler();
    server.on_request(handler.clone());

    let observed = observed
        .lock()
        .unwrap();
    assert_eq!(observed.len(), 1);
    assert!(same_handler(&observed[0], &handler));
}

#[test]
fn test_mock_observer_not_called_before_registration() {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = calls.clone();
    let _server = ServerConfigurator::create_mock(move |_handler| {
        *counter
            .lock()
            .unwrap() += 1;
    });

    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_mock_start_and_stop_bind_nothing() -> Result<(), ToriiError> {
    let mut server = ServerConfigurator::create_mock(|_handler| {});
    server.on_request(hello_handler());

    server.start().await?;
    assert!(server
        .local_addr()
        .is_none());
    server.stop().await?;
    Ok(())
}
