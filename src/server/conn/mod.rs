use bytes::Bytes;
use ::http::StatusCode;
use http_body_util::Full;

use crate::{errors::ToriiError, Response};

pub mod http;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Response sent when a request handler fails.
///
/// The error text is only exposed when development messages are enabled.
pub fn error_response(error: &ToriiError, development_messages: bool) -> Response {
    let body = if development_messages {
        error.to_string()
    } else {
        INTERNAL_SERVER_ERROR.to_string()
    };

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
