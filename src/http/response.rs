//! HTTP response building module
//!
//! Every reply is `200 OK` with a JSON envelope body; the envelope `code`
//! carries success or failure.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_MAX_AGE, ALLOW,
};
use hyper::Response;
use serde_json::Value;

use crate::config::HttpConfig;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Serialize an envelope and wrap it in a 200 response
pub fn build_json_response(envelope: &Value, http: &HttpConfig) -> Response<Full<Bytes>> {
    let body = envelope.to_string();
    let content_length = body.len();

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", "application/json; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Server", http.server_name.as_str());
    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(Bytes::from(body))).unwrap_or_else(|e| {
        log_build_error("JSON", &e);
        Response::new(Full::new(Bytes::from(r#"{"code":-1,"msg":"internal error"}"#)))
    })
}

/// Add `Allow` and, with CORS enabled, the preflight headers to an
/// OPTIONS reply
pub fn add_preflight_headers(response: &mut Response<Full<Bytes>>, enable_cors: bool) {
    let headers = response.headers_mut();
    headers.insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    if enable_cors {
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    }
}

/// Log response build error
fn log_build_error(kind: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {kind} response: {error}"));
}
