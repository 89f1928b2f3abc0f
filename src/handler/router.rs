//! Request pipeline
//!
//! Body size check, body decoding, then the kernel on a blocking thread.
//! Whatever happens, OPTIONS included, the client gets a JSON envelope.

use crate::config::AppState;
use crate::dispatch::Envelope;
use crate::http::{self, FormData};
use crate::kernel::RequestInput;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use hyper::{HeaderMap, Method, Request, Response, Version};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: fmt::Display,
{
    let started = Instant::now();
    let http_cfg = &state.config.http;
    let is_options = *req.method() == Method::OPTIONS;

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
        req.uri().query().unwrap_or_default().to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();
    entry.user_agent = header_text(req.headers(), USER_AGENT.as_str()).map(ToString::to_string);

    let reply = match read_input(req, http_cfg.max_body_size).await {
        Ok(input) => run_kernel(&state, input).await,
        Err(msg) => {
            logger::log_warning(&format!(
                "Rejected {} '{}': {msg}",
                entry.method, entry.selector
            ));
            Envelope::error(msg).into_value()
        }
    };

    let mut response = http::build_json_response(&reply, http_cfg);
    if is_options {
        http::add_preflight_headers(&mut response, http_cfg.enable_cors);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        entry.code = reply.get("code").and_then(Value::as_i64).unwrap_or_default();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Size-check, collect and decode the request body
async fn read_input<B>(req: Request<B>, max_body_size: u64) -> Result<RequestInput, String>
where
    B: Body,
    B::Error: fmt::Display,
{
    check_body_size(req.headers(), max_body_size)?;

    let method = req.method().to_string();
    let selector = req.uri().query().unwrap_or_default().to_string();
    let content_type = header_text(req.headers(), CONTENT_TYPE.as_str()).map(ToString::to_string);

    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| format!("failed to read request body: {e}"))?
        .to_bytes();
    // Chunked bodies carry no Content-Length
    if body.len() as u64 > max_body_size {
        return Err(too_large(body.len() as u64, max_body_size));
    }

    let form = FormData::parse(content_type.as_deref(), &body)?;
    Ok(RequestInput::new(method, selector, form))
}

/// Run the kernel off the async workers; the database call blocks
async fn run_kernel(state: &Arc<AppState>, input: RequestInput) -> Value {
    let kernel = Arc::clone(&state.kernel);
    match tokio::task::spawn_blocking(move || kernel.handle(&input)).await {
        Ok(reply) => reply,
        Err(e) => {
            logger::log_error(&format!("Handler task failed: {e}"));
            Envelope::error("internal error").into_value()
        }
    }
}

/// Validate the Content-Length header against `max_body_size`
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Result<(), String> {
    let Some(size_str) = header_text(headers, CONTENT_LENGTH.as_str()) else {
        return Ok(());
    };
    match size_str.trim().parse::<u64>() {
        Ok(size) if size > max_body_size => Err(too_large(size, max_body_size)),
        Ok(_) => Ok(()),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            Ok(())
        }
    }
}

fn too_large(size: u64, max_body_size: u64) -> String {
    format!("request body too large: {size} bytes (max: {max_body_size})")
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
