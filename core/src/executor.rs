//! Synchronous request execution against a fixed URL.
//!
//! # Design
//! `RequestExecutor` owns a `ureq::Agent` configured once from an
//! `ExecutorConfig` and the target URL. Each verb is split in two steps:
//! `build_request` produces a plain-data `HttpRequest` and `execute` sends
//! it, so the header and entity rules stay testable without a network.
//!
//! Every outcome is returned as a `ResponseDescriptor`; transport failures
//! are captured on it rather than returned as `Err`. An empty URL is a silent
//! no-op, kept for compatibility with existing callers and logged at `warn`.
//!
//! Calls block the current thread, bounded by the configured timeouts.
//! The socket timeout is applied per phase, not per read: once to receive
//! the status line and headers, and once as a budget for the whole body.
//! A body that trickles in, or is read slowly, fails with a read timeout
//! once that budget is spent even if no single wait reached it.

use log::{debug, warn};
use serde::Serialize;

use crate::config::ExecutorConfig;
use crate::error::{ErrorKind, RequestError};
use crate::http::{HttpMethod, HttpRequest};
use crate::response::{ResponseBody, ResponseDescriptor};

type TransportResponse = ureq::http::Response<ureq::Body>;

/// Issues GET/POST/PUT/DELETE requests to one URL.
pub struct RequestExecutor {
    url: String,
    config: ExecutorConfig,
    agent: Option<ureq::Agent>,
}

impl RequestExecutor {
    /// Executor with 30s connect and socket timeouts.
    pub fn new(url: &str) -> Self {
        Self::with_config(url, ExecutorConfig::default())
    }

    /// Executor with explicit timeouts in milliseconds; zero disables one.
    pub fn with_timeouts(url: &str, connect_timeout_ms: u64, socket_timeout_ms: u64) -> Self {
        Self::with_config(
            url,
            ExecutorConfig::from_millis(connect_timeout_ms, socket_timeout_ms),
        )
    }

    /// No I/O happens here; the URL is not validated until a request is sent.
    pub fn with_config(url: &str, config: ExecutorConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_connect(config.connect_timeout())
            .timeout_recv_response(config.socket_timeout())
            .timeout_recv_body(config.socket_timeout())
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            url: url.to_string(),
            config,
            agent: Some(agent),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.agent.is_none()
    }

    /// Describe a request for `method` against this executor's URL.
    ///
    /// `json_body` is attached only for POST and PUT and only when non-empty.
    pub fn build_request(&self, method: HttpMethod, json_body: &str) -> HttpRequest {
        HttpRequest::new(method, &self.url).with_json_body(json_body)
    }

    pub fn get(&self) -> ResponseDescriptor {
        self.execute(self.build_request(HttpMethod::Get, ""))
    }

    /// POST `json_body`; an empty string sends no entity and no JSON headers.
    pub fn post(&self, json_body: &str) -> ResponseDescriptor {
        self.execute(self.build_request(HttpMethod::Post, json_body))
    }

    /// PUT `json_body`; an empty string sends no entity and no JSON headers.
    pub fn put(&self, json_body: &str) -> ResponseDescriptor {
        self.execute(self.build_request(HttpMethod::Put, json_body))
    }

    pub fn delete(&self) -> ResponseDescriptor {
        self.execute(self.build_request(HttpMethod::Delete, ""))
    }

    /// Serialize `value` and POST it. A serialization failure is captured on
    /// the descriptor with `ErrorKind::Encoding` and nothing is sent.
    pub fn post_json<T: Serialize + ?Sized>(&self, value: &T) -> ResponseDescriptor {
        self.send_json(HttpMethod::Post, value)
    }

    /// Serialize `value` and PUT it. See `post_json`.
    pub fn put_json<T: Serialize + ?Sized>(&self, value: &T) -> ResponseDescriptor {
        self.send_json(HttpMethod::Put, value)
    }

    fn send_json<T: Serialize + ?Sized>(&self, method: HttpMethod, value: &T) -> ResponseDescriptor {
        match serde_json::to_string(value) {
            Ok(body) => self.execute(self.build_request(method, &body)),
            Err(e) => {
                let err = RequestError::from(e);
                warn!("{method} {}: could not encode body: {err}", self.url);
                ResponseDescriptor::failed(err)
            }
        }
    }

    /// Send a previously built request and capture the outcome.
    pub fn execute(&self, request: HttpRequest) -> ResponseDescriptor {
        let Some(agent) = &self.agent else {
            return ResponseDescriptor::failed(RequestError::msg(
                ErrorKind::Closed,
                "request executor was closed",
            ));
        };
        if request.url.is_empty() {
            warn!("{} skipped: no url configured", request.method);
            return ResponseDescriptor::not_sent();
        }

        debug!("{} {}", request.method, request.url);
        match dispatch(agent, &request) {
            Ok(response) => {
                let descriptor = into_descriptor(response);
                debug!(
                    "{} {} -> {}",
                    request.method, request.url, descriptor.status_code
                );
                descriptor.with_buffer_size(self.config.socket_buffer_size)
            }
            Err(e) => {
                let err = RequestError::from(e);
                warn!("{} {} failed: {err}", request.method, request.url);
                ResponseDescriptor::failed(err)
            }
        }
    }

    /// Release every pooled connection. Calling it again does nothing.
    ///
    /// Verb calls made afterwards return a descriptor with
    /// `ErrorKind::Closed`. Body streams handed out earlier own their
    /// connection and stay readable.
    pub fn close(&mut self) {
        if self.agent.take().is_some() {
            debug!("closed request executor for {}", self.url);
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("url", &self.url)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn dispatch(agent: &ureq::Agent, request: &HttpRequest) -> Result<TransportResponse, ureq::Error> {
    let url = request.url.as_str();
    match request.method {
        HttpMethod::Get => agent.get(url).call(),
        HttpMethod::Delete => agent.delete(url).call(),
        HttpMethod::Post => send(agent.post(url), request),
        HttpMethod::Put => send(agent.put(url), request),
    }
}

fn send(
    mut builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    request: &HttpRequest,
) -> Result<TransportResponse, ureq::Error> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match &request.body {
        Some(body) => builder.send(body.as_str()),
        None => builder.send_empty(),
    }
}

fn into_descriptor(response: TransportResponse) -> ResponseDescriptor {
    let status = response.status();
    let code = status.as_u16();
    let text = status.canonical_reason().unwrap_or("");
    let body = carries_entity(code).then(|| ResponseBody::new(response.into_body().into_reader()));
    ResponseDescriptor::received(code, text, body)
}

/// Informational, 204 and 304 responses never have an entity.
fn carries_entity(status: u16) -> bool {
    !(status < 200 || status == 204 || status == 304)
}
