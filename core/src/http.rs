//! HTTP request types described as plain data.
//!
//! # Design
//! `RequestExecutor` first describes the outbound exchange as an
//! `HttpRequest` (verb, URL, headers, body) and only then hands it to the
//! transport. Header and entity rules can therefore be checked without a
//! socket, and the transport code stays a single dispatch over `HttpMethod`.

/// `Accept` / `Content-type` value attached to every JSON entity.
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The verb as it appears on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether this verb may carry a JSON entity.
    pub fn accepts_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound HTTP request described as plain data.
///
/// Built by `RequestExecutor::build_request`. `body` is `Some` only for a
/// POST or PUT with a non-empty JSON payload, and in that case `headers`
/// holds the JSON header pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A request with no headers and no entity.
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach `json` as the entity together with the JSON header pair.
    ///
    /// An empty payload leaves the request untouched, as does a verb that
    /// cannot carry a body.
    pub fn with_json_body(mut self, json: &str) -> Self {
        if json.is_empty() || !self.method.accepts_body() {
            return self;
        }
        add_json_headers(&mut self.headers);
        self.body = Some(json.to_string());
        self
    }

    /// Look up a header value, ignoring ASCII case in the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn add_json_headers(headers: &mut Vec<(String, String)>) {
    headers.push(("Accept".to_string(), APPLICATION_JSON.to_string()));
    headers.push(("Content-type".to_string(), APPLICATION_JSON.to_string()));
}
