//! The uniform result of every request.
//!
//! # Design
//! A `ResponseDescriptor` is in exactly one of three states:
//! - not sent (empty URL): status 0, no text, no body, no error;
//! - failed: `error` is set, every other field is at its default;
//! - received: status line recorded, `error` is `None`, body possibly present.
//!
//! The constructors below are the only way to build one, so a descriptor
//! never mixes an error with status fields. The body is an owned,
//! single-pass stream; dropping the descriptor (or the taken reader)
//! releases the underlying connection.

use std::fmt;
use std::io::{self, BufReader, Read};

use crate::config::SOCKET_BUFFER_SIZE;
use crate::error::RequestError;

/// Forward-only response entity.
pub struct ResponseBody {
    reader: Box<dyn Read + Send>,
}

impl ResponseBody {
    pub fn new<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            reader: Box::new(reader),
        }
    }
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseBody { .. }")
    }
}

/// Outcome of one verb call on a `RequestExecutor`.
#[derive(Debug, Default)]
pub struct ResponseDescriptor {
    /// Numeric status code, `0` when no status line was received.
    pub status_code: u16,
    /// Canonical reason phrase for `status_code` ("OK", "Not Found", ...).
    ///
    /// The phrase the server actually sent is not available from the
    /// transport, so a non-standard code such as `299 Custom Thing` yields an
    /// empty string.
    pub status_text: String,
    body: Option<ResponseBody>,
    buffer_size: Option<usize>,
    /// Captured failure. When set, no other field is meaningful.
    pub error: Option<RequestError>,
}

impl ResponseDescriptor {
    /// Descriptor for a call that never left the executor.
    pub fn not_sent() -> Self {
        Self::default()
    }

    pub fn failed(error: RequestError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn received(status_code: u16, status_text: impl Into<String>, body: Option<ResponseBody>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            body,
            ..Self::default()
        }
    }

    /// Capacity of the buffered reader returned by `take_reader`.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size.max(1));
        self
    }

    /// True when a status line came back from a server.
    pub fn was_sent(&self) -> bool {
        self.error.is_none() && self.status_code != 0
    }

    /// No error and a 2xx status.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status_code)
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Take the raw body stream. Returns `None` once taken.
    pub fn take_body(&mut self) -> Option<ResponseBody> {
        self.body.take()
    }

    /// Take the body wrapped in a buffered reader for line-based reading.
    ///
    /// ```no_run
    /// use std::io::BufRead;
    /// # let mut response = httphelper::ResponseDescriptor::not_sent();
    /// if let Some(reader) = response.take_reader() {
    ///     for line in reader.lines() {
    ///         println!("{}", line?);
    ///     }
    /// }
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn take_reader(&mut self) -> Option<BufReader<ResponseBody>> {
        let capacity = self.buffer_size.unwrap_or(SOCKET_BUFFER_SIZE);
        self.body
            .take()
            .map(|body| BufReader::with_capacity(capacity, body))
    }

    /// Drain the body into a `String`. `Ok(None)` when there is no body
    /// (or it was already taken).
    pub fn read_text(&mut self) -> io::Result<Option<String>> {
        let Some(mut body) = self.body.take() else {
            return Ok(None);
        };
        let mut text = String::new();
        body.read_to_string(&mut text)?;
        Ok(Some(text))
    }

    /// One-line status, `"200 - OK"` or `"Error : <cause>"`.
    pub fn summary(&self) -> String {
        match &self.error {
            Some(err) => format!("Error : {err}"),
            None => format!("{} - {}", self.status_code, self.status_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{BufRead, Cursor};

    fn body(text: &str) -> Option<ResponseBody> {
        Some(ResponseBody::new(Cursor::new(text.as_bytes().to_vec())))
    }

    #[test]
    fn not_sent_is_empty() {
        let resp = ResponseDescriptor::not_sent();
        assert_eq!(resp.status_code, 0);
        assert!(resp.status_text.is_empty());
        assert!(!resp.has_body());
        assert!(resp.error.is_none());
        assert!(!resp.was_sent());
        assert!(!resp.is_success());
    }

    #[test]
    fn failed_leaves_status_unset() {
        let resp = ResponseDescriptor::failed(RequestError::msg(ErrorKind::Io, "boom"));
        assert_eq!(resp.status_code, 0);
        assert!(resp.status_text.is_empty());
        assert!(!resp.has_body());
        assert!(!resp.was_sent());
        assert_eq!(resp.summary(), "Error : i/o error: boom");
    }

    #[test]
    fn reader_yields_lines_once() {
        let mut resp = ResponseDescriptor::received(200, "OK", body("hello\nworld"));
        assert!(resp.is_success());
        let lines: Vec<String> = resp
            .take_reader()
            .unwrap()
            .lines()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["hello", "world"]);
        assert!(resp.take_reader().is_none());
        assert!(!resp.has_body());
    }

    #[test]
    fn read_text_drains_body() {
        let mut resp = ResponseDescriptor::received(201, "Created", body("{\"ok\":true}"));
        assert_eq!(resp.read_text().unwrap().as_deref(), Some("{\"ok\":true}"));
        assert_eq!(resp.read_text().unwrap(), None);
    }

    #[test]
    fn reader_respects_buffer_size() {
        let mut resp = ResponseDescriptor::received(200, "OK", body("x")).with_buffer_size(16);
        assert_eq!(resp.take_reader().unwrap().capacity(), 16);

        let mut resp = ResponseDescriptor::received(200, "OK", body("x"));
        assert_eq!(resp.take_reader().unwrap().capacity(), SOCKET_BUFFER_SIZE);
    }

    #[test]
    fn non_2xx_is_sent_but_not_success() {
        let resp = ResponseDescriptor::received(404, "Not Found", None);
        assert!(resp.was_sent());
        assert!(!resp.is_success());
        assert_eq!(resp.summary(), "404 - Not Found");
    }
}
