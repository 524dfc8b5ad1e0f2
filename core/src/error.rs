//! Error types for the request executor.
//!
//! # Design
//! Every transport failure is folded into one `RequestError` carrying an
//! `ErrorKind` category and the underlying cause. Callers branch on the
//! category when they need to and log the cause otherwise; they never see
//! `ureq` error types directly. Configuration problems are the only errors
//! returned as `Result`, see `ConfigError`.

use std::fmt;
use std::io;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The target URL could not be parsed.
    MalformedUrl,
    /// The server broke the HTTP protocol (bad status line, redirect loop, ...).
    Protocol,
    /// No connection could be established to the remote host and port.
    ConnectionRefused,
    /// Timed out while establishing the connection.
    ConnectTimeout,
    /// Timed out waiting for data on an established connection.
    ReadTimeout,
    /// The socket failed after it was created (reset, aborted, broken pipe).
    Socket,
    /// Any other I/O failure, including name resolution.
    Io,
    /// The request entity could not be encoded; nothing was sent.
    Encoding,
    /// The executor was closed before the call.
    Closed,
    /// Anything not covered above.
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::MalformedUrl => "malformed url",
            ErrorKind::Protocol => "protocol error",
            ErrorKind::ConnectionRefused => "connection refused",
            ErrorKind::ConnectTimeout => "connect timeout",
            ErrorKind::ReadTimeout => "read timeout",
            ErrorKind::Socket => "socket error",
            ErrorKind::Io => "i/o error",
            ErrorKind::Encoding => "encoding error",
            ErrorKind::Closed => "executor closed",
            ErrorKind::Unknown => "unexpected error",
        };
        f.write_str(label)
    }
}

/// A failure captured on a `ResponseDescriptor`.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl RequestError {
    /// Wrap an underlying cause under the given category.
    pub fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        Self {
            kind,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// An error with no underlying cause.
    pub fn msg(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for both connect and read timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectTimeout | ErrorKind::ReadTimeout)
    }
}

impl From<ureq::Error> for RequestError {
    fn from(err: ureq::Error) -> Self {
        let kind = classify(&err);
        RequestError::new(kind, err)
    }
}

/// Errors from reading a body stream; a wrapped transport error keeps its
/// category, so a stalled body reports `ReadTimeout`.
impl From<io::Error> for RequestError {
    fn from(err: io::Error) -> Self {
        let kind = match err.get_ref().and_then(|e| e.downcast_ref::<ureq::Error>()) {
            Some(inner) => classify(inner),
            None => classify_io(&err),
        };
        RequestError::new(kind, err)
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::new(ErrorKind::Encoding, err)
    }
}

/// Map a transport error onto its category.
pub fn classify(err: &ureq::Error) -> ErrorKind {
    match err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => ErrorKind::MalformedUrl,
        ureq::Error::Protocol(_)
        | ureq::Error::StatusCode(_)
        | ureq::Error::RedirectFailed
        | ureq::Error::TooManyRedirects => ErrorKind::Protocol,
        ureq::Error::ConnectionFailed => ErrorKind::ConnectionRefused,
        ureq::Error::Timeout(ureq::Timeout::Connect) => ErrorKind::ConnectTimeout,
        ureq::Error::Timeout(_) => ErrorKind::ReadTimeout,
        ureq::Error::HostNotFound => ErrorKind::Io,
        ureq::Error::Tls(_) => ErrorKind::Socket,
        ureq::Error::Io(e) => classify_io(e),
        _ => ErrorKind::Unknown,
    }
}

fn classify_io(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ErrorKind::ConnectionRefused,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::ReadTimeout,
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::AddrInUse
        | io::ErrorKind::AddrNotAvailable => ErrorKind::Socket,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => ErrorKind::Protocol,
        _ => ErrorKind::Io,
    }
}

/// Invalid executor configuration read from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidMillis {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn bad_uri_is_malformed_url() {
        let err = ureq::Error::BadUri("no scheme".to_string());
        assert_eq!(classify(&err), ErrorKind::MalformedUrl);
    }

    #[test]
    fn connect_timeout_and_read_timeout_are_distinct() {
        assert_eq!(
            classify(&ureq::Error::Timeout(ureq::Timeout::Connect)),
            ErrorKind::ConnectTimeout
        );
        assert_eq!(
            classify(&ureq::Error::Timeout(ureq::Timeout::RecvResponse)),
            ErrorKind::ReadTimeout
        );
        assert_eq!(
            classify(&ureq::Error::Timeout(ureq::Timeout::RecvBody)),
            ErrorKind::ReadTimeout
        );
    }

    #[test]
    fn refused_connection_from_io_or_connector() {
        let io = ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert_eq!(classify(&io), ErrorKind::ConnectionRefused);
        assert_eq!(
            classify(&ureq::Error::ConnectionFailed),
            ErrorKind::ConnectionRefused
        );
    }

    #[test]
    fn socket_faults_are_grouped() {
        for kind in [
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::ConnectionAborted,
        ] {
            let err = ureq::Error::Io(io::Error::from(kind));
            assert_eq!(classify(&err), ErrorKind::Socket, "{kind:?}");
        }
    }

    #[test]
    fn other_io_and_dns_failures_are_io() {
        let err = ureq::Error::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(classify(&err), ErrorKind::Io);
        assert_eq!(classify(&ureq::Error::HostNotFound), ErrorKind::Io);
    }

    #[test]
    fn redirect_loop_is_protocol() {
        assert_eq!(classify(&ureq::Error::TooManyRedirects), ErrorKind::Protocol);
    }

    #[test]
    fn request_error_keeps_cause() {
        let err = RequestError::from(ureq::Error::Timeout(ureq::Timeout::Connect));
        assert_eq!(err.kind(), ErrorKind::ConnectTimeout);
        assert!(err.is_timeout());
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("connect timeout: "));
    }

    #[test]
    fn message_only_error_has_no_source() {
        let err = RequestError::msg(ErrorKind::Closed, "executor already closed");
        assert!(err.source().is_none());
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "executor closed: executor already closed");
    }

    #[test]
    fn body_read_errors_keep_transport_category() {
        let wrapped = io::Error::other(ureq::Error::Timeout(ureq::Timeout::RecvBody));
        assert_eq!(RequestError::from(wrapped).kind(), ErrorKind::ReadTimeout);

        let plain = io::Error::from(io::ErrorKind::ConnectionReset);
        assert_eq!(RequestError::from(plain).kind(), ErrorKind::Socket);
    }

    #[test]
    fn serde_failure_is_encoding() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RequestError::from(json_err);
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }
}
