//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The executor is exposed as an opaque handle. Responses are flattened
//! into one `FfiResponse` envelope: the body stream is drained into an
//! owned byte buffer, since C callers cannot hold a Rust `Read`. Conversion
//! helpers live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use httphelper::{ErrorKind, RequestError, ResponseDescriptor};

/// Opaque handle to a `RequestExecutor`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiExecutor {
    pub(crate) inner: httphelper::RequestExecutor,
}

/// Error category as a C enum. `None` means the request produced a status line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorKind {
    None = 0,
    MalformedUrl = 1,
    Protocol = 2,
    ConnectionRefused = 3,
    ConnectTimeout = 4,
    ReadTimeout = 5,
    Socket = 6,
    Io = 7,
    Encoding = 8,
    Closed = 9,
    Unknown = 10,
    Panic = 11,
    NullArg = 12,
}

impl From<ErrorKind> for FfiErrorKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::MalformedUrl => FfiErrorKind::MalformedUrl,
            ErrorKind::Protocol => FfiErrorKind::Protocol,
            ErrorKind::ConnectionRefused => FfiErrorKind::ConnectionRefused,
            ErrorKind::ConnectTimeout => FfiErrorKind::ConnectTimeout,
            ErrorKind::ReadTimeout => FfiErrorKind::ReadTimeout,
            ErrorKind::Socket => FfiErrorKind::Socket,
            ErrorKind::Io => FfiErrorKind::Io,
            ErrorKind::Encoding => FfiErrorKind::Encoding,
            ErrorKind::Closed => FfiErrorKind::Closed,
            ErrorKind::Unknown => FfiErrorKind::Unknown,
        }
    }
}

/// Result of one verb call.
///
/// When `error_kind` is `None`, `status_code` / `status_text` hold the
/// status line and, if `has_body`, `body` points to `body_len` bytes (not
/// NUL-terminated). Otherwise `error_message` describes the failure and all
/// other fields are zero / null.
#[repr(C)]
pub struct FfiResponse {
    pub status_code: u16,
    pub status_text: *mut c_char,
    pub has_body: bool,
    pub body: *mut u8,
    pub body_len: usize,
    pub error_kind: FfiErrorKind,
    pub error_message: *mut c_char,
}

impl FfiResponse {
    /// Drain `descriptor` into a heap-allocated `FfiResponse`.
    pub(crate) fn from_descriptor(mut descriptor: ResponseDescriptor) -> *mut Self {
        if let Some(err) = descriptor.error.take() {
            return Self::from_error(&err);
        }

        let has_body = descriptor.has_body();
        let mut bytes = Vec::new();
        if let Some(mut body) = descriptor.take_body() {
            if let Err(e) = std::io::Read::read_to_end(&mut body, &mut bytes) {
                return Self::from_error(&RequestError::from(e));
            }
        }

        let body_len = bytes.len();
        let body = if has_body {
            Box::into_raw(bytes.into_boxed_slice()) as *mut u8
        } else {
            std::ptr::null_mut()
        };

        Box::into_raw(Box::new(FfiResponse {
            status_code: descriptor.status_code,
            status_text: c_string(&descriptor.status_text),
            has_body,
            body,
            body_len,
            error_kind: FfiErrorKind::None,
            error_message: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: &RequestError) -> *mut Self {
        Self::failure(err.kind().into(), &err.to_string())
    }

    /// Response for a null required argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorKind::NullArg, &format!("null argument: {name}"))
    }

    /// Response for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorKind::Panic, msg)
    }

    fn failure(error_kind: FfiErrorKind, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiResponse {
            status_code: 0,
            status_text: std::ptr::null_mut(),
            has_body: false,
            body: std::ptr::null_mut(),
            body_len: 0,
            error_kind,
            error_message: c_string(msg),
        }))
    }
}

/// Copy `s` into a C string owned by the caller. Interior NULs are dropped.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}
