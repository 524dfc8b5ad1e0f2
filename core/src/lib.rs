//! Blocking HTTP helper for GET/POST/PUT/DELETE against a single URL.
//!
//! # Overview
//! A `RequestExecutor` holds a configured HTTP agent and a target URL. Each
//! verb call performs one synchronous exchange and returns a
//! `ResponseDescriptor` carrying the status line, a readable body stream, or
//! a captured `RequestError`. Transport failures are never returned as
//! `Err` and never panic.
//!
//! # Design
//! - Requests are built as plain data (`HttpRequest`) before being sent, so
//!   JSON header and entity rules are testable without I/O.
//! - Failures are folded into one error type tagged with an `ErrorKind`.
//! - The body is an owned single-pass stream released on drop.
//! - Logging goes through the `log` facade; binaries pick the backend.
//!
//! ```no_run
//! use httphelper::RequestExecutor;
//!
//! let mut executor = RequestExecutor::new("http://localhost:3000/hello");
//! let mut response = executor.get();
//! println!("{}", response.summary());
//! if let Ok(Some(text)) = response.read_text() {
//!     println!("{text}");
//! }
//! executor.close();
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod response;

pub use config::{ExecutorConfig, LONG_CONNECTION_TIMEOUT, SHORT_CONNECTION_TIMEOUT, SOCKET_BUFFER_SIZE};
pub use error::{ConfigError, ErrorKind, RequestError};
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest};
pub use response::{ResponseBody, ResponseDescriptor};
