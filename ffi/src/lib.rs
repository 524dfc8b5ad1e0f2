//! C-ABI wrapper around `httphelper`.
//!
//! # Overview
//! Exposes the request executor through `extern "C"` functions so a host
//! application (for example an Android app over JNI) can issue
//! GET/POST/PUT/DELETE requests and read the uniform response without
//! touching Rust types.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One function per verb mirrors the core API 1:1.
//! - The caller owns every returned pointer and must release it with the
//!   matching `httphelper_*_free` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use httphelper::{ErrorKind, RequestError, RequestExecutor};
use log::error;

use types::*;

/// Borrow a C string argument. Null becomes `None`; invalid UTF-8 is an
/// encoding error.
fn str_arg<'a>(ptr: *const c_char) -> Result<Option<&'a str>, RequestError> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(Some)
        .map_err(|e| RequestError::new(ErrorKind::Encoding, e))
}

// ---------------------------------------------------------------------------
// Executor lifecycle
// ---------------------------------------------------------------------------

/// Create an executor for `url` with explicit timeouts in milliseconds.
///
/// A zero timeout disables it. A null `url` behaves like an empty one: every
/// call returns an empty response. Returns null if `url` is not valid UTF-8
/// or if an internal panic occurs. Free with `httphelper_executor_free`.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_executor_new(
    url: *const c_char,
    connect_timeout_ms: u64,
    socket_timeout_ms: u64,
) -> *mut FfiExecutor {
    catch_unwind(|| {
        let Ok(url) = str_arg(url) else {
            return std::ptr::null_mut();
        };
        let inner = RequestExecutor::with_timeouts(
            url.unwrap_or(""),
            connect_timeout_ms,
            socket_timeout_ms,
        );
        Box::into_raw(Box::new(FfiExecutor { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create an executor for `url` with the default 30s timeouts.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_executor_new_default(url: *const c_char) -> *mut FfiExecutor {
    httphelper_executor_new(
        url,
        httphelper::LONG_CONNECTION_TIMEOUT,
        httphelper::LONG_CONNECTION_TIMEOUT,
    )
}

/// Release the executor's connections. Safe to call repeatedly and with null.
///
/// Calls made afterwards return `FfiErrorKind::Closed`.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_executor_close(executor: *mut FfiExecutor) {
    if executor.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let executor = unsafe { &mut *executor };
        executor.inner.close();
    }));
}

/// Free an executor created by `httphelper_executor_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_executor_free(executor: *mut FfiExecutor) {
    if !executor.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(executor) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

fn run_verb<F>(name: &str, executor: *const FfiExecutor, call: F) -> *mut FfiResponse
where
    F: FnOnce(&RequestExecutor) -> *mut FfiResponse,
{
    catch_unwind(AssertUnwindSafe(|| {
        if executor.is_null() {
            return FfiResponse::null_arg("executor");
        }
        let executor = unsafe { &*executor };
        call(&executor.inner)
    }))
    .unwrap_or_else(|_| {
        error!("panic in {name}");
        FfiResponse::panic(&format!("panic in {name}"))
    })
}

/// Execute a GET request. Free the result with `httphelper_free_response`.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_get(executor: *const FfiExecutor) -> *mut FfiResponse {
    run_verb("httphelper_get", executor, |exec| {
        FfiResponse::from_descriptor(exec.get())
    })
}

/// Execute a POST request. `json` may be null or empty to send no entity.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_post(
    executor: *const FfiExecutor,
    json: *const c_char,
) -> *mut FfiResponse {
    run_verb("httphelper_post", executor, |exec| match str_arg(json) {
        Ok(body) => FfiResponse::from_descriptor(exec.post(body.unwrap_or(""))),
        Err(e) => FfiResponse::from_error(&e),
    })
}

/// Execute a PUT request. `json` may be null or empty to send no entity.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_put(
    executor: *const FfiExecutor,
    json: *const c_char,
) -> *mut FfiResponse {
    run_verb("httphelper_put", executor, |exec| match str_arg(json) {
        Ok(body) => FfiResponse::from_descriptor(exec.put(body.unwrap_or(""))),
        Err(e) => FfiResponse::from_error(&e),
    })
}

/// Execute a DELETE request. Free the result with `httphelper_free_response`.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_delete(executor: *const FfiExecutor) -> *mut FfiResponse {
    run_verb("httphelper_delete", executor, |exec| {
        FfiResponse::from_descriptor(exec.delete())
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResponse` returned by any verb function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn httphelper_free_response(response: *mut FfiResponse) {
    if response.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let response = unsafe { Box::from_raw(response) };
        if !response.status_text.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(response.status_text) });
        }
        if !response.error_message.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(response.error_message) });
        }
        if !response.body.is_null() {
            let slice = std::ptr::slice_from_raw_parts_mut(response.body, response.body_len);
            drop(unsafe { Box::from_raw(slice) });
        }
    }));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
