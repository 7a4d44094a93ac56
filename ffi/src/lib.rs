//! C-ABI wrapper around `ynab-core`.
//!
//! # Overview
//! Exposes request building and response parsing for every YNAB operation
//! through `extern "C"` functions, so any language with a C FFI can talk to
//! the API with its own HTTP stack and without linking serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Operations are named by the JSON form of `ynab_core::Endpoint`
//!   (`{"operation": "transaction", "budget_id": ..., "transaction_id": ...}`)
//!   instead of one symbol per operation.
//! - A single `FfiYnabResult` envelope carries either the unwrapped payload
//!   as JSON text or an error code and message.
//! - The C caller owns all returned pointers and must call the matching
//!   `ynab_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use serde_json::Value;
use ynab_core::{ApiError, Endpoint, HttpResponse, YnabClient};

use types::*;

/// Borrow a C string as UTF-8. Null and invalid UTF-8 are `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn parse_endpoint(json: &str) -> Result<Endpoint, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for the public YNAB API using `auth_token`.
///
/// Returns null if `auth_token` is null or not UTF-8.
/// The caller must free the returned pointer with `ynab_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_client_new(auth_token: *const c_char) -> *mut FfiYnabClient {
    catch_unwind(|| match unsafe { borrow_str(auth_token) } {
        Some(token) => Box::into_raw(Box::new(FfiYnabClient {
            inner: YnabClient::new(token),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client that targets `base_url` instead of the public API.
///
/// Returns null if either argument is null or not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_client_new_with_base_url(
    auth_token: *const c_char,
    base_url: *const c_char,
) -> *mut FfiYnabClient {
    catch_unwind(|| {
        let (Some(token), Some(url)) = (unsafe { borrow_str(auth_token) }, unsafe {
            borrow_str(base_url)
        }) else {
            return std::ptr::null_mut();
        };
        Box::into_raw(Box::new(FfiYnabClient {
            inner: YnabClient::with_base_url(token, url),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `ynab_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_client_free(client: *mut FfiYnabClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the HTTP request for the operation described by `endpoint_json`.
///
/// Returns null if an argument is null or `endpoint_json` does not name a
/// known operation with its parameters.
/// The caller must free the returned pointer with `ynab_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_build_request(
    client: *const FfiYnabClient,
    endpoint_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(json) = (unsafe { borrow_str(endpoint_json) }) else {
            return std::ptr::null_mut();
        };
        match parse_endpoint(json).and_then(|endpoint| client.inner.build(&endpoint)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request for an arbitrary `path` relative to the base URL.
///
/// `method` is an `FfiHttpMethod` discriminant. `body_json` may be null for a
/// request without a body. Returns null if `client` or `path` is null, the
/// method is unknown, or `body_json` is not valid JSON.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_build_raw_request(
    client: *const FfiYnabClient,
    method: u32,
    path: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(method), Some(path)) = (method_from_raw(method), unsafe { borrow_str(path) })
        else {
            return std::ptr::null_mut();
        };
        let body: Option<Value> = if body_json.is_null() {
            None
        } else {
            match unsafe { borrow_str(body_json) }.and_then(|s| serde_json::from_str(s).ok()) {
                Some(value) => Some(value),
                None => return std::ptr::null_mut(),
            }
        };
        match client.inner.build_request(method, path, body.as_ref()) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body is read as the empty string. Invalid UTF-8 is replaced with
/// U+FFFD so an error body still reaches the caller.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    if resp.body.is_null() {
        return HttpResponse::new(resp.status, "");
    }
    let body = unsafe { CStr::from_ptr(resp.body) }.to_string_lossy();
    HttpResponse::new(resp.status, body)
}

/// Parse the response to the operation described by `endpoint_json`,
/// returning the operation's unwrapped result.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_parse_response(
    client: *const FfiYnabClient,
    endpoint_json: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiYnabResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiYnabResult::null_arg("client");
        }
        if response.is_null() {
            return FfiYnabResult::null_arg("response");
        }
        let Some(json) = (unsafe { borrow_str(endpoint_json) }) else {
            return FfiYnabResult::null_arg("endpoint_json");
        };
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match parse_endpoint(json).and_then(|endpoint| client.inner.parse(&endpoint, core_resp)) {
            Ok(data) => FfiYnabResult::ok(&data),
            Err(e) => FfiYnabResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiYnabResult::panic("panic in ynab_parse_response"))
}

/// Parse a response to a raw request, returning the whole `data` object.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_parse_data(
    client: *const FfiYnabClient,
    response: *const FfiHttpResponse,
) -> *mut FfiYnabResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiYnabResult::null_arg("client");
        }
        if response.is_null() {
            return FfiYnabResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let core_resp = ffi_response_to_core(unsafe { &*response });
        match client.inner.parse_data(core_resp) {
            Ok(data) => FfiYnabResult::ok(&data),
            Err(e) => FfiYnabResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiYnabResult::panic("panic in ynab_parse_data"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `ynab_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiYnabResult` returned by any `ynab_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_free_result(result: *mut FfiYnabResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data_json.is_null() {
            drop(unsafe { CString::from_raw(result.data_json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ynab_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
