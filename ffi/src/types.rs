//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Resource payloads cross the boundary as
//! JSON text, the same way the core keeps them as `serde_json::Value`.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use serde_json::Value;
use ynab_core::{ApiError, HttpMethod};

/// Opaque handle to a `YnabClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiYnabClient {
    pub(crate) inner: ynab_core::YnabClient,
}

/// Copy `s` into a heap C string owned by the caller.
///
/// Interior NUL bytes cannot be represented and are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
        }
    }
}

/// Decode a method discriminant received from C. Unknown values are `None`.
pub(crate) fn method_from_raw(raw: u32) -> Option<HttpMethod> {
    match raw {
        0 => Some(HttpMethod::Get),
        1 => Some(HttpMethod::Post),
        2 => Some(HttpMethod::Put),
        3 => Some(HttpMethod::Patch),
        _ => None,
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `ynab_build_*` functions. The C caller executes the request
/// and passes the response back through `ynab_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: ynab_core::HttpRequest) -> *mut Self {
        let path = into_c_string(req.path);
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `ynab_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiYnabResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Request = 1,
    Transport = 2,
    Deserialization = 3,
    Serialization = 4,
    MissingField = 5,
    Panic = 6,
    NullArg = 7,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data_json`
/// holds the unwrapped payload as JSON text.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` carries the status of a failed
/// request (0 otherwise), and `data_json` is null.
#[repr(C)]
pub struct FfiYnabResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
}

impl FfiYnabResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_json: *mut c_char,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiYnabResult {
            error_code,
            error_message,
            http_status,
            data_json,
        }))
    }

    /// Build a success result carrying `data` as JSON text.
    pub(crate) fn ok(data: &Value) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            into_c_string(data.to_string()),
        )
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::Request { .. } | ApiError::TransactionUpdate { .. } => FfiErrorCode::Request,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
            ApiError::MissingField(_) => FfiErrorCode::MissingField,
        };
        let http_status = err.status().unwrap_or(0);
        Self::boxed(
            error_code,
            into_c_string(err.to_string()),
            http_status,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            into_c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            into_c_string(msg.to_string()),
            0,
            std::ptr::null_mut(),
        )
    }
}
