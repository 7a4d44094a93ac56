//! Client core for the YNAB v1 REST API.
//!
//! # Overview
//! `YnabClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `BlockingClient`
//! pairs it with a `Transport` to give one blocking method per remote
//! resource, plus a bounded concurrent bulk transaction update.
//!
//! # Design
//! - `YnabClient` is immutable after construction: it holds the bearer token
//!   and base URL only.
//! - Every operation is an `Endpoint` variant that knows its verb, path, body
//!   and envelope unwrap rule, so the blocking client, the FFI crate and the
//!   test vectors share one table.
//! - Payloads are `serde_json::Value`; the client does no schema validation.
//! - Any non-2xx status is `ApiError::Request`. No retries.

pub mod blocking;
mod bulk;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod progress;
pub mod rate_limit;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use blocking::BlockingClient;
pub use client::{YnabClient, DEFAULT_BASE_URL};
pub use config::{ClientConfig, RateLimitConfig};
pub use endpoint::{Endpoint, Unwrap};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use progress::{ConsoleProgress, NoProgress, Progress};
pub use rate_limit::{RateLimiter, SlidingWindow, Unlimited};
pub use transport::{Transport, UreqTransport};
pub use types::ErrorDetail;
