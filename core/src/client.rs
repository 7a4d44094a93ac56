//! Stateless HTTP request builder and response parser for the YNAB API.
//!
//! # Design
//! `YnabClient` holds only the bearer token and the base URL and carries no
//! mutable state between calls. Building a request and parsing its response
//! are separate steps; the caller (a `Transport`, or a foreign host through
//! FFI) executes the HTTP round-trip in between.

use std::fmt;

use serde_json::Value;

use crate::endpoint::{take_field, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.youneedabudget.com/v1";

#[derive(Clone)]
pub struct YnabClient {
    auth_token: String,
    base_url: String,
}

impl fmt::Debug for YnabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YnabClient")
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl YnabClient {
    pub fn new(auth_token: &str) -> Self {
        Self::with_base_url(auth_token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(auth_token: &str, base_url: &str) -> Self {
        Self {
            auth_token: auth_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (relative to the base URL).
    ///
    /// A present `body` is serialized and sent as `application/json`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![(
            "authorization".to_string(),
            format!("Bearer {}", self.auth_token),
        )];
        let body = match body {
            Some(value) => {
                let encoded = serde_json::to_string(value)
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(encoded)
            }
            None => None,
        };
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    pub fn build(&self, endpoint: &Endpoint) -> Result<HttpRequest, ApiError> {
        let body = endpoint.body()?;
        self.build_request(endpoint.method(), &endpoint.path(), body.as_ref())
    }

    /// Check the status and return the value under the `data` envelope key.
    pub fn parse_data(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        let mut decoded: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        take_field(&mut decoded, "data")
    }

    pub fn parse(&self, endpoint: &Endpoint, response: HttpResponse) -> Result<Value, ApiError> {
        let data = self.parse_data(response)?;
        endpoint.unwrap_rule().apply(data)
    }
}

/// Map any non-2xx status to `ApiError::Request`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Request {
        status: response.status,
        body: response.body.clone(),
    })
}
