//! Error types for the YNAB client.
//!
//! # Design
//! Every non-2xx response is a single `Request` variant carrying the raw
//! status and body; 401, 404 and 429 are not split into their own variants.
//! The helper methods classify a `Request` error without the caller having to
//! match on status codes.

use thiserror::Error;

use crate::types::{ErrorDetail, ErrorEnvelope};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("request failed with HTTP {status}: {body}")]
    Request { status: u16, body: String },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body (or an endpoint description) was not the expected JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A key expected in the response envelope was absent.
    #[error("response is missing field `{0}`")]
    MissingField(String),

    /// One update of a bulk transaction update failed.
    #[error("updating transaction {transaction_id} failed: {source}")]
    TransactionUpdate {
        transaction_id: String,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// HTTP status of the failed request, looking through bulk-update wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::TransactionUpdate { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Decode the `{"error": {...}}` body YNAB sends with failed requests.
    pub fn error_detail(&self) -> Option<ErrorDetail> {
        match self {
            ApiError::Request { body, .. } => serde_json::from_str::<ErrorEnvelope>(body)
                .ok()
                .map(|envelope| envelope.error),
            ApiError::TransactionUpdate { source, .. } => source.error_detail(),
            _ => None,
        }
    }
}
