//! Wire-level shapes shared by request building and response parsing.
//!
//! # Design
//! Resource payloads stay `serde_json::Value`: the client passes them through
//! without schema validation. Only the envelope wrappers the client itself
//! produces or inspects get concrete types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `PUT /budgets/{b}/transactions/{t}`.
#[derive(Debug, Serialize)]
pub struct TransactionBody<'a> {
    pub transaction: &'a Value,
}

/// Body of `PATCH /budgets/{b}/months/{m}/categories/{c}`.
#[derive(Debug, Serialize)]
pub struct MonthCategoryBody<'a> {
    pub month_category: &'a Value,
}

/// The `error` object of a failed YNAB response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}
