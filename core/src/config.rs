//! Caller-supplied client configuration.
//!
//! The library reads no files and no environment variables; embedders build a
//! `ClientConfig` directly or deserialize it from their own settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_BASE_URL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound on in-flight requests during a bulk update.
    pub max_concurrency: usize,
    /// Whole-request timeout. `None` leaves the transport default.
    pub timeout_secs: Option<u64>,
    /// Largest response body accepted. `None` reads bodies of any size.
    pub max_response_bytes: Option<u64>,
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrency: 4,
            timeout_secs: None,
            max_response_bytes: None,
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

/// At most `max_requests` requests in any trailing window of `window_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// YNAB allows 200 requests per hour per access token.
    pub fn ynab() -> Self {
        Self {
            max_requests: 200,
            window_secs: 60 * 60,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
