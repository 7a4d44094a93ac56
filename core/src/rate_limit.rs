//! Client-side request throttling.
//!
//! `BlockingClient` calls `RateLimiter::acquire` before every request it
//! sends, including each worker request of a bulk update.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::RateLimitConfig;

pub trait RateLimiter: Send + Sync {
    /// Block until one more request may be sent.
    fn acquire(&self);
}

/// Never blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn acquire(&self) {}
}

/// Allows at most `max_requests` acquisitions in any trailing `window`.
#[derive(Debug)]
pub struct SlidingWindow {
    max_requests: usize,
    window: Duration,
    sent: Mutex<VecDeque<Instant>>,
}

impl SlidingWindow {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            sent: Mutex::new(VecDeque::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    /// Record a send if a slot is free, otherwise return how long to wait.
    fn try_acquire(&self, now: Instant) -> Result<(), Duration> {
        let mut sent = self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        while let Some(&oldest) = sent.front() {
            if now.duration_since(oldest) >= self.window {
                sent.pop_front();
            } else {
                break;
            }
        }
        let oldest = sent.front().copied();
        match oldest {
            Some(oldest) if sent.len() >= self.max_requests => {
                Err(self.window.saturating_sub(now.duration_since(oldest)))
            }
            _ => {
                sent.push_back(now);
                Ok(())
            }
        }
    }
}

impl RateLimiter for SlidingWindow {
    fn acquire(&self) {
        loop {
            match self.try_acquire(Instant::now()) {
                Ok(()) => return,
                Err(wait) => {
                    debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
                    std::thread::sleep(wait);
                }
            }
        }
    }
}
