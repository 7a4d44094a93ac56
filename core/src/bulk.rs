//! Concurrent update of many transactions.
//!
//! # Design
//! All requests are built up front, then a bounded pool of scoped worker
//! threads pulls them in submission order. Results are collected in
//! completion order on the calling thread, which is also the only thread that
//! talks to the `Progress` reporter. A failing worker stops further
//! dispatch; requests already in flight run to completion and their results
//! are discarded.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::YnabClient;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::progress::Progress;
use crate::rate_limit::RateLimiter;
use crate::transport::Transport;

pub(crate) struct BulkUpdate<'a, T: ?Sized> {
    pub client: &'a YnabClient,
    pub transport: &'a T,
    pub limiter: &'a dyn RateLimiter,
    pub max_concurrency: usize,
}

impl<T> BulkUpdate<'_, T>
where
    T: Transport + ?Sized,
{
    /// Returns the number of submitted updates once every one has succeeded.
    pub fn run<P>(
        &self,
        budget_id: &str,
        updates: Vec<(String, Value)>,
        progress: &P,
    ) -> Result<usize, ApiError>
    where
        P: Progress + ?Sized,
    {
        let jobs = updates
            .into_iter()
            .map(|(transaction_id, transaction)| {
                let endpoint = Endpoint::UpdateTransaction {
                    budget_id: budget_id.to_string(),
                    transaction_id: transaction_id.clone(),
                    transaction,
                };
                self.client.build(&endpoint).map(|request| (transaction_id, request))
            })
            .collect::<Result<Vec<(String, HttpRequest)>, ApiError>>()?;

        let total = jobs.len();
        if total == 0 {
            return Ok(0);
        }
        let workers = self.max_concurrency.max(1).min(total);
        info!(budget_id, total, workers, "starting bulk transaction update");
        progress.remaining(total);

        let next = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<(usize, Result<(), ApiError>)>();

        let (remaining, first_error) = thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let (jobs, next, abort) = (&jobs, &next, &abort);
                scope.spawn(move || loop {
                    if abort.load(Ordering::Acquire) {
                        break;
                    }
                    let index = next.fetch_add(1, Ordering::AcqRel);
                    let Some((transaction_id, request)) = jobs.get(index) else {
                        break;
                    };
                    self.limiter.acquire();
                    debug!(transaction_id = %transaction_id, "sending transaction update");
                    let result = self
                        .transport
                        .execute(request)
                        .and_then(|response| self.client.parse_data(response))
                        .map(|_| ());
                    if result.is_err() {
                        abort.store(true, Ordering::Release);
                    }
                    if tx.send((index, result)).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            let mut remaining = total;
            let mut first_error = None;
            for (index, result) in rx {
                match result {
                    Ok(()) if first_error.is_none() => {
                        remaining -= 1;
                        progress.remaining(remaining);
                    }
                    Ok(()) => {}
                    Err(err) => {
                        if first_error.is_none() {
                            first_error = Some(ApiError::TransactionUpdate {
                                transaction_id: jobs[index].0.clone(),
                                source: Box::new(err),
                            });
                        }
                    }
                }
            }
            (remaining, first_error)
        });
        progress.finished(total - remaining);

        if let Some(err) = first_error {
            warn!(budget_id, total, error = %err, "bulk transaction update aborted");
            return Err(err);
        }
        info!(budget_id, total, "bulk transaction update finished");
        Ok(total)
    }
}
