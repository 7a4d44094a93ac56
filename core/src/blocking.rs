//! Blocking YNAB client: `YnabClient` plus a `Transport` that performs the I/O.
//!
//! One method per remote resource. Each builds the request, waits for the
//! rate limiter, executes it, then checks the status and unwraps the envelope.

use serde_json::Value;
use tracing::{debug, warn};

use crate::bulk::BulkUpdate;
use crate::client::YnabClient;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::progress::Progress;
use crate::rate_limit::{RateLimiter, SlidingWindow, Unlimited};
use crate::transport::{Transport, UreqTransport};

pub struct BlockingClient<T = UreqTransport> {
    client: YnabClient,
    transport: T,
    limiter: Box<dyn RateLimiter>,
    max_concurrency: usize,
}

impl BlockingClient<UreqTransport> {
    /// Client for the public YNAB API with default settings. Performs no I/O.
    pub fn new(auth_token: &str) -> Self {
        Self::from_config(auth_token, &ClientConfig::default())
    }

    pub fn from_config(auth_token: &str, config: &ClientConfig) -> Self {
        let client = YnabClient::with_base_url(auth_token, &config.base_url);
        let transport =
            UreqTransport::new(config.timeout()).with_max_response_bytes(config.max_response_bytes);
        Self::with_transport(client, transport, config)
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn with_transport(client: YnabClient, transport: T, config: &ClientConfig) -> Self {
        let limiter: Box<dyn RateLimiter> = match &config.rate_limit {
            Some(rate_limit) => Box::new(SlidingWindow::from_config(rate_limit)),
            None => Box::new(Unlimited),
        };
        Self {
            client,
            transport,
            limiter,
            max_concurrency: config.concurrency(),
        }
    }

    /// Replace the limiter chosen from the config.
    pub fn with_rate_limiter(mut self, limiter: impl RateLimiter + 'static) -> Self {
        self.limiter = Box::new(limiter);
        self
    }

    pub fn client(&self) -> &YnabClient {
        &self.client
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.limiter.acquire();
        debug!(method = %request.method, url = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        if !response.is_success() {
            warn!(
                method = %request.method,
                url = %request.path,
                status = response.status,
                "request failed"
            );
        }
        Ok(response)
    }

    fn send(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = self.client.build_request(method, path, body)?;
        let response = self.execute(&request)?;
        self.client.parse_data(response)
    }

    /// GET `path` and return the `data` envelope contents.
    pub fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(HttpMethod::Get, path, None)
    }

    pub fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(HttpMethod::Put, path, Some(body))
    }

    pub fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(HttpMethod::Patch, path, Some(body))
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(HttpMethod::Post, path, Some(body))
    }

    /// Execute one endpoint and apply its unwrap rule.
    pub fn call(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let request = self.client.build(endpoint)?;
        let response = self.execute(&request)?;
        self.client.parse(endpoint, response)
    }

    // User

    pub fn user(&self) -> Result<Value, ApiError> {
        self.call(&Endpoint::User)
    }

    // Budgets

    pub fn budgets(&self) -> Result<Value, ApiError> {
        self.call(&Endpoint::Budgets)
    }

    /// Full budget export with all related entities.
    pub fn budget(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Budget {
            budget_id: budget_id.to_string(),
        })
    }

    /// Returns the whole `data` object (`{"settings": {...}}`).
    pub fn budget_settings(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::BudgetSettings {
            budget_id: budget_id.to_string(),
        })
    }

    // Accounts

    pub fn accounts(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Accounts {
            budget_id: budget_id.to_string(),
        })
    }

    pub fn account(&self, budget_id: &str, account_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Account {
            budget_id: budget_id.to_string(),
            account_id: account_id.to_string(),
        })
    }

    // Categories

    /// Category groups with their categories, amounts for the current month.
    pub fn categories(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Categories {
            budget_id: budget_id.to_string(),
        })
    }

    pub fn category(&self, budget_id: &str, category_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Category {
            budget_id: budget_id.to_string(),
            category_id: category_id.to_string(),
        })
    }

    pub fn category_month(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
    ) -> Result<Value, ApiError> {
        self.call(&Endpoint::CategoryMonth {
            budget_id: budget_id.to_string(),
            month: month.to_string(),
            category_id: category_id.to_string(),
        })
    }

    pub fn update_category_month(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
        month_category: Value,
    ) -> Result<Value, ApiError> {
        self.call(&Endpoint::UpdateCategoryMonth {
            budget_id: budget_id.to_string(),
            month: month.to_string(),
            category_id: category_id.to_string(),
            month_category,
        })
    }

    // Payees

    pub fn payee(&self, budget_id: &str, payee_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Payee {
            budget_id: budget_id.to_string(),
            payee_id: payee_id.to_string(),
        })
    }

    pub fn payees(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Payees {
            budget_id: budget_id.to_string(),
        })
    }

    // Months

    pub fn months(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Months {
            budget_id: budget_id.to_string(),
        })
    }

    pub fn month(&self, budget_id: &str, month: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Month {
            budget_id: budget_id.to_string(),
            month: month.to_string(),
        })
    }

    // Transactions

    pub fn transactions(&self, budget_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Transactions {
            budget_id: budget_id.to_string(),
        })
    }

    /// POST `transactions` unchanged. A body holding `transaction` creates one
    /// transaction, a body holding `transactions` creates several. Returns the
    /// whole `data` object.
    pub fn add_transactions(&self, budget_id: &str, transactions: Value) -> Result<Value, ApiError> {
        self.call(&Endpoint::AddTransactions {
            budget_id: budget_id.to_string(),
            transactions,
        })
    }

    pub fn account_transactions(&self, budget_id: &str, account_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::AccountTransactions {
            budget_id: budget_id.to_string(),
            account_id: account_id.to_string(),
        })
    }

    pub fn category_transactions(
        &self,
        budget_id: &str,
        category_id: &str,
    ) -> Result<Value, ApiError> {
        self.call(&Endpoint::CategoryTransactions {
            budget_id: budget_id.to_string(),
            category_id: category_id.to_string(),
        })
    }

    pub fn payee_transactions(&self, budget_id: &str, payee_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::PayeeTransactions {
            budget_id: budget_id.to_string(),
            payee_id: payee_id.to_string(),
        })
    }

    pub fn transaction(&self, budget_id: &str, transaction_id: &str) -> Result<Value, ApiError> {
        self.call(&Endpoint::Transaction {
            budget_id: budget_id.to_string(),
            transaction_id: transaction_id.to_string(),
        })
    }

    pub fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        transaction: Value,
    ) -> Result<Value, ApiError> {
        self.call(&Endpoint::UpdateTransaction {
            budget_id: budget_id.to_string(),
            transaction_id: transaction_id.to_string(),
            transaction,
        })
    }

    /// Update many transactions concurrently.
    ///
    /// `updates` pairs a transaction id with its partial update, for example
    /// `("tx-1", json!({"payee_id": "new-payee"}))`. At most
    /// `max_concurrency` requests are in flight. `progress` hears the number of
    /// updates still outstanding, counted in completion order. Returns the
    /// number of updates submitted; the first failure aborts with
    /// `ApiError::TransactionUpdate`.
    pub fn update_transactions<I, K, P>(
        &self,
        budget_id: &str,
        updates: I,
        progress: &P,
    ) -> Result<usize, ApiError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
        P: Progress + ?Sized,
    {
        let updates = updates
            .into_iter()
            .map(|(id, update)| (id.into(), update))
            .collect();
        BulkUpdate {
            client: &self.client,
            transport: &self.transport,
            limiter: self.limiter.as_ref(),
            max_concurrency: self.max_concurrency,
        }
        .run(budget_id, updates, progress)
    }
}
