//! In-memory stand-in for the YNAB v1 API.
//!
//! Serves the seeded fixtures in `fixtures` behind bearer-token auth, using
//! the real API's `{"data": ...}` success envelope and
//! `{"error": {"id", "name", "detail"}}` failure body.

pub mod fixtures;
pub mod model;

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

use model::{
    Account, BudgetSettings, BudgetSummary, Category, CategoryGroup, MonthCategoryBody, Month,
    Payee, SaveTransactions, Transaction, TransactionBody, User,
};

pub const DEFAULT_TOKEN: &str = "mock-token";

pub struct Budget {
    pub summary: BudgetSummary,
    pub settings: BudgetSettings,
    pub accounts: Vec<Account>,
    pub category_groups: Vec<CategoryGroup>,
    pub payees: Vec<Payee>,
    pub months: Vec<Month>,
    pub transactions: Vec<Transaction>,
}

impl Budget {
    fn category(&self, id: &str) -> Option<&Category> {
        self.category_groups
            .iter()
            .flat_map(|group| group.categories.iter())
            .find(|category| category.id == id)
    }

    fn month(&self, month: &str) -> Option<&Month> {
        if month == "current" {
            return self.months.last();
        }
        self.months.iter().find(|m| m.month == month)
    }

    fn month_mut(&mut self, month: &str) -> Option<&mut Month> {
        if month == "current" {
            return self.months.last_mut();
        }
        self.months.iter_mut().find(|m| m.month == month)
    }

    fn transactions_where(&self, keep: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        self.transactions.iter().filter(|tx| keep(tx)).cloned().collect()
    }
}

pub struct Store {
    pub user: User,
    pub budgets: Vec<Budget>,
    pub server_knowledge: u64,
}

impl Store {
    fn budget(&self, id: &str) -> Result<&Budget, ApiFailure> {
        self.budgets
            .iter()
            .find(|b| b.summary.id == id)
            .ok_or_else(ApiFailure::not_found)
    }

    fn budget_mut(&mut self, id: &str) -> Result<&mut Budget, ApiFailure> {
        self.budgets
            .iter_mut()
            .find(|b| b.summary.id == id)
            .ok_or_else(ApiFailure::not_found)
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    db: Db,
}

/// A failed request, rendered as YNAB's error body.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    id: &'static str,
    name: &'static str,
    detail: String,
}

impl ApiFailure {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            id: "404.2",
            name: "resource_not_found",
            detail: "Resource not found".to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            id: "401",
            name: "unauthorized",
            detail: "Unauthorized".to_string(),
        }
    }

    fn bad_request(detail: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            id: "400",
            name: "bad_request",
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "error": { "id": self.id, "name": self.name, "detail": self.detail }
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

fn data(value: Value) -> Json<Value> {
    Json(json!({ "data": value }))
}

/// Router over the seeded fixtures, accepting `DEFAULT_TOKEN`.
pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(fixtures::seed())),
    };
    Router::new()
        .route("/v1/user", get(get_user))
        .route("/v1/budgets", get(list_budgets))
        .route("/v1/budgets/{budget_id}", get(get_budget))
        .route("/v1/budgets/{budget_id}/settings", get(get_budget_settings))
        .route("/v1/budgets/{budget_id}/accounts", get(list_accounts))
        .route("/v1/budgets/{budget_id}/accounts/{account_id}", get(get_account))
        .route(
            "/v1/budgets/{budget_id}/accounts/{account_id}/transactions",
            get(list_account_transactions),
        )
        .route("/v1/budgets/{budget_id}/categories", get(list_categories))
        .route("/v1/budgets/{budget_id}/categories/{category_id}", get(get_category))
        .route(
            "/v1/budgets/{budget_id}/categories/{category_id}/transactions",
            get(list_category_transactions),
        )
        .route("/v1/budgets/{budget_id}/payees", get(list_payees))
        .route("/v1/budgets/{budget_id}/payees/{payee_id}", get(get_payee))
        .route(
            "/v1/budgets/{budget_id}/payees/{payee_id}/transactions",
            get(list_payee_transactions),
        )
        .route("/v1/budgets/{budget_id}/months", get(list_months))
        .route("/v1/budgets/{budget_id}/months/{month}", get(get_month))
        .route(
            "/v1/budgets/{budget_id}/months/{month}/categories/{category_id}",
            get(get_month_category).patch(update_month_category),
        )
        .route(
            "/v1/budgets/{budget_id}/transactions",
            get(list_transactions).post(create_transactions),
        )
        .route(
            "/v1/budgets/{budget_id}/transactions/{transaction_id}",
            get(get_transaction).put(update_transaction),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return ApiFailure::unauthorized().into_response();
    }
    next.run(request).await
}

// --- user & budgets ---

async fn get_user(State(state): State<AppState>) -> ApiResult {
    let store = state.db.read().await;
    Ok(data(json!({ "user": store.user })))
}

async fn list_budgets(State(state): State<AppState>) -> ApiResult {
    let store = state.db.read().await;
    let budgets: Vec<&BudgetSummary> = store.budgets.iter().map(|b| &b.summary).collect();
    Ok(data(json!({ "budgets": budgets, "default_budget": null })))
}

async fn get_budget(State(state): State<AppState>, Path(budget_id): Path<String>) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let categories: Vec<&Category> = budget
        .category_groups
        .iter()
        .flat_map(|group| group.categories.iter())
        .collect();
    let export = json!({
        "id": budget.summary.id,
        "name": budget.summary.name,
        "last_modified_on": budget.summary.last_modified_on,
        "first_month": budget.summary.first_month,
        "last_month": budget.summary.last_month,
        "date_format": budget.settings.date_format,
        "currency_format": budget.settings.currency_format,
        "accounts": budget.accounts,
        "payees": budget.payees,
        "category_groups": budget.category_groups,
        "categories": categories,
        "months": budget.months,
        "transactions": budget.transactions,
    });
    Ok(data(json!({ "budget": export, "server_knowledge": store.server_knowledge })))
}

async fn get_budget_settings(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    Ok(data(json!({ "settings": budget.settings })))
}

// --- accounts ---

async fn list_accounts(State(state): State<AppState>, Path(budget_id): Path<String>) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    Ok(data(json!({ "accounts": budget.accounts, "server_knowledge": store.server_knowledge })))
}

async fn get_account(
    State(state): State<AppState>,
    Path((budget_id, account_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let account = budget
        .accounts
        .iter()
        .find(|a| a.id == account_id)
        .ok_or_else(ApiFailure::not_found)?;
    Ok(data(json!({ "account": account })))
}

async fn list_account_transactions(
    State(state): State<AppState>,
    Path((budget_id, account_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    if !budget.accounts.iter().any(|a| a.id == account_id) {
        return Err(ApiFailure::not_found());
    }
    let transactions = budget.transactions_where(|tx| tx.account_id == account_id);
    Ok(data(json!({ "transactions": transactions, "server_knowledge": store.server_knowledge })))
}

// --- categories ---

async fn list_categories(State(state): State<AppState>, Path(budget_id): Path<String>) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    Ok(data(json!({
        "category_groups": budget.category_groups,
        "server_knowledge": store.server_knowledge,
    })))
}

async fn get_category(
    State(state): State<AppState>,
    Path((budget_id, category_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let category = budget.category(&category_id).ok_or_else(ApiFailure::not_found)?;
    Ok(data(json!({ "category": category })))
}

async fn list_category_transactions(
    State(state): State<AppState>,
    Path((budget_id, category_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    if budget.category(&category_id).is_none() {
        return Err(ApiFailure::not_found());
    }
    let transactions =
        budget.transactions_where(|tx| tx.category_id.as_deref() == Some(category_id.as_str()));
    Ok(data(json!({ "transactions": transactions, "server_knowledge": store.server_knowledge })))
}

// --- payees ---

async fn list_payees(State(state): State<AppState>, Path(budget_id): Path<String>) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    Ok(data(json!({ "payees": budget.payees, "server_knowledge": store.server_knowledge })))
}

async fn get_payee(
    State(state): State<AppState>,
    Path((budget_id, payee_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let payee = budget
        .payees
        .iter()
        .find(|p| p.id == payee_id)
        .ok_or_else(ApiFailure::not_found)?;
    Ok(data(json!({ "payee": payee })))
}

async fn list_payee_transactions(
    State(state): State<AppState>,
    Path((budget_id, payee_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    if !budget.payees.iter().any(|p| p.id == payee_id) {
        return Err(ApiFailure::not_found());
    }
    let transactions =
        budget.transactions_where(|tx| tx.payee_id.as_deref() == Some(payee_id.as_str()));
    Ok(data(json!({ "transactions": transactions, "server_knowledge": store.server_knowledge })))
}

// --- months ---

async fn list_months(State(state): State<AppState>, Path(budget_id): Path<String>) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let months: Vec<Value> = budget
        .months
        .iter()
        .map(|m| {
            json!({
                "month": m.month,
                "income": m.income,
                "budgeted": m.budgeted,
                "activity": m.activity,
                "to_be_budgeted": m.to_be_budgeted,
                "deleted": m.deleted,
            })
        })
        .collect();
    Ok(data(json!({ "months": months, "server_knowledge": store.server_knowledge })))
}

async fn get_month(
    State(state): State<AppState>,
    Path((budget_id, month)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let month = budget.month(&month).ok_or_else(ApiFailure::not_found)?;
    Ok(data(json!({ "month": month })))
}

async fn get_month_category(
    State(state): State<AppState>,
    Path((budget_id, month, category_id)): Path<(String, String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let category = budget
        .month(&month)
        .and_then(|m| m.categories.iter().find(|c| c.id == category_id))
        .ok_or_else(ApiFailure::not_found)?;
    Ok(data(json!({ "category": category })))
}

async fn update_month_category(
    State(state): State<AppState>,
    Path((budget_id, month, category_id)): Path<(String, String, String)>,
    Json(input): Json<MonthCategoryBody>,
) -> ApiResult {
    let mut store = state.db.write().await;
    let server_knowledge = store.server_knowledge + 1;
    let budget = store.budget_mut(&budget_id)?;
    let month = budget.month_mut(&month).ok_or_else(ApiFailure::not_found)?;
    let category = month
        .categories
        .iter_mut()
        .find(|c| c.id == category_id)
        .ok_or_else(ApiFailure::not_found)?;

    let delta = input.month_category.budgeted - category.budgeted;
    category.budgeted = input.month_category.budgeted;
    category.balance += delta;
    let updated = category.clone();
    month.budgeted += delta;
    month.to_be_budgeted -= delta;
    store.server_knowledge = server_knowledge;

    info!(category_id = %category_id, budgeted = updated.budgeted, "month category updated");
    Ok(data(json!({ "category": updated, "server_knowledge": server_knowledge })))
}

// --- transactions ---

async fn list_transactions(State(state): State<AppState>, Path(budget_id): Path<String>) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    Ok(data(json!({
        "transactions": budget.transactions,
        "server_knowledge": store.server_knowledge,
    })))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path((budget_id, transaction_id)): Path<(String, String)>,
) -> ApiResult {
    let store = state.db.read().await;
    let budget = store.budget(&budget_id)?;
    let transaction = budget
        .transactions
        .iter()
        .find(|tx| tx.id == transaction_id)
        .ok_or_else(ApiFailure::not_found)?;
    Ok(data(json!({ "transaction": transaction })))
}

async fn update_transaction(
    State(state): State<AppState>,
    Path((budget_id, transaction_id)): Path<(String, String)>,
    Json(input): Json<TransactionBody>,
) -> ApiResult {
    let mut store = state.db.write().await;
    let budget = store.budget_mut(&budget_id)?;
    let transaction = budget
        .transactions
        .iter_mut()
        .find(|tx| tx.id == transaction_id)
        .ok_or_else(ApiFailure::not_found)?;
    transaction.apply(input.transaction);
    let updated = transaction.clone();
    store.server_knowledge += 1;

    info!(transaction_id = %transaction_id, "transaction updated");
    Ok(data(json!({ "transaction": updated, "server_knowledge": store.server_knowledge })))
}

async fn create_transactions(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Json(input): Json<SaveTransactions>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let (single, new_transactions) = match (input.transaction, input.transactions) {
        (Some(one), None) => (true, vec![one]),
        (None, Some(many)) => (false, many),
        _ => {
            return Err(ApiFailure::bad_request(
                "provide either 'transaction' or 'transactions'",
            ))
        }
    };

    let mut store = state.db.write().await;
    let budget = store.budget_mut(&budget_id)?;
    if let Some(missing) = new_transactions
        .iter()
        .find(|tx| !budget.accounts.iter().any(|a| a.id == tx.account_id))
    {
        return Err(ApiFailure::bad_request(&format!(
            "account {} does not exist",
            missing.account_id
        )));
    }

    let created: Vec<Transaction> = new_transactions
        .into_iter()
        .map(|tx| Transaction {
            id: Uuid::new_v4().to_string(),
            date: tx.date,
            amount: tx.amount,
            memo: tx.memo,
            cleared: tx.cleared,
            approved: tx.approved,
            flag_color: tx.flag_color,
            account_id: tx.account_id,
            payee_id: tx.payee_id,
            category_id: tx.category_id,
            deleted: false,
        })
        .collect();
    budget.transactions.extend(created.iter().cloned());
    store.server_knowledge += 1;

    let ids: Vec<&str> = created.iter().map(|tx| tx.id.as_str()).collect();
    info!(count = created.len(), "transactions created");
    let mut payload = json!({
        "transaction_ids": ids,
        "duplicate_import_ids": [],
        "server_knowledge": store.server_knowledge,
    });
    if single {
        payload["transaction"] = json!(created[0]);
    } else {
        payload["transactions"] = json!(created);
    }
    Ok((StatusCode::CREATED, data(payload)))
}
