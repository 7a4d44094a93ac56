//! One variant per YNAB operation the client exposes.
//!
//! # Design
//! Each `Endpoint` knows its verb, resource path, request body and how to
//! unwrap the response envelope, so request building and response parsing
//! share one source of truth. The enum is serde-tagged by `operation` so the
//! FFI layer and the JSON test vectors can describe a call as plain data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{MonthCategoryBody, TransactionBody};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Endpoint {
    User,
    Budgets,
    Budget {
        budget_id: String,
    },
    BudgetSettings {
        budget_id: String,
    },
    Accounts {
        budget_id: String,
    },
    Account {
        budget_id: String,
        account_id: String,
    },
    Categories {
        budget_id: String,
    },
    Category {
        budget_id: String,
        category_id: String,
    },
    CategoryMonth {
        budget_id: String,
        month: String,
        category_id: String,
    },
    UpdateCategoryMonth {
        budget_id: String,
        month: String,
        category_id: String,
        month_category: Value,
    },
    Payee {
        budget_id: String,
        payee_id: String,
    },
    Payees {
        budget_id: String,
    },
    Months {
        budget_id: String,
    },
    Month {
        budget_id: String,
        month: String,
    },
    Transactions {
        budget_id: String,
    },
    AddTransactions {
        budget_id: String,
        transactions: Value,
    },
    AccountTransactions {
        budget_id: String,
        account_id: String,
    },
    CategoryTransactions {
        budget_id: String,
        category_id: String,
    },
    PayeeTransactions {
        budget_id: String,
        payee_id: String,
    },
    Transaction {
        budget_id: String,
        transaction_id: String,
    },
    UpdateTransaction {
        budget_id: String,
        transaction_id: String,
        transaction: Value,
    },
}

/// How the value under `data` is reduced to the operation's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unwrap {
    /// Return `data` itself.
    Data,
    /// Return `data[key]`.
    Key(&'static str),
    /// Return `data[primary]`, or `data[fallback]` when `primary` is absent.
    KeyOr(&'static str, &'static str),
}

impl Unwrap {
    pub fn apply(self, mut data: Value) -> Result<Value, ApiError> {
        match self {
            Unwrap::Data => Ok(data),
            Unwrap::Key(key) => take_field(&mut data, key),
            Unwrap::KeyOr(primary, fallback) => {
                if data.get(primary).is_some() {
                    take_field(&mut data, primary)
                } else {
                    take_field(&mut data, fallback).map_err(|_| ApiError::MissingField(primary.to_string()))
                }
            }
        }
    }
}

pub(crate) fn take_field(value: &mut Value, key: &str) -> Result<Value, ApiError> {
    value
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::MissingField(key.to_string()))
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::User => "user",
            Endpoint::Budgets => "budgets",
            Endpoint::Budget { .. } => "budget",
            Endpoint::BudgetSettings { .. } => "budget_settings",
            Endpoint::Accounts { .. } => "accounts",
            Endpoint::Account { .. } => "account",
            Endpoint::Categories { .. } => "categories",
            Endpoint::Category { .. } => "category",
            Endpoint::CategoryMonth { .. } => "category_month",
            Endpoint::UpdateCategoryMonth { .. } => "update_category_month",
            Endpoint::Payee { .. } => "payee",
            Endpoint::Payees { .. } => "payees",
            Endpoint::Months { .. } => "months",
            Endpoint::Month { .. } => "month",
            Endpoint::Transactions { .. } => "transactions",
            Endpoint::AddTransactions { .. } => "add_transactions",
            Endpoint::AccountTransactions { .. } => "account_transactions",
            Endpoint::CategoryTransactions { .. } => "category_transactions",
            Endpoint::PayeeTransactions { .. } => "payee_transactions",
            Endpoint::Transaction { .. } => "transaction",
            Endpoint::UpdateTransaction { .. } => "update_transaction",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::UpdateCategoryMonth { .. } => HttpMethod::Patch,
            Endpoint::AddTransactions { .. } => HttpMethod::Post,
            Endpoint::UpdateTransaction { .. } => HttpMethod::Put,
            _ => HttpMethod::Get,
        }
    }

    /// Resource path relative to the base URL. Identifiers are not escaped.
    pub fn path(&self) -> String {
        match self {
            Endpoint::User => "/user".to_string(),
            Endpoint::Budgets => "/budgets".to_string(),
            Endpoint::Budget { budget_id } => format!("/budgets/{budget_id}"),
            Endpoint::BudgetSettings { budget_id } => format!("/budgets/{budget_id}/settings"),
            Endpoint::Accounts { budget_id } => format!("/budgets/{budget_id}/accounts"),
            Endpoint::Account {
                budget_id,
                account_id,
            } => format!("/budgets/{budget_id}/accounts/{account_id}"),
            Endpoint::Categories { budget_id } => format!("/budgets/{budget_id}/categories"),
            Endpoint::Category {
                budget_id,
                category_id,
            } => format!("/budgets/{budget_id}/categories/{category_id}"),
            Endpoint::CategoryMonth {
                budget_id,
                month,
                category_id,
            }
            | Endpoint::UpdateCategoryMonth {
                budget_id,
                month,
                category_id,
                ..
            } => format!("/budgets/{budget_id}/months/{month}/categories/{category_id}"),
            Endpoint::Payee {
                budget_id,
                payee_id,
            } => format!("/budgets/{budget_id}/payees/{payee_id}"),
            Endpoint::Payees { budget_id } => format!("/budgets/{budget_id}/payees"),
            Endpoint::Months { budget_id } => format!("/budgets/{budget_id}/months"),
            Endpoint::Month { budget_id, month } => format!("/budgets/{budget_id}/months/{month}"),
            Endpoint::Transactions { budget_id } | Endpoint::AddTransactions { budget_id, .. } => {
                format!("/budgets/{budget_id}/transactions")
            }
            Endpoint::AccountTransactions {
                budget_id,
                account_id,
            } => format!("/budgets/{budget_id}/accounts/{account_id}/transactions"),
            Endpoint::CategoryTransactions {
                budget_id,
                category_id,
            } => format!("/budgets/{budget_id}/categories/{category_id}/transactions"),
            Endpoint::PayeeTransactions {
                budget_id,
                payee_id,
            } => format!("/budgets/{budget_id}/payees/{payee_id}/transactions"),
            Endpoint::Transaction {
                budget_id,
                transaction_id,
            }
            | Endpoint::UpdateTransaction {
                budget_id,
                transaction_id,
                ..
            } => format!("/budgets/{budget_id}/transactions/{transaction_id}"),
        }
    }

    /// JSON request body, if the operation sends one.
    pub fn body(&self) -> Result<Option<Value>, ApiError> {
        let body = match self {
            Endpoint::UpdateCategoryMonth { month_category, .. } => {
                serde_json::to_value(MonthCategoryBody { month_category })
            }
            Endpoint::UpdateTransaction { transaction, .. } => {
                serde_json::to_value(TransactionBody { transaction })
            }
            Endpoint::AddTransactions { transactions, .. } => return Ok(Some(transactions.clone())),
            _ => return Ok(None),
        };
        body.map(Some)
            .map_err(|e| ApiError::SerializationError(e.to_string()))
    }

    pub fn unwrap_rule(&self) -> Unwrap {
        match self {
            Endpoint::User => Unwrap::Key("user"),
            Endpoint::Budgets => Unwrap::Key("budgets"),
            Endpoint::Budget { .. } => Unwrap::Key("budget"),
            Endpoint::BudgetSettings { .. } | Endpoint::AddTransactions { .. } => Unwrap::Data,
            Endpoint::Accounts { .. } => Unwrap::Key("accounts"),
            Endpoint::Account { .. } => Unwrap::KeyOr("accounts", "account"),
            Endpoint::Categories { .. } => Unwrap::Key("category_groups"),
            Endpoint::Category { .. }
            | Endpoint::CategoryMonth { .. }
            | Endpoint::UpdateCategoryMonth { .. } => Unwrap::Key("category"),
            Endpoint::Payee { .. } => Unwrap::Key("payee"),
            Endpoint::Payees { .. } => Unwrap::Key("payees"),
            Endpoint::Months { .. } => Unwrap::Key("months"),
            Endpoint::Month { .. } => Unwrap::Key("month"),
            Endpoint::Transactions { .. }
            | Endpoint::AccountTransactions { .. }
            | Endpoint::CategoryTransactions { .. }
            | Endpoint::PayeeTransactions { .. } => Unwrap::Key("transactions"),
            Endpoint::Transaction { .. } | Endpoint::UpdateTransaction { .. } => {
                Unwrap::Key("transaction")
            }
        }
    }
}
