//! Resource shapes served by the mock, following the YNAB v1 schemas.
//!
//! Amounts are milliunits (`-12500` is -12.50 in the budget currency).

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub id: String,
    pub name: String,
    pub last_modified_on: String,
    pub first_month: String,
    pub last_month: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DateFormat {
    pub format: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub iso_code: String,
    pub decimal_digits: u8,
    pub decimal_separator: String,
    pub group_separator: String,
    pub symbol_first: bool,
    pub currency_symbol: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetSettings {
    pub date_format: DateFormat,
    pub currency_format: CurrencyFormat,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub on_budget: bool,
    pub closed: bool,
    pub balance: i64,
    pub deleted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub category_group_id: String,
    pub name: String,
    pub hidden: bool,
    pub budgeted: i64,
    pub activity: i64,
    pub balance: i64,
    pub deleted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    pub hidden: bool,
    pub deleted: bool,
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payee {
    pub id: String,
    pub name: String,
    pub transfer_account_id: Option<String>,
    pub deleted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Month {
    pub month: String,
    pub income: i64,
    pub budgeted: i64,
    pub activity: i64,
    pub to_be_budgeted: i64,
    pub deleted: bool,
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub amount: i64,
    pub memo: Option<String>,
    pub cleared: String,
    pub approved: bool,
    pub flag_color: Option<String>,
    pub account_id: String,
    pub payee_id: Option<String>,
    pub category_id: Option<String>,
    pub deleted: bool,
}

/// Partial update accepted by `PUT /budgets/{b}/transactions/{t}`.
/// Omitted fields keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TransactionUpdate {
    pub account_id: Option<String>,
    pub date: Option<String>,
    pub amount: Option<i64>,
    pub payee_id: Option<String>,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    pub cleared: Option<String>,
    pub approved: Option<bool>,
    pub flag_color: Option<String>,
}

impl Transaction {
    pub fn apply(&mut self, update: TransactionUpdate) {
        if let Some(account_id) = update.account_id {
            self.account_id = account_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if update.payee_id.is_some() {
            self.payee_id = update.payee_id;
        }
        if update.category_id.is_some() {
            self.category_id = update.category_id;
        }
        if update.memo.is_some() {
            self.memo = update.memo;
        }
        if let Some(cleared) = update.cleared {
            self.cleared = cleared;
        }
        if let Some(approved) = update.approved {
            self.approved = approved;
        }
        if update.flag_color.is_some() {
            self.flag_color = update.flag_color;
        }
    }
}

#[derive(Deserialize)]
pub struct TransactionBody {
    pub transaction: TransactionUpdate,
}

/// A transaction to create via `POST /budgets/{b}/transactions`.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTransaction {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub payee_id: Option<String>,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    #[serde(default = "uncleared")]
    pub cleared: String,
    #[serde(default)]
    pub approved: bool,
    pub flag_color: Option<String>,
}

fn uncleared() -> String {
    "uncleared".to_string()
}

/// Either a single `transaction` or a `transactions` array, never both.
#[derive(Deserialize)]
pub struct SaveTransactions {
    pub transaction: Option<NewTransaction>,
    pub transactions: Option<Vec<NewTransaction>>,
}

#[derive(Deserialize)]
pub struct MonthCategoryUpdate {
    pub budgeted: i64,
}

#[derive(Deserialize)]
pub struct MonthCategoryBody {
    pub month_category: MonthCategoryUpdate,
}
