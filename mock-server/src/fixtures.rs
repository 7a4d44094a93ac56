//! Seed data with fixed ids so tests can address resources directly.

use crate::model::{
    Account, BudgetSettings, BudgetSummary, Category, CategoryGroup, CurrencyFormat, DateFormat,
    Month, Payee, Transaction, User,
};
use crate::{Budget, Store};

pub const USER_ID: &str = "a3f1c9d2-5b7e-4e21-9c0d-1f2e3d4c5b6a";
pub const BUDGET_ID: &str = "6f1e2d3c-0000-4000-8000-000000000001";

pub const CHECKING_ACCOUNT_ID: &str = "6f1e2d3c-0000-4000-8000-000000000101";
pub const SAVINGS_ACCOUNT_ID: &str = "6f1e2d3c-0000-4000-8000-000000000102";

pub const BILLS_GROUP_ID: &str = "6f1e2d3c-0000-4000-8000-000000000201";
pub const EVERYDAY_GROUP_ID: &str = "6f1e2d3c-0000-4000-8000-000000000202";

pub const RENT_CATEGORY_ID: &str = "6f1e2d3c-0000-4000-8000-000000000301";
pub const GROCERIES_CATEGORY_ID: &str = "6f1e2d3c-0000-4000-8000-000000000302";
pub const DINING_CATEGORY_ID: &str = "6f1e2d3c-0000-4000-8000-000000000303";

pub const LANDLORD_PAYEE_ID: &str = "6f1e2d3c-0000-4000-8000-000000000401";
pub const MARKET_PAYEE_ID: &str = "6f1e2d3c-0000-4000-8000-000000000402";
pub const CAFE_PAYEE_ID: &str = "6f1e2d3c-0000-4000-8000-000000000403";

pub const RENT_TRANSACTION_ID: &str = "6f1e2d3c-0000-4000-8000-000000000501";
pub const GROCERIES_TRANSACTION_ID: &str = "6f1e2d3c-0000-4000-8000-000000000502";
pub const CAFE_TRANSACTION_ID: &str = "6f1e2d3c-0000-4000-8000-000000000503";
pub const WEEKLY_SHOP_TRANSACTION_ID: &str = "6f1e2d3c-0000-4000-8000-000000000504";

pub const PREVIOUS_MONTH: &str = "2024-04-01";
pub const CURRENT_MONTH: &str = "2024-05-01";

fn category(id: &str, group_id: &str, name: &str, budgeted: i64, activity: i64) -> Category {
    Category {
        id: id.to_string(),
        category_group_id: group_id.to_string(),
        name: name.to_string(),
        hidden: false,
        budgeted,
        activity,
        balance: budgeted + activity,
        deleted: false,
    }
}

fn categories(month_offset: i64) -> Vec<Category> {
    vec![
        category(RENT_CATEGORY_ID, BILLS_GROUP_ID, "Rent", 1_200_000, -1_200_000),
        category(GROCERIES_CATEGORY_ID, EVERYDAY_GROUP_ID, "Groceries", 400_000, -129_250 + month_offset),
        category(DINING_CATEGORY_ID, EVERYDAY_GROUP_ID, "Dining Out", 100_000, -12_500),
    ]
}

fn month(month: &str, categories: Vec<Category>) -> Month {
    let budgeted = categories.iter().map(|c| c.budgeted).sum();
    let activity = categories.iter().map(|c| c.activity).sum();
    Month {
        month: month.to_string(),
        income: 3_500_000,
        budgeted,
        activity,
        to_be_budgeted: 3_500_000 - budgeted,
        deleted: false,
        categories,
    }
}

fn account(id: &str, name: &str, account_type: &str, balance: i64) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: account_type.to_string(),
        on_budget: true,
        closed: false,
        balance,
        deleted: false,
    }
}

fn payee(id: &str, name: &str) -> Payee {
    Payee {
        id: id.to_string(),
        name: name.to_string(),
        transfer_account_id: None,
        deleted: false,
    }
}

fn transaction(
    id: &str,
    date: &str,
    amount: i64,
    payee_id: &str,
    category_id: &str,
    memo: Option<&str>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: date.to_string(),
        amount,
        memo: memo.map(str::to_string),
        cleared: "cleared".to_string(),
        approved: true,
        flag_color: None,
        account_id: CHECKING_ACCOUNT_ID.to_string(),
        payee_id: Some(payee_id.to_string()),
        category_id: Some(category_id.to_string()),
        deleted: false,
    }
}

pub fn seed() -> Store {
    let current = categories(0);
    let groups = vec![
        CategoryGroup {
            id: BILLS_GROUP_ID.to_string(),
            name: "Bills".to_string(),
            hidden: false,
            deleted: false,
            categories: current[..1].to_vec(),
        },
        CategoryGroup {
            id: EVERYDAY_GROUP_ID.to_string(),
            name: "Everyday".to_string(),
            hidden: false,
            deleted: false,
            categories: current[1..].to_vec(),
        },
    ];

    let budget = Budget {
        summary: BudgetSummary {
            id: BUDGET_ID.to_string(),
            name: "Household".to_string(),
            last_modified_on: "2024-05-10T18:22:05+00:00".to_string(),
            first_month: PREVIOUS_MONTH.to_string(),
            last_month: CURRENT_MONTH.to_string(),
        },
        settings: BudgetSettings {
            date_format: DateFormat {
                format: "YYYY-MM-DD".to_string(),
            },
            currency_format: CurrencyFormat {
                iso_code: "USD".to_string(),
                decimal_digits: 2,
                decimal_separator: ".".to_string(),
                group_separator: ",".to_string(),
                symbol_first: true,
                currency_symbol: "$".to_string(),
            },
        },
        accounts: vec![
            account(CHECKING_ACCOUNT_ID, "Checking", "checking", 2_158_250),
            account(SAVINGS_ACCOUNT_ID, "Savings", "savings", 10_000_000),
        ],
        category_groups: groups,
        payees: vec![
            payee(LANDLORD_PAYEE_ID, "Landlord"),
            payee(MARKET_PAYEE_ID, "Corner Market"),
            payee(CAFE_PAYEE_ID, "Cafe"),
        ],
        months: vec![
            month(PREVIOUS_MONTH, categories(20_000)),
            month(CURRENT_MONTH, current),
        ],
        transactions: vec![
            transaction(RENT_TRANSACTION_ID, "2024-05-01", -1_200_000, LANDLORD_PAYEE_ID, RENT_CATEGORY_ID, None),
            transaction(
                GROCERIES_TRANSACTION_ID,
                "2024-05-03",
                -84_250,
                MARKET_PAYEE_ID,
                GROCERIES_CATEGORY_ID,
                None,
            ),
            transaction(CAFE_TRANSACTION_ID, "2024-05-04", -12_500, CAFE_PAYEE_ID, DINING_CATEGORY_ID, Some("coffee")),
            transaction(
                WEEKLY_SHOP_TRANSACTION_ID,
                "2024-05-10",
                -45_000,
                MARKET_PAYEE_ID,
                GROCERIES_CATEGORY_ID,
                Some("weekly shop"),
            ),
        ],
    };

    Store {
        user: User {
            id: USER_ID.to_string(),
        },
        budgets: vec![budget],
        server_knowledge: 100,
    }
}
