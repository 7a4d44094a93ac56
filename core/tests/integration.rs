//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port so writes never leak
//! between tests, then drives `BlockingClient` over real HTTP through the
//! ureq transport. Fixture ids come from `mock_server::fixtures`.

use std::io::{BufRead, BufReader, Write};
use std::sync::Mutex;

use mock_server::fixtures::{
    BUDGET_ID, CAFE_PAYEE_ID, CAFE_TRANSACTION_ID, CHECKING_ACCOUNT_ID, CURRENT_MONTH,
    DINING_CATEGORY_ID, GROCERIES_CATEGORY_ID, GROCERIES_TRANSACTION_ID, MARKET_PAYEE_ID,
    RENT_TRANSACTION_ID, SAVINGS_ACCOUNT_ID, USER_ID, WEEKLY_SHOP_TRANSACTION_ID,
};
use serde_json::json;
use ynab_core::{ApiError, BlockingClient, ClientConfig, NoProgress, DEFAULT_BASE_URL};

/// Start the mock server on a random port and return its `/v1` base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/v1")
}

fn client_for(base_url: &str, token: &str) -> BlockingClient {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        max_concurrency: 2,
        timeout_secs: Some(10),
        ..ClientConfig::default()
    };
    BlockingClient::from_config(token, &config)
}

fn client() -> BlockingClient {
    client_for(&start_server(), mock_server::DEFAULT_TOKEN)
}

/// Serve a single `200` with `body` on a random port and return the base URL.
fn serve_once(body: String) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        // The client may hang up early when it enforces a size limit.
        let _ = stream
            .write_all(head.as_bytes())
            .and_then(|()| stream.write_all(body.as_bytes()))
            .and_then(|()| stream.flush());
    });

    format!("http://{addr}/v1")
}

fn oversized_budget() -> (String, usize) {
    let blob_len = 11 * 1024 * 1024;
    let body = format!(r#"{{"data":{{"budget":{{"id":"b","blob":"{}"}}}}}}"#, "x".repeat(blob_len));
    (body, blob_len)
}

#[test]
fn default_base_url_targets_ynab() {
    assert_eq!(DEFAULT_BASE_URL, "https://api.youneedabudget.com/v1");
    let client = BlockingClient::new("token");
    assert_eq!(client.client().base_url(), DEFAULT_BASE_URL);
}

#[test]
fn reads_unwrap_their_resource() {
    let c = client();

    assert_eq!(c.user().unwrap()["id"], USER_ID);

    let budgets = c.budgets().unwrap();
    assert_eq!(budgets.as_array().unwrap().len(), 1);
    assert_eq!(budgets[0]["id"], BUDGET_ID);

    let budget = c.budget(BUDGET_ID).unwrap();
    assert_eq!(budget["name"], "Household");
    assert_eq!(budget["transactions"].as_array().unwrap().len(), 4);

    let settings = c.budget_settings(BUDGET_ID).unwrap();
    assert_eq!(settings["settings"]["currency_format"]["iso_code"], "USD");

    assert_eq!(c.accounts(BUDGET_ID).unwrap().as_array().unwrap().len(), 2);
    assert_eq!(c.account(BUDGET_ID, SAVINGS_ACCOUNT_ID).unwrap()["name"], "Savings");

    let groups = c.categories(BUDGET_ID).unwrap();
    assert_eq!(groups.as_array().unwrap().len(), 2);
    assert_eq!(c.category(BUDGET_ID, GROCERIES_CATEGORY_ID).unwrap()["name"], "Groceries");

    let month_category = c
        .category_month(BUDGET_ID, CURRENT_MONTH, DINING_CATEGORY_ID)
        .unwrap();
    assert_eq!(month_category["budgeted"], 100_000);

    assert_eq!(c.payees(BUDGET_ID).unwrap().as_array().unwrap().len(), 3);
    assert_eq!(c.payee(BUDGET_ID, CAFE_PAYEE_ID).unwrap()["name"], "Cafe");

    assert_eq!(c.months(BUDGET_ID).unwrap().as_array().unwrap().len(), 2);
    assert_eq!(c.month(BUDGET_ID, "current").unwrap()["month"], CURRENT_MONTH);
}

#[test]
fn transaction_listings_are_filtered() {
    let c = client();

    assert_eq!(c.transactions(BUDGET_ID).unwrap().as_array().unwrap().len(), 4);
    assert_eq!(
        c.account_transactions(BUDGET_ID, SAVINGS_ACCOUNT_ID)
            .unwrap()
            .as_array()
            .unwrap()
            .len(),
        0
    );
    assert_eq!(
        c.category_transactions(BUDGET_ID, GROCERIES_CATEGORY_ID)
            .unwrap()
            .as_array()
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        c.payee_transactions(BUDGET_ID, MARKET_PAYEE_ID)
            .unwrap()
            .as_array()
            .unwrap()
            .len(),
        2
    );
    assert_eq!(c.transaction(BUDGET_ID, CAFE_TRANSACTION_ID).unwrap()["memo"], "coffee");
}

#[test]
fn write_lifecycle() {
    let c = client();

    // Step 1: create one transaction.
    let created = c
        .add_transactions(
            BUDGET_ID,
            json!({"transaction": {
                "account_id": CHECKING_ACCOUNT_ID,
                "date": "2024-05-15",
                "amount": -4200,
                "memo": "bus pass"
            }}),
        )
        .unwrap();
    let id = created["transaction_ids"][0].as_str().unwrap().to_string();
    assert_eq!(created["transaction"]["memo"], "bus pass");

    // Step 2: fetch it back.
    assert_eq!(c.transaction(BUDGET_ID, &id).unwrap()["amount"], -4200);

    // Step 3: update it.
    let updated = c
        .update_transaction(BUDGET_ID, &id, json!({"memo": "monthly bus pass"}))
        .unwrap();
    assert_eq!(updated["memo"], "monthly bus pass");
    assert_eq!(updated["amount"], -4200);

    // Step 4: move money into the category.
    let category = c
        .update_category_month(
            BUDGET_ID,
            CURRENT_MONTH,
            DINING_CATEGORY_ID,
            json!({"budgeted": 120_000}),
        )
        .unwrap();
    assert_eq!(category["budgeted"], 120_000);
    let reread = c
        .category_month(BUDGET_ID, CURRENT_MONTH, DINING_CATEGORY_ID)
        .unwrap();
    assert_eq!(reread["balance"], 120_000 - 12_500);

    // Step 5: listing now includes the new transaction.
    assert_eq!(c.transactions(BUDGET_ID).unwrap().as_array().unwrap().len(), 5);
}

#[test]
fn add_many_transactions() {
    let c = client();
    let created = c
        .add_transactions(
            BUDGET_ID,
            json!({"transactions": [
                {"account_id": SAVINGS_ACCOUNT_ID, "date": "2024-05-20", "amount": 50_000},
                {"account_id": SAVINGS_ACCOUNT_ID, "date": "2024-05-21", "amount": 25_000}
            ]}),
        )
        .unwrap();
    assert_eq!(created["transaction_ids"].as_array().unwrap().len(), 2);
    assert_eq!(
        c.account_transactions(BUDGET_ID, SAVINGS_ACCOUNT_ID)
            .unwrap()
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn bulk_update_reassigns_payees() {
    let c = client();
    let ids = [
        RENT_TRANSACTION_ID,
        GROCERIES_TRANSACTION_ID,
        CAFE_TRANSACTION_ID,
        WEEKLY_SHOP_TRANSACTION_ID,
    ];
    let updates = ids
        .iter()
        .map(|id| (*id, json!({"payee_id": CAFE_PAYEE_ID})));

    let seen = Mutex::new(Vec::new());
    let record = |remaining: usize| seen.lock().unwrap().push(remaining);
    let submitted = c.update_transactions(BUDGET_ID, updates, &record).unwrap();

    assert_eq!(submitted, 4);
    assert_eq!(seen.into_inner().unwrap(), vec![4, 3, 2, 1, 0]);
    let cafe = c.payee_transactions(BUDGET_ID, CAFE_PAYEE_ID).unwrap();
    assert_eq!(cafe.as_array().unwrap().len(), 4);
}

#[test]
fn bulk_update_stops_on_missing_transaction() {
    let c = client();
    let updates = vec![(
        "00000000-0000-0000-0000-000000000000".to_string(),
        json!({"memo": "ghost"}),
    )];
    let err = c.update_transactions(BUDGET_ID, updates, &NoProgress).unwrap_err();
    match &err {
        ApiError::TransactionUpdate { transaction_id, .. } => {
            assert_eq!(transaction_id, "00000000-0000-0000-0000-000000000000")
        }
        other => panic!("expected TransactionUpdate, got {other:?}"),
    }
    assert!(err.is_not_found());
}

#[test]
fn raw_primitives_return_data() {
    let c = client();
    let data = c.get("/user").unwrap();
    assert_eq!(data["user"]["id"], USER_ID);

    let path = format!("/budgets/{BUDGET_ID}/transactions/{CAFE_TRANSACTION_ID}");
    let data = c.put(&path, &json!({"transaction": {"approved": false}})).unwrap();
    assert_eq!(data["transaction"]["approved"], false);
    assert!(data.get("server_knowledge").is_some());

    let path = format!("/budgets/{BUDGET_ID}/months/{CURRENT_MONTH}/categories/{DINING_CATEGORY_ID}");
    let data = c.patch(&path, &json!({"month_category": {"budgeted": 0}})).unwrap();
    assert_eq!(data["category"]["budgeted"], 0);
}

#[test]
fn missing_resources_are_not_found() {
    let c = client();

    let err = c.payee(BUDGET_ID, "missing").unwrap_err();
    assert!(err.is_not_found());
    let detail = err.error_detail().unwrap();
    assert_eq!(detail.id, "404.2");
    assert_eq!(detail.name, "resource_not_found");

    assert!(c.accounts("missing").unwrap_err().is_not_found());
    assert!(c.month(BUDGET_ID, "1999-01-01").unwrap_err().is_not_found());
}

#[test]
fn bad_token_is_unauthorized() {
    let c = client_for(&start_server(), "not-the-token");
    let err = c.user().unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.error_detail().unwrap().name, "unauthorized");
}

#[test]
fn rejected_create_is_bad_request() {
    let c = client();
    let err = c
        .add_transactions(BUDGET_ID, json!({"transaction": {"account_id": "nowhere", "date": "2024-05-01", "amount": 1}}))
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client_for(&format!("http://{addr}/v1"), "token");
    assert!(matches!(c.user(), Err(ApiError::Transport(_))));
}

#[test]
fn large_budget_export_is_read_in_full() {
    let (body, blob_len) = oversized_budget();
    let c = client_for(&serve_once(body), "token");

    let budget = c.budget("b").unwrap();
    assert_eq!(budget["id"], "b");
    assert_eq!(budget["blob"].as_str().unwrap().len(), blob_len);
}

#[test]
fn configured_response_limit_is_enforced() {
    let (body, _) = oversized_budget();
    let config = ClientConfig {
        base_url: serve_once(body),
        max_response_bytes: Some(1024 * 1024),
        timeout_secs: Some(10),
        ..ClientConfig::default()
    };
    let c = BlockingClient::from_config("token", &config);
    assert!(matches!(c.budget("b"), Err(ApiError::Transport(_))));
}
