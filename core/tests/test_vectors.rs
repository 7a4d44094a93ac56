//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each case names an `Endpoint` (in its serde form), the request it must
//! build, a simulated response, and either the expected parse result or the
//! expected error. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use serde_json::Value;
use ynab_core::{ApiError, Endpoint, HttpResponse, YnabClient};

fn client(vectors: &Value) -> YnabClient {
    YnabClient::with_base_url(
        vectors["token"].as_str().unwrap(),
        vectors["base_url"].as_str().unwrap(),
    )
}

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

/// Check the built request and return the simulated response for the case.
fn check_request(c: &YnabClient, base_url: &str, case: &Value) -> (Endpoint, HttpResponse) {
    let name = case["name"].as_str().unwrap();
    let endpoint: Endpoint = serde_json::from_value(case["endpoint"].clone()).unwrap();
    let expected_req = &case["expected_request"];

    let req = c.build(&endpoint).unwrap();
    assert_eq!(req.method.as_str(), expected_req["method"].as_str().unwrap(), "{name}: method");
    assert_eq!(req.path, format!("{base_url}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected_req.get("body") {
        Some(expected_body) => {
            let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&body, expected_body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }

    let sim = &case["simulated_response"];
    let response = HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    );
    (endpoint, response)
}

fn run_success_vectors(raw: &str) {
    let vectors = load(raw);
    let base_url = vectors["base_url"].as_str().unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (endpoint, response) = check_request(&c, base_url, case);
        let result = c.parse(&endpoint, response).unwrap();
        assert_eq!(result, case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[test]
fn read_test_vectors() {
    run_success_vectors(include_str!("../../test-vectors/reads.json"));
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[test]
fn write_test_vectors() {
    run_success_vectors(include_str!("../../test-vectors/writes.json"));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/errors.json"));
    let base_url = vectors["base_url"].as_str().unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (endpoint, response) = check_request(&c, base_url, case);
        let err = c.parse(&endpoint, response).unwrap_err();
        let expected = &case["expected_error"];

        match expected["kind"].as_str().unwrap() {
            "Request" => {
                let status = expected["status"].as_u64().unwrap() as u16;
                assert!(matches!(err, ApiError::Request { .. }), "{name}: expected Request, got {err:?}");
                assert_eq!(err.status(), Some(status), "{name}: status");
                match expected.get("error_name") {
                    Some(error_name) => {
                        let detail = err.error_detail().unwrap();
                        assert_eq!(detail.name, error_name.as_str().unwrap(), "{name}: error name");
                    }
                    None => assert!(err.error_detail().is_none(), "{name}: no error detail"),
                }
            }
            "MissingField" => match &err {
                ApiError::MissingField(field) => {
                    assert_eq!(field, expected["field"].as_str().unwrap(), "{name}: field")
                }
                other => panic!("{name}: expected MissingField, got {other:?}"),
            },
            "DeserializationError" => {
                assert!(matches!(err, ApiError::DeserializationError(_)), "{name}: got {err:?}")
            }
            other => panic!("{name}: unknown expected_error kind: {other}"),
        }
    }
}

#[test]
fn every_operation_has_a_vector() {
    let mut covered = std::collections::BTreeSet::new();
    for raw in [
        include_str!("../../test-vectors/reads.json"),
        include_str!("../../test-vectors/writes.json"),
    ] {
        for case in load(raw)["cases"].as_array().unwrap() {
            let endpoint: Endpoint = serde_json::from_value(case["endpoint"].clone()).unwrap();
            covered.insert(endpoint.name());
        }
    }
    assert_eq!(covered.len(), 21, "covered: {covered:?}");
}
