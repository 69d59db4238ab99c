//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert JSON error body carries the HTTP status and a message
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    assert!(
        json["error"].as_str().is_some_and(|e| !e.is_empty()),
        "Expected error message, got {json}"
    );
}

/// Assert a score is within `tolerance` of `expected`
pub fn assert_score_near(actual: Option<f64>, expected: f64, tolerance: f64) {
    let actual = actual.unwrap_or_else(|| panic!("Expected a score near {expected}, got none"));
    assert!(
        (actual - expected).abs() <= tolerance,
        "Expected score {expected} ± {tolerance}, got {actual}"
    );
}

/// Assert an analysis JSON body lists all ten topics in chart order
pub fn assert_topic_order(json: &serde_json::Value) {
    let topics: Vec<&str> = json["scores"]
        .as_array()
        .expect("scores must be an array")
        .iter()
        .map(|s| s["topic"].as_str().unwrap_or_default())
        .collect();
    let expected: Vec<&str> = chart_scan::Topic::ALL.iter().map(|t| t.label()).collect();
    assert_eq!(topics, expected);
}
