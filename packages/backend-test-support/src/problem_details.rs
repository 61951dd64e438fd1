//! Assertions for `application/problem+json` bodies, independent of backend types.

use serde_json::Value;

const FIELDS: [&str; 6] = ["type", "title", "status", "detail", "code", "trace_id"];

/// Check the problem body shape and its `status`/`code`, and that the body
/// trace id matches the `x-trace-id` header value.
pub fn assert_problem_details(body: &Value, status: u16, code: &str, header_trace_id: &str) {
    for field in FIELDS {
        assert!(body.get(field).is_some(), "{field} field should be present");
    }
    assert_eq!(body["status"], status);
    assert_eq!(body["code"], code);
    assert_eq!(
        body["trace_id"].as_str(),
        Some(header_trace_id),
        "trace_id in body should match x-trace-id header"
    );
    let type_url = body["type"].as_str().unwrap_or_default();
    assert!(
        type_url.ends_with(&format!("/errors/{code}")),
        "type should end with the error code (got {type_url})"
    );
}
