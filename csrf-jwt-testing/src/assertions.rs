// Test assertions for HTTP responses

use crate::TestResponse;

/// Assert that a response has a specific status code
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status();
    assert_eq!(
        actual, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        actual,
        response.body_string()
    );
}

/// Assert that a response has a specific header
pub fn assert_header(response: &TestResponse, key: &str, expected: &str) {
    let actual = response.header(key);
    assert_eq!(
        actual,
        Some(expected),
        "Expected header '{}' to be '{}', got {:?}",
        key,
        expected,
        actual
    );
}

/// Assert that a response does not carry a header
pub fn assert_no_header(response: &TestResponse, key: &str) {
    let actual = response.header(key);
    assert!(
        actual.is_none(),
        "Expected no '{}' header, got {:?}",
        key,
        actual
    );
}

/// Assert that a response sets no cookies at all
pub fn assert_no_cookies(response: &TestResponse) {
    let cookies = response.set_cookies();
    assert!(
        cookies.is_empty(),
        "Expected no cookies to be set, got {:?}",
        cookies
    );
}

/// Assert that a response body is the JSON error `{"message": expected}`
pub fn assert_error_message(response: &TestResponse, expected: &str) {
    let body: serde_json::Value = response
        .body_json()
        .expect("Failed to deserialize response body");
    assert_eq!(
        body,
        serde_json::json!({ "message": expected }),
        "Unexpected error body"
    );
}

/// Assert that a response body contains a string
pub fn assert_body_contains(response: &TestResponse, expected: &str) {
    let body = response.body_string();
    assert!(
        body.contains(expected),
        "Expected body to contain '{}', but it didn't. Body: {}",
        expected,
        body
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use csrf_jwt_core::HttpResponse;

    #[test]
    fn test_assertions_pass() {
        let inner = HttpResponse::bad_request()
            .with_json(&serde_json::json!({ "message": "nope" }))
            .unwrap();
        let response = TestResponse::new(inner);

        assert_status(&response, 400);
        assert_header(&response, "content-type", "application/json");
        assert_no_header(&response, "set-cookie");
        assert_no_cookies(&response);
        assert_error_message(&response, "nope");
        assert_body_contains(&response, "nope");
    }

    #[test]
    #[should_panic(expected = "Expected no cookies")]
    fn test_assert_no_cookies_fails() {
        let inner = HttpResponse::ok().with_cookie("jwt=abc; Path=/".to_string());
        assert_no_cookies(&TestResponse::new(inner));
    }

    #[test]
    #[should_panic(expected = "Expected status 200")]
    fn test_assert_status_fails() {
        assert_status(&TestResponse::new(HttpResponse::not_found()), 200);
    }
}
