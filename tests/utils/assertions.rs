//! Test assertion helpers - fluent API for verifying responses
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::http::StatusCode;
use serde_json::Value;

use super::actions::TestResponse;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct ResponseAssertion<'a> {
    response: &'a TestResponse,
}

impl<'a> ResponseAssertion<'a> {
    pub fn of(response: &'a TestResponse) -> Self {
        Self { response }
    }

    /// Assert a successful envelope with the given status, returning `data`
    pub fn succeeded_with(self, status: StatusCode) -> &'a Value {
        assert_eq!(
            self.response.status, status,
            "unexpected status, body: {}",
            self.response.body
        );
        assert_eq!(self.response.body["success"], true);
        assert!(self.response.body.get("error").is_none());
        &self.response.body["data"]
    }

    /// Assert a failure envelope with the given status and error message
    pub fn failed_with(self, status: StatusCode, message: &str) {
        assert_eq!(
            self.response.status, status,
            "unexpected status, body: {}",
            self.response.body
        );
        assert_eq!(self.response.body["success"], false);
        assert_eq!(self.response.body["error"], message);
        assert!(self.response.body.get("data").is_none());
    }
}
