use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

/// Status and decoded JSON body of one response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the router and decode the JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"full_name": full_name, "email": email, "password": password})),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await
    }

    /// Register a user and return its session token
    pub async fn register_token(&self, email: &str) -> String {
        let response = self.register("Test User", email, "secret1").await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn me(&self, token: &str) -> TestResponse {
        self.send("GET", "/api/auth/me", Some(token), None).await
    }

    pub async fn create_listing(&self, token: &str, title: &str, price: f64) -> TestResponse {
        self.send(
            "POST",
            "/api/listings",
            Some(token),
            Some(json!({
                "title": title,
                "description": "used for one semester",
                "price": price,
                "category": "misc",
            })),
        )
        .await
    }

    pub async fn report(&self, token: &str, listing_id: i64, reason: &str) -> TestResponse {
        self.send(
            "POST",
            &format!("/api/listings/{listing_id}/report"),
            Some(token),
            Some(json!({"reason": reason})),
        )
        .await
    }
}
