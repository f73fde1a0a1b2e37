use axum::Router;
use std::sync::Arc;

use campus_marketplace::{
    build_router,
    listing::repository::InMemoryListingRepository,
    report::repository::InMemoryReportRepository,
    user::InMemoryUserRepository,
    AppState, PasswordHasher, TokenIssuer,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";

/// bcrypt's lowest accepted cost
const TEST_COST: u32 = 4;

#[allow(dead_code)]
pub struct TestSetup {
    pub app: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub listings: Arc<InMemoryListingRepository>,
    pub reports: Arc<InMemoryReportRepository>,
    pub token_issuer: TokenIssuer,
}

pub struct TestSetupBuilder {
    secret: String,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            secret: TEST_SECRET.to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn build(self) -> TestSetup {
        let users = Arc::new(InMemoryUserRepository::new());
        let listings = Arc::new(InMemoryListingRepository::new());
        let reports = Arc::new(InMemoryReportRepository::new());
        let token_issuer = TokenIssuer::new(&self.secret);

        let state = AppState::new(
            users.clone(),
            listings.clone(),
            reports.clone(),
            token_issuer.clone(),
            PasswordHasher::with_cost(TEST_COST),
        );

        TestSetup {
            app: build_router(state),
            users,
            listings,
            reports,
            token_issuer,
        }
    }
}
