use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::shared::{ApiResponse, AppState};
use crate::{auth, listing, report};

/// Upper bound on the time spent handling one request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// GET /health
pub async fn health_check() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({ "status": "ok" })))
}

/// Builds the full HTTP router. Protected routes carry the JWT middleware
/// as a route layer so public methods on the same path stay open.
pub fn build_router(state: AppState) -> Router {
    let require_auth = middleware::from_fn_with_state(state.clone(), auth::jwt_auth);

    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/auth/me",
            get(auth::me).route_layer(require_auth.clone()),
        )
        .route(
            "/listings",
            get(listing::list_listings)
                .merge(post(listing::create_listing).route_layer(require_auth.clone())),
        )
        .route("/listings/:id", get(listing::get_listing))
        .route(
            "/listings/:id/report",
            post(report::report_listing).route_layer(require_auth),
        );

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
