use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::ListingModel,
    types::{CreateListingRequest, ListingQuery},
};
use crate::auth::AuthenticatedUser;
use crate::shared::{positive_id, ApiResponse, AppError, AppState};

/// HTTP handler for listing and searching listings
///
/// GET /api/listings?search=<term>
#[instrument(name = "list_listings", skip(state, query))]
pub async fn list_listings(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ListingModel>>>, AppError> {
    let Query(query) = query?;
    let listings = state
        .listing_service
        .list_listings(query.search.as_deref())
        .await?;

    info!(count = listings.len(), "Listings fetched");

    Ok(Json(ApiResponse::success(listings)))
}

/// HTTP handler for creating a listing as the authenticated user
///
/// POST /api/listings
#[instrument(name = "create_listing", skip(state, payload))]
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateListingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ListingModel>>), AppError> {
    let Json(request) = payload?;

    let listing = state
        .listing_service
        .create_listing(user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(listing))))
}

/// GET /api/listings/:id
#[instrument(name = "get_listing", skip(state, path))]
pub async fn get_listing(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<ListingModel>>, AppError> {
    let listing_id = positive_id(path)?;
    let listing = state.listing_service.get_listing(listing_id).await?;

    Ok(Json(ApiResponse::success(listing)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{jwt_auth, token::TokenIssuer};
    use crate::shared::test_utils::{read_json, AppStateBuilder, TEST_SECRET};
    use crate::user::UserModel;
    use axum::{
        body::Body,
        http::Request,
        middleware,
        routing::{get, post},
        Router,
    };
    use chrono::Utc;
    use rstest::rstest;
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        let state = AppStateBuilder::new().build();
        let require_auth = middleware::from_fn_with_state(state.clone(), jwt_auth);
        Router::new()
            .route(
                "/listings",
                get(list_listings).merge(post(create_listing).route_layer(require_auth)),
            )
            .route("/listings/:id", get(get_listing))
            .with_state(state)
    }

    fn token(user_id: i64) -> String {
        let now = Utc::now();
        let user = UserModel {
            id: user_id,
            full_name: "Seller".to_string(),
            email: "seller@campus.edu".to_string(),
            password_hash: "hash".to_string(),
            university: None,
            created_at: now,
            updated_at: now,
        };
        TokenIssuer::new(TEST_SECRET).issue(&user).unwrap()
    }

    fn create_request(body: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/listings")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_listing_handler() {
        let response = app()
            .oneshot(create_request(
                r#"{"title": "Desk", "description": "oak", "price": 40, "category": "furniture"}"#,
                Some(&token(9)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["data"]["user_id"], 9);
        assert_eq!(body["data"]["title"], "Desk");
        assert_eq!(body["data"]["price"], 40.0);
    }

    #[tokio::test]
    async fn test_create_listing_requires_token() {
        let response = app()
            .oneshot(create_request(r#"{"title": "Desk", "category": "x"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_listing_validation_error() {
        let response = app()
            .oneshot(create_request(
                r#"{"title": "Desk", "price": -1, "category": "furniture"}"#,
                Some(&token(1)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_and_search_listings() {
        let app = app();
        let token = token(1);
        for title in ["Desk lamp", "Bike"] {
            let body = format!(r#"{{"title": "{title}", "price": 5, "category": "misc"}}"#);
            app.clone()
                .oneshot(create_request(&body, Some(&token)))
                .await
                .unwrap();
        }

        let all = read_json(app.clone().oneshot(get_request("/listings")).await.unwrap()).await;
        assert_eq!(all["data"].as_array().unwrap().len(), 2);
        assert_eq!(all["data"][0]["title"], "Bike");

        let found = read_json(
            app.oneshot(get_request("/listings?search=LAMP"))
                .await
                .unwrap(),
        )
        .await;
        let found = found["data"].as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["title"], "Desk lamp");
    }

    #[tokio::test]
    async fn test_malformed_query_uses_error_envelope() {
        let response = app()
            .oneshot(get_request("/listings?search=a&search=b"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "invalid query parameters");
    }

    #[tokio::test]
    async fn test_get_listing_handler() {
        let app = app();
        let created = app
            .clone()
            .oneshot(create_request(
                r#"{"title": "Desk", "price": 5, "category": "misc"}"#,
                Some(&token(1)),
            ))
            .await
            .unwrap();
        let id = read_json(created).await["data"]["id"].as_i64().unwrap();

        let response = app
            .oneshot(get_request(&format!("/listings/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["data"]["id"], id);
    }

    #[rstest]
    #[case::unknown("/listings/12345", "listing not found")]
    #[case::non_numeric("/listings/abc", "resource not found")]
    #[case::zero("/listings/0", "resource not found")]
    #[case::negative("/listings/-4", "resource not found")]
    #[tokio::test]
    async fn test_get_listing_not_found(#[case] uri: &str, #[case] message: &str) {
        let response = app().oneshot(get_request(uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["error"], message);
    }
}
