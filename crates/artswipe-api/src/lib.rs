pub mod auth;
pub mod error;
pub mod extract;
pub mod matches;
pub mod middleware;
pub mod profile;
pub mod reviews;
pub mod state;
pub mod swipes;
pub mod works;

use axum::{
    Json, Router, middleware as axum_middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::middleware::require_auth;
use crate::state::AppState;

/// All API routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/me", get(profile::get_profile).put(profile::update_profile))
        .route("/me/works", get(works::my_works))
        .route("/works", get(works::feed).post(works::create_work))
        .route("/swipes", post(swipes::swipe))
        .route("/matches", get(matches::list_matches))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/received", get(reviews::received_reviews))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
