// Library crate for the SDK demo test harness
// Exports modules for use by the server and sdkctl binaries and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod sdk;
pub mod services;
pub mod state;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{all_api_test, get_test_api_list, test_progress};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    let api_test_routes = Router::new()
        .route("/api/apiTest/allApiTest", get(all_api_test))
        .route("/api/apiTest/testProgress", get(test_progress))
        .route("/api/apiTest/getTestApiList", get(get_test_api_list));

    Router::new()
        .route("/", get(|| async { "Hello, SDK demo!" }))
        .merge(api_test_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
