//! Route definitions for the LicenseHub HTTP API.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, threading `AppState` through.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(license_routes())
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/user/info", get(handlers::auth::me))
}

/// Installation-facing verification plus token-protected administration.
fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/license/create", post(handlers::license::create))
        .route("/license/verify", post(handlers::license::verify))
        .route("/license/list", get(handlers::license::list))
        .route("/license/getInfo", get(handlers::license::get_info))
        .route("/license/status", post(handlers::license::set_status))
        .route("/license/bind", post(handlers::license::bind))
        .route("/license/remove", get(handlers::license::remove))
}
