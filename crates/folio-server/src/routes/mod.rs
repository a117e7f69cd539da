//! HTTP route handlers for the Folio server.
//!
//! Document pages live at the root, sign-in and sign-out under `/users`.
//! Every request passes through the session middleware so handlers can read
//! the signed-in user and the pending flash message.

pub mod documents;
pub mod pages;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::middleware as axum_mw;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::session_middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // bcrypt verification is CPU-bound; cap concurrent sign-in attempts.
    let user_routes = users::router().layer(tower::limit::ConcurrencyLimitLayer::new(10));

    Router::new()
        .merge(user_routes)
        .merge(documents::router())
        .layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}
