use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    AppState,
    middleware::{RateLimiter, cache_control, log_errors, rate_limit, require_auth},
    routes::{admin, site},
};

/// Requests running longer than `timeout` are answered with 408.
fn request_timeout(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Builds the full application: public pages, the login flow, the admin
/// area behind the session gate, static assets and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    let rate_limiter = Arc::new(RateLimiter::from_config(&state.config));
    let static_dir = PathBuf::from(&state.config.static_dir);

    let protected_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/links/add", post(admin::add_link))
        .route("/admin/links/delete", post(admin::delete_link))
        .route("/admin/links/featured", post(admin::toggle_featured))
        .route("/admin/profile", post(admin::update_profile))
        .route("/admin/password", post(admin::update_password))
        .route("/admin/banner", post(admin::update_banner))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let public_routes = Router::new()
        .route("/", get(site::index))
        .route("/health", get(site::health))
        .route("/admin/login", get(admin::login_page).post(admin::login))
        .route("/admin/logout", get(admin::logout).post(admin::logout))
        .route_service("/robots.txt", ServeFile::new(static_dir.join("robots.txt")))
        .route_service(
            "/favicon.ico",
            ServeFile::new(static_dir.join("images").join("favicon.ico")),
        )
        .nest_service("/static", ServeDir::new(&static_dir));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(site::not_found)
        .layer(from_fn(cache_control))
        .layer(from_fn(log_errors))
        .layer(from_fn_with_state(rate_limiter, rate_limit))
        .layer(CompressionLayer::new())
        .layer(request_timeout(state.config.request_timeout()))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
