use axum::{
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{Html, IntoResponse},
};
use chrono::Utc;
use tracing::{error, warn};

use crate::{
    AppState,
    error::AppError,
    views::{self, IndexPage},
};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let profile = state
        .repo
        .profile()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to load profile"))?;
    let links = state
        .repo
        .links()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to load links"))?;
    // the page still works without its banner
    let banner = state.repo.banner().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load banner");
        Default::default()
    });

    Ok(views::index_page(&IndexPage {
        profile,
        links,
        banner,
        last_updated: Utc::now().format("%b %-d, %Y").to_string(),
    }))
}

pub async fn health() -> &'static str {
    "."
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(LOCATION, "/")])
}
