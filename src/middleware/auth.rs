use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{AppState, session::SESSION_COOKIE};

pub const LOGIN_PATH: &str = "/admin/login";

/// The session token carried by the request, or an empty string.
pub fn session_token(jar: &CookieJar) -> String {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default()
}

/// Cookie handing `token` to the browser for `max_age`.
pub fn session_cookie(token: String, max_age: std::time::Duration) -> Cookie<'static> {
    let max_age = time::Duration::try_from(max_age).unwrap_or(time::Duration::MAX);
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

/// Removal cookie for logout. Expires immediately.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Lets the request through only with a live session; everything else is
/// sent to the login page.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar);
    if !state.sessions.validate(&token) {
        tracing::debug!("Unauthenticated request to {}", request.uri().path());
        return Redirect::to(LOGIN_PATH).into_response();
    }

    next.run(request).await
}
