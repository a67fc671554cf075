use axum::{
    extract::Request,
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware::Next,
    response::Response,
};

const STATIC_PREFIX: &str = "/static/";

/// Long-lived caching for static assets, none for pages.
pub async fn cache_control(request: Request, next: Next) -> Response {
    let is_static = request.uri().path().starts_with(STATIC_PREFIX);
    let mut response = next.run(request).await;

    let value = if is_static {
        HeaderValue::from_static("public, max-age=86400")
    } else {
        HeaderValue::from_static("no-cache, no-store, must-revalidate")
    };
    response.headers_mut().insert(CACHE_CONTROL, value);

    response
}
