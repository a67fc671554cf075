mod auth;
mod cache_control;
mod error_handler;
mod rate_limit;

pub use auth::{clear_session_cookie, require_auth, session_cookie, session_token};
pub use cache_control::cache_control;
pub use error_handler::log_errors;
pub use rate_limit::{RateLimiter, rate_limit};
