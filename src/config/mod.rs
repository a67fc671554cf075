use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cache_ttl_secs: u64,
    pub session_lifetime_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    /// Rate limit on `X-Real-IP` / `X-Forwarded-For` rather than the peer
    pub trust_proxy_headers: bool,
    pub request_timeout_secs: u64,
    pub static_dir: String,
    /// Seeds the admin credential on first start; ignored once one is stored
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            cache_ttl_secs: 60 * 60,
            session_lifetime_secs: 24 * 3600,
            rate_limit_window_secs: 60,
            rate_limit_requests: 500,
            trust_proxy_headers: false,
            request_timeout_secs: 60,
            static_dir: "static".to_string(),
            admin_password: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let cache_ttl_minutes = env::var("CACHE_TTL").ok();
        let session_lifetime_hours = env::var("SESSION_LIFETIME").ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or("SERVER_PORT", defaults.server_port),
            cache_ttl_secs: unit_secs(cache_ttl_minutes.as_deref(), 'm', 60)
                .unwrap_or(defaults.cache_ttl_secs),
            session_lifetime_secs: unit_secs(session_lifetime_hours.as_deref(), 'h', 3600)
                .unwrap_or(defaults.session_lifetime_secs),
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window_secs),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
            trust_proxy_headers: parse_or("TRUST_PROXY", defaults.trust_proxy_headers),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT", defaults.request_timeout_secs),
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_lifetime_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parses a count of `unit` (`"90"` or `"90m"`) into seconds, saturating
/// instead of overflowing.
fn unit_secs(raw: Option<&str>, unit: char, secs_per_unit: u64) -> Option<u64> {
    raw?.trim()
        .trim_end_matches(unit)
        .parse::<u64>()
        .ok()
        .map(|n| n.saturating_mul(secs_per_unit))
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {key} value {raw:?}, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_behaviour() {
        let config = Config::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.session_lifetime(), Duration::from_secs(86_400));
        assert_eq!(config.rate_limit_requests, 500);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.server_port, 8080);
        assert!(!config.trust_proxy_headers);
    }

    #[test]
    fn unit_values_convert_to_seconds() {
        assert_eq!(unit_secs(Some("90"), 'm', 60), Some(5400));
        assert_eq!(unit_secs(Some(" 2h "), 'h', 3600), Some(7200));
        assert_eq!(unit_secs(Some("soon"), 'm', 60), None);
        assert_eq!(unit_secs(None, 'm', 60), None);
    }

    #[test]
    fn huge_unit_values_saturate() {
        let max = u64::MAX.to_string();
        assert_eq!(unit_secs(Some(&max), 'm', 60), Some(u64::MAX));
        assert_eq!(unit_secs(Some(&format!("{max}h")), 'h', 3600), Some(u64::MAX));

        let config = Config {
            cache_ttl_secs: u64::MAX,
            session_lifetime_secs: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.cache_ttl(), Duration::from_secs(u64::MAX));
        assert_eq!(config.session_lifetime(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn parse_or_falls_back_on_missing_key() {
        assert_eq!(parse_or("LINKPAGE_TEST_SURELY_UNSET", 42u32), 42);
    }
}
