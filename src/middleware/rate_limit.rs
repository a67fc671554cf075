use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};

use crate::config::Config;

/// Clients tracked before idle limiters are dropped.
const MAX_TRACKED_CLIENTS: usize = 10_000;

type DirectRateLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct ClientLimiter {
    limiter: DirectRateLimiter,
    last_seen: Instant,
}

/// Per-client request budget: `max_requests` per `window`, refilled
/// gradually, one limiter per client address.
pub struct RateLimiter {
    quota: Quota,
    window: Duration,
    trust_proxy_headers: bool,
    max_clients: usize,
    limiters: DashMap<IpAddr, ClientLimiter>,
    clock: DefaultClock,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            quota,
            window,
            trust_proxy_headers: false,
            max_clients: MAX_TRACKED_CLIENTS,
            limiters: DashMap::new(),
            clock: DefaultClock::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_window(), config.rate_limit_requests)
            .trust_proxy_headers(config.trust_proxy_headers)
    }

    /// Key clients on `X-Real-IP` / `X-Forwarded-For` instead of the peer
    /// address. Only safe behind a proxy that overwrites those headers.
    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// Counts one request from `client`. Returns how long to wait when the
    /// client is over budget.
    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        let now = Instant::now();
        if !self.limiters.contains_key(&client) && self.limiters.len() >= self.max_clients {
            self.prune(now);
        }

        let mut entry = self.limiters.entry(client).or_insert_with(|| ClientLimiter {
            limiter: governor::RateLimiter::direct(self.quota),
            last_seen: now,
        });
        entry.last_seen = now;

        entry
            .limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// A client idle for a whole window is back to a full budget, so its
    /// limiter can go. If most clients are still active the table is reset.
    fn prune(&self, now: Instant) {
        let window = self.window;
        self.limiters
            .retain(|_, c| now.duration_since(c.last_seen) < window);

        if self.limiters.len() > self.max_clients / 2 {
            tracing::warn!(
                "Rate limiter tracking {} active clients, resetting",
                self.limiters.len()
            );
            self.limiters.clear();
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiters.len()
    }

    /// Peer address, or the first parseable proxy header when trusted.
    fn client_ip(&self, headers: &HeaderMap, remote: Option<SocketAddr>) -> IpAddr {
        let forwarded = self
            .trust_proxy_headers
            .then(|| forwarded_ip(headers))
            .flatten();

        forwarded
            .or(remote.map(|addr| addr.ip()))
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    #[cfg(test)]
    fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }
}

/// `X-Real-IP`, then the first `X-Forwarded-For` hop. Values that are not
/// an IP address are ignored.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok());

    real_ip.or_else(|| {
        headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|ip| ip.trim().parse().ok())
    })
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let client = limiter.client_ip(req.headers(), remote);

    if let Err(wait) = limiter.check(client) {
        let retry_after = wait.as_secs().max(1);
        tracing::warn!("Rate limit exceeded for {}", client);

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            format!("Too many requests, retry in {retry_after} seconds"),
        )
            .into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        return response;
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn budget_is_per_client() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        assert!(limiter.check(ip("1.2.3.4")).is_ok());
        assert!(limiter.check(ip("1.2.3.4")).is_ok());

        let wait = limiter.check(ip("1.2.3.4")).unwrap_err();
        assert!(wait <= Duration::from_secs(30));

        assert!(limiter.check(ip("5.6.7.8")).is_ok());
        assert!(limiter.check(ip("1.2.3.4")).is_err());
    }

    #[test]
    fn budget_refills_over_the_window() {
        let limiter = RateLimiter::new(Duration::from_millis(40), 2);
        assert!(limiter.check(ip("1.2.3.4")).is_ok());
        assert!(limiter.check(ip("1.2.3.4")).is_ok());
        assert!(limiter.check(ip("1.2.3.4")).is_err());

        thread::sleep(Duration::from_millis(50));
        assert!(limiter.check(ip("1.2.3.4")).is_ok());
    }

    #[test]
    fn zero_budget_still_admits_one_request() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 0);
        assert!(limiter.check(ip("1.2.3.4")).is_ok());
        assert!(limiter.check(ip("1.2.3.4")).is_err());
    }

    #[test]
    fn tracked_clients_stay_bounded() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2).with_max_clients(64);

        for n in 0..30_000u32 {
            let client = IpAddr::from(n.to_be_bytes());
            assert!(limiter.check(client).is_ok());
            assert!(limiter.tracked_clients() <= 64);
        }
    }

    #[test]
    fn idle_clients_are_pruned_first() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 2).with_max_clients(4);
        for n in 0..4u8 {
            limiter.check(ip(&format!("10.0.0.{n}"))).unwrap();
        }

        thread::sleep(Duration::from_millis(30));
        limiter.check(ip("10.0.0.1")).unwrap();
        limiter.check(ip("10.0.0.9")).unwrap();
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn proxy_headers_are_ignored_unless_trusted() {
        let remote: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));

        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        assert_eq!(limiter.client_ip(&headers, Some(remote)), ip("10.0.0.1"));
        assert_eq!(
            limiter.client_ip(&HeaderMap::new(), None),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn trusted_proxy_headers_must_parse() {
        let remote: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        let limiter = RateLimiter::new(Duration::from_secs(60), 2).trust_proxy_headers(true);

        let mut headers = HeaderMap::new();
        assert_eq!(limiter.client_ip(&headers, Some(remote)), ip("10.0.0.1"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.9 , 10.0.0.2"),
        );
        assert_eq!(limiter.client_ip(&headers, Some(remote)), ip("203.0.113.9"));

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(limiter.client_ip(&headers, Some(remote)), ip("198.51.100.7"));

        headers.insert("x-real-ip", HeaderValue::from_static("not-an-ip"));
        assert_eq!(limiter.client_ip(&headers, Some(remote)), ip("203.0.113.9"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage-1, 10.0.0.2"));
        assert_eq!(limiter.client_ip(&headers, Some(remote)), ip("10.0.0.1"));
    }

    #[test]
    fn rotating_garbage_headers_share_the_peer_budget() {
        let remote: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        let limiter = RateLimiter::new(Duration::from_secs(60), 2).trust_proxy_headers(true);

        let allowed = (0..1000)
            .filter(|n| {
                let mut headers = HeaderMap::new();
                headers.insert(
                    "x-forwarded-for",
                    HeaderValue::from_str(&format!("client-{n}")).unwrap(),
                );
                limiter.check(limiter.client_ip(&headers, Some(remote))).is_ok()
            })
            .count();

        assert_eq!(allowed, 2);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
