//! Server-side admin sessions.
//!
//! A session is nothing more than a random token mapped to an absolute
//! expiry. Tokens live only in this process; a restart logs everyone out.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{error::SessionError, utils::random_hex};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// 32 random bytes, 64 hex characters once encoded.
const TOKEN_BYTES: usize = 32;

pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

pub struct SessionStore {
    lifetime: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_LIFETIME)
    }
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a new token valid for the configured lifetime.
    pub fn create(&self) -> Result<String, SessionError> {
        let token = random_hex(TOKEN_BYTES)?;
        let expires_at = chrono::Duration::from_std(self.lifetime)
            .ok()
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.sessions.write().insert(token.clone(), expires_at);
        tracing::debug!("Created session expiring at {}", expires_at);

        Ok(token)
    }

    /// Whether `token` names a live session. An expired session found here is
    /// removed on the spot.
    pub fn validate(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        let expires_at = match self.sessions.read().get(token) {
            Some(expires_at) => *expires_at,
            None => return false,
        };
        if Utc::now() <= expires_at {
            return true;
        }

        // Re-check under the write lock; only an entry that is still expired
        // gets dropped.
        let mut sessions = self.sessions.write();
        match sessions.get(token) {
            Some(expires_at) if Utc::now() > *expires_at => {
                sessions.remove(token);
                tracing::debug!("Evicted expired session");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Removes `token`. Unknown tokens are ignored.
    pub fn delete(&self, token: &str) {
        self.sessions.write().remove(token);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn set_expiry(&self, token: &str, expires_at: DateTime<Utc>) {
        self.sessions.write().insert(token.to_string(), expires_at);
    }

    #[cfg(test)]
    fn contains(&self, token: &str) -> bool {
        self.sessions.read().contains_key(token)
    }
}
