use std::sync::Arc;

use config::Config;
use database::{Repository, Store};
use session::SessionStore;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod session;
pub mod utils;
pub mod views;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}

impl AppState {
    /// Wires a fresh cache and an empty session table around `store`.
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            repo: Arc::new(Repository::new(store, config.cache_ttl())),
            sessions: Arc::new(SessionStore::new(config.session_lifetime())),
            config,
        }
    }
}
