//! Backing store access.
//!
//! [`Store`] is the narrow contract the site needs from persistence;
//! [`Repository`] layers the read cache on top of it.

mod credential;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;
mod repository;

use async_trait::async_trait;

use credential::verify_and_upgrade;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::Repository;

use crate::{
    error::StoreError,
    models::{Banner, Link, Profile},
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn read_profile(&self) -> Result<Profile, StoreError>;
    async fn write_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Featured links first, then by sort order, newest first.
    async fn read_links(&self) -> Result<Vec<Link>, StoreError>;
    async fn write_link(&self, link: &Link) -> Result<(), StoreError>;
    async fn delete_link(&self, id: &str) -> Result<(), StoreError>;
    async fn set_link_featured(&self, id: &str, featured: bool) -> Result<(), StoreError>;

    async fn read_banner(&self) -> Result<Banner, StoreError>;
    async fn write_banner(&self, banner: &Banner) -> Result<(), StoreError>;

    /// Checks `secret` against the stored admin credential. A matching
    /// legacy plaintext credential is re-stored as a bcrypt hash.
    async fn verify_credential(&self, secret: &str) -> Result<bool, StoreError>;
    async fn set_credential(&self, secret: &str) -> Result<(), StoreError>;
}
