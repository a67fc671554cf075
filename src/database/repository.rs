use std::sync::Arc;
use std::time::Duration;

use super::Store;
use crate::{
    cache::Cache,
    error::StoreError,
    models::{Banner, Link, Profile},
};

/// Store access for request handlers.
///
/// Reads go through the cache and fill it on a miss; successful writes
/// invalidate the record they touched. Failed reads cache nothing and failed
/// writes leave the cache alone. The store is never called with a cache lock
/// held.
pub struct Repository {
    store: Arc<dyn Store>,
    cache: Cache,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: Cache::new(cache_ttl),
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub async fn profile(&self) -> Result<Profile, StoreError> {
        if let Some(profile) = self.cache.profile().get() {
            return Ok(profile);
        }

        let profile = self.store.read_profile().await?;
        self.cache.profile().set(profile.clone());
        Ok(profile)
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.store.write_profile(profile).await?;
        self.cache.profile().invalidate();
        tracing::debug!("Profile updated, cache invalidated");
        Ok(())
    }

    pub async fn links(&self) -> Result<Vec<Link>, StoreError> {
        if let Some(links) = self.cache.links().get() {
            return Ok(links);
        }

        let links = self.store.read_links().await?;
        self.cache.links().set(links.clone());
        Ok(links)
    }

    pub async fn add_link(&self, link: &Link) -> Result<(), StoreError> {
        self.store.write_link(link).await?;
        self.cache.links().invalidate();
        tracing::debug!("Link {} added, cache invalidated", link.id);
        Ok(())
    }

    pub async fn delete_link(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_link(id).await?;
        self.cache.links().invalidate();
        tracing::debug!("Link {} deleted, cache invalidated", id);
        Ok(())
    }

    pub async fn set_link_featured(&self, id: &str, featured: bool) -> Result<(), StoreError> {
        self.store.set_link_featured(id, featured).await?;
        self.cache.links().invalidate();
        Ok(())
    }

    pub async fn banner(&self) -> Result<Banner, StoreError> {
        if let Some(banner) = self.cache.banner().get() {
            return Ok(banner);
        }

        let banner = self.store.read_banner().await?;
        self.cache.banner().set(banner.clone());
        Ok(banner)
    }

    pub async fn update_banner(&self, banner: &Banner) -> Result<(), StoreError> {
        self.store.write_banner(banner).await?;
        self.cache.banner().invalidate();
        tracing::debug!("Banner updated, cache invalidated");
        Ok(())
    }

    pub async fn verify_credential(&self, secret: &str) -> Result<bool, StoreError> {
        self.store.verify_credential(secret).await
    }

    pub async fn set_credential(&self, secret: &str) -> Result<(), StoreError> {
        self.store.set_credential(secret).await
    }
}
