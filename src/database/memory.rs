use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Store, verify_and_upgrade};
use crate::{
    error::StoreError,
    models::{Banner, Link, Profile},
    utils::hash_password,
};

#[derive(Default)]
struct Tables {
    profile: Profile,
    /// Links with their insertion sequence, standing in for `created_at`
    links: Vec<(u64, Link)>,
    next_seq: u64,
    banner: Banner,
    credential: String,
}

/// In-process [`Store`] with the same ordering and credential rules as
/// [`PgStore`](super::PgStore). Counts reads and can be told to fail, which
/// is what the tests need from it.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.tables.lock().profile = profile;
        self
    }

    pub fn with_links(self, links: impl IntoIterator<Item = Link>) -> Self {
        {
            let mut tables = self.tables.lock();
            for link in links {
                let seq = tables.next_seq;
                tables.next_seq += 1;
                tables.links.push((seq, link));
            }
        }
        self
    }

    /// Sets the stored credential verbatim. A value shorter than a bcrypt
    /// hash is treated as legacy plaintext.
    pub fn with_stored_credential(self, stored: impl Into<String>) -> Self {
        self.tables.lock().credential = stored.into();
        self
    }

    pub fn stored_credential(&self) -> String {
        self.tables.lock().credential.clone()
    }

    /// Number of profile, link and banner reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn begin_read(&self) -> Result<(), StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read_profile(&self) -> Result<Profile, StoreError> {
        self.begin_read()?;
        Ok(self.tables.lock().profile.clone())
    }

    async fn write_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.begin_write()?;
        self.tables.lock().profile = profile.clone();
        Ok(())
    }

    async fn read_links(&self) -> Result<Vec<Link>, StoreError> {
        self.begin_read()?;
        let mut links = self.tables.lock().links.clone();
        links.sort_by(|(a_seq, a), (b_seq, b)| {
            b.featured.cmp(&a.featured).then(b_seq.cmp(a_seq))
        });
        Ok(links.into_iter().map(|(_, link)| link).collect())
    }

    async fn write_link(&self, link: &Link) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut tables = self.tables.lock();
        if tables.links.iter().any(|(_, l)| l.id == link.id) {
            return Err(StoreError::Unavailable(format!("duplicate link id {}", link.id)));
        }
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.links.push((seq, link.clone()));
        Ok(())
    }

    async fn delete_link(&self, id: &str) -> Result<(), StoreError> {
        self.begin_write()?;
        self.tables.lock().links.retain(|(_, link)| link.id != id);
        Ok(())
    }

    async fn set_link_featured(&self, id: &str, featured: bool) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut tables = self.tables.lock();
        if let Some((_, link)) = tables.links.iter_mut().find(|(_, link)| link.id == id) {
            link.featured = featured;
        }
        Ok(())
    }

    async fn read_banner(&self) -> Result<Banner, StoreError> {
        self.begin_read()?;
        Ok(self.tables.lock().banner.clone())
    }

    async fn write_banner(&self, banner: &Banner) -> Result<(), StoreError> {
        self.begin_write()?;
        self.tables.lock().banner = banner.clone();
        Ok(())
    }

    async fn verify_credential(&self, secret: &str) -> Result<bool, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }

        let stored = self.stored_credential();
        verify_and_upgrade(&stored, secret, || self.set_credential(secret)).await
    }

    async fn set_credential(&self, secret: &str) -> Result<(), StoreError> {
        self.begin_write()?;
        let hashed = hash_password(secret)?;
        self.tables.lock().credential = hashed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str, featured: bool) -> Link {
        Link {
            id: id.into(),
            title: format!("Link {id}"),
            url: format!("https://example.com/{id}"),
            featured,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn links_are_featured_first_then_newest() {
        let store = MemoryStore::new().with_links([
            link("old", false),
            link("star", true),
            link("new", false),
        ]);
        store.write_link(&link("newest", false)).await.unwrap();

        let ids: Vec<_> = store
            .read_links()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, ["star", "newest", "new", "old"]);
    }

    #[tokio::test]
    async fn duplicate_link_id_is_rejected() {
        let store = MemoryStore::new().with_links([link("a", false)]);
        assert!(store.write_link(&link("a", true)).await.is_err());
    }

    #[tokio::test]
    async fn legacy_credential_is_upgraded_on_success() {
        let store = MemoryStore::new().with_stored_credential("changeme");

        assert!(!store.verify_credential("wrong").await.unwrap());
        assert_eq!(store.stored_credential(), "changeme");

        assert!(store.verify_credential("changeme").await.unwrap());
        let upgraded = store.stored_credential();
        assert_eq!(upgraded.len(), 60);
        assert_ne!(upgraded, "changeme");

        // the hashed form keeps accepting the same secret
        assert!(store.verify_credential("changeme").await.unwrap());
        assert_eq!(store.stored_credential(), upgraded);
    }

    #[tokio::test]
    async fn failed_upgrade_still_verifies() {
        let store = MemoryStore::new().with_stored_credential("changeme");
        store.fail_writes(true);

        assert!(store.verify_credential("changeme").await.unwrap());
        assert_eq!(store.stored_credential(), "changeme");
    }

    #[tokio::test]
    async fn set_credential_stores_a_hash() {
        let store = MemoryStore::new();
        store.set_credential("new-secret").await.unwrap();
        assert!(store.stored_credential().starts_with("$2"));
        assert!(store.verify_credential("new-secret").await.unwrap());
        assert!(!store.verify_credential("changeme").await.unwrap());
    }
}
