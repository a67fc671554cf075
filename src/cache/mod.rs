//! Read-through cache for the three records the public page needs.
//!
//! The working set is fixed: one profile, one link collection, one banner.
//! Each lives in its own [`CacheSlot`] with its own lock, so a profile write
//! never waits on a links read. There is no capacity limit and no sweeper.

mod slot;

use std::time::Duration;

pub use slot::CacheSlot;

use crate::models::{Banner, Link, Profile};

pub struct Cache {
    profile: CacheSlot<Profile>,
    links: CacheSlot<Vec<Link>>,
    banner: CacheSlot<Banner>,
}

impl Cache {
    /// Creates an empty cache applying `ttl` to all three records.
    pub fn new(ttl: Duration) -> Self {
        Self {
            profile: CacheSlot::new(ttl),
            links: CacheSlot::new(ttl),
            banner: CacheSlot::new(ttl),
        }
    }

    pub fn profile(&self) -> &CacheSlot<Profile> {
        &self.profile
    }

    pub fn links(&self) -> &CacheSlot<Vec<Link>> {
        &self.links
    }

    pub fn banner(&self) -> &CacheSlot<Banner> {
        &self.banner
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            title: format!("{name} title"),
            subtitle: format!("{name} subtitle"),
            description: format!("{name} description"),
            avatar: format!("/{name}.png"),
        }
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = Cache::new(Duration::from_secs(300));
        assert_eq!(cache.profile().ttl(), Duration::from_secs(300));
        assert!(cache.profile().get().is_none());
        assert!(cache.links().get().is_none());
        assert!(cache.banner().get().is_none());
    }

    #[test]
    fn profile_set_get_invalidate() {
        let cache = Cache::new(Duration::from_secs(3600));
        cache.profile().set(profile("Test"));

        assert_eq!(cache.profile().get(), Some(profile("Test")));

        cache.profile().invalidate();
        assert_eq!(cache.profile().get(), None);
    }

    #[test]
    fn profile_expires() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.profile().set(profile("Test"));
        assert!(cache.profile().get().is_some());

        thread::sleep(Duration::from_millis(20));
        assert!(cache.profile().get().is_none());
    }

    #[test]
    fn links_keep_order() {
        let cache = Cache::new(Duration::from_secs(3600));
        let links = vec![
            Link {
                id: "1".into(),
                title: "Link 1".into(),
                url: "https://example.com".into(),
                ..Default::default()
            },
            Link {
                id: "2".into(),
                title: "Link 2".into(),
                url: "https://example.org".into(),
                ..Default::default()
            },
        ];
        cache.links().set(links.clone());
        assert_eq!(cache.links().get(), Some(links));

        cache.links().invalidate();
        assert!(cache.links().get().is_none());
    }

    #[test]
    fn an_empty_link_list_is_still_a_hit() {
        let cache = Cache::new(Duration::from_secs(3600));
        cache.links().set(Vec::new());
        assert_eq!(cache.links().get(), Some(Vec::new()));
    }

    #[test]
    fn banner_set_get_invalidate() {
        let cache = Cache::new(Duration::from_secs(3600));
        let banner = Banner {
            enabled: true,
            text: "Test Banner".into(),
            link: "https://example.com".into(),
            kind: "info".into(),
        };
        cache.banner().set(banner.clone());
        assert_eq!(cache.banner().get(), Some(banner));

        cache.banner().invalidate();
        assert!(cache.banner().get().is_none());
    }

    #[test]
    fn kinds_are_independent() {
        let cache = Cache::new(Duration::from_secs(3600));
        cache.profile().set(profile("Test"));
        cache.banner().set(Banner::default());

        cache.links().invalidate();
        cache.profile().invalidate();

        assert!(cache.profile().get().is_none());
        assert_eq!(cache.banner().get(), Some(Banner::default()));
    }

    #[test]
    fn concurrent_set_get_invalidate() {
        let cache = Cache::new(Duration::from_secs(3600));

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..100 {
                    cache.profile().set(profile(&format!("writer-{i}")));
                }
            });
            s.spawn(|| {
                for _ in 0..100 {
                    if let Some(p) = cache.profile().get() {
                        // every field comes from the same `set`
                        assert_eq!(p, profile(&p.name));
                    }
                }
            });
            s.spawn(|| {
                for _ in 0..100 {
                    cache.profile().invalidate();
                }
            });
        });
    }
}
