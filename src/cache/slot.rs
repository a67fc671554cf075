use std::time::{Duration, Instant};

use parking_lot::RwLock;

struct Entry<T> {
    value: T,
    /// `None` when `now + ttl` does not fit in an `Instant`
    expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now <= expires_at)
    }
}

/// One cached record with its own expiry.
///
/// Expiry is lazy: a stale value stays in the slot until the next `set` or
/// `invalidate`, and `get` simply stops returning it. Readers share the
/// lock; `set` and `invalidate` take it exclusively.
pub struct CacheSlot<T> {
    ttl: Duration,
    entry: RwLock<Option<Entry<T>>>,
}

impl<T: Clone> CacheSlot<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the cached value if one is present and not past its expiry.
    pub fn get(&self) -> Option<T> {
        let now = Instant::now();
        self.entry
            .read()
            .as_ref()
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Replaces the cached value and restarts its time-to-live.
    pub fn set(&self, value: T) {
        let expires_at = Instant::now().checked_add(self.ttl);
        *self.entry.write() = Some(Entry { value, expires_at });
    }

    /// Drops the cached value regardless of its expiry.
    pub fn invalidate(&self) {
        *self.entry.write() = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn empty_slot_misses() {
        let slot: CacheSlot<String> = CacheSlot::new(Duration::from_secs(60));
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let slot = CacheSlot::new(Duration::from_secs(60));
        slot.set(1);
        slot.set(2);
        assert_eq!(slot.get(), Some(2));
    }

    #[test]
    fn invalidate_clears_fresh_value() {
        let slot = CacheSlot::new(Duration::from_secs(3600));
        slot.set("cached");
        slot.invalidate();
        assert_eq!(slot.get(), None);

        // invalidating an empty slot is fine too
        slot.invalidate();
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn value_expires_after_ttl() {
        let slot = CacheSlot::new(Duration::from_millis(10));
        slot.set(7u32);
        assert_eq!(slot.get(), Some(7));

        thread::sleep(Duration::from_millis(20));
        assert_eq!(slot.get(), None);

        // a fresh set restarts the clock
        slot.set(8);
        assert_eq!(slot.get(), Some(8));
    }

    #[test]
    fn huge_ttl_never_expires() {
        let slot = CacheSlot::new(Duration::MAX);
        slot.set(1u8);
        assert_eq!(slot.get(), Some(1));
    }
}
