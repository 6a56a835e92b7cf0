use dashmap::DashMap;
use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(10 * 60);

/// Id-keyed caches for the scalars pages ask for over and over.
///
/// Everything is dropped at once when the refresh interval has passed since the
/// last clear; the check runs lazily on each read. Writers evict single entries
/// through the `forget_*` methods.
#[derive(Debug)]
pub struct ScalarCache {
    product_names: DashMap<i32, String>,
    product_ratings: DashMap<i32, f64>,
    user_names: DashMap<i32, String>,
    manufacturer_names: DashMap<i32, String>,
    refresh_every: Duration,
    last_clear: Mutex<Instant>,
}

impl Default for ScalarCache {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH)
    }
}

impl ScalarCache {
    pub fn new(refresh_every: Duration) -> Self {
        Self {
            product_names: DashMap::new(),
            product_ratings: DashMap::new(),
            user_names: DashMap::new(),
            manufacturer_names: DashMap::new(),
            refresh_every,
            last_clear: Mutex::new(Instant::now()),
        }
    }

    /// Clear all four maps if the refresh interval has elapsed.
    pub fn refresh_if_stale(&self) {
        self.refresh_if_stale_at(Instant::now());
    }

    fn refresh_if_stale_at(&self, now: Instant) {
        let mut last_clear = match self.last_clear.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if now.saturating_duration_since(*last_clear) <= self.refresh_every {
            return;
        }

        tracing::debug!("clearing scalar caches");
        self.clear();
        *last_clear = now;
    }

    pub fn clear(&self) {
        self.product_names.clear();
        self.product_ratings.clear();
        self.user_names.clear();
        self.manufacturer_names.clear();
    }

    pub fn product_name(&self, id: i32) -> Option<String> {
        self.refresh_if_stale();
        self.product_names.get(&id).map(|v| v.clone())
    }

    pub fn put_product_name(&self, id: i32, name: String) {
        self.product_names.insert(id, name);
    }

    pub fn forget_product_name(&self, id: i32) {
        self.product_names.remove(&id);
    }

    pub fn product_rating(&self, id: i32) -> Option<f64> {
        self.refresh_if_stale();
        self.product_ratings.get(&id).map(|v| *v)
    }

    pub fn put_product_rating(&self, id: i32, rating: f64) {
        self.product_ratings.insert(id, rating);
    }

    pub fn forget_product_rating(&self, id: i32) {
        self.product_ratings.remove(&id);
    }

    pub fn user_name(&self, id: i32) -> Option<String> {
        self.refresh_if_stale();
        self.user_names.get(&id).map(|v| v.clone())
    }

    pub fn put_user_name(&self, id: i32, name: String) {
        self.user_names.insert(id, name);
    }

    pub fn forget_user_name(&self, id: i32) {
        self.user_names.remove(&id);
    }

    pub fn manufacturer_name(&self, id: i32) -> Option<String> {
        self.refresh_if_stale();
        self.manufacturer_names.get(&id).map(|v| v.clone())
    }

    pub fn put_manufacturer_name(&self, id: i32, name: String) {
        self.manufacturer_names.insert(id, name);
    }

    pub fn forget_manufacturer_name(&self, id: i32) {
        self.manufacturer_names.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn entries_are_independent() {
        let cache = ScalarCache::default();
        cache.put_product_name(1, "Widget".into());
        cache.put_user_name(1, "alice".into());
        cache.put_manufacturer_name(1, "Acme".into());
        cache.put_product_rating(1, 0.8);

        cache.forget_product_name(1);

        assert_eq!(cache.product_name(1), None);
        assert_eq!(cache.user_name(1).as_deref(), Some("alice"));
        assert_eq!(cache.manufacturer_name(1).as_deref(), Some("Acme"));
        assert_eq!(cache.product_rating(1), Some(0.8));
    }

    #[test]
    fn wholesale_clear_after_interval() {
        let cache = ScalarCache::new(Duration::from_secs(60));
        cache.put_product_name(7, "Lamp".into());
        cache.put_product_rating(7, 0.5);

        let start = *cache.last_clear.lock().unwrap();
        cache.refresh_if_stale_at(start + Duration::from_secs(30));
        assert_eq!(cache.product_names.len(), 1);

        cache.refresh_if_stale_at(start + Duration::from_secs(61));
        assert!(cache.product_names.is_empty());
        assert!(cache.product_ratings.is_empty());

        // the clock restarts from the clear
        cache.put_product_name(7, "Lamp".into());
        cache.refresh_if_stale_at(start + Duration::from_secs(100));
        assert_eq!(cache.product_names.len(), 1);
    }

    #[test]
    fn concurrent_access_is_safe() {
        let cache = Arc::new(ScalarCache::default());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.put_user_name(i, format!("user-{t}-{i}"));
                        let _ = cache.user_name(i);
                        if i % 3 == 0 {
                            cache.forget_user_name(i);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.user_names.len() <= 100);
    }
}
