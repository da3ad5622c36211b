//! Process-scoped store of resilience profiles and rate limiters

use arc_swap::ArcSwap;
use autologic_domain::{ResilienceKey, ResilienceProfile};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::caller::ResilientCaller;
use super::rate_limiter::RateLimiter;

struct Entry {
    profile: ArcSwap<ResilienceProfile>,
    limiter: Arc<RateLimiter>,
}

impl Entry {
    fn new(profile: ResilienceProfile) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::new(profile.rate_limit)),
            profile: ArcSwap::from_pointee(profile),
        }
    }
}

/// Limiters and profiles keyed by [`ResilienceKey`].
///
/// Unknown keys are created on first use with the default profile. Profiles
/// are read far more often than written, so each lives in an [`ArcSwap`];
/// the map lock is only taken for writing when a key is first seen.
#[derive(Default)]
pub struct ResilienceRegistry {
    entries: RwLock<HashMap<ResilienceKey, Arc<Entry>>>,
}

impl ResilienceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &ResilienceKey) -> Arc<Entry> {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = entries.get(key) {
                return Arc::clone(entry);
            }
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(entries.entry(key.clone()).or_insert_with(|| {
            debug!(key = %key, "Creating default resilience entry");
            Arc::new(Entry::new(ResilienceProfile::default()))
        }))
    }

    /// Current profile for a key
    pub fn profile(&self, key: &ResilienceKey) -> Arc<ResilienceProfile> {
        self.entry(key).profile.load_full()
    }

    /// Shared limiter for a key
    pub fn limiter(&self, key: &ResilienceKey) -> Arc<RateLimiter> {
        Arc::clone(&self.entry(key).limiter)
    }

    /// Replace a key's profile and retune its limiter to the new rate
    pub fn set_profile(&self, key: &ResilienceKey, profile: ResilienceProfile) {
        let entry = self.entry(key);
        entry.limiter.set_rate(profile.rate_limit);
        debug!(key = %key, rate = profile.rate_limit, retry = profile.retry_enabled,
            fallback = profile.fallback_enabled, "Resilience profile updated");
        entry.profile.store(Arc::new(profile));
    }

    /// A caller bound to the key's limiter, using `override_profile` instead
    /// of the registered profile when given
    pub fn caller(
        &self,
        key: &ResilienceKey,
        override_profile: Option<&ResilienceProfile>,
    ) -> ResilientCaller {
        let entry = self.entry(key);
        let profile = match override_profile {
            Some(profile) => Arc::new(profile.clone()),
            None => entry.profile.load_full(),
        };
        ResilientCaller::new(key.clone(), profile, Arc::clone(&entry.limiter))
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<ResilienceKey> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<_> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for ResilienceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilienceRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
