//! Free-tier model cache used for gateway fallback

use autologic_application::GatewayError;
use rand::seq::SliceRandom;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How long a fetched listing stays fresh
pub const DEFAULT_FREE_MODEL_TTL: Duration = Duration::from_secs(60 * 60);

struct Snapshot {
    fetched_at: Instant,
    models: Arc<Vec<String>>,
}

/// Lazily populated list of free models, shared by every gateway client a
/// factory creates.
///
/// The listing is fetched on first use and again once it is older than the
/// TTL. The lock is held across the fetch so concurrent fallbacks trigger a
/// single request. A failed fetch is not cached.
pub struct FreeModelCache {
    ttl: Duration,
    state: Mutex<Option<Snapshot>>,
}

impl Default for FreeModelCache {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_MODEL_TTL)
    }
}

impl FreeModelCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current listing, fetching it with `fetch` when missing or stale.
    ///
    /// `None` when the fetch fails.
    pub async fn models<F, Fut>(&self, fetch: F) -> Option<Arc<Vec<String>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, GatewayError>>,
    {
        let mut state = self.state.lock().await;
        if let Some(snapshot) = state.as_ref()
            && snapshot.fetched_at.elapsed() < self.ttl
        {
            return Some(Arc::clone(&snapshot.models));
        }

        match fetch().await {
            Ok(models) => {
                info!(count = models.len(), "Free model listing refreshed");
                let models = Arc::new(models);
                *state = Some(Snapshot {
                    fetched_at: Instant::now(),
                    models: Arc::clone(&models),
                });
                Some(models)
            }
            Err(e) => {
                warn!(error = %e, "Could not fetch free models for fallback");
                None
            }
        }
    }

    /// A random free model other than `current`
    pub async fn pick_other<F, Fut>(&self, current: &str, fetch: F) -> Option<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, GatewayError>>,
    {
        let models = self.models(fetch).await?;
        let candidates: Vec<&String> = models.iter().filter(|m| m.as_str() != current).collect();
        let choice = candidates
            .choose(&mut rand::thread_rng())
            .map(|m| (*m).clone());
        if choice.is_none() {
            debug!(current, "No alternative free model available");
        }
        choice
    }
}
