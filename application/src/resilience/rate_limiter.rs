//! Token-bucket rate limiter

use autologic_domain::clamp_rate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Per-key token bucket.
///
/// Holds at most `rate` tokens, so it allows a burst of `rate` calls and then
/// sustains `rate` calls per second. Token accounting is serialized by one
/// async mutex that is held across the wait, so concurrent callers queue in
/// arrival order instead of racing for the same refill.
pub struct RateLimiter {
    /// `f64` bits, so the rate can be changed without taking the bucket lock
    rate: AtomicU64,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket
    pub fn new(rate: f64) -> Self {
        let rate = clamp_rate(rate);
        Self {
            rate: AtomicU64::new(rate.to_bits()),
            state: Mutex::new(BucketState {
                tokens: rate,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn rate(&self) -> f64 {
        f64::from_bits(self.rate.load(Ordering::Acquire))
    }

    /// Change the rate in place; accumulated tokens are kept
    pub fn set_rate(&self, rate: f64) {
        self.rate.store(clamp_rate(rate).to_bits(), Ordering::Release);
    }

    /// Wait until a token is available, then consume it
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        let rate = self.rate();
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        let available = (state.tokens + elapsed * rate).min(rate);

        if available < 1.0 {
            let wait = Duration::from_secs_f64((1.0 - available) / rate);
            trace!(?wait, rate, "Rate limiter waiting for a token");
            tokio::time::sleep(wait).await;
            // The token accrued during the wait is the one being consumed
            state.tokens = 0.0;
            state.last_refill = Instant::now();
        } else {
            state.tokens = available - 1.0;
            state.last_refill = now;
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").field("rate", &self.rate()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn time_acquires(limiter: &RateLimiter, n: usize) -> Duration {
        let start = Instant::now();
        for _ in 0..n {
            limiter.acquire().await;
        }
        start.elapsed()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_up_to_rate_is_immediate() {
        let limiter = RateLimiter::new(5.0);
        assert_eq!(time_acquires(&limiter, 5).await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sustained_throughput_bound() {
        // N=10, R=2 => at least (N-R)/R = 4s
        let limiter = RateLimiter::new(2.0);
        let elapsed = time_acquires(&limiter, 10).await;
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(4100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_one_rate_always_waits() {
        let limiter = RateLimiter::new(0.5);
        let elapsed = time_acquires(&limiter, 2).await;
        // Bucket caps at 0.5 tokens: 1s for the first, 2s for the second
        assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_refills_while_idle() {
        let limiter = RateLimiter::new(2.0);
        time_acquires(&limiter, 2).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(time_acquires(&limiter, 2).await, Duration::ZERO);
    }

    #[test]
    fn test_set_rate_clamps() {
        let limiter = RateLimiter::new(5.0);
        limiter.set_rate(0.0);
        assert_eq!(limiter.rate(), 0.1);
        limiter.set_rate(12.0);
        assert_eq!(limiter.rate(), 12.0);
        assert_eq!(RateLimiter::new(-1.0).rate(), 0.1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_bucket() {
        let limiter = Arc::new(RateLimiter::new(2.0));
        let start = Instant::now();
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
