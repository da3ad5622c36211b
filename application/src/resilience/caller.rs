//! Throttled, retrying, fallback-aware invocation of one unit of work

use autologic_domain::{ResilienceKey, ResilienceProfile};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use super::rate_limiter::RateLimiter;
use crate::ports::model_client::GatewayError;

/// Runs operations under one key's limiter and profile.
///
/// 1. Acquire a token.
/// 2. Invoke; transient failures are retried with exponential backoff while
///    attempts remain, re-acquiring a token before each retry.
/// 3. A fallback-eligible failure (after retries, or immediately if not
///    retryable) runs the fallback when the profile enables it. If the
///    fallback fails too, the original error is returned with the fallback's
///    error as its source.
/// 4. Anything else propagates as-is.
#[derive(Debug, Clone)]
pub struct ResilientCaller {
    key: ResilienceKey,
    profile: Arc<ResilienceProfile>,
    limiter: Arc<RateLimiter>,
}

impl ResilientCaller {
    pub fn new(
        key: ResilienceKey,
        profile: Arc<ResilienceProfile>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            key,
            profile,
            limiter,
        }
    }

    pub fn key(&self) -> &ResilienceKey {
        &self.key
    }

    pub fn profile(&self) -> &ResilienceProfile {
        &self.profile
    }

    /// Run `op` with throttling and retry, without a fallback
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        self.run(op, None::<fn() -> std::future::Ready<Result<T, GatewayError>>>)
            .await
    }

    /// Run `op` with throttling, retry and a fallback
    pub async fn call_with_fallback<T, F, Fut, G, GFut>(
        &self,
        op: F,
        fallback: G,
    ) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
        G: FnOnce() -> GFut,
        GFut: Future<Output = Result<T, GatewayError>>,
    {
        self.run(op, Some(fallback)).await
    }

    async fn run<T, F, Fut, G, GFut>(
        &self,
        mut op: F,
        fallback: Option<G>,
    ) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
        G: FnOnce() -> GFut,
        GFut: Future<Output = Result<T, GatewayError>>,
    {
        self.limiter.acquire().await;

        let max_attempts = self.profile.max_attempts();
        let mut attempt = 0;
        let error = loop {
            let e = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            attempt += 1;

            if e.classify().is_retryable() && attempt < max_attempts {
                let delay = self.profile.backoff(attempt - 1);
                warn!(
                    key = %self.key,
                    attempt,
                    max_attempts,
                    ?delay,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                self.limiter.acquire().await;
                continue;
            }
            break e;
        };

        if error.classify().is_fallback_eligible()
            && self.profile.fallback_enabled
            && let Some(fallback) = fallback
        {
            info!(key = %self.key, error = %error, "Primary call failed, invoking fallback");
            self.limiter.acquire().await;
            return match fallback().await {
                Ok(value) => Ok(value),
                Err(fallback_error) => {
                    warn!(key = %self.key, error = %fallback_error, "Fallback failed");
                    Err(GatewayError::FallbackFailed {
                        original: Box::new(error),
                        fallback: Box::new(fallback_error),
                    })
                }
            };
        }

        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn caller(profile: ResilienceProfile) -> ResilientCaller {
        ResilientCaller::new(
            ResilienceKey::new("test"),
            Arc::new(profile),
            Arc::new(RateLimiter::new(100.0)),
        )
    }

    /// Fails `failures` times with `error`, then succeeds
    async fn flaky(
        calls: &AtomicU32,
        failures: u32,
        error: fn() -> GatewayError,
    ) -> Result<&'static str, GatewayError> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < failures { Err(error()) } else { Ok("ok") }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_within_budget() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_retry(3, 0.1));
        let result = caller
            .call(|| flaky(&calls, 3, || GatewayError::http(503, "")))
            .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_retry(2, 0.1));
        let result = caller.call(|| flaky(&calls, 5, || GatewayError::Timeout)).await;
        assert!(matches!(result, Err(GatewayError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_disabled_means_single_attempt() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default());
        let result = caller.call(|| flaky(&calls, 1, || GatewayError::Timeout)).await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_exponential() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_retry(3, 1.0));
        let start = Instant::now();
        caller
            .call(|| flaky(&calls, 3, || GatewayError::http(429, "")))
            .await
            .unwrap();
        // 1 + 2 + 4 seconds of backoff
        assert!(start.elapsed() >= Duration::from_secs(7));
        assert!(start.elapsed() < Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_retry(3, 0.1).with_fallback(true));
        let fallback_calls = AtomicU32::new(0);
        let result = caller
            .call_with_fallback(
                || flaky(&calls, 9, || GatewayError::Authentication("bad key".into())),
                || async {
                    fallback_calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fallback")
                },
            )
            .await;
        assert!(matches!(result, Err(GatewayError::Authentication(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_model_goes_straight_to_fallback() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_retry(3, 0.1).with_fallback(true));
        let result = caller
            .call_with_fallback(
                || flaky(&calls, 9, || GatewayError::http(404, "No endpoints found")),
                || async { Ok("fallback") },
            )
            .await;
        assert_eq!(result.unwrap(), "fallback");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_after_exhausted_retries() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_retry(1, 0.1).with_fallback(true));
        let result = caller
            .call_with_fallback(
                || flaky(&calls, 9, || GatewayError::http(502, "")),
                || async { Ok("fallback") },
            )
            .await;
        assert_eq!(result.unwrap(), "fallback");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_disabled_propagates_original() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default());
        let result = caller
            .call_with_fallback(
                || flaky(&calls, 9, || GatewayError::http(404, "gone")),
                || async { Ok("fallback") },
            )
            .await;
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fallback_chains_original() {
        let calls = AtomicU32::new(0);
        let caller = caller(ResilienceProfile::default().with_fallback(true));
        let result: Result<&str, _> = caller
            .call_with_fallback(
                || flaky(&calls, 9, || GatewayError::http(404, "retired")),
                || async { Err(GatewayError::Timeout) },
            )
            .await;
        match result.unwrap_err() {
            GatewayError::FallbackFailed { original, fallback } => {
                assert_eq!(original.status(), Some(404));
                assert!(matches!(*fallback, GatewayError::Timeout));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
