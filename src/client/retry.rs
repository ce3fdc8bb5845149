use std::time::Duration;

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::models::QuizResult;
use crate::session::SubmitRequest;

use super::gateway::SubmissionGateway;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_max: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(4),
            jitter_max: Some(Duration::from_millis(100)),
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn delay(&self, backoff: Duration) -> Duration {
        match self.jitter_max {
            Some(jitter_max) => {
                let jitter_ms = jitter_max.as_millis() as u64;
                let extra = if jitter_ms == 0 {
                    0
                } else {
                    rand::random::<u64>() % (jitter_ms + 1)
                };
                backoff + Duration::from_millis(extra)
            }
            None => backoff,
        }
    }
}

/// Run `f` until it succeeds, fails with an error `retryable` rejects, or
/// `max_attempts` calls have been made.
pub async fn retry_async_with_config<F, Fut, T, E, R>(
    config: &RetryConfig,
    retryable: R,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempts_left = config.max_attempts.max(1);
    let mut backoff = config.base_backoff;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempts_left = attempts_left.saturating_sub(1);
                if attempts_left == 0 || !retryable(&e) {
                    return Err(e);
                }

                tracing::warn!("Attempt failed, {} left: {}", attempts_left, e);
                tokio::time::sleep(config.delay(backoff)).await;
                backoff = std::cmp::min(backoff * 2, config.max_backoff);
            }
        }
    }
}

/// Gateway wrapper that retries transient failures with the same submission token.
pub struct RetryingGateway<G> {
    inner: G,
    config: RetryConfig,
}

impl<G> RetryingGateway<G> {
    pub fn new(inner: G, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: SubmissionGateway> SubmissionGateway for RetryingGateway<G> {
    async fn submit(&self, request: &SubmitRequest) -> Result<QuizResult, SubmitError> {
        retry_async_with_config(&self.config, SubmitError::is_retryable, || {
            self.inner.submit(request)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast(max_attempts: usize) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(10),
            jitter_max: None,
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_retries() {
        let counter = AtomicUsize::new(0);

        let res: Result<usize, SubmitError> =
            retry_async_with_config(&fast(3), SubmitError::is_retryable, || async {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(SubmitError::Unavailable("timeout".into()))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(res.unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_fails_after_max_attempts() {
        let counter = AtomicUsize::new(0);

        let res: Result<(), SubmitError> =
            retry_async_with_config(&fast(2), SubmitError::is_retryable, || async {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(SubmitError::Unavailable("down".into()))
            })
            .await;

        assert!(res.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let counter = AtomicUsize::new(0);

        let res: Result<(), SubmitError> =
            retry_async_with_config(&fast(5), SubmitError::is_retryable, || async {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(SubmitError::Rejected("already submitted".into()))
            })
            .await;

        assert_eq!(res.unwrap_err(), SubmitError::Rejected("already submitted".into()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
