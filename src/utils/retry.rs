//! Retry with exponential backoff for metadata API calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failure
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Backoff delay after `failures` consecutive failures (1-based)
    pub fn delay_for(&self, failures: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .powi(failures.saturating_sub(1) as i32);
        let secs = (self.initial_delay.as_secs_f64() * factor).min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Kinds of failure worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientError {
    Network,
    RateLimit,
    ServerError,
    Timeout,
}

impl TransientError {
    /// Classify a source error; `None` means it is permanent
    pub fn classify(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::RateLimit => Some(TransientError::RateLimit),
            SourceError::Network(msg) if msg.to_lowercase().contains("timed out") => {
                Some(TransientError::Timeout)
            }
            SourceError::Network(_) => Some(TransientError::Network),
            SourceError::Api(msg) => {
                let msg = msg.to_lowercase();
                if msg.contains("timeout") {
                    Some(TransientError::Timeout)
                } else if ["500", "502", "503", "504"].iter().any(|code| msg.contains(code))
                    || msg.contains("unavailable")
                {
                    Some(TransientError::ServerError)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Minimum wait before retrying this kind of failure
    pub fn minimum_delay(self) -> Duration {
        match self {
            TransientError::RateLimit => Duration::from_secs(5),
            TransientError::ServerError => Duration::from_secs(2),
            TransientError::Network | TransientError::Timeout => Duration::ZERO,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or runs out of attempts
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        let Some(transient) = TransientError::classify(&error) else {
            return Err(error);
        };
        if attempt >= config.max_attempts {
            tracing::warn!("Giving up after {} attempts: {}", attempt, error);
            return Err(error);
        }

        let delay = config.delay_for(attempt).max(transient.minimum_delay());
        tracing::debug!(
            "Transient {:?} on attempt {}, retrying in {:?}",
            transient,
            attempt,
            delay
        );
        sleep(delay).await;
    }
}

/// Retry settings used for the CrossRef API
pub fn api_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 4,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(60),
        backoff_multiplier: 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .max_attempts(4)
            .initial_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let calls = Cell::new(0);
        let result = with_retry(fast(), || {
            calls.set(calls.get() + 1);
            async { Ok::<_, SourceError>("ok") }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_network_failures() {
        let calls = Cell::new(0);
        let result = with_retry(fast(), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(SourceError::Network("connection reset".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(fast(), || {
            calls.set(calls.get() + 1);
            async { Err(SourceError::Parse("bad json".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(SourceError::Parse(_))));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(fast().max_attempts(2), || {
            calls.set(calls.get() + 1);
            async { Err(SourceError::Network("down".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            TransientError::classify(&SourceError::RateLimit),
            Some(TransientError::RateLimit)
        );
        assert_eq!(
            TransientError::classify(&SourceError::Api("CrossRef returned 503".to_string())),
            Some(TransientError::ServerError)
        );
        assert_eq!(
            TransientError::classify(&SourceError::Api("CrossRef returned 400".to_string())),
            None
        );
        assert_eq!(
            TransientError::classify(&SourceError::Network("operation timed out".to_string())),
            Some(TransientError::Timeout)
        );
    }

    #[test]
    fn test_delay_for_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        };
        assert_eq!(config.delay_for(1), Duration::from_secs(1));
        assert_eq!(config.delay_for(2), Duration::from_secs(2));
        assert_eq!(config.delay_for(3), Duration::from_secs(4));
        assert_eq!(config.delay_for(4), Duration::from_secs(5));
    }
}
