use anyhow::Result;
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Retry an async operation with exponential backoff. Only transient
/// failures are retried; anything else returns immediately.
pub async fn retry_with_backoff<T, F, Fut>(config: &RetryConfig, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>> + Send + 'static,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.base_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt >= max_attempts {
                    warn!("Operation failed after {} attempts: {}", max_attempts, e);
                    return Err(e);
                }

                if !is_transient_error(&e) {
                    debug!("Attempt {} failed with non-transient error, not retrying: {}", attempt, e);
                    return Err(e);
                }

                debug!("Attempt {} failed transiently, retrying in {:?}: {}", attempt, delay, e);
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(
                    Duration::from_millis(
                        (delay.as_millis() as f64 * config.backoff_multiplier) as u64,
                    ),
                    config.max_delay,
                );
            }
        }
    }
}

fn is_transient_error(error: &anyhow::Error) -> bool {
    let error_str = error.to_string().to_lowercase();

    // Network-level hiccups and upstream statuses worth a second try
    error_str.contains("timeout")
        || error_str.contains("connection")
        || error_str.contains("network")
        || error_str.contains("temporarily")
        || error_str.contains("service unavailable")
        || error_str.contains("bad gateway")
        || error_str.contains("gateway timeout")
        || error_str.contains("429")
        || error_str.contains("502")
        || error_str.contains("503")
        || error_str.contains("504")
}
