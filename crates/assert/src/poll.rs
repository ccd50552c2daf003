// Eventually-Style Polling
// Engine state moves asynchronously; these helpers retry an assertion until
// it holds or a deadline passes. Built on tokio::time so tests can run under
// a paused clock.

use crate::error::AssertionError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const TIMEOUT_ENV: &str = "PROCFLOW_ASSERT_TIMEOUT_MS";
const INTERVAL_ENV: &str = "PROCFLOW_ASSERT_INTERVAL_MS";

/// Poll behavior for [`eventually`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub timeout_ms: u64,
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            interval_ms: 100,
        }
    }
}

impl PollConfig {
    /// Defaults, overridden by `PROCFLOW_ASSERT_TIMEOUT_MS` and
    /// `PROCFLOW_ASSERT_INTERVAL_MS` when set to valid millisecond values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(timeout_ms) = env_millis(TIMEOUT_ENV) {
            config.timeout_ms = timeout_ms;
        }
        if let Some(interval_ms) = env_millis(INTERVAL_ENV) {
            config.interval_ms = interval_ms;
        }
        config
    }
}

fn env_millis(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|raw| raw.parse().ok())
}

/// Retry an async fallible check until it succeeds or the timeout elapses.
///
/// The closure runs at least once even with a zero timeout. On timeout the
/// returned error carries the last underlying failure, so the final message
/// still names the entity and values that never matched.
pub async fn eventually<T, F, Fut>(config: PollConfig, mut check: F) -> Result<T, AssertionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AssertionError>>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(config.timeout_ms);
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        match check().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if tokio::time::Instant::now() >= deadline {
                    return Err(AssertionError::Timeout {
                        timeout_ms: config.timeout_ms,
                        last_error: Box::new(err),
                    });
                }
                debug!(attempt, error = %err, "condition not yet met, retrying");
                tokio::time::sleep(Duration::from_millis(config.interval_ms)).await;
            }
        }
    }
}
