// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Capped exponential backoff for single GitHub API calls.
//!
//! The executor wraps each request in [`retry_with_backoff`]. The walker and
//! aggregator never retry on their own, so a failure that survives this layer
//! is terminal for the whole fetch.

use std::time::Duration;

use masterror::AppError;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Backoff parameters for one API call.
#[derive(Debug, Clone, PartialEq, Deserialize,)]
#[serde(default)]
pub struct RetryConfig
{
    /// Attempts including the first one (default: 3).
    pub max_attempts:     u32,
    /// Delay before the second attempt in milliseconds (default: 500).
    pub initial_delay_ms: u64,
    /// Multiplier applied after every failed attempt (default: 2.0).
    pub backoff_factor:   f64,
    /// Upper bound for a single delay in milliseconds (default: 8000).
    pub max_delay_ms:     u64,
}

impl Default for RetryConfig
{
    fn default() -> Self
    {
        Self {
            max_attempts: 3, initial_delay_ms: 500, backoff_factor: 2.0, max_delay_ms: 8_000,
        }
    }
}

impl RetryConfig
{
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32,) -> Duration
    {
        let exponent = attempt.saturating_sub(1,) as i32;
        let scaled = self.initial_delay_ms as f64 * self.backoff_factor.powi(exponent,);
        let capped = if scaled.is_finite() { scaled.min(self.max_delay_ms as f64,) } else { self.max_delay_ms as f64 };
        Duration::from_millis(capped.max(0.0,) as u64,)
    }
}

/// Runs `f` until it succeeds or `config.max_attempts` is reached.
///
/// # Errors
///
/// Returns the error of the last attempt.
///
/// # Example
///
/// ```no_run
/// use ghcard::{RetryConfig, retry_with_backoff};
/// use masterror::AppError;
///
/// # async fn example() -> Result<(), AppError> {
/// let config = RetryConfig::default();
/// let value = retry_with_backoff(&config, "graphql userInfo", || async {
///     Ok::<_, AppError,>(42,)
/// },)
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T,>(
    config: &RetryConfig,
    operation: &str,
    mut f: F,
) -> Result<T, AppError,>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError,>,>,
{
    let max_attempts = config.max_attempts.max(1,);
    let mut attempt = 1;

    loop {
        match f().await {
            Ok(value,) => {
                if attempt > 1 {
                    debug!(operation, attempt, "request succeeded after retry");
                }
                return Ok(value,);
            }
            Err(error,) if attempt >= max_attempts => {
                warn!(operation, attempts = max_attempts, %error, "request failed, giving up");
                return Err(error,);
            }
            Err(error,) => {
                let delay = config.delay_after(attempt,);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "request failed, retrying"
                );
                sleep(delay,).await;
                attempt += 1;
            }
        }
    }
}
