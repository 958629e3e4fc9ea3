use anyhow::{Error, Result, anyhow};
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::{error, warn};

use crate::models::common::RetrySettings;
use crate::utils::strip_html;

pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub exponential: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            exponential: 2.0,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay_ms: settings.base_delay_ms,
            max_delay_ms: settings.max_delay_ms,
            ..Default::default()
        }
    }
}

impl RetryConfig {
    // Exponential growth with full jitter, capped at `max_delay_ms`
    fn next_delay(&self, delay_ms: u64) -> u64 {
        let ceiling = delay_ms as f64 * self.exponential;
        ((fastrand::f64() * ceiling) as u64).min(self.max_delay_ms)
    }
}

/// Runs `request` until it succeeds or `max_attempts` is reached. `endpoint` names the
/// runner endpoint in logs and in the final error.
pub async fn retry<F, Fut, T>(request: F, config: &RetryConfig, endpoint: &str) -> Result<T, Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, Error>>,
{
    let mut delay_ms = config.base_delay_ms;
    let mut attempt: u32 = 1;

    loop {
        let message = match request().await {
            Ok(response) => return Ok(response),
            Err(e) => strip_html(&e.to_string()),
        };

        if attempt >= config.max_attempts {
            error!("/{} unreachable after {} attempt(s): {}", endpoint, attempt, message);
            return Err(anyhow!(message)
                .context(format!("runner request /{} failed after {} attempt(s)", endpoint, attempt)));
        }

        warn!(
            "/{} attempt {}/{} failed: {}, next try in {}ms",
            endpoint, attempt, config.max_attempts, message, delay_ms
        );
        sleep(Duration::from_millis(delay_ms)).await;
        delay_ms = config.next_delay(delay_ms);
        attempt += 1;
    }
}
