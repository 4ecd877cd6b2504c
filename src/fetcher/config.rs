use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::fetcher::retry::RetryPolicy;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Request pacing and retry settings shared by every fetch in a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Minimum delay between any two requests in seconds (default: 2.0)
    pub delay_secs: f64,

    /// Retries after the first attempt (default: 2)
    pub max_retries: u32,

    /// First backoff delay in milliseconds, doubled per retry (default: 1000)
    pub backoff_base_ms: u64,

    /// Backoff ceiling in milliseconds (default: 30000)
    pub backoff_max_ms: u64,

    /// Per-request timeout for plain HTTP in seconds (default: 10)
    pub request_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            delay_secs: 2.0,
            max_retries: 2,
            backoff_base_ms: 1000,
            backoff_max_ms: 30_000,
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Inter-request delay. Negative or non-finite values clamp to zero.
    pub fn delay(&self) -> Duration {
        if self.delay_secs.is_finite() && self.delay_secs > 0.0 {
            Duration::from_secs_f64(self.delay_secs)
        } else {
            Duration::ZERO
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
        )
    }
}
