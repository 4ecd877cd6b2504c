use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the headless browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Upper bound for one render, navigation included, in seconds (default: 30)
    pub timeout_secs: u64,

    /// Settle time after navigation for client-side content in milliseconds (default: 2000)
    pub wait_after_load_ms: u64,

    /// Browser window size
    pub window_width: u32,
    pub window_height: u32,

    /// Elements stripped from the markup snapshot
    pub remove_selectors: Vec<String>,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
            wait_after_load_ms: 2000,
            window_width: 1920,
            window_height: 1080,
            remove_selectors: vec![
                "script".to_string(),
                "style".to_string(),
                "noscript".to_string(),
            ],
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl RenderConfig {
    /// Get the render timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }
}
