//! Page retrieval with retry, backoff and run-wide request pacing.
//!
//! [`PageFetcher`] is the one [`PageSource`] used in production: plain
//! requests go through a [`Transport`], rendered ones through a lazily
//! launched [`Renderer`](crate::render::Renderer).

pub mod config;
pub mod http_fetcher;
pub mod retry;
pub mod throttle;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::app::{Result, ScoutError};
use crate::render::{BrowserLauncher, Renderer};

pub use config::FetchConfig;
pub use http_fetcher::HttpFetcher;
pub use retry::RetryPolicy;
pub use throttle::Throttle;

/// Body and status of a retrieved page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub content: String,
    pub status: u16,
}

/// One plain HTTP GET, no retries
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResult>;
}

/// Where platform strategies get their pages from
#[async_trait]
pub trait PageSource: Send {
    async fn fetch(&mut self, url: &str, use_rendering: bool) -> Result<FetchResult>;

    /// Release held resources; safe to call more than once
    async fn close(&mut self) -> Result<()>;
}

/// Retrying fetcher shared by every platform in a run
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    launcher: Option<Arc<dyn BrowserLauncher>>,
    renderer: Option<Box<dyn Renderer>>,
    launch_error: Option<String>,
    policy: RetryPolicy,
    throttle: Throttle,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn Transport>, config: &FetchConfig) -> Self {
        Self {
            transport,
            launcher: None,
            renderer: None,
            launch_error: None,
            policy: config.retry_policy(),
            throttle: Throttle::new(config.delay()),
        }
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn BrowserLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn renderer_open(&self) -> bool {
        self.renderer.is_some()
    }

    async fn attempt(&mut self, url: &str, use_rendering: bool) -> Result<FetchResult> {
        if !use_rendering {
            let result = self.transport.get(url).await?;
            if (200..300).contains(&result.status) {
                return Ok(result);
            }
            return Err(ScoutError::Status {
                url: url.to_string(),
                status: result.status,
            });
        }

        let renderer = self.renderer().await?;
        let content = renderer.render(url).await?;
        Ok(FetchResult {
            content,
            status: 200,
        })
    }

    /// Open the browser session on first use. A failed launch is sticky.
    async fn renderer(&mut self) -> Result<&mut Box<dyn Renderer>> {
        if let Some(reason) = &self.launch_error {
            return Err(ScoutError::RendererUnavailable(reason.clone()));
        }

        if self.renderer.is_none() {
            let launcher = self.launcher.clone().ok_or_else(|| {
                ScoutError::RendererUnavailable("no browser launcher configured".to_string())
            })?;

            match launcher.launch().await {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => {
                    error!("Failed to start browser session: {}", e);
                    let reason = e.to_string();
                    self.launch_error = Some(reason.clone());
                    return Err(ScoutError::RendererUnavailable(reason));
                }
            }
        }

        self.renderer
            .as_mut()
            .ok_or_else(|| ScoutError::RendererUnavailable("browser session missing".to_string()))
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&mut self, url: &str, use_rendering: bool) -> Result<FetchResult> {
        let parsed = Url::parse(url)?;
        if !parsed.has_host() {
            return Err(ScoutError::RelativeUrl(url.to_string()));
        }

        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            self.throttle.wait().await;
            debug!(url, attempt = attempt + 1, use_rendering, "Fetching");

            let err = match self.attempt(url, use_rendering).await {
                Ok(result) => {
                    info!(url, attempt = attempt + 1, status = result.status, "Fetched");
                    return Ok(result);
                }
                Err(e) => e,
            };

            if !err.is_transient() || !self.policy.should_retry(attempt) {
                let attempts = attempt + 1;
                error!(url, attempts, status = err.status(), "Giving up: {}", err);
                return Err(ScoutError::Fetch {
                    url: url.to_string(),
                    attempts,
                    status: err.status(),
                    cause: err.to_string(),
                });
            }

            let delay = self.policy.delay(attempt);
            warn!(
                url,
                attempt = attempt + 1,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "Attempt failed: {}",
                err
            );
            self.throttle.defer(delay);
            attempt += 1;
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self.renderer.take() {
            Some(mut renderer) => renderer.close().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Replays scripted statuses and records when each call happened
    struct ScriptedTransport {
        statuses: Mutex<VecDeque<u16>>,
        fallback: u16,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn new(statuses: &[u16], fallback: u16) -> Arc<Self> {
            Arc::new(Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                fallback,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<FetchResult> {
            self.calls.lock().unwrap().push(Instant::now());
            let status = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(self.fallback);
            Ok(FetchResult {
                content: format!("<html>{url}</html>"),
                status,
            })
        }
    }

    #[derive(Default)]
    struct Counters {
        launches: AtomicUsize,
        renders: AtomicUsize,
        closes: AtomicUsize,
    }

    struct FakeRenderer {
        counters: Arc<Counters>,
        fail: bool,
    }

    #[async_trait]
    impl Renderer for FakeRenderer {
        async fn render(&mut self, url: &str) -> Result<String> {
            self.counters.renders.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ScoutError::Render("navigation timed out".into()))
            } else {
                Ok(format!("<html><body>{url}</body></html>"))
            }
        }

        async fn close(&mut self) -> Result<()> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeLauncher {
        counters: Arc<Counters>,
        launch_fails: bool,
        render_fails: bool,
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        async fn launch(&self) -> Result<Box<dyn Renderer>> {
            self.counters.launches.fetch_add(1, Ordering::SeqCst);
            if self.launch_fails {
                return Err(ScoutError::RendererUnavailable("chrome not found".into()));
            }
            Ok(Box::new(FakeRenderer {
                counters: self.counters.clone(),
                fail: self.render_fails,
            }))
        }
    }

    fn config(delay_secs: f64, max_retries: u32) -> FetchConfig {
        FetchConfig {
            delay_secs,
            max_retries,
            backoff_base_ms: 100,
            backoff_max_ms: 60_000,
            ..Default::default()
        }
    }

    fn fetcher_with_launcher(
        launch_fails: bool,
        render_fails: bool,
        max_retries: u32,
    ) -> (PageFetcher, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let launcher = Arc::new(FakeLauncher {
            counters: counters.clone(),
            launch_fails,
            render_fails,
        });
        let fetcher = PageFetcher::new(ScriptedTransport::new(&[], 200), &config(0.0, max_retries))
            .with_launcher(launcher);
        (fetcher, counters)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(&[200], 200);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.0, 3));

        let result = fetcher.fetch("https://example.com/a", false).await.unwrap();
        assert_eq!(result.status, 200);
        assert!(result.content.contains("example.com/a"));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let transport = ScriptedTransport::new(&[503, 429], 200);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.0, 3));

        let result = fetcher.fetch("https://example.com/a", false).await.unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_exactly_max_retries_plus_one() {
        let transport = ScriptedTransport::new(&[], 503);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.0, 3));

        let err = fetcher.fetch("https://example.com/a", false).await.unwrap_err();
        match err {
            ScoutError::Fetch {
                attempts, status, ..
            } => {
                assert_eq!(attempts, 4);
                assert_eq!(status, Some(503));
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        for pair in gaps.windows(2) {
            assert!(pair[1] > pair[0], "delays must strictly increase: {gaps:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_stacks_on_request_delay() {
        let transport = ScriptedTransport::new(&[], 503);
        let config = FetchConfig {
            max_retries: 3,
            ..Default::default()
        };
        let mut fetcher = PageFetcher::new(transport.clone(), &config);

        assert!(fetcher.fetch("https://example.com/a", false).await.is_err());

        let calls = transport.calls();
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(
            gaps,
            vec![
                Duration::from_secs(3),
                Duration::from_secs(4),
                Duration::from_secs(6)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_smaller_than_delay_still_increases() {
        let transport = ScriptedTransport::new(&[], 503);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(2.0, 3));

        assert!(fetcher.fetch("https://example.com/a", false).await.is_err());

        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        for pair in gaps.windows(2) {
            assert!(pair[1] > pair[0], "delays must strictly increase: {gaps:?}");
        }
        assert!(gaps[0] >= Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let transport = ScriptedTransport::new(&[], 500);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.0, 0));

        assert!(fetcher.fetch("https://example.com/a", false).await.is_err());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let transport = ScriptedTransport::new(&[404], 200);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.0, 3));

        let err = fetcher.fetch("https://example.com/missing", false).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_url_makes_no_request() {
        let transport = ScriptedTransport::new(&[], 200);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.0, 3));

        assert!(matches!(
            fetcher.fetch("/relative/path", false).await,
            Err(ScoutError::InvalidUrl(_))
        ));
        assert!(matches!(
            fetcher.fetch("mailto:someone@example.com", false).await,
            Err(ScoutError::RelativeUrl(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_spaces_sequential_fetches() {
        let transport = ScriptedTransport::new(&[], 200);
        let mut fetcher = PageFetcher::new(transport.clone(), &config(0.5, 0));

        for path in ["a", "b", "c"] {
            fetcher
                .fetch(&format!("https://example.com/{path}"), false)
                .await
                .unwrap();
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_renderer_launched_lazily_and_reused() {
        let (mut fetcher, counters) = fetcher_with_launcher(false, false, 1);

        fetcher.fetch("https://example.com/plain", false).await.unwrap();
        assert_eq!(counters.launches.load(Ordering::SeqCst), 0);

        fetcher.fetch("https://example.com/a", true).await.unwrap();
        fetcher.fetch("https://example.com/b", true).await.unwrap();
        assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
        assert_eq!(counters.renders.load(Ordering::SeqCst), 2);
        assert!(fetcher.renderer_open());

        fetcher.close().await.unwrap();
        fetcher.close().await.unwrap();
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
        assert!(!fetcher.renderer_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_failure_is_retried() {
        let (mut fetcher, counters) = fetcher_with_launcher(false, true, 2);

        let err = fetcher.fetch("https://example.com/a", true).await.unwrap_err();
        assert!(matches!(err, ScoutError::Fetch { attempts: 3, .. }));
        assert_eq!(counters.renders.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_failure_is_sticky() {
        let (mut fetcher, counters) = fetcher_with_launcher(true, false, 3);

        assert!(fetcher.fetch("https://example.com/a", true).await.is_err());
        assert!(fetcher.fetch("https://example.com/b", true).await.is_err());
        assert_eq!(counters.launches.load(Ordering::SeqCst), 1);

        // Plain fetches are unaffected
        assert!(fetcher.fetch("https://example.com/c", false).await.is_ok());
    }
}
