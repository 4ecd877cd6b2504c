use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{Result, ScoutError};
use crate::render::config::RenderConfig;
use crate::render::extractor::MarkupExtractor;
use crate::render::{BrowserLauncher, Renderer};

/// Launches headless Chrome sessions through chromiumoxide
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    config: RenderConfig,
}

impl ChromeLauncher {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        let renderer = ChromeRenderer::launch(self.config.clone()).await?;
        Ok(Box::new(renderer))
    }
}

/// A live Chrome session
pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    config: RenderConfig,
    extractor: MarkupExtractor,
    closed: bool,
}

impl ChromeRenderer {
    pub async fn launch(config: RenderConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .window_size(config.window_width, config.window_height);

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(|e| {
            ScoutError::RendererUnavailable(format!("Failed to build browser config: {}", e))
        })?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ScoutError::RendererUnavailable(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        info!(headless = config.headless, "Browser session started");

        let extractor = MarkupExtractor::new(&config);
        Ok(Self {
            browser,
            handler,
            config,
            extractor,
            closed: false,
        })
    }

    async fn render_page(&self, url: &str) -> Result<String> {
        let limit = self.config.timeout();
        let page = within_deadline(limit, url, async {
            self.browser
                .new_page("about:blank")
                .await
                .map_err(|e| ScoutError::Render(format!("Failed to create page: {}", e)))
        })
        .await?;

        // The page is closed on every path, including a timed-out render
        let result = within_deadline(limit, url, async {
            if let Some(ref ua) = self.config.user_agent {
                page.set_user_agent(ua)
                    .await
                    .map_err(|e| ScoutError::Render(format!("Failed to set user agent: {}", e)))?;
            }

            page.goto(url)
                .await
                .map_err(|e| ScoutError::Render(format!("Navigation failed: {}", e)))?;

            page.wait_for_navigation()
                .await
                .map_err(|e| ScoutError::Render(format!("Navigation failed: {}", e)))?;

            // Client-side content settles after DOM readiness
            tokio::time::sleep(self.config.wait_after_load()).await;

            let snapshot: serde_json::Value = page
                .evaluate(self.extractor.snapshot_script())
                .await
                .map_err(|e| ScoutError::Render(format!("Script execution failed: {}", e)))?
                .into_value()
                .map_err(|e| ScoutError::Render(format!("Failed to parse result: {:?}", e)))?;

            let html = snapshot["html"].as_str().unwrap_or("").to_string();
            if html.is_empty() {
                return Err(ScoutError::Render("No markup extracted".to_string()));
            }
            Ok(html)
        })
        .await;

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        result
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&mut self, url: &str) -> Result<String> {
        self.render_page(url).await
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();

        info!("Browser session closed");
        Ok(())
    }
}

/// Run one render step, failing with a render error once `limit` elapses.
async fn within_deadline<T, F>(limit: Duration, url: &str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => Err(ScoutError::Render(format!(
            "Render of {} timed out after {}s",
            url,
            limit.as_secs_f64()
        ))),
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        // chromiumoxide kills the child process when `Browser` drops
        self.handler.abort();
    }
}
