//! Headless browser rendering for pages populated by client-side script.
//!
//! # Architecture
//!
//! ```text
//! PageFetcher ──launch (lazy, once)──▶ BrowserLauncher ──▶ Box<dyn Renderer>
//!      └──render(url)──▶ Renderer ──close (once, end of run)
//! ```
//!
//! A [`Renderer`] is a single-owner session: the fetch layer keeps it in an
//! `Option` and takes it out to close it, so it cannot be used after close.

mod chrome;
mod config;
mod extractor;

pub use chrome::{ChromeLauncher, ChromeRenderer};
pub use config::RenderConfig;
pub use extractor::MarkupExtractor;

use crate::app::Result;
use async_trait::async_trait;

/// An open browser session
#[async_trait]
pub trait Renderer: Send {
    /// Navigate to `url`, let dynamic content settle and return the markup
    async fn render(&mut self, url: &str) -> Result<String>;

    /// Tear the session down. The renderer must not be used afterwards.
    async fn close(&mut self) -> Result<()>;
}

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Renderer>>;
}
