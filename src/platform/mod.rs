//! Per-site extraction strategies.
//!
//! Each supported site is one struct implementing [`Platform`]. A platform
//! knows its listing pages and markup; the fetching, retrying and pacing all
//! live behind the [`PageSource`] it is handed.
//!
//! ```text
//! listing_paths ─fetch─▶ extract_item_links ─(next page)─▶ item URLs
//! item URL ─fetch─▶ parse_page ─▶ Record
//! ```

mod agent_ai;
pub mod extract;
mod metaschool;

pub use agent_ai::AgentAi;
pub use metaschool::Metaschool;

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::app::{Result, ScoutError};
use crate::domain::Record;
use crate::fetcher::PageSource;
use extract::Document;

/// Upper bound on listing pages followed from one listing path
pub const MAX_LISTING_PAGES: usize = 20;

/// Title fragment served by common anti-bot interstitials
const CHALLENGE_TITLE: &str = "just a moment";

/// Registry names of the supported platforms
pub const KNOWN_PLATFORMS: [&str; 2] = ["agent.ai", "metaschool.so"];

/// A site-specific discovery and extraction strategy
#[async_trait]
pub trait Platform: Send + Sync {
    /// Provenance written into every record this platform produces
    fn source_site(&self) -> &str;

    fn base_url(&self) -> &Url;

    /// Whether pages need a browser to populate
    fn uses_rendering(&self) -> bool;

    /// Listing pages tried in order, relative to the base URL
    fn listing_paths(&self) -> &[&str];

    /// Item page URLs linked from one listing page
    fn extract_item_links(&self, page_url: &Url, html: &str) -> Vec<String>;

    /// Build a record from an item page's markup
    fn parse_page(&self, url: &str, html: &str) -> Result<Record>;

    /// Next page of a paginated listing
    fn next_listing_page(&self, page_url: &Url, html: &str) -> Option<Url> {
        let doc = Document::parse(html);
        let href = doc
            .select_one(r#"a[rel="next"], link[rel="next"]"#)?
            .value()
            .attr("href")?;
        resolve_link(page_url, href).and_then(|u| Url::parse(&u).ok())
    }

    /// Collect the item URLs to scrape in this run.
    ///
    /// Listing paths are tried in order until one yields URLs. A failed fetch
    /// ends the current listing path but keeps what was found so far.
    async fn discover_item_urls(&self, source: &mut dyn PageSource) -> Vec<String> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for path in self.listing_paths() {
            let start = match self.base_url().join(path) {
                Ok(url) => url,
                Err(e) => {
                    warn!(site = self.source_site(), path, "Bad listing path: {}", e);
                    continue;
                }
            };

            let mut visited = HashSet::new();
            let mut next = Some(start);

            while let Some(page_url) = next.take() {
                if visited.len() >= MAX_LISTING_PAGES || !visited.insert(page_url.to_string()) {
                    break;
                }

                let html = match source.fetch(page_url.as_str(), self.uses_rendering()).await {
                    Ok(result) => result.content,
                    Err(e) => {
                        warn!(
                            site = self.source_site(),
                            url = page_url.as_str(),
                            "Listing fetch failed, keeping {} URLs found so far: {}",
                            found.len(),
                            e
                        );
                        break;
                    }
                };

                let before = found.len();
                for link in self.extract_item_links(&page_url, &html) {
                    if seen.insert(link.clone()) {
                        found.push(link);
                    }
                }
                debug!(
                    site = self.source_site(),
                    url = page_url.as_str(),
                    new = found.len() - before,
                    "Listing page scanned"
                );

                if found.len() == before {
                    break;
                }
                next = self.next_listing_page(&page_url, &html);
            }

            if !found.is_empty() {
                break;
            }
        }

        info!(site = self.source_site(), count = found.len(), "Discovered item URLs");
        found
    }

    /// Fetch one item page and parse it
    async fn parse_item(&self, source: &mut dyn PageSource, url: &str) -> Result<Record> {
        let page = source.fetch(url, self.uses_rendering()).await?;
        self.parse_page(url, &page.content)
    }
}

/// Absolute http(s) URL for `href` without its fragment
pub fn resolve_link(page_url: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = page_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

/// Fail pages served by an anti-bot interstitial instead of the real content
pub fn reject_challenge_page(url: &str, doc: &Document) -> Result<()> {
    if doc.title().to_lowercase().contains(CHALLENGE_TITLE) {
        return Err(ScoutError::parse(url, "anti-bot challenge page"));
    }
    Ok(())
}

/// Fresh platform instances for the given registry names
pub fn build_platforms<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn Platform>>> {
    names
        .iter()
        .map(|name| build_platform(name.as_ref()))
        .collect()
}

pub fn build_platform(name: &str) -> Result<Box<dyn Platform>> {
    match name.trim().to_lowercase().as_str() {
        "agent.ai" => Ok(Box::new(AgentAi::default())),
        "metaschool.so" => Ok(Box::new(Metaschool::default())),
        other => Err(ScoutError::UnknownPlatform(other.to_string())),
    }
}
