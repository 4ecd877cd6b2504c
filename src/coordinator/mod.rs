//! Drives every registered platform through discovery and parsing, then
//! hands the collected records to the sinks.
//!
//! ```text
//! Pending ──▶ InProgress ──▶ Done { discovered, parsed, failed }
//! ```
//!
//! Platforms run one after another and items one at a time; a platform that
//! finds nothing or fails every item still ends in `Done`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::app::{Result, ScoutError};
use crate::domain::Record;
use crate::export::RecordSink;
use crate::fetcher::PageSource;
use crate::platform::Platform;

/// Progress of one platform within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlatformState {
    Pending,
    InProgress,
    Done {
        discovered: usize,
        parsed: usize,
        failed: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformReport {
    pub source_site: String,
    pub state: PlatformState,
}

/// Outcome of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub platforms: Vec<PlatformReport>,
    pub records: usize,
    pub exported_to: Vec<String>,
}

struct Entry {
    platform: Box<dyn Platform>,
    state: PlatformState,
}

/// Knobs that change which parsed records are kept
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinatorOptions {
    /// Drop records without a description
    pub require_description: bool,
}

pub struct Coordinator<S: PageSource> {
    entries: Vec<Entry>,
    source: S,
    sinks: Vec<Box<dyn RecordSink>>,
    options: CoordinatorOptions,
    records: Vec<Record>,
    keys: HashSet<String>,
    started_at: DateTime<Utc>,
    closed: bool,
    exported: bool,
}

impl<S: PageSource> Coordinator<S> {
    /// Register `platforms` in order. Two platforms may not share a source site.
    pub fn new(
        platforms: Vec<Box<dyn Platform>>,
        source: S,
        sinks: Vec<Box<dyn RecordSink>>,
    ) -> Result<Self> {
        let mut sites = HashSet::new();
        for platform in &platforms {
            if !sites.insert(platform.source_site().to_string()) {
                return Err(ScoutError::DuplicatePlatform(
                    platform.source_site().to_string(),
                ));
            }
        }

        let entries = platforms
            .into_iter()
            .map(|platform| Entry {
                platform,
                state: PlatformState::Pending,
            })
            .collect();

        Ok(Self {
            entries,
            source,
            sinks,
            options: CoordinatorOptions::default(),
            records: Vec::new(),
            keys: HashSet::new(),
            started_at: Utc::now(),
            closed: false,
            exported: false,
        })
    }

    pub fn with_options(mut self, options: CoordinatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn reports(&self) -> Vec<PlatformReport> {
        self.entries
            .iter()
            .map(|entry| PlatformReport {
                source_site: entry.platform.source_site().to_string(),
                state: entry.state,
            })
            .collect()
    }

    /// Scrape, release the page source, export
    pub async fn run(&mut self) -> RunReport {
        self.scrape_all().await;
        self.finish().await
    }

    /// Release the page source and export whatever was collected
    pub async fn finish(&mut self) -> RunReport {
        self.close().await;
        let exported_to = self.export();

        RunReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            platforms: self.reports(),
            records: self.records.len(),
            exported_to,
        }
    }

    /// Process every pending platform in registration order
    pub async fn scrape_all(&mut self) {
        self.started_at = Utc::now();
        for index in 0..self.entries.len() {
            if self.entries[index].state == PlatformState::Pending {
                self.scrape_platform(index).await;
            }
        }
    }

    async fn scrape_platform(&mut self, index: usize) {
        let entry = &mut self.entries[index];
        entry.state = PlatformState::InProgress;
        let platform = entry.platform.as_ref();
        let site = platform.source_site().to_string();
        info!(site = %site, "Scraping platform");

        let urls = platform.discover_item_urls(&mut self.source).await;
        if urls.is_empty() {
            warn!(site = %site, "Discovery found no item URLs");
        }

        let total = urls.len();
        let mut parsed = 0;
        let mut failed = 0;

        for (i, url) in urls.iter().enumerate() {
            info!(site = %site, "Scraping item {}/{}: {}", i + 1, total, url);

            let record = match platform.parse_item(&mut self.source, url).await {
                Ok(record) => record,
                Err(e) => {
                    failed += 1;
                    warn!(site = %site, url = %url, "Skipping item: {}", e);
                    continue;
                }
            };

            if self.options.require_description && record.brief_description().is_empty() {
                failed += 1;
                info!(site = %site, url = %url, "Skipping item: insufficient data");
                continue;
            }

            if !self.keys.insert(record.key()) {
                info!(site = %site, url = %url, "Skipping duplicate item");
                continue;
            }

            self.records.push(record);
            parsed += 1;
        }

        info!(
            site = %site,
            discovered = total,
            parsed,
            failed,
            "Platform done"
        );
        self.entries[index].state = PlatformState::Done {
            discovered: total,
            parsed,
            failed,
        };
    }

    /// Release the page source (browser session included). Runs at most once.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.source.close().await {
            error!("Failed to release page source: {}", e);
        }
    }

    /// Hand the collected records to every sink. Runs at most once.
    ///
    /// Returns the names of the sinks that succeeded.
    pub fn export(&mut self) -> Vec<String> {
        if self.exported {
            return Vec::new();
        }
        self.exported = true;

        let mut succeeded = Vec::new();
        for sink in &mut self.sinks {
            match sink.write(&self.records) {
                Ok(()) => succeeded.push(sink.name().to_string()),
                Err(e) => error!(sink = sink.name(), "Export failed: {}", e),
            }
        }

        if self.records.is_empty() {
            warn!("No records were collected");
        }
        succeeded
    }
}
