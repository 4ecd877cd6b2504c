//! # agentscout
//!
//! Collects listings from AI-agent directories and course catalogs, maps
//! them onto one [`Record`](domain::Record) shape and writes them out as CSV
//! and JSON.
//!
//! ## Architecture
//!
//! ```text
//! Coordinator → Platform (discover, parse) → PageFetcher (retry, pacing)
//!                                              ├─ HttpFetcher
//!                                              └─ ChromeRenderer
//!             → Records → CSV / JSON sinks
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape everything with the default config
//! agentscout run
//!
//! # One platform, faster pacing, visible browser
//! agentscout run -p metaschool.so --delay 0.5 --headed
//!
//! # List supported platforms
//! agentscout platforms
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) turns a [`Config`](config::Config) into a
/// ready [`Coordinator`](coordinator::Coordinator).
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// TOML configuration at `~/.config/agentscout/config.toml`.
pub mod config;

/// Per-run orchestration across platforms.
pub mod coordinator;

/// The normalized [`Record`](domain::Record) model.
pub mod domain;

/// CSV and JSON sinks.
pub mod export;

/// Retrying, paced page retrieval.
///
/// - [`PageSource`](fetcher::PageSource): what platforms fetch through
/// - [`PageFetcher`](fetcher::PageFetcher): retry/backoff/throttle implementation
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based plain HTTP
pub mod fetcher;

/// Site-specific discovery and extraction.
pub mod platform;

/// Headless Chrome rendering via chromiumoxide.
pub mod render;
