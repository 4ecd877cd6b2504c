use std::path::Path;

use tracing::warn;

use crate::app::{AppContext, Result, ScoutError};
use crate::config::Config;
use crate::coordinator::{PlatformState, RunReport};
use crate::platform::{build_platform, KNOWN_PLATFORMS};

/// Scrape all enabled platforms. Ctrl-C stops scraping but still closes the
/// browser and exports what was collected.
pub async fn run(ctx: &AppContext) -> Result<RunReport> {
    let mut coordinator = ctx.coordinator()?;

    tokio::select! {
        _ = coordinator.scrape_all() => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, exporting records collected so far");
        }
    }

    let report = coordinator.finish().await;
    print_report(&report);
    Ok(report)
}

fn print_report(report: &RunReport) {
    for platform in &report.platforms {
        match platform.state {
            PlatformState::Done {
                discovered,
                parsed,
                failed,
            } => println!(
                "  {}: {} discovered, {} parsed, {} skipped",
                platform.source_site, discovered, parsed, failed
            ),
            PlatformState::InProgress => println!("  {}: interrupted", platform.source_site),
            PlatformState::Pending => println!("  {}: not started", platform.source_site),
        }
    }

    if report.records == 0 {
        println!("No data was scraped. Check the logs for errors.");
    } else {
        println!(
            "Collected {} records in {}s, exported as {}",
            report.records,
            (report.finished_at - report.started_at).num_seconds(),
            report.exported_to.join(", ")
        );
    }
}

pub fn list_platforms() -> Result<()> {
    for name in KNOWN_PLATFORMS {
        let platform = build_platform(name)?;
        println!(
            "{:<16} {:<12} {}",
            name,
            platform.source_site(),
            platform.base_url()
        );
    }
    Ok(())
}

pub fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path().map_err(|e| ScoutError::Config(e.to_string()))?,
    };

    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    Config::write_default_config(&path).map_err(|e| ScoutError::Config(e.to_string()))?;
    println!("Wrote config: {}", path.display());
    Ok(())
}
