pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, LogLevel};

#[derive(Parser)]
#[command(name = "agentscout")]
#[command(about = "Collect AI agent and course listings into CSV and JSON", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/agentscout/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape every enabled platform and export the records
    Run(RunArgs),
    /// List the supported platforms
    Platforms,
    /// Write the default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Overrides applied on top of the config file
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Seconds between requests
    #[arg(long)]
    pub delay: Option<f64>,

    /// Retries per request after the first attempt
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Log level when RUST_LOG is unset
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Directory for the CSV and JSON files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Platform to scrape (repeatable, default: all enabled in config)
    #[arg(short, long = "platform")]
    pub platforms: Vec<String>,
}

impl RunArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(delay) = self.delay {
            config.fetch.delay_secs = delay;
        }
        if let Some(max_retries) = self.max_retries {
            config.fetch.max_retries = max_retries;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.headed {
            config.render.headless = false;
        }
        if let Some(ref dir) = self.output_dir {
            config.output.dir = dir.clone();
        }
        if !self.platforms.is_empty() {
            config.platforms = self.platforms.clone();
        }
    }
}
