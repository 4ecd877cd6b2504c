use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::coordinator::{Coordinator, CoordinatorOptions};
use crate::export::{CsvSink, JsonSink, RecordSink};
use crate::fetcher::{HttpFetcher, PageFetcher, Transport};
use crate::platform::{build_platforms, Platform};
use crate::render::{BrowserLauncher, ChromeLauncher};

/// Wires configuration into a ready-to-run coordinator
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn platforms(&self) -> Result<Vec<Box<dyn Platform>>> {
        build_platforms(self.config.platforms.as_slice())
    }

    pub fn page_fetcher(&self) -> Result<PageFetcher> {
        let transport: Arc<dyn Transport> = Arc::new(HttpFetcher::new(&self.config.fetch)?);
        let launcher: Arc<dyn BrowserLauncher> =
            Arc::new(ChromeLauncher::new(self.config.render.clone()));

        Ok(PageFetcher::new(transport, &self.config.fetch).with_launcher(launcher))
    }

    pub fn sinks(&self) -> Vec<Box<dyn RecordSink>> {
        vec![
            Box::new(CsvSink::new(self.config.output.csv_path())),
            Box::new(JsonSink::new(self.config.output.json_path())),
        ]
    }

    pub fn coordinator(&self) -> Result<Coordinator<PageFetcher>> {
        let coordinator = Coordinator::new(self.platforms()?, self.page_fetcher()?, self.sinks())?
            .with_options(CoordinatorOptions {
                require_description: self.config.require_description,
            });
        Ok(coordinator)
    }
}
