use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::config::FetchConfig;
use crate::fetcher::{FetchResult, Transport};

/// Plain HTTP retrieval through reqwest
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResult> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content = response.text().await?;

        Ok(FetchResult { content, status })
    }
}
