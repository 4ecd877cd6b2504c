use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::app::{Result, ScoutError};

/// One normalized item scraped from a platform.
///
/// Fields are only reachable through getters; a `Record` is built once by
/// [`RecordBuilder::build`] and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    url: String,
    brief_description: String,
    features: String,
    pros: String,
    cons: String,
    user_reviews: String,
    pricing: String,
    rating: String,
    category: String,
    source_site: String,
}

impl Record {
    /// Export column order.
    pub const COLUMNS: [&'static str; 11] = [
        "name",
        "url",
        "brief_description",
        "features",
        "pros",
        "cons",
        "user_reviews",
        "pricing",
        "rating",
        "category",
        "source_site",
    ];

    pub fn builder(source_site: impl Into<String>, url: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(source_site, url)
    }

    /// Deterministic key from source site and URL
    pub fn generate_key(source_site: &str, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source_site.as_bytes());
        hasher.update([0u8]);
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn key(&self) -> String {
        Self::generate_key(&self.source_site, &self.url)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn brief_description(&self) -> &str {
        &self.brief_description
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    pub fn pros(&self) -> &str {
        &self.pros
    }

    pub fn cons(&self) -> &str {
        &self.cons
    }

    pub fn user_reviews(&self) -> &str {
        &self.user_reviews
    }

    pub fn pricing(&self) -> &str {
        &self.pricing
    }

    pub fn rating(&self) -> &str {
        &self.rating
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn source_site(&self) -> &str {
        &self.source_site
    }

    /// Field values in [`Record::COLUMNS`] order.
    pub fn values(&self) -> [&str; 11] {
        [
            &self.name,
            &self.url,
            &self.brief_description,
            &self.features,
            &self.pros,
            &self.cons,
            &self.user_reviews,
            &self.pricing,
            &self.rating,
            &self.category,
            &self.source_site,
        ]
    }
}

/// Mutable draft filled in field by field during extraction.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    pub name: String,
    pub url: String,
    pub brief_description: String,
    pub features: String,
    pub pros: String,
    pub cons: String,
    pub user_reviews: String,
    pub pricing: String,
    pub rating: String,
    pub category: String,
    pub source_site: String,
}

impl RecordBuilder {
    pub fn new(source_site: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source_site: source_site.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Finish the draft. Fails when name, url or source site is blank.
    pub fn build(self) -> Result<Record> {
        let name = self.name.trim().to_string();
        let url = self.url.trim().to_string();
        let source_site = self.source_site.trim().to_string();

        if url.is_empty() {
            return Err(ScoutError::parse("<unknown>", "missing url"));
        }
        if name.is_empty() {
            return Err(ScoutError::parse(url, "missing name"));
        }
        if source_site.is_empty() {
            return Err(ScoutError::parse(url, "missing source site"));
        }

        Ok(Record {
            name,
            url,
            brief_description: self.brief_description,
            features: self.features,
            pros: self.pros,
            cons: self.cons,
            user_reviews: self.user_reviews,
            pricing: self.pricing,
            rating: self.rating,
            category: self.category,
            source_site,
        })
    }
}
