// src/fetch/mod.rs
//! Content fetcher seam: resolves a URL to page text via a scraping service.

pub mod error;
pub mod firecrawl;

pub use error::{FetchError, Result};
pub use firecrawl::FirecrawlClient;

use serde_json::Value;

/// What to ask the scrape service for.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub formats: Vec<String>,
    pub only_main_content: bool,
    /// Optional JSON schema for structured extraction.
    pub extract_schema: Option<Value>,
}

impl FetchRequest {
    /// Main-content markdown for a page; the default request for every collector.
    pub fn markdown(url: &str) -> Self {
        Self {
            url: url.to_string(),
            formats: vec!["markdown".to_string()],
            only_main_content: true,
            extract_schema: None,
        }
    }

    pub fn with_extract_schema(mut self, schema: Value) -> Self {
        self.extract_schema = Some(schema);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedContent {
    pub markdown: String,
    /// Structured fields, present only when a schema was requested and honoured.
    pub extract: Option<Value>,
}

#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedContent>;
    fn name(&self) -> &'static str;
}
