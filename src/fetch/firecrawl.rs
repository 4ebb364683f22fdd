// src/fetch/firecrawl.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{ContentFetcher, FetchError, FetchRequest, FetchedContent, Result};

const BASE_URL: &str = "https://api.firecrawl.dev/v1";

/// Firecrawl `/scrape` client. One request per page; no crawling.
pub struct FirecrawlClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<String>,
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    extract: Option<ExtractOptions<'a>>,
}

#[derive(Debug, Serialize)]
struct ExtractOptions<'a> {
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    extract: Option<Value>,
}

impl FirecrawlClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            client,
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

fn build_body(request: &FetchRequest) -> ScrapeRequest<'_> {
    let mut formats = request.formats.clone();
    if request.extract_schema.is_some() && !formats.iter().any(|f| f == "extract") {
        formats.push("extract".to_string());
    }
    ScrapeRequest {
        url: &request.url,
        formats,
        only_main_content: request.only_main_content,
        extract: request
            .extract_schema
            .as_ref()
            .map(|schema| ExtractOptions { schema }),
    }
}

fn into_content(resp: ScrapeResponse) -> Result<FetchedContent> {
    if !resp.success {
        return Err(FetchError::Parse(
            resp.error
                .unwrap_or_else(|| "scrape reported success=false".to_string()),
        ));
    }
    let data = resp
        .data
        .ok_or_else(|| FetchError::Parse("scrape response without data".to_string()))?;
    Ok(FetchedContent {
        markdown: data.markdown.unwrap_or_default(),
        extract: data.extract.filter(|v| !v.is_null()),
    })
}

#[async_trait]
impl ContentFetcher for FirecrawlClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedContent> {
        let body = build_body(request);
        let resp = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status.as_u16(), text));
        }

        let parsed: ScrapeResponse = resp.json().await?;
        into_content(parsed)
    }

    fn name(&self) -> &'static str {
        "firecrawl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_uses_camel_case_and_adds_extract_format() {
        let req = FetchRequest::markdown("https://example.org")
            .with_extract_schema(json!({"type": "object"}));
        let body = serde_json::to_value(build_body(&req)).unwrap();
        assert_eq!(body["onlyMainContent"], json!(true));
        assert_eq!(body["formats"], json!(["markdown", "extract"]));
        assert_eq!(body["extract"]["schema"], json!({"type": "object"}));
    }

    #[test]
    fn plain_markdown_body_has_no_extract() {
        let body = serde_json::to_value(build_body(&FetchRequest::markdown("https://x.test"))).unwrap();
        assert!(body.get("extract").is_none());
        assert_eq!(body["formats"], json!(["markdown"]));
    }

    #[test]
    fn response_mapping() {
        let ok: ScrapeResponse = serde_json::from_value(json!({
            "success": true,
            "data": {"markdown": "# Hello", "extract": null}
        }))
        .unwrap();
        let content = into_content(ok).unwrap();
        assert_eq!(content.markdown, "# Hello");
        assert!(content.extract.is_none());

        let failed: ScrapeResponse =
            serde_json::from_value(json!({"success": false, "error": "blocked"})).unwrap();
        assert!(matches!(into_content(failed), Err(FetchError::Parse(m)) if m == "blocked"));
    }

    #[tokio::test]
    async fn connection_errors_map_to_network() {
        let client = FirecrawlClient::new("fc-test".into(), reqwest::Client::new())
            .with_base_url("http://127.0.0.1:9/v1")
            .with_timeout(5);
        let err = client
            .fetch(&FetchRequest::markdown("https://example.org"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
