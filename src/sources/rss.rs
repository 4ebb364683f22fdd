// src/sources/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use super::clean_text;

const GOOGLE_NEWS_SEARCH: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// One feed item, text already cleaned of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    /// Raw `pubDate` as published, when present.
    pub published: Option<String>,
    /// Unix seconds parsed from `pubDate` (RFC 2822).
    pub published_at: Option<u64>,
}

#[async_trait]
pub trait FeedReader: Send + Sync {
    async fn read(&self, url: &str) -> Result<Vec<FeedEntry>>;
}

fn parse_rfc2822_to_unix(ts: &str) -> Option<u64> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
}

/// Named HTML entities are not valid XML; replace the common ones before parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

/// Parse an RSS 2.0 document. Items without a title are dropped.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let title = clean_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        out.push(FeedEntry {
            title,
            link: it.link.unwrap_or_default().trim().to_string(),
            summary: clean_text(it.description.as_deref().unwrap_or_default()),
            published_at: it.pub_date.as_deref().and_then(parse_rfc2822_to_unix),
            published: it.pub_date.map(|d| d.trim().to_string()),
        });
    }

    histogram!("feed_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("feed_entries_total").increment(out.len() as u64);
    Ok(out)
}

/// Google News RSS search URL for a free-text query (US English edition).
pub fn google_news_search_url(query: &str) -> Result<String> {
    let url = reqwest::Url::parse_with_params(
        GOOGLE_NEWS_SEARCH,
        &[("q", query), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
    )
    .context("building google news url")?;
    Ok(url.to_string())
}

pub struct HttpFeedReader {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeedReader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn read(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let body = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("feed status {url}"))?
            .text()
            .await
            .context("feed body")?;
        parse_feed(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_and_dates() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title>
<item><title>Digital equity &ndash; new fund</title><link> https://a.test/1 </link>
<pubDate>Tue, 10 Jun 2025 14:00:00 +0000</pubDate>
<description>&lt;p&gt;Funding for laptops&lt;/p&gt;</description></item>
<item><title></title><link>https://a.test/2</link></item>
</channel></rss>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Digital equity - new fund");
        assert_eq!(items[0].link, "https://a.test/1");
        assert_eq!(items[0].summary, "Funding for laptops");
        assert_eq!(items[0].published_at, Some(1_749_564_000));
    }

    #[test]
    fn empty_channel_is_ok() {
        let xml = "<rss><channel><title>none</title></channel></rss>";
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn google_news_url_encodes_query() {
        let u = google_news_search_url("Boys & Girls Club Durham North Carolina").unwrap();
        assert!(u.starts_with("https://news.google.com/rss/search?q=Boys+%26+Girls+Club"));
        assert!(u.ends_with("ceid=US%3Aen"));
    }
}
