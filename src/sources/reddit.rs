// src/sources/reddit.rs
//! Reddit search over the OAuth API using an application-only token
//! (client-credentials grant).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const PERMALINK_BASE: &str = "https://reddit.com";
pub const USER_AGENT: &str = "HTIAutomator/1.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ForumPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub permalink: String,
}

impl ForumPost {
    pub fn url(&self) -> String {
        format!("{}{}", PERMALINK_BASE, self.permalink)
    }
}

#[async_trait]
pub trait ForumSearch: Send + Sync {
    /// Search one subreddit for `query`, newest week only.
    async fn search(&self, subreddit: &str, query: &str, limit: u32) -> Result<Vec<ForumPost>>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: ForumPost,
}

pub fn parse_listing(body: &str) -> Result<Vec<ForumPost>> {
    let listing: Listing = serde_json::from_str(body).context("parsing reddit listing")?;
    Ok(listing.data.children.into_iter().map(|c| c.data).collect())
}

pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    timeout: Duration,
}

impl RedditClient {
    /// Exchange client credentials for an app token. Fails if Reddit rejects them.
    pub async fn connect(
        client: reqwest::Client,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        let resp = client
            .post(TOKEN_URL)
            .basic_auth(client_id, Some(client_secret))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .context("reddit token request")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("reddit token request rejected: {status}"));
        }
        let token: TokenResponse = resp.json().await.context("reddit token body")?;
        tracing::debug!(target: "sources", "reddit app token acquired");

        Ok(Self {
            client,
            token: token.access_token,
            timeout: Duration::from_secs(30),
        })
    }
}

#[async_trait]
impl ForumSearch for RedditClient {
    async fn search(&self, subreddit: &str, query: &str, limit: u32) -> Result<Vec<ForumPost>> {
        let limit = limit.to_string();
        let url = reqwest::Url::parse_with_params(
            &format!("{API_BASE}/r/{subreddit}/search"),
            &[
                ("q", query),
                ("restrict_sr", "1"),
                ("limit", limit.as_str()),
                ("t", "week"),
                ("sort", "relevance"),
            ],
        )
        .context("building reddit search url")?;

        let body = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("reddit search r/{subreddit}"))?
            .error_for_status()
            .with_context(|| format!("reddit search status r/{subreddit}"))?
            .text()
            .await
            .context("reddit search body")?;
        parse_listing(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_maps_children() {
        let body = r#"{"kind":"Listing","data":{"children":[
            {"kind":"t3","data":{"title":"Need a laptop","selftext":"","score":12,
             "num_comments":3,"permalink":"/r/raleigh/comments/abc/need_a_laptop/"}}
        ]}}"#;
        let posts = parse_listing(body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].score, 12);
        assert_eq!(
            posts[0].url(),
            "https://reddit.com/r/raleigh/comments/abc/need_a_laptop/"
        );
    }
}
