// src/sources/grants_gov.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const SEARCH_URL: &str = "https://www.grants.gov/grantsws/rest/opportunities/search";
const DETAIL_URL: &str = "https://www.grants.gov/search-results-detail";
const OPP_STATUSES: &str = "forecasted|posted";

/// One hit from the opportunity search. Missing fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    /// Numeric in some responses, string in others.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub agency_code: Option<String>,
    #[serde(default)]
    pub award_ceiling: Option<Value>,
    #[serde(default)]
    pub close_date: Option<String>,
    #[serde(default)]
    pub opp_status: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
}

impl Opportunity {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(value_to_string).unwrap_or_default()
    }

    pub fn detail_url(&self) -> String {
        format!("{}/{}", DETAIL_URL, self.id_string())
    }

    pub fn award_ceiling_display(&self) -> String {
        match self.award_ceiling.as_ref().map(value_to_string) {
            Some(s) if !s.is_empty() => s,
            _ => "Not specified".to_string(),
        }
    }
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    opp_hits: Vec<Opportunity>,
}

#[async_trait]
pub trait OpportunitySearch: Send + Sync {
    async fn search(&self, keyword: &str, rows: u32) -> Result<Vec<Opportunity>>;
}

pub struct GrantsGovClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl GrantsGovClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(30),
        }
    }
}

pub fn parse_search(body: &str) -> Result<Vec<Opportunity>> {
    let resp: SearchResponse = serde_json::from_str(body).context("parsing grants.gov search")?;
    Ok(resp.opp_hits)
}

#[async_trait]
impl OpportunitySearch for GrantsGovClient {
    async fn search(&self, keyword: &str, rows: u32) -> Result<Vec<Opportunity>> {
        let rows = rows.to_string();
        let url = reqwest::Url::parse_with_params(
            SEARCH_URL,
            &[
                ("keyword", keyword),
                ("oppStatuses", OPP_STATUSES),
                ("rows", rows.as_str()),
            ],
        )
        .context("building grants.gov url")?;
        let body = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .context("grants.gov search")?
            .error_for_status()
            .context("grants.gov non-2xx")?
            .text()
            .await
            .context("grants.gov body")?;
        parse_search(&body)
    }
}
