// src/report/rows.rs
//! Fixed CSV schemas, one row type per report category.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::classify::Tier;
use crate::record::{Category, ClassifiedRecord, FetchStatus, RecordDetail};

/// A CSV row that can be built from a record and read back by the digest.
pub trait ReportRow: Serialize + DeserializeOwned {
    const CATEGORY: Category;
    const HEADERS: &'static [&'static str];

    /// `None` when the record belongs to another category.
    fn from_record(r: &ClassifiedRecord) -> Option<Self>;

    /// Tier shown in the row, if it parses.
    fn tier(&self) -> Option<Tier>;
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRow {
    #[serde(rename = "Organization")]
    pub organization: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "Insights")]
    pub insights: String,
    #[serde(rename = "Content_Length")]
    pub content_length: usize,
    #[serde(rename = "Last_Scraped")]
    pub last_scraped: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl CompetitorRow {
    pub fn status_label(status: FetchStatus) -> &'static str {
        match status {
            FetchStatus::Fetched => "Scraped",
            FetchStatus::Failed => "Failed",
            FetchStatus::Skipped => "Watch List",
        }
    }
}

impl ReportRow for CompetitorRow {
    const CATEGORY: Category = Category::Competitors;
    const HEADERS: &'static [&'static str] = &[
        "Organization",
        "Type",
        "URL",
        "Activity",
        "Insights",
        "Content_Length",
        "Last_Scraped",
        "Status",
    ];

    fn from_record(r: &ClassifiedRecord) -> Option<Self> {
        let RecordDetail::Competitor(d) = &r.detail else {
            return None;
        };
        Some(Self {
            organization: d.organization.clone(),
            kind: d.kind.clone(),
            url: d.url.clone(),
            activity: r.tier.to_string(),
            insights: r.labels.join("; "),
            content_length: r.content_length,
            last_scraped: timestamp(r.timestamp),
            status: Self::status_label(r.status).to_string(),
        })
    }

    fn tier(&self) -> Option<Tier> {
        self.activity.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantRow {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Agency")]
    pub agency: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Deadline")]
    pub deadline: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Relevance")]
    pub relevance: String,
    #[serde(rename = "Deep_Scrape")]
    pub deep_scrape: bool,
    #[serde(rename = "Content_Preview", default)]
    pub content_preview: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl ReportRow for GrantRow {
    const CATEGORY: Category = Category::Grants;
    const HEADERS: &'static [&'static str] = &[
        "Source",
        "Title",
        "Agency",
        "Amount",
        "Deadline",
        "Status",
        "URL",
        "Relevance",
        "Deep_Scrape",
        "Content_Preview",
        "Timestamp",
    ];

    fn from_record(r: &ClassifiedRecord) -> Option<Self> {
        let RecordDetail::Grant(d) = &r.detail else {
            return None;
        };
        Some(Self {
            source: d.source.clone(),
            title: d.title.clone(),
            agency: d.agency.clone(),
            amount: d.amount.clone(),
            deadline: d.deadline.clone(),
            status: d.listing_status.clone(),
            url: d.url.clone(),
            relevance: r.tier.to_string(),
            deep_scrape: d.deep_scrape,
            content_preview: d.content_preview.clone().unwrap_or_default(),
            timestamp: timestamp(r.timestamp),
        })
    }

    fn tier(&self) -> Option<Tier> {
        self.relevance.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerRow {
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Opportunity_Type")]
    pub opportunity_type: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl PartnerRow {
    pub fn is_news(&self) -> bool {
        self.kind == crate::record::PartnerEntry::NewsMention.as_str()
    }
}

impl ReportRow for PartnerRow {
    const CATEGORY: Category = Category::Partners;
    const HEADERS: &'static [&'static str] = &[
        "Partner",
        "Type",
        "Title",
        "Summary",
        "URL",
        "Date",
        "Opportunity_Type",
        "Timestamp",
    ];

    fn from_record(r: &ClassifiedRecord) -> Option<Self> {
        let RecordDetail::Partner(d) = &r.detail else {
            return None;
        };
        Some(Self {
            partner: d.partner.clone(),
            kind: d.entry.as_str().to_string(),
            title: d.title.clone(),
            summary: d.summary.clone(),
            url: d.url.clone(),
            date: d.date.clone(),
            opportunity_type: d.opportunity.as_str().to_string(),
            timestamp: timestamp(r.timestamp),
        })
    }

    fn tier(&self) -> Option<Tier> {
        crate::record::OpportunityType::parse(&self.opportunity_type).map(|o| o.tier())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRow {
    #[serde(rename = "Subreddit")]
    pub subreddit: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Story_Value")]
    pub story_value: String,
    #[serde(rename = "Use_Case")]
    pub use_case: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Upvotes")]
    pub upvotes: i64,
    #[serde(rename = "Comments")]
    pub comments: i64,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Excerpt")]
    pub excerpt: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl ReportRow for StoryRow {
    const CATEGORY: Category = Category::Stories;
    const HEADERS: &'static [&'static str] = &[
        "Subreddit",
        "Title",
        "Story_Value",
        "Use_Case",
        "Sentiment",
        "Upvotes",
        "Comments",
        "URL",
        "Excerpt",
        "Timestamp",
    ];

    fn from_record(r: &ClassifiedRecord) -> Option<Self> {
        let RecordDetail::Story(d) = &r.detail else {
            return None;
        };
        Some(Self {
            subreddit: d.subreddit.clone(),
            title: d.title.clone(),
            story_value: r.tier.to_string(),
            use_case: d.use_case.clone(),
            sentiment: d.sentiment.to_string(),
            upvotes: d.upvotes,
            comments: d.comments,
            url: d.url.clone(),
            excerpt: d.excerpt.clone(),
            timestamp: timestamp(r.timestamp),
        })
    }

    fn tier(&self) -> Option<Tier> {
        self.story_value.parse().ok()
    }
}
