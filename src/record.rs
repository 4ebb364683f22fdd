// src/record.rs
//! Targets, fetch outcomes and the classified records every collector emits.
//!
//! A [`ClassifiedRecord`] carries the common base used by aggregation and the
//! digest (natural key, tier, status, timestamp) plus a [`RecordDetail`]
//! variant holding the category-specific columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::{Classification, Tier};
use crate::collector::PageProfile;
use crate::fetch::FetchedContent;

pub const FAILED_LABEL: &str = "Scrape failed - check manually";
pub const WATCH_LIST_LABEL: &str = "On watch list - not scraped this run";
/// Placeholder tier for targets whose fetch failed.
pub const FAILED_TIER: Tier = Tier::Low;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Competitors,
    Grants,
    Partners,
    Stories,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Competitors,
        Category::Grants,
        Category::Partners,
        Category::Stories,
    ];

    /// File-name stem of the dated report artifact.
    pub fn stem(self) -> &'static str {
        match self {
            Category::Competitors => "competitors",
            Category::Grants => "grants",
            Category::Partners => "partners",
            Category::Stories => "digital-divide",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// A configured external entity to monitor. Immutable within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    /// Free-form type/category label, e.g. "NC competitor".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub secondary_url: Option<String>,
    /// Tier given to the placeholder record when the target is not fetched.
    #[serde(default = "default_priority")]
    pub priority: Tier,
    #[serde(default)]
    pub focus: Option<String>,
}

fn default_priority() -> Tier {
    Tier::High
}

impl Target {
    pub fn new(name: &str, url: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind: kind.to_string(),
            secondary_url: None,
            priority: default_priority(),
            focus: None,
        }
    }

    pub fn with_secondary_url(mut self, url: &str) -> Self {
        self.secondary_url = Some(url.to_string());
        self
    }

    pub fn with_priority(mut self, priority: Tier) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_focus(mut self, focus: &str) -> Self {
        self.focus = Some(focus.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchStatus {
    Fetched,
    Failed,
    /// Not fetched this run (fetch budget spent or no credential).
    Skipped,
}

impl FetchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchStatus::Fetched => "fetched",
            FetchStatus::Failed => "failed",
            FetchStatus::Skipped => "skipped",
        }
    }
}

/// Outcome of one fetch attempt for one target. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub target: Target,
    pub content: Option<FetchedContent>,
    pub status: FetchStatus,
    pub fetched_at: DateTime<Utc>,
}

impl FetchResult {
    pub fn fetched(target: &Target, content: FetchedContent, at: DateTime<Utc>) -> Self {
        Self {
            target: target.clone(),
            content: Some(content),
            status: FetchStatus::Fetched,
            fetched_at: at,
        }
    }

    pub fn failed(target: &Target, at: DateTime<Utc>) -> Self {
        Self {
            target: target.clone(),
            content: None,
            status: FetchStatus::Failed,
            fetched_at: at,
        }
    }

    pub fn skipped(target: &Target, at: DateTime<Utc>) -> Self {
        Self {
            target: target.clone(),
            content: None,
            status: FetchStatus::Skipped,
            fetched_at: at,
        }
    }
}

/// Partner news ranking. Declaration order is the report sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpportunityType {
    Expansion,
    FundingNews,
    Partnership,
    Event,
    LeadershipChange,
    GeneralNews,
    Reference,
}

impl OpportunityType {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OpportunityType::Expansion => "Expansion",
            OpportunityType::FundingNews => "Funding News",
            OpportunityType::Partnership => "Partnership",
            OpportunityType::Event => "Event",
            OpportunityType::LeadershipChange => "Leadership Change",
            OpportunityType::GeneralNews => "General News",
            OpportunityType::Reference => "Reference",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            OpportunityType::Expansion,
            OpportunityType::FundingNews,
            OpportunityType::Partnership,
            OpportunityType::Event,
            OpportunityType::LeadershipChange,
            OpportunityType::GeneralNews,
            OpportunityType::Reference,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Coarse tier used by the digest when picking partner highlights.
    pub fn tier(self) -> Tier {
        match self {
            OpportunityType::Expansion | OpportunityType::FundingNews => Tier::High,
            OpportunityType::Partnership
            | OpportunityType::Event
            | OpportunityType::LeadershipChange => Tier::Medium,
            OpportunityType::GeneralNews | OpportunityType::Reference => Tier::Low,
        }
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorDetail {
    pub organization: String,
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrantDetail {
    pub source: String,
    pub title: String,
    pub agency: String,
    pub amount: String,
    pub deadline: String,
    /// Listing status as shown in the report ("posted", "Live Page", "Watch List", ...).
    pub listing_status: String,
    pub url: String,
    pub deep_scrape: bool,
    pub content_preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerEntry {
    NewsMention,
    Profile,
}

impl PartnerEntry {
    pub fn as_str(self) -> &'static str {
        match self {
            PartnerEntry::NewsMention => "News Mention",
            PartnerEntry::Profile => "Partner Profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerDetail {
    pub partner: String,
    pub entry: PartnerEntry,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub date: String,
    pub opportunity: OpportunityType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryDetail {
    pub subreddit: String,
    pub title: String,
    pub use_case: String,
    pub sentiment: Sentiment,
    pub upvotes: i64,
    pub comments: i64,
    pub url: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordDetail {
    Competitor(CompetitorDetail),
    Grant(GrantDetail),
    Partner(PartnerDetail),
    Story(StoryDetail),
}

impl RecordDetail {
    pub fn category(&self) -> Category {
        match self {
            RecordDetail::Competitor(_) => Category::Competitors,
            RecordDetail::Grant(_) => Category::Grants,
            RecordDetail::Partner(_) => Category::Partners,
            RecordDetail::Story(_) => Category::Stories,
        }
    }

    /// Natural key used for de-duplication.
    pub fn natural_key(&self) -> String {
        match self {
            RecordDetail::Competitor(d) => d.url.clone(),
            RecordDetail::Grant(d) => format!("{}\u{1f}{}", d.title, d.source),
            RecordDetail::Partner(d) => format!("{}\u{1f}{}", d.partner, d.title),
            RecordDetail::Story(d) => d.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub key: String,
    pub tier: Tier,
    pub status: FetchStatus,
    pub labels: Vec<String>,
    pub score: i32,
    pub content_length: usize,
    pub timestamp: DateTime<Utc>,
    pub detail: RecordDetail,
}

impl ClassifiedRecord {
    pub fn new(detail: RecordDetail, tier: Tier, status: FetchStatus, at: DateTime<Utc>) -> Self {
        Self {
            key: detail.natural_key(),
            tier,
            status,
            labels: Vec::new(),
            score: 0,
            content_length: 0,
            timestamp: at,
            detail,
        }
    }

    pub fn with_classification(mut self, c: Classification) -> Self {
        self.tier = c.tier;
        self.score = c.score;
        self.labels = c.labels;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_content_length(mut self, len: usize) -> Self {
        self.content_length = len;
        self
    }

    pub fn category(&self) -> Category {
        self.detail.category()
    }

    /// Position in the report's fixed total order (lower sorts first).
    pub fn sort_rank(&self) -> u8 {
        match &self.detail {
            RecordDetail::Partner(d) => d.opportunity.rank(),
            _ => self.tier.rank(),
        }
    }
}

/// What the record builder knows about a target's fetch.
pub enum Outcome<'a> {
    Fetched {
        content: &'a FetchedContent,
        classification: &'a Classification,
    },
    Failed,
    Skipped,
}

/// Build the one record a target contributes to a run. Never fails.
pub fn build_record(profile: &dyn PageProfile, result: &FetchResult) -> ClassifiedRecord {
    let target = &result.target;
    let at = result.fetched_at;

    match (result.status, result.content.as_ref()) {
        (FetchStatus::Fetched, Some(content)) => {
            let classification = profile.classify(target, content);
            let detail = profile.detail(
                target,
                Outcome::Fetched {
                    content,
                    classification: &classification,
                },
            );
            ClassifiedRecord::new(detail, classification.tier, FetchStatus::Fetched, at)
                .with_classification(classification)
                .with_content_length(content.markdown.chars().count())
        }
        (FetchStatus::Skipped, _) => {
            let detail = profile.detail(target, Outcome::Skipped);
            ClassifiedRecord::new(detail, target.priority, FetchStatus::Skipped, at)
                .with_labels(vec![WATCH_LIST_LABEL.to_string()])
        }
        // Failed, or a "fetched" result that somehow carries no content.
        _ => {
            let detail = profile.detail(target, Outcome::Failed);
            ClassifiedRecord::new(detail, FAILED_TIER, FetchStatus::Failed, at)
                .with_labels(vec![FAILED_LABEL.to_string()])
        }
    }
}
