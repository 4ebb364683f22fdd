// src/collector/grants.rs
//! Grant opportunity collector. Three sources, flattened into one record list:
//!
//! 1. Grants.gov search, one query per configured keyword (first few only).
//! 2. Philanthropy news RSS, titles filtered for relevant terms.
//! 3. Foundation grant pages, deep-scraped within the fetch budget; the rest
//!    stay on the watch list.
//!
//! A failing query or feed is logged and skipped. Duplicates across query
//! variants are left for the report aggregator.

use chrono::Utc;
use metrics::counter;
use serde_json::{json, Value};

use super::{run_budgeted, truncate_chars, CollectorOutput, PageProfile, RunSummary};
use crate::classify::tables::{AMOUNT_TERMS, DEADLINE_TERMS, GRANT_RELEVANCE, NEWS_TITLE_TERMS};
use crate::classify::{classify, classify_fields, mentions_any, Classification, Tier};
use crate::fetch::{ContentFetcher, FetchRequest, FetchedContent};
use crate::record::{
    Category, ClassifiedRecord, FetchStatus, GrantDetail, Outcome, RecordDetail, Target,
};
use crate::sources::clean_text;
use crate::sources::grants_gov::{Opportunity, OpportunitySearch};
use crate::sources::rss::FeedReader;

pub const PHILANTHROPY_NEWS_FEED: &str = "https://philanthropynewsdigest.org/news.rss";

/// Keywords actually sent to Grants.gov per run.
pub const KEYWORD_QUERIES: usize = 3;
pub const ROWS_PER_QUERY: u32 = 15;
pub const NEWS_ENTRIES: usize = 15;
const PREVIEW_CHARS: usize = 500;

pub const SOURCE_GRANTS_GOV: &str = "Grants.gov";
pub const SOURCE_NEWS: &str = "Philanthropy News";
pub const SOURCE_DEEP_SCRAPE: &str = "Foundation Deep Scrape";
pub const SOURCE_WATCH_LIST: &str = "Foundation Watch List";

/// Structured fields requested from the scrape service for foundation pages.
pub fn foundation_extract_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "grant_name": {"type": "string"},
            "deadline": {"type": "string"},
            "amount_min": {"type": "string"},
            "amount_max": {"type": "string"},
            "eligibility": {"type": "string"},
            "focus_areas": {"type": "array", "items": {"type": "string"}},
            "application_url": {"type": "string"}
        }
    })
}

fn extract_str<'a>(extract: Option<&'a Value>, field: &str) -> Option<&'a str> {
    extract
        .and_then(|v| v.get(field))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn extracted_amount(extract: Option<&Value>) -> Option<String> {
    match (
        extract_str(extract, "amount_min"),
        extract_str(extract, "amount_max"),
    ) {
        (Some(lo), Some(hi)) => Some(format!("{lo} - {hi}")),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

pub struct FoundationProfile;

impl PageProfile for FoundationProfile {
    fn category(&self) -> Category {
        Category::Grants
    }

    fn request(&self, target: &Target) -> FetchRequest {
        FetchRequest::markdown(&target.url).with_extract_schema(foundation_extract_schema())
    }

    fn classify(&self, _target: &Target, content: &FetchedContent) -> Classification {
        let focus = content
            .extract
            .as_ref()
            .and_then(|v| v.get("focus_areas"))
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        classify_fields(&[&content.markdown, &focus], &GRANT_RELEVANCE)
    }

    fn detail(&self, target: &Target, outcome: Outcome<'_>) -> RecordDetail {
        let detail = match outcome {
            Outcome::Fetched { content, .. } => {
                let extract = content.extract.as_ref();
                let md = &content.markdown;
                let deadline = extract_str(extract, "deadline")
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        if mentions_any(md, DEADLINE_TERMS) {
                            "Active deadlines found".into()
                        } else {
                            "Rolling/Unknown".into()
                        }
                    });
                let amount = extracted_amount(extract).unwrap_or_else(|| {
                    if mentions_any(md, AMOUNT_TERMS) {
                        "See page for details".into()
                    } else {
                        "Not specified".into()
                    }
                });
                let title = match extract_str(extract, "grant_name") {
                    Some(name) => format!("{} - {}", target.name, name),
                    None => format!("{} - Grant Opportunities", target.name),
                };
                let preview = if md.is_empty() {
                    "No content".to_string()
                } else {
                    truncate_chars(md, PREVIEW_CHARS)
                };
                GrantDetail {
                    source: SOURCE_DEEP_SCRAPE.into(),
                    title,
                    agency: target.name.clone(),
                    amount,
                    deadline,
                    listing_status: "Live Page".into(),
                    url: extract_str(extract, "application_url")
                        .unwrap_or(&target.url)
                        .to_string(),
                    deep_scrape: true,
                    content_preview: Some(preview),
                }
            }
            Outcome::Failed => watch_list_detail(target, "Scrape Failed"),
            Outcome::Skipped => watch_list_detail(target, "Watch List"),
        };
        RecordDetail::Grant(detail)
    }
}

fn watch_list_detail(target: &Target, status: &str) -> GrantDetail {
    GrantDetail {
        source: SOURCE_WATCH_LIST.into(),
        title: format!("{} - Monitor for opportunities", target.name),
        agency: target.name.clone(),
        amount: "Varies".into(),
        deadline: "Check website".into(),
        listing_status: status.into(),
        url: target.url.clone(),
        deep_scrape: false,
        content_preview: None,
    }
}

/// Record for one Grants.gov hit, scored on title + synopsis.
pub fn opportunity_record(opp: &Opportunity) -> ClassifiedRecord {
    let title = opp
        .title
        .as_deref()
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown".into());
    let synopsis = clean_text(opp.synopsis.as_deref().unwrap_or_default());
    let c = classify_fields(&[&title, &synopsis], &GRANT_RELEVANCE);

    let detail = GrantDetail {
        source: SOURCE_GRANTS_GOV.into(),
        title,
        agency: opp.agency_code.clone().unwrap_or_else(|| "Unknown".into()),
        amount: opp.award_ceiling_display(),
        deadline: opp.close_date.clone().unwrap_or_else(|| "Open".into()),
        listing_status: opp.opp_status.clone().unwrap_or_else(|| "Unknown".into()),
        url: opp.detail_url(),
        deep_scrape: false,
        content_preview: None,
    };
    ClassifiedRecord::new(
        RecordDetail::Grant(detail),
        c.tier,
        FetchStatus::Fetched,
        Utc::now(),
    )
    .with_classification(c)
}

async fn search_grants_gov(
    search: &dyn OpportunitySearch,
    keywords: &[String],
    summary: &mut RunSummary,
) -> Vec<ClassifiedRecord> {
    let mut out = Vec::new();
    for keyword in keywords.iter().take(KEYWORD_QUERIES) {
        match search.search(keyword, ROWS_PER_QUERY).await {
            Ok(hits) => {
                tracing::debug!(target: "collector", keyword = %keyword, hits = hits.len(), "grants.gov query");
                summary.count(FetchStatus::Fetched);
                out.extend(hits.iter().map(opportunity_record));
            }
            Err(e) => {
                tracing::warn!(target: "collector", error = ?e, keyword = %keyword, "grants.gov query failed");
                counter!("collector_source_errors_total", "source" => "grants_gov").increment(1);
                summary.count(FetchStatus::Failed);
            }
        }
    }
    out
}

async fn philanthropy_news(
    feeds: &dyn FeedReader,
    summary: &mut RunSummary,
) -> Vec<ClassifiedRecord> {
    let entries = match feeds.read(PHILANTHROPY_NEWS_FEED).await {
        Ok(entries) => {
            summary.count(FetchStatus::Fetched);
            entries
        }
        Err(e) => {
            tracing::warn!(target: "collector", error = ?e, feed = PHILANTHROPY_NEWS_FEED, "news feed failed");
            counter!("collector_source_errors_total", "source" => "philanthropy_news").increment(1);
            summary.count(FetchStatus::Failed);
            return Vec::new();
        }
    };

    let at = Utc::now();
    entries
        .into_iter()
        .take(NEWS_ENTRIES)
        .filter(|e| mentions_any(&e.title, NEWS_TITLE_TERMS))
        .map(|e| {
            let labels = classify(&e.title, &GRANT_RELEVANCE).labels;
            let detail = GrantDetail {
                source: SOURCE_NEWS.into(),
                title: e.title,
                agency: "Various".into(),
                amount: "See article".into(),
                deadline: "See article".into(),
                listing_status: "News".into(),
                url: e.link,
                deep_scrape: false,
                content_preview: None,
            };
            ClassifiedRecord::new(RecordDetail::Grant(detail), Tier::Medium, FetchStatus::Fetched, at)
                .with_labels(labels)
        })
        .collect()
}

pub async fn collect(
    keywords: &[String],
    foundations: &[Target],
    search: &dyn OpportunitySearch,
    feeds: &dyn FeedReader,
    fetcher: Option<&dyn ContentFetcher>,
    budget: usize,
) -> CollectorOutput {
    tracing::info!(
        target: "collector",
        keywords = keywords.len().min(KEYWORD_QUERIES),
        foundations = foundations.len(),
        budget,
        scrape = fetcher.map(|f| f.name()).unwrap_or("disabled"),
        "grant tracker run"
    );

    let mut summary = RunSummary::default();
    let mut records = search_grants_gov(search, keywords, &mut summary).await;
    records.extend(philanthropy_news(feeds, &mut summary).await);

    let pages = run_budgeted(&FoundationProfile, foundations, fetcher, budget).await;
    summary.merge(pages.summary);
    records.extend(pages.records);

    CollectorOutput { records, summary }.finish(Category::Grants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foundation() -> Target {
        Target::new("Golden LEAF Foundation", "https://www.goldenleaf.org/grants/", "foundation")
    }

    #[test]
    fn page_heuristics_without_extract() {
        let content = FetchedContent {
            markdown: "Applications open. Deadline: March 1. Awards up to $50,000.".into(),
            extract: None,
        };
        let RecordDetail::Grant(d) = FoundationProfile.detail(
            &foundation(),
            Outcome::Fetched {
                content: &content,
                classification: &classify("", &GRANT_RELEVANCE),
            },
        ) else {
            panic!("expected grant detail");
        };
        assert_eq!(d.deadline, "Active deadlines found");
        assert_eq!(d.amount, "See page for details");
        assert_eq!(d.title, "Golden LEAF Foundation - Grant Opportunities");
        assert!(d.deep_scrape);
        assert_eq!(d.listing_status, "Live Page");
    }

    #[test]
    fn extract_fields_win_over_heuristics() {
        let content = FetchedContent {
            markdown: "nothing useful".into(),
            extract: Some(json!({
                "grant_name": "Community Tech Fund",
                "deadline": "2025-09-30",
                "amount_min": "$5,000",
                "amount_max": "$25,000"
            })),
        };
        let RecordDetail::Grant(d) = FoundationProfile.detail(
            &foundation(),
            Outcome::Fetched {
                content: &content,
                classification: &classify("", &GRANT_RELEVANCE),
            },
        ) else {
            panic!("expected grant detail");
        };
        assert_eq!(d.deadline, "2025-09-30");
        assert_eq!(d.amount, "$5,000 - $25,000");
        assert_eq!(d.title, "Golden LEAF Foundation - Community Tech Fund");
    }

    #[test]
    fn watch_list_placeholder_columns() {
        let RecordDetail::Grant(d) = FoundationProfile.detail(&foundation(), Outcome::Skipped) else {
            panic!("expected grant detail");
        };
        assert_eq!(d.source, SOURCE_WATCH_LIST);
        assert_eq!(d.amount, "Varies");
        assert_eq!(d.deadline, "Check website");
        assert!(!d.deep_scrape);
    }

    #[test]
    fn opportunity_defaults_and_scoring() {
        let opp = Opportunity {
            title: Some("Laptop access for rural North Carolina schools".into()),
            ..Default::default()
        };
        let r = opportunity_record(&opp);
        // laptop(3) + rural(2) + north carolina(5)
        assert_eq!(r.score, 10);
        assert_eq!(r.tier, Tier::High);
        let RecordDetail::Grant(d) = &r.detail else {
            panic!("expected grant detail");
        };
        assert_eq!(d.deadline, "Open");
        assert_eq!(d.agency, "Unknown");
        assert_eq!(d.amount, "Not specified");
    }
}
