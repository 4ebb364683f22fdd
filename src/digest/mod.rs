// src/digest/mod.rs
//! Cross-category digest built from the latest report of each category.
//!
//! Composition only reads reports. A category without a report, or whose
//! report has nothing to show, is left out of the digest.

pub mod html;

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::classify::Tier;
use crate::record::Category;
use crate::report::{CompetitorRow, GrantRow, PartnerRow, ReportRow, ReportStore, StoryRow};

pub const GRANTS_SHOWN: usize = 5;
pub const STORIES_SHOWN: usize = 3;
pub const PARTNERS_SHOWN: usize = 4;
pub const COMPETITORS_SHOWN: usize = 5;
const GRANT_TITLE_CHARS: usize = 80;
const PARTNER_TITLE_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub tier: Option<Tier>,
    pub title: String,
    pub meta: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub category: Category,
    pub heading: &'static str,
    /// Date of the report the section was read from.
    pub report_date: NaiveDate,
    pub stats: Vec<Stat>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub date: NaiveDate,
    pub sections: Vec<Section>,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }
}

/// Rows of the top tier (first `n`), or the first `n` rows overall when no row
/// reaches it. Input order is preserved.
pub fn top_n<R: ReportRow>(rows: &[R], n: usize) -> Vec<&R> {
    let top: Vec<&R> = rows
        .iter()
        .filter(|r| r.tier() == Some(Tier::High))
        .take(n)
        .collect();
    if top.is_empty() {
        rows.iter().take(n).collect()
    } else {
        top
    }
}

pub fn count_tier<R: ReportRow>(rows: &[R], tier: Tier) -> usize {
    rows.iter().filter(|r| r.tier() == Some(tier)).count()
}

fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}

fn non_empty_url(url: &str) -> Option<String> {
    (!url.trim().is_empty()).then(|| url.to_string())
}

pub fn grants_section(date: NaiveDate, rows: &[GrantRow]) -> Option<Section> {
    let cards: Vec<Card> = top_n(rows, GRANTS_SHOWN)
        .into_iter()
        .map(|r| Card {
            tier: r.tier(),
            title: ellipsize(&r.title, GRANT_TITLE_CHARS),
            meta: format!("Source: {} \u{2022} Deadline: {}", r.source, r.deadline),
            url: non_empty_url(&r.url),
        })
        .collect();
    if cards.is_empty() {
        return None;
    }
    Some(Section {
        category: Category::Grants,
        heading: "Grant Opportunities",
        report_date: date,
        stats: vec![
            Stat { label: "High", value: count_tier(rows, Tier::High) },
            Stat { label: "Medium", value: count_tier(rows, Tier::Medium) },
            Stat { label: "Total", value: rows.len() },
        ],
        cards,
    })
}

pub fn stories_section(date: NaiveDate, rows: &[StoryRow]) -> Option<Section> {
    if rows.is_empty() {
        return None;
    }
    let use_cases: HashSet<&str> = rows.iter().map(|r| r.use_case.as_str()).collect();
    // Reports are already ranked; the first rows are the strongest stories.
    let cards = rows
        .iter()
        .take(STORIES_SHOWN)
        .map(|r| Card {
            tier: r.tier(),
            title: r.title.clone(),
            meta: format!("{} \u{2022} {}", r.subreddit, r.use_case),
            url: non_empty_url(&r.url),
        })
        .collect();
    Some(Section {
        category: Category::Stories,
        heading: "NC Digital Divide Stories",
        report_date: date,
        stats: vec![
            Stat { label: "High Value", value: count_tier(rows, Tier::High) },
            Stat { label: "Total", value: rows.len() },
            Stat { label: "Use Cases", value: use_cases.len() },
        ],
        cards,
    })
}

pub fn partners_section(date: NaiveDate, rows: &[PartnerRow]) -> Option<Section> {
    let news: Vec<&PartnerRow> = rows.iter().filter(|r| r.is_news()).collect();
    if news.is_empty() {
        return None;
    }
    let partners: HashSet<&str> = news.iter().map(|r| r.partner.as_str()).collect();
    let cards = news
        .iter()
        .take(PARTNERS_SHOWN)
        .map(|r| Card {
            tier: None,
            title: r.partner.clone(),
            meta: format!(
                "{} \u{2022} {}",
                r.opportunity_type,
                ellipsize(&r.title, PARTNER_TITLE_CHARS)
            ),
            url: non_empty_url(&r.url),
        })
        .collect();
    Some(Section {
        category: Category::Partners,
        heading: "Partner Updates",
        report_date: date,
        stats: vec![
            Stat { label: "News Mentions", value: news.len() },
            Stat { label: "Partners", value: partners.len() },
            Stat {
                label: "Opportunity Types",
                value: news
                    .iter()
                    .map(|r| r.opportunity_type.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
            },
        ],
        cards,
    })
}

pub fn competitors_section(date: NaiveDate, rows: &[CompetitorRow]) -> Option<Section> {
    let scraped_label = CompetitorRow::status_label(crate::record::FetchStatus::Fetched);
    let scraped: Vec<CompetitorRow> = rows
        .iter()
        .filter(|r| r.status == scraped_label)
        .cloned()
        .collect();
    let pool = if scraped.is_empty() { rows } else { &scraped[..] };
    let cards: Vec<Card> = top_n(pool, COMPETITORS_SHOWN)
        .into_iter()
        .map(|r| Card {
            tier: r.tier(),
            title: r.organization.clone(),
            meta: r.insights.clone(),
            url: non_empty_url(&r.url),
        })
        .collect();
    if cards.is_empty() {
        return None;
    }
    Some(Section {
        category: Category::Competitors,
        heading: "Competitor Activity",
        report_date: date,
        stats: vec![
            Stat { label: "Scraped", value: scraped.len() },
            Stat { label: "High Activity", value: count_tier(rows, Tier::High) },
            Stat { label: "Tracked", value: rows.len() },
        ],
        cards,
    })
}

/// Latest rows for `R`, treating an unreadable report like a missing one.
fn latest_rows<R: ReportRow>(store: &ReportStore) -> Option<(NaiveDate, Vec<R>)> {
    match store.load_latest::<R>() {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                target: "digest",
                error = ?e,
                category = R::CATEGORY.stem(),
                "skipping unreadable report"
            );
            None
        }
    }
}

/// Compose the digest for `date` from the latest report of every category.
pub fn compose(store: &ReportStore, date: NaiveDate) -> Digest {
    let mut sections = Vec::new();

    if let Some((d, rows)) = latest_rows::<GrantRow>(store) {
        sections.extend(grants_section(d, &rows));
    }
    if let Some((d, rows)) = latest_rows::<StoryRow>(store) {
        sections.extend(stories_section(d, &rows));
    }
    if let Some((d, rows)) = latest_rows::<PartnerRow>(store) {
        sections.extend(partners_section(d, &rows));
    }
    if let Some((d, rows)) = latest_rows::<CompetitorRow>(store) {
        sections.extend(competitors_section(d, &rows));
    }

    tracing::info!(
        target: "digest",
        sections = sections.len(),
        "digest composed"
    );
    Digest { date, sections }
}

pub fn subject(date: NaiveDate) -> String {
    format!("HTI Market Intelligence \u{2014} {}", date.format("%b %d"))
}
