// src/collector/partners.rs
//! Partner monitor: recent news mentions of each distribution partner plus one
//! reference profile row per partner. Uses free news feeds only.

use chrono::Utc;
use metrics::counter;

use super::{truncate_chars, CollectorOutput, RunSummary};
use crate::classify::tables::OPPORTUNITY_TYPES;
use crate::record::{
    Category, ClassifiedRecord, FetchStatus, OpportunityType, PartnerDetail, PartnerEntry,
    RecordDetail, Target,
};
use crate::sources::rss::{google_news_search_url, FeedEntry, FeedReader};

pub const ENTRIES_PER_PARTNER: usize = 5;
const SUMMARY_CHARS: usize = 200;

fn partner_record(detail: PartnerDetail) -> ClassifiedRecord {
    let tier = detail.opportunity.tier();
    let label = detail.opportunity.as_str().to_string();
    ClassifiedRecord::new(RecordDetail::Partner(detail), tier, FetchStatus::Fetched, Utc::now())
        .with_labels(vec![label])
}

/// News mention row, categorized on title + summary.
pub fn mention_record(partner: &Target, entry: FeedEntry) -> ClassifiedRecord {
    let opportunity = OPPORTUNITY_TYPES.categorize(&[&entry.title, &entry.summary]);
    let detail = PartnerDetail {
        partner: partner.name.clone(),
        entry: PartnerEntry::NewsMention,
        summary: truncate_chars(&entry.summary, SUMMARY_CHARS),
        title: entry.title,
        url: entry.link,
        date: entry.published.unwrap_or_else(|| "Unknown".into()),
        opportunity,
    };
    partner_record(detail)
}

pub fn profile_record(partner: &Target) -> ClassifiedRecord {
    let focus = partner.focus.as_deref().unwrap_or("General");
    let detail = PartnerDetail {
        partner: partner.name.clone(),
        entry: PartnerEntry::Profile,
        title: format!("Focus: {focus}"),
        summary: format!("Website: {}", partner.url),
        url: partner.url.clone(),
        date: "Ongoing".into(),
        opportunity: OpportunityType::Reference,
    };
    partner_record(detail)
}

async fn partner_news(
    feeds: &dyn FeedReader,
    partner: &Target,
) -> anyhow::Result<Vec<ClassifiedRecord>> {
    let url = google_news_search_url(&format!("{} North Carolina", partner.name))?;
    let entries = feeds.read(&url).await?;
    Ok(entries
        .into_iter()
        .take(ENTRIES_PER_PARTNER)
        .map(|e| mention_record(partner, e))
        .collect())
}

pub async fn collect(partners: &[Target], feeds: &dyn FeedReader) -> CollectorOutput {
    tracing::info!(target: "collector", partners = partners.len(), "partner monitor run");

    let mut summary = RunSummary::default();
    let mut records = Vec::new();
    for partner in partners {
        tracing::info!(target: "collector", name = %partner.name, "checking");
        match partner_news(feeds, partner).await {
            Ok(news) => {
                summary.count(FetchStatus::Fetched);
                records.extend(news);
            }
            Err(e) => {
                tracing::warn!(target: "collector", error = ?e, name = %partner.name, "partner news search failed");
                counter!("collector_source_errors_total", "source" => "google_news").increment(1);
                summary.count(FetchStatus::Failed);
            }
        }
        records.push(profile_record(partner));
    }

    CollectorOutput { records, summary }.finish(Category::Partners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Tier;

    fn ymca() -> Target {
        Target::new("YMCA of the Triangle", "https://www.ymcatriangle.org", "partner")
            .with_focus("Youth programs")
    }

    #[test]
    fn mention_is_categorized_and_truncated() {
        let entry = FeedEntry {
            title: "YMCA receives $1 million grant".into(),
            link: "https://news.test/1".into(),
            summary: "x".repeat(300),
            published: None,
            published_at: None,
        };
        let r = mention_record(&ymca(), entry);
        let RecordDetail::Partner(d) = &r.detail else {
            panic!("expected partner detail");
        };
        assert_eq!(d.opportunity, OpportunityType::FundingNews);
        assert_eq!(d.summary.chars().count(), 200);
        assert_eq!(d.date, "Unknown");
        assert_eq!(r.tier, Tier::High);
        assert_eq!(r.sort_rank(), 1);
    }

    #[test]
    fn profile_row_is_reference() {
        let r = profile_record(&ymca());
        let RecordDetail::Partner(d) = &r.detail else {
            panic!("expected partner detail");
        };
        assert_eq!(d.title, "Focus: Youth programs");
        assert_eq!(d.summary, "Website: https://www.ymcatriangle.org");
        assert_eq!(d.entry, PartnerEntry::Profile);
        assert_eq!(r.sort_rank(), 6);
    }
}
