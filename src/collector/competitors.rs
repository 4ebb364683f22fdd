// src/collector/competitors.rs
//! Competitive-intelligence collector: deep-scrapes the first few peer
//! organisations and keeps the rest on a watch list.

use super::{run_budgeted, CollectorOutput, PageProfile};
use crate::classify::impact::impact_metrics;
use crate::classify::tables::{COMPETITOR_ACTIVITY, IMPACT_METRICS_BONUS};
use crate::classify::{classify, Classification};
use crate::fetch::{ContentFetcher, FetchedContent};
use crate::record::{Category, CompetitorDetail, Outcome, RecordDetail, Target};

pub struct CompetitorProfile;

impl PageProfile for CompetitorProfile {
    fn category(&self) -> Category {
        Category::Competitors
    }

    fn classify(&self, _target: &Target, content: &FetchedContent) -> Classification {
        let mut c = classify(&content.markdown, &COMPETITOR_ACTIVITY);
        let figures = impact_metrics(&content.markdown, 3);
        if !figures.is_empty() {
            c.boost(
                &COMPETITOR_ACTIVITY,
                format!("Impact metrics: {}", figures.join(", ")),
                IMPACT_METRICS_BONUS,
            );
        }
        c
    }

    fn detail(&self, target: &Target, _outcome: Outcome<'_>) -> RecordDetail {
        RecordDetail::Competitor(CompetitorDetail {
            organization: target.name.clone(),
            kind: target.kind.clone(),
            url: target.url.clone(),
        })
    }
}

pub async fn collect(
    orgs: &[Target],
    fetcher: Option<&dyn ContentFetcher>,
    budget: usize,
) -> CollectorOutput {
    tracing::info!(
        target: "collector",
        orgs = orgs.len(),
        budget,
        scrape = fetcher.map(|f| f.name()).unwrap_or("disabled"),
        "competitive intelligence run"
    );
    run_budgeted(&CompetitorProfile, orgs, fetcher, budget)
        .await
        .finish(Category::Competitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Tier;

    #[test]
    fn impact_figures_raise_activity() {
        let content = FetchedContent {
            markdown: "We launch a new program. 25,000 computers delivered.".into(),
            extract: None,
        };
        let c = CompetitorProfile.classify(&Target::new("X", "https://x", "t"), &content);
        // launch(3) + program(1) + impact(2)
        assert_eq!(c.score, 6);
        assert_eq!(c.tier, Tier::High);
        assert_eq!(c.labels.last().unwrap(), "Impact metrics: 25,000");
    }

    #[test]
    fn quiet_page_is_general_monitoring() {
        let content = FetchedContent {
            markdown: "About us. Contact.".into(),
            extract: None,
        };
        let c = CompetitorProfile.classify(&Target::new("X", "https://x", "t"), &content);
        assert_eq!(c.labels, vec!["General monitoring"]);
        assert_eq!(c.tier, Tier::Low);
    }
}
