// src/collector/mod.rs
//! Collector runs: budgeted page fetching with watch-list fallback, plus the
//! four concrete collectors built on top of it.
//!
//! Budget policy: targets are processed in configured order; the first
//! `budget` are fetched and classified, the rest become `Skipped` placeholders.
//! With no fetcher configured the budget is 0. A failing target becomes a
//! `Failed` placeholder and never stops the run.

pub mod competitors;
pub mod grants;
pub mod partners;
pub mod stories;

use chrono::Utc;
use metrics::counter;

use crate::classify::Classification;
use crate::fetch::{ContentFetcher, FetchRequest, FetchedContent};
use crate::record::{
    build_record, Category, ClassifiedRecord, FetchResult, FetchStatus, Outcome, RecordDetail,
    Target,
};

/// Category-specific half of the record builder for page-fetching collectors.
pub trait PageProfile: Send + Sync {
    fn category(&self) -> Category;

    fn request(&self, target: &Target) -> FetchRequest {
        FetchRequest::markdown(&target.url)
    }

    fn classify(&self, target: &Target, content: &FetchedContent) -> Classification;

    fn detail(&self, target: &Target, outcome: Outcome<'_>) -> RecordDetail;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub fetched: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn count(&mut self, status: FetchStatus) {
        self.total += 1;
        match status {
            FetchStatus::Fetched => self.fetched += 1,
            FetchStatus::Failed => self.failed += 1,
            FetchStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.total += other.total;
        self.fetched += other.fetched;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn log(&self, category: Category) {
        tracing::info!(
            target: "collector",
            category = category.stem(),
            total = self.total,
            fetched = self.fetched,
            failed = self.failed,
            skipped = self.skipped,
            "fetched {}/{} targets",
            self.fetched,
            self.total
        );
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectorOutput {
    pub records: Vec<ClassifiedRecord>,
    pub summary: RunSummary,
}

impl CollectorOutput {
    /// Log the run summary and count emitted records.
    pub(crate) fn finish(self, category: Category) -> Self {
        self.summary.log(category);
        counter!("collector_records_total", "category" => category.stem())
            .increment(self.records.len() as u64);
        self
    }
}

/// Fetch one target, mapping every fetch error onto a `Failed` result.
async fn fetch_one(
    profile: &dyn PageProfile,
    fetcher: &dyn ContentFetcher,
    target: &Target,
) -> FetchResult {
    let request = profile.request(target);
    match fetcher.fetch(&request).await {
        Ok(content) => FetchResult::fetched(target, content, Utc::now()),
        Err(e) => {
            tracing::warn!(
                target: "collector",
                error = %e,
                kind = e.kind(),
                fetcher = fetcher.name(),
                name = %target.name,
                url = %target.url,
                "fetch failed"
            );
            counter!("collector_fetch_errors_total", "kind" => e.kind()).increment(1);
            FetchResult::failed(target, Utc::now())
        }
    }
}

/// Run a budgeted fetch over `targets`. Always returns exactly one record per target.
pub async fn run_budgeted(
    profile: &dyn PageProfile,
    targets: &[Target],
    fetcher: Option<&dyn ContentFetcher>,
    budget: usize,
) -> CollectorOutput {
    crate::metrics::ensure_described();

    let category = profile.category();
    let budget = match fetcher {
        Some(_) => budget,
        None => {
            tracing::info!(
                target: "collector",
                category = category.stem(),
                "no fetch credential configured; every target goes on the watch list"
            );
            0
        }
    };

    let mut out = CollectorOutput::default();
    for (i, target) in targets.iter().enumerate() {
        let result = match fetcher {
            Some(f) if i < budget => {
                tracing::info!(target: "collector", name = %target.name, "checking");
                fetch_one(profile, f, target).await
            }
            _ => FetchResult::skipped(target, Utc::now()),
        };

        counter!(
            "collector_fetch_total",
            "category" => category.stem(),
            "status" => result.status.as_str()
        )
        .increment(1);
        out.summary.count(result.status);
        out.records.push(build_record(profile, &result));
    }

    out
}

/// Truncate to at most `max` characters (not bytes).
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_and_merges() {
        let mut a = RunSummary::default();
        a.count(FetchStatus::Fetched);
        a.count(FetchStatus::Skipped);
        let mut b = RunSummary::default();
        b.count(FetchStatus::Failed);
        a.merge(b);
        assert_eq!(
            a,
            RunSummary {
                total: 3,
                fetched: 1,
                failed: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
