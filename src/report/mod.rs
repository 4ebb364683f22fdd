// src/report/mod.rs
//! Report aggregation: de-duplicate, rank, persist as a dated CSV.

pub mod rows;
pub mod store;

pub use rows::{CompetitorRow, GrantRow, PartnerRow, ReportRow, StoryRow};
pub use store::ReportStore;

use anyhow::Result;
use chrono::NaiveDate;
use metrics::counter;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::record::{Category, ClassifiedRecord};

/// Drop records whose natural key was already seen (first wins), then stable-sort
/// by rank so equal ranks keep collection order.
pub fn aggregate(records: Vec<ClassifiedRecord>) -> Vec<ClassifiedRecord> {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let mut out: Vec<ClassifiedRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.key.clone()))
        .collect();

    let dropped = before - out.len();
    if dropped > 0 {
        counter!("report_dedup_total").increment(dropped as u64);
        tracing::debug!(target: "report", dropped, "duplicate records removed");
    }

    out.sort_by_key(|r| r.sort_rank());
    out
}

/// Aggregate and write one category's run. Returns the artifact path.
pub fn publish(
    store: &ReportStore,
    category: Category,
    records: Vec<ClassifiedRecord>,
    date: NaiveDate,
) -> Result<PathBuf> {
    let records = aggregate(records);
    let path = match category {
        Category::Competitors => store.write::<CompetitorRow>(&records, date)?,
        Category::Grants => store.write::<GrantRow>(&records, date)?,
        Category::Partners => store.write::<PartnerRow>(&records, date)?,
        Category::Stories => store.write::<StoryRow>(&records, date)?,
    };
    tracing::info!(
        target: "report",
        category = category.stem(),
        rows = records.len(),
        path = %path.display(),
        "report saved"
    );
    Ok(path)
}
