// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod agent;
pub mod classify;
pub mod collector;
pub mod config;
pub mod digest;
pub mod fetch;
pub mod metrics;
pub mod notify;
pub mod record;
pub mod report;
pub mod sentiment;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::classify::{classify, Classification, Tier};
pub use crate::collector::{run_budgeted, CollectorOutput, RunSummary};
pub use crate::record::{Category, ClassifiedRecord, FetchStatus, Target};
pub use crate::report::{aggregate, ReportStore};

use std::time::Duration;

pub const USER_AGENT: &str = concat!("market-intel/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client. Each request still sets its own timeout.
pub fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| anyhow::anyhow!("building http client: {e}"))
}
