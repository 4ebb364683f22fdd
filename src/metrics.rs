// src/metrics.rs
//! Metric descriptions and the optional Prometheus text dump written after a CLI run.

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::path::Path;

/// One-time metric registration so every series carries its help text.
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collector_fetch_total",
            "Targets processed by budgeted runs, by category and status."
        );
        describe_counter!(
            "collector_fetch_errors_total",
            "Page fetch failures, by error kind."
        );
        describe_counter!(
            "collector_source_errors_total",
            "Failed API/feed queries (grants search, news feeds, forum search)."
        );
        describe_counter!(
            "collector_records_total",
            "Records emitted by collectors before aggregation."
        );
        describe_counter!(
            "report_dedup_total",
            "Records dropped as duplicates during aggregation."
        );
        describe_counter!("feed_entries_total", "RSS entries parsed.");
        describe_histogram!("feed_parse_ms", "RSS parse time in milliseconds.");
        describe_gauge!(
            "collector_last_run_ts",
            "Unix ts when a collector command last finished."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call at most once per process.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Stamp the run and write the text exposition to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        gauge!("collector_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        std::fs::write(path, self.handle.render())
            .with_context(|| format!("writing metrics to {}", path.display()))
    }
}
