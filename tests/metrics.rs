// tests/metrics.rs
use market_intel::collector::competitors;
use market_intel::metrics::Metrics;
use market_intel::report;
use market_intel::{Category, ClassifiedRecord, ReportStore, Target};

// The Prometheus recorder is process-global, so everything lives in one test.
#[tokio::test]
async fn dump_contains_collector_and_report_series() {
    let m = Metrics::init().expect("recorder installs once");

    let targets = vec![Target::new(
        "Kramden Institute",
        "https://kramden.org",
        "NC competitor",
    )];
    let out = competitors::collect(&targets, None, 3).await;
    // The same row handed to the aggregator twice.
    let mut records: Vec<ClassifiedRecord> = out.records;
    records.push(records[0].clone());

    let tmp = tempfile::tempdir().unwrap();
    let store = ReportStore::new(tmp.path().join("reports"));
    let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    report::publish(&store, Category::Competitors, records, date).unwrap();

    let path = tmp.path().join("metrics.prom");
    m.write_to(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("collector_fetch_total"), "missing fetch counter:\n{text}");
    assert!(text.contains("status=\"skipped\""));
    assert!(text.contains("collector_records_total"));
    assert!(text.contains("report_dedup_total 1"));
    assert!(text.contains("collector_last_run_ts"));
}
