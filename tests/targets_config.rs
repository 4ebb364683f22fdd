// tests/targets_config.rs
use std::{env, fs};

use market_intel::classify::Tier;
use market_intel::config::{load_targets, load_targets_from, Settings, Targets};

#[test]
fn toml_and_json_files_parse_and_fill_missing_lists() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("targets.toml");
    fs::write(
        &p_toml,
        r#"
subreddits = [" raleigh ", "", "durham", "raleigh"]

[[competitors]]
name = "Kramden Institute"
url = "https://kramden.org"
type = "NC competitor"
priority = "Low"

[[competitors]]
name = "  "
url = "https://blank.example"
"#,
    )
    .unwrap();
    let t = load_targets_from(&p_toml).unwrap();
    assert_eq!(t.subreddits, vec!["raleigh".to_string(), "durham".to_string()]);
    assert_eq!(t.competitors.len(), 1, "blank names are dropped");
    assert_eq!(t.competitors[0].kind, "NC competitor");
    assert_eq!(t.competitors[0].priority, Tier::Low);
    // Lists not in the file come from the built-ins.
    assert_eq!(t.foundations, Targets::default().foundations);

    let p_json = dir.path().join("targets.json");
    fs::write(
        &p_json,
        r#"{"grant_keywords": ["digital equity", " broadband "], "partners": [{"name": "Passage Home", "url": "https://passagehome.org", "focus": "Housing"}]}"#,
    )
    .unwrap();
    let j = load_targets_from(&p_json).unwrap();
    assert_eq!(j.grant_keywords, vec!["digital equity", "broadband"]);
    assert_eq!(j.partners[0].focus.as_deref(), Some("Housing"));
    assert_eq!(j.partners[0].priority, Tier::High);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("targets.json");
    fs::write(&p, "{ not json").unwrap();
    assert!(load_targets_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn env_then_config_dir_then_builtin() {
    // Isolate CWD so the repo's own config/ is never read.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var("TARGETS_CONFIG_PATH");

    // 1) Nothing configured: built-ins.
    let settings = Settings::from_env().unwrap();
    let t = load_targets(settings.targets_config_path.as_deref()).unwrap();
    assert_eq!(t, Targets::default());
    assert_eq!(t.competitors.len(), 5);

    // 2) ./config/targets.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("targets.toml"), r#"subreddits = ["bullcity"]"#).unwrap();
    let t = load_targets(None).unwrap();
    assert_eq!(t.subreddits, vec!["bullcity"]);

    // 3) TARGETS_CONFIG_PATH wins over config/
    let p_env = tmp.path().join("elsewhere.json");
    fs::write(&p_env, r#"{"subreddits": ["Charlotte"]}"#).unwrap();
    env::set_var("TARGETS_CONFIG_PATH", p_env.display().to_string());
    let settings = Settings::from_env().unwrap();
    let t = load_targets(settings.targets_config_path.as_deref()).unwrap();
    assert_eq!(t.subreddits, vec!["Charlotte"]);

    // 4) A path that does not exist is reported, not silently ignored.
    env::set_var("TARGETS_CONFIG_PATH", tmp.path().join("missing.toml").display().to_string());
    let settings = Settings::from_env().unwrap();
    assert!(load_targets(settings.targets_config_path.as_deref()).is_err());
    env::remove_var("TARGETS_CONFIG_PATH");

    env::set_current_dir(&old).unwrap();
}

#[test]
fn settings_defaults_and_required_credentials() {
    let s = Settings::from_lookup(|k: &str| match k {
        "FETCH_BUDGET" => Some("5".to_string()),
        "REDDIT_CLIENT_ID" => Some("id".to_string()),
        "REDDIT_CLIENT_SECRET" => Some("   ".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(s.fetch_budget, 5);
    assert_eq!(s.reports_dir, std::path::PathBuf::from("reports"));
    assert!(s.reddit.is_none(), "blank secret counts as unset");
    assert!(s.reddit_credentials().is_err());
    assert!(s.manus_api_key().is_err());
    assert!(s.digest_recipient().is_err());

    let bad = Settings::from_lookup(|k: &str| (k == "FETCH_BUDGET").then(|| "three".to_string()));
    assert!(bad.is_err());
}

#[test]
fn repeated_target_urls_or_names_keep_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("targets.toml");
    fs::write(
        &p,
        r#"
[[competitors]]
name = "Org A"
url = "https://same.org"

[[competitors]]
name = "Org B"
url = " https://same.org "

[[competitors]]
name = "Org A"
url = "https://other.org"

[[competitors]]
name = "Org C"
url = "https://c.org"
"#,
    )
    .unwrap();
    let t = load_targets_from(&p).unwrap();
    let names: Vec<&str> = t.competitors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Org A", "Org C"]);
}

#[tokio::test]
async fn every_surviving_target_gets_one_report_row() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("targets.json");
    fs::write(
        &p,
        r#"{"competitors": [
            {"name": "Org A", "url": "https://same.org"},
            {"name": "Org B", "url": "https://same.org"},
            {"name": "Org C", "url": "https://c.org"}
        ]}"#,
    )
    .unwrap();
    let t = load_targets_from(&p).unwrap();
    let out = market_intel::collector::competitors::collect(&t.competitors, None, 3).await;
    let rows = market_intel::report::aggregate(out.records);
    assert_eq!(rows.len(), t.competitors.len());
}

#[test]
fn priority_spelling_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("targets.toml");
    fs::write(
        &p,
        r#"
[[foundations]]
name = "Golden LEAF Foundation"
url = "https://www.goldenleaf.org/grants/"
priority = "high"

[[foundations]]
name = "Z. Smith Reynolds Foundation"
url = "https://www.zsr.org/grants"
priority = " MEDIUM "
"#,
    )
    .unwrap();
    let t = load_targets_from(&p).unwrap();
    assert_eq!(t.foundations[0].priority, Tier::High);
    assert_eq!(t.foundations[1].priority, Tier::Medium);

    fs::write(&p, "[[foundations]]\nname = \"X\"\nurl = \"https://x.org\"\npriority = \"urgent\"\n").unwrap();
    assert!(load_targets_from(&p).is_err());
}
