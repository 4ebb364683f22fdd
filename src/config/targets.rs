// src/config/targets.rs
//! Monitored targets and search keywords.
//!
//! Lookup order:
//! 1) `$TARGETS_CONFIG_PATH` (must exist when set)
//! 2) `config/targets.toml`
//! 3) `config/targets.json`
//! 4) built-in seed lists
//!
//! A config file may list only some sections; the rest keep their built-in values.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::record::Target;

const DEFAULT_TOML: &str = "config/targets.toml";
const DEFAULT_JSON: &str = "config/targets.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default = "builtin::competitors")]
    pub competitors: Vec<Target>,
    #[serde(default = "builtin::foundations")]
    pub foundations: Vec<Target>,
    #[serde(default = "builtin::partners")]
    pub partners: Vec<Target>,
    #[serde(default = "builtin::subreddits")]
    pub subreddits: Vec<String>,
    #[serde(default = "builtin::grant_keywords")]
    pub grant_keywords: Vec<String>,
    #[serde(default = "builtin::story_keywords")]
    pub story_keywords: Vec<String>,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            competitors: builtin::competitors(),
            foundations: builtin::foundations(),
            partners: builtin::partners(),
            subreddits: builtin::subreddits(),
            grant_keywords: builtin::grant_keywords(),
            story_keywords: builtin::story_keywords(),
        }
    }
}

/// Load targets from an explicit TOML or JSON file.
pub fn load_targets_from(path: &Path) -> Result<Targets> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading targets from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let targets = match ext.as_str() {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("parsing TOML {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON {}", path.display()))?,
        _ => parse_any(&content)?,
    };
    Ok(clean(targets))
}

fn parse_any(s: &str) -> Result<Targets> {
    if let Ok(t) = serde_json::from_str(s) {
        return Ok(t);
    }
    toml::from_str(s).map_err(|e| anyhow!("unsupported targets format: {e}"))
}

/// Resolve targets: explicit path (from `TARGETS_CONFIG_PATH`), then `config/`, then built-ins.
pub fn load_targets(explicit: Option<&Path>) -> Result<Targets> {
    if let Some(p) = explicit {
        if !p.exists() {
            return Err(anyhow!(
                "TARGETS_CONFIG_PATH points to non-existent path {}",
                p.display()
            ));
        }
        tracing::info!(target: "config", path = %p.display(), "loading targets");
        return load_targets_from(p);
    }
    for candidate in [DEFAULT_TOML, DEFAULT_JSON] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            tracing::info!(target: "config", path = %p.display(), "loading targets");
            return load_targets_from(&p);
        }
    }
    Ok(Targets::default())
}

fn clean_strings(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}

/// Trim, drop blanks and duplicates; order is significant (budgets take the first N).
fn clean(mut t: Targets) -> Targets {
    t.subreddits = clean_strings(t.subreddits);
    t.grant_keywords = clean_strings(t.grant_keywords);
    t.story_keywords = clean_strings(t.story_keywords);
    t.competitors = clean_targets("competitors", t.competitors);
    t.foundations = clean_targets("foundations", t.foundations);
    t.partners = clean_targets("partners", t.partners);
    t
}

/// Drop blank targets and any target repeating an earlier name or URL, so each
/// survivor maps to exactly one report row.
fn clean_targets(list: &str, items: Vec<Target>) -> Vec<Target> {
    let mut out: Vec<Target> = Vec::with_capacity(items.len());
    for mut it in items {
        it.name = it.name.trim().to_string();
        it.url = it.url.trim().to_string();
        if it.name.is_empty() || it.url.is_empty() {
            continue;
        }
        if let Some(prev) = out.iter().find(|o| o.url == it.url || o.name == it.name) {
            tracing::warn!(
                target: "config",
                list,
                name = %it.name,
                url = %it.url,
                kept = %prev.name,
                "duplicate target dropped"
            );
            continue;
        }
        out.push(it);
    }
    out
}

pub mod builtin {
    use crate::classify::Tier;
    use crate::record::Target;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    pub fn competitors() -> Vec<Target> {
        [
            ("PCs for People", "https://www.pcsforpeople.org", "https://www.pcsforpeople.org/news/", "National competitor"),
            ("Human-I-T", "https://www.human-i-t.org", "https://www.human-i-t.org/blog/", "California competitor"),
            ("Kramden Institute", "https://kramden.org", "https://kramden.org/news/", "NC competitor"),
            ("EveryoneOn", "https://www.everyoneon.org", "https://www.everyoneon.org/blog/", "National partner potential"),
            ("Digitunity", "https://digitunity.org", "https://digitunity.org/news/", "Industry association"),
        ]
        .into_iter()
        .map(|(name, url, news, kind)| Target::new(name, url, kind).with_secondary_url(news))
        .collect()
    }

    pub fn foundations() -> Vec<Target> {
        [
            ("Google.org", "https://www.google.org/grants/"),
            ("Microsoft Philanthropies", "https://www.microsoft.com/en-us/corporate-responsibility/philanthropies"),
            ("T-Mobile Foundation", "https://www.t-mobile.com/responsibility/community/t-mobile-foundation"),
            ("State Farm Foundation", "https://www.statefarm.com/about-us/corporate-responsibility/community-grants"),
            ("Duke Energy Foundation", "https://www.duke-energy.com/community/duke-energy-foundation"),
            ("Z. Smith Reynolds Foundation", "https://www.zsr.org/grants"),
            ("Kate B. Reynolds Charitable Trust", "https://kbrct.org/apply/"),
            ("Golden LEAF Foundation", "https://www.goldenleaf.org/grants/"),
            ("Blue Cross NC Foundation", "https://www.bcbsncfoundation.org/grants/"),
        ]
        .into_iter()
        .map(|(name, url)| Target::new(name, url, "Foundation").with_priority(Tier::High))
        .collect()
    }

    pub fn partners() -> Vec<Target> {
        [
            ("YMCA of the Triangle", "https://www.ymcatriangle.org", "Youth programs"),
            ("Boys & Girls Club Durham", "https://www.bgcdurham.org", "Youth development"),
            ("Salvation Army NC", "https://salvationarmycarolinas.org", "Family services"),
            ("Easterseals UCP NC", "https://www.eastersealsucp.com", "Disability services"),
            ("Veterans Life Center NC", "https://veteranslifecenter.org", "Veteran support"),
            ("Passage Home", "https://passagehome.org", "Housing assistance"),
            ("Step Up Ministry", "https://stepupministry.org", "Job training"),
            ("Raleigh Dream Center", "https://raleighdreamcenter.org", "Community outreach"),
        ]
        .into_iter()
        .map(|(name, url, focus)| Target::new(name, url, "Distribution partner").with_focus(focus))
        .collect()
    }

    pub fn subreddits() -> Vec<String> {
        strings(&[
            "triangle",
            "raleigh",
            "NorthCarolina",
            "Charlotte",
            "bullcity",
            "Greensboro",
            "winstonsalem",
            "education",
            "Teachers",
            "povertyfinance",
        ])
    }

    pub fn grant_keywords() -> Vec<String> {
        strings(&[
            "digital equity",
            "digital divide",
            "technology access",
            "computer donation",
            "digital literacy",
            "education technology",
            "broadband access",
            "nonprofit technology",
            "underserved communities",
        ])
    }

    pub fn story_keywords() -> Vec<String> {
        strings(&[
            "laptop",
            "computer",
            "chromebook",
            "homework",
            "can't afford",
            "no internet",
            "wifi",
            "hotspot",
            "digital divide",
            "technology access",
            "school device",
            "broken laptop",
            "need computer",
            "old computer",
            "remote learning",
            "online school",
            "virtual learning",
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_sizes() {
        let t = Targets::default();
        assert_eq!(t.competitors.len(), 5);
        assert_eq!(t.foundations.len(), 9);
        assert_eq!(t.partners.len(), 8);
        assert_eq!(t.subreddits.len(), 10);
        assert_eq!(t.grant_keywords[0], "digital equity");
        assert_eq!(
            t.competitors[2].secondary_url.as_deref(),
            Some("https://kramden.org/news/")
        );
    }

    #[test]
    fn partial_toml_keeps_other_sections() {
        let s = r#"
subreddits = [" raleigh ", "", "raleigh", "durham"]

[[competitors]]
name = "Kramden Institute"
url = "https://kramden.org"
type = "NC competitor"
priority = "Medium"
"#;
        let t = clean(toml::from_str::<Targets>(s).unwrap());
        assert_eq!(t.subreddits, vec!["raleigh", "durham"]);
        assert_eq!(t.competitors.len(), 1);
        assert_eq!(t.competitors[0].priority, crate::classify::Tier::Medium);
        assert_eq!(t.competitors[0].kind, "NC competitor");
        assert_eq!(t.foundations.len(), 9);
    }
}
