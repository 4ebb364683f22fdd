// src/classify/mod.rs
//! Heuristic keyword classifier.
//!
//! A [`KeywordTable`] is an ordered list of keyword groups plus two tier cutoffs.
//! Matching is a case-insensitive substring test against the lowercased text;
//! every triggered group adds its weight and contributes one label.
//!
//! - `Scoring::Once` adds the weight once when any keyword of the group matches
//!   (regional bonus groups always use this).
//! - `Scoring::PerKeyword` adds the weight for every distinct keyword that matches.
//!
//! Tables are plain `'static` data (see [`tables`]); nothing here keeps state.

pub mod impact;
pub mod tables;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal relevance tier. Declaration order is rank order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    pub fn rank(self) -> u8 {
        match self {
            Tier::High => 0,
            Tier::Medium => 1,
            Tier::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::High => "High",
            Tier::Medium => "Medium",
            Tier::Low => "Low",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Tier::High),
            "medium" => Ok(Tier::Medium),
            "low" => Ok(Tier::Low),
            other => anyhow::bail!("unknown tier: {other}"),
        }
    }
}

impl TryFrom<String> for Tier {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    Once,
    PerKeyword,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub label: &'static str,
    pub weight: i32,
    pub scoring: Scoring,
    pub keywords: &'static [&'static str],
}

impl KeywordGroup {
    /// Weight contributed by this group for already-lowercased `text` (0 if not triggered).
    fn contribution(&self, text: &str) -> i32 {
        match self.scoring {
            Scoring::Once => {
                if self.keywords.iter().any(|k| text.contains(k)) {
                    self.weight
                } else {
                    0
                }
            }
            Scoring::PerKeyword => {
                let hits = self.keywords.iter().filter(|k| text.contains(*k)).count();
                self.weight * hits as i32
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordTable {
    pub groups: &'static [KeywordGroup],
    /// score >= high → `Tier::High`
    pub high: i32,
    /// score >= medium → `Tier::Medium`
    pub medium: i32,
    pub default_label: &'static str,
}

impl KeywordTable {
    pub fn tier_for(&self, score: i32) -> Tier {
        if score >= self.high {
            Tier::High
        } else if score >= self.medium {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tier: Tier,
    pub labels: Vec<String>,
    pub score: i32,
}

impl Classification {
    /// Add a bonus found outside the keyword table and re-derive the tier.
    pub fn boost(&mut self, table: &KeywordTable, label: String, weight: i32) {
        if self.labels.len() == 1 && self.labels[0] == table.default_label {
            self.labels.clear();
        }
        self.labels.push(label);
        self.score += weight;
        self.tier = table.tier_for(self.score);
    }
}

/// Classify free text against a keyword table.
pub fn classify(text: &str, table: &KeywordTable) -> Classification {
    let lowered = text.to_lowercase();
    let mut score = 0;
    let mut labels = Vec::new();

    for group in table.groups {
        let w = group.contribution(&lowered);
        if w > 0 {
            score += w;
            labels.push(group.label.to_string());
        }
    }

    if labels.is_empty() {
        labels.push(table.default_label.to_string());
    }

    Classification {
        tier: table.tier_for(score),
        labels,
        score,
    }
}

/// Classify several text fields joined with a single space (e.g. title + summary).
pub fn classify_fields(fields: &[&str], table: &KeywordTable) -> Classification {
    classify(&fields.join(" "), table)
}

/// Ordered first-match categorizer: the first rule with any matching keyword wins.
#[derive(Debug, Clone, Copy)]
pub struct Categorizer<C: 'static> {
    pub rules: &'static [(C, &'static [&'static str])],
    pub fallback: C,
}

impl<C: Copy> Categorizer<C> {
    pub fn categorize(&self, fields: &[&str]) -> C {
        let lowered = fields.join(" ").to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(c, _)| *c)
            .unwrap_or(self.fallback)
    }
}

/// True when any keyword occurs in the lowercased text.
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: KeywordTable = KeywordTable {
        groups: &[
            KeywordGroup {
                label: "Digital equity",
                weight: 3,
                scoring: Scoring::Once,
                keywords: &["digital equity", "digital divide"],
            },
            KeywordGroup {
                label: "Technology",
                weight: 2,
                scoring: Scoring::Once,
                keywords: &["technology"],
            },
            KeywordGroup {
                label: "North Carolina",
                weight: 5,
                scoring: Scoring::Once,
                keywords: &["north carolina", "raleigh", "durham"],
            },
        ],
        high: 8,
        medium: 4,
        default_label: "General monitoring",
    };

    #[test]
    fn regional_bonus_applies_once() {
        let c = classify(
            "Digital equity program expands across North Carolina",
            &TOY,
        );
        assert_eq!(c.score, 8);
        assert_eq!(c.tier, Tier::High);
        assert_eq!(c.labels, vec!["Digital equity", "North Carolina"]);

        let twice = classify("north carolina: raleigh and durham", &TOY);
        assert_eq!(twice.score, 5);
        assert_eq!(twice.tier, Tier::Medium);
    }

    #[test]
    fn empty_text_is_lowest_tier_with_default_label() {
        let c = classify("", &TOY);
        assert_eq!(c.score, 0);
        assert_eq!(c.tier, Tier::Low);
        assert_eq!(c.labels, vec!["General monitoring"]);
    }

    #[test]
    fn per_keyword_groups_sum_each_distinct_hit() {
        const PER: KeywordTable = KeywordTable {
            groups: &[KeywordGroup {
                label: "Devices",
                weight: 3,
                scoring: Scoring::PerKeyword,
                keywords: &["laptop", "computer", "device"],
            }],
            high: 8,
            medium: 4,
            default_label: "none",
        };
        // "laptop" twice still counts once; two distinct keywords → 6
        let c = classify("Laptop, laptop and a computer", &PER);
        assert_eq!(c.score, 6);
        assert_eq!(c.tier, Tier::Medium);
    }

    #[test]
    fn boost_replaces_default_label() {
        let mut c = classify("nothing here", &TOY);
        c.boost(&TOY, "Impact metrics: 500 laptops".into(), 4);
        assert_eq!(c.labels, vec!["Impact metrics: 500 laptops"]);
        assert_eq!(c.tier, Tier::Medium);
    }

    #[test]
    fn categorizer_first_match_wins() {
        const CAT: Categorizer<&str> = Categorizer {
            rules: &[("School", &["school", "class"]), ("Job", &["job"])],
            fallback: "Other",
        };
        assert_eq!(CAT.categorize(&["Job help for my CLASS"]), "School");
        assert_eq!(CAT.categorize(&["job", ""]), "Job");
        assert_eq!(CAT.categorize(&["nothing"]), "Other");
    }

    #[test]
    fn tier_parses_and_orders() {
        assert_eq!("high".parse::<Tier>().unwrap(), Tier::High);
        assert_eq!(" Medium ".parse::<Tier>().unwrap(), Tier::Medium);
        assert!("urgent".parse::<Tier>().is_err());
        assert!(Tier::High < Tier::Medium && Tier::Medium < Tier::Low);
    }
}
