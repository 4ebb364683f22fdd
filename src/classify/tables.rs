// src/classify/tables.rs
//! Fixed keyword tables and cutoffs used by the collectors.
//!
//! These values are kept exactly as the reports have always been scored so that
//! CSV output stays comparable between runs. They are not tuned or learned.

use super::{Categorizer, KeywordGroup, KeywordTable, Scoring};
use crate::record::OpportunityType;

pub const GRANT_HIGH_CUTOFF: i32 = 8;
pub const GRANT_MEDIUM_CUTOFF: i32 = 4;
pub const GRANT_HIGH_VALUE_WEIGHT: i32 = 3;
pub const GRANT_MEDIUM_VALUE_WEIGHT: i32 = 2;
pub const GRANT_NC_BONUS: i32 = 5;

/// Grant relevance: title + synopsis of an opportunity (or a foundation page).
pub const GRANT_RELEVANCE: KeywordTable = KeywordTable {
    groups: &[
        KeywordGroup {
            label: "Device / digital-equity focus",
            weight: GRANT_HIGH_VALUE_WEIGHT,
            scoring: Scoring::PerKeyword,
            keywords: &[
                "digital equity",
                "digital divide",
                "computer",
                "chromebook",
                "laptop",
                "device",
            ],
        },
        KeywordGroup {
            label: "Technology / education focus",
            weight: GRANT_MEDIUM_VALUE_WEIGHT,
            scoring: Scoring::PerKeyword,
            keywords: &[
                "technology",
                "education",
                "underserved",
                "low-income",
                "rural",
                "broadband",
            ],
        },
        KeywordGroup {
            label: "North Carolina",
            weight: GRANT_NC_BONUS,
            scoring: Scoring::Once,
            keywords: &["north carolina", " nc "],
        },
    ],
    high: GRANT_HIGH_CUTOFF,
    medium: GRANT_MEDIUM_CUTOFF,
    default_label: "General opportunity",
};

pub const STORY_HIGH_CUTOFF: i32 = 6;
pub const STORY_MEDIUM_CUTOFF: i32 = 3;

/// Story value: how useful a forum post is as a first-hand account of need.
pub const STORY_VALUE: KeywordTable = KeywordTable {
    groups: &[
        KeywordGroup {
            label: "Story indicators",
            weight: 2,
            scoring: Scoring::PerKeyword,
            keywords: &[
                "single mom",
                "single parent",
                "low income",
                "struggling",
                "homeless",
                "unemployed",
                "job search",
                "resume",
                "student",
                "kid",
                "children",
                "family",
                "veteran",
            ],
        },
        KeywordGroup {
            label: "North Carolina",
            weight: 3,
            scoring: Scoring::Once,
            keywords: &[
                "north carolina",
                "nc",
                "raleigh",
                "durham",
                "charlotte",
                "triangle",
                "triad",
            ],
        },
        KeywordGroup {
            label: "Urgency",
            weight: 1,
            scoring: Scoring::PerKeyword,
            keywords: &["desperate", "urgent", "help", "please", "need", "can't"],
        },
    ],
    high: STORY_HIGH_CUTOFF,
    medium: STORY_MEDIUM_CUTOFF,
    default_label: "General Need",
};

pub const COMPETITOR_HIGH_CUTOFF: i32 = 5;
pub const COMPETITOR_MEDIUM_CUTOFF: i32 = 2;
pub const IMPACT_METRICS_BONUS: i32 = 2;

/// Competitor activity: insight labels read off a scraped home page.
pub const COMPETITOR_ACTIVITY: KeywordTable = KeywordTable {
    groups: &[
        KeywordGroup {
            label: "Expansion activity detected",
            weight: 3,
            scoring: Scoring::Once,
            keywords: &["expand", "new location", "launch", "opening"],
        },
        KeywordGroup {
            label: "Funding/grant news",
            weight: 3,
            scoring: Scoring::Once,
            keywords: &["grant", "funding", "million", "donation"],
        },
        KeywordGroup {
            label: "Partnership activity",
            weight: 2,
            scoring: Scoring::Once,
            keywords: &["partner", "collaborate", "join"],
        },
        KeywordGroup {
            label: "New programs/services",
            weight: 1,
            scoring: Scoring::Once,
            keywords: &["program", "initiative", "service"],
        },
    ],
    high: COMPETITOR_HIGH_CUTOFF,
    medium: COMPETITOR_MEDIUM_CUTOFF,
    default_label: "General monitoring",
};

pub const USE_CASES: Categorizer<&str> = Categorizer {
    rules: &[
        ("K-12 Student", &["student", "school", "homework", "class"]),
        ("College Student", &["college", "university", "degree"]),
        ("Job Seeker", &["job", "resume", "employment", "work from home"]),
        ("Veteran", &["veteran", "military", "va"]),
        ("Single Parent", &["single mom", "single parent", "parent"]),
        ("Special Needs", &["disabled", "disability", "special needs"]),
    ],
    fallback: "General Need",
};

pub const OPPORTUNITY_TYPES: Categorizer<OpportunityType> = Categorizer {
    rules: &[
        (
            OpportunityType::Expansion,
            &["expand", "new location", "open", "launch"],
        ),
        (
            OpportunityType::FundingNews,
            &["grant", "funding", "donation", "million"],
        ),
        (
            OpportunityType::Partnership,
            &["partnership", "partner", "collaborate"],
        ),
        (OpportunityType::Event, &["event", "fundraiser", "gala"]),
        (
            OpportunityType::LeadershipChange,
            &["hire", "director", "ceo", "leadership"],
        ),
    ],
    fallback: OpportunityType::GeneralNews,
};

/// Philanthropy-news titles worth keeping.
pub const NEWS_TITLE_TERMS: &[&str] = &[
    "digital",
    "technology",
    "computer",
    "education",
    "equity",
    "grant",
];

/// Foundation page mentions an active deadline.
pub const DEADLINE_TERMS: &[&str] = &["deadline", "due date", "submit by"];

/// Foundation page mentions award amounts.
pub const AMOUNT_TERMS: &[&str] = &["$", "award", "grant amount", "funding"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, classify_fields, Tier};

    #[test]
    fn grant_example_scores_high() {
        let c = classify(
            "Digital equity program expands across North Carolina",
            &GRANT_RELEVANCE,
        );
        assert_eq!(c.score, 8);
        assert_eq!(c.tier, Tier::High);
    }

    #[test]
    fn grant_nc_abbreviation_needs_spaces() {
        let c = classify_fields(&["Broadband for rural", "NC families"], &GRANT_RELEVANCE);
        // rural(2) + broadband(2) + " nc "(5)
        assert_eq!(c.score, 9);
        let no_space = classify("broadband in rural areas, nc.", &GRANT_RELEVANCE);
        assert_eq!(no_space.score, 4);
        assert_eq!(no_space.tier, Tier::Medium);
    }

    #[test]
    fn story_nc_terms_count_once() {
        let c = classify("raleigh durham charlotte", &STORY_VALUE);
        assert_eq!(c.score, 3);
        assert_eq!(c.tier, Tier::Medium);
    }

    #[test]
    fn story_urgency_and_indicators_accumulate() {
        // "student"(2) + "family"(2) + "need"(1) + "please"(1) = 6
        let c = classify("Student in my family, please I need a laptop", &STORY_VALUE);
        assert_eq!(c.score, 6);
        assert_eq!(c.tier, Tier::High);
    }

    #[test]
    fn use_case_order_matters() {
        assert_eq!(USE_CASES.categorize(&["Need laptop for class", ""]), "K-12 Student");
        assert_eq!(USE_CASES.categorize(&["Lost my job", "resume help"]), "Job Seeker");
        assert_eq!(USE_CASES.categorize(&["Anyone have a spare", ""]), "General Need");
    }

    #[test]
    fn opportunity_type_categories() {
        assert_eq!(
            OPPORTUNITY_TYPES.categorize(&["YMCA opens new branch", ""]),
            OpportunityType::Expansion
        );
        assert_eq!(
            OPPORTUNITY_TYPES.categorize(&["Annual gala raises record", ""]),
            OpportunityType::Event
        );
        assert_eq!(
            OPPORTUNITY_TYPES.categorize(&["Weekly update", "nothing new"]),
            OpportunityType::GeneralNews
        );
    }
}
