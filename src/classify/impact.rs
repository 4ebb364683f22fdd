// src/classify/impact.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Large grouped numbers ("12,000") or counts of served people/devices ("500 laptops").
static RE_IMPACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\d{1,3}(?:,\d{3})+|\d+(?:,\d+)*\s*(?:devices?|computers?|laptops?|families?|students?)",
    )
    .expect("impact regex")
});

/// Return up to `max` impact figures found in the text, in order of appearance.
pub fn impact_metrics(text: &str, max: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_IMPACT
        .find_iter(&lowered)
        .take(max)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_grouped_numbers_and_counts() {
        let t = "We refurbished 12,500 devices and served 300 Families in 2023.";
        let found = impact_metrics(t, 3);
        assert_eq!(found, vec!["12,500", "300 families"]);
    }

    #[test]
    fn caps_at_max() {
        let t = "1,000 and 2,000 and 3,000 and 4,000";
        assert_eq!(impact_metrics(t, 3).len(), 3);
    }

    #[test]
    fn plain_years_do_not_count() {
        assert!(impact_metrics("Founded in 2012", 3).is_empty());
    }
}
