// src/sentiment.rs
//! Lexicon sentiment for forum posts.
//!
//! Each known word carries an integer weight in -3..=3. A word preceded by a
//! negator within the last three tokens has its sign flipped. Polarity is the
//! mean weight of the scored words scaled into [-1, 1].

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::record::Sentiment;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

const MAX_WEIGHT: f64 = 3.0;
const NEGATION_WINDOW: usize = 3;
pub const POSITIVE_CUTOFF: f64 = 0.1;
pub const NEGATIVE_CUTOFF: f64 = -0.1;

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (summed score, scored word count).
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score = 0;
        let mut hits = 0;

        for (i, w) in tokens.iter().enumerate() {
            let base = self.word_score(w);
            if base == 0 {
                continue;
            }
            let negated =
                (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
            hits += 1;
        }

        (score, hits)
    }

    /// Polarity in [-1, 1]; 0.0 when no word is in the lexicon.
    pub fn polarity(&self, text: &str) -> f64 {
        let (score, hits) = self.score_text(text);
        if hits == 0 {
            return 0.0;
        }
        (score as f64 / (hits as f64 * MAX_WEIGHT)).clamp(-1.0, 1.0)
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        let p = self.polarity(text);
        if p > POSITIVE_CUTOFF {
            Sentiment::Positive
        } else if p < NEGATIVE_CUTOFF {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Lowercased word tokens; apostrophes stay inside words ("can't").
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "don't"
            | "doesn't"
            | "didn't"
            | "can't"
            | "cannot"
            | "without"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_unknown_text_is_neutral() {
        let a = SentimentAnalyzer::new();
        assert_eq!(a.polarity(""), 0.0);
        assert_eq!(a.sentiment("the laptop is on the table"), Sentiment::Neutral);
    }

    #[test]
    fn polarity_signs() {
        let a = SentimentAnalyzer::new();
        assert_eq!(a.sentiment("So grateful, this was amazing"), Sentiment::Positive);
        assert_eq!(a.sentiment("Desperate and struggling, it's awful"), Sentiment::Negative);
    }

    #[test]
    fn negation_flips_within_window() {
        let a = SentimentAnalyzer::new();
        let (plain, _) = a.score_text("this is good");
        let (negated, _) = a.score_text("this is not very good");
        assert!(plain > 0);
        assert_eq!(negated, -plain);
        // Four tokens away: outside the window.
        let (far, _) = a.score_text("not that it was ever good");
        assert_eq!(far, plain);
    }

    #[test]
    fn apostrophe_negators_are_tokens() {
        let a = SentimentAnalyzer::new();
        assert_eq!(a.sentiment("I can\u{2019}t say it's great"), Sentiment::Negative);
    }
}
