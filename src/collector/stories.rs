// src/collector/stories.rs
//! Digital-divide stories: searches regional and education subreddits for
//! first-hand accounts of technology need. Only posts of Medium or High story
//! value are kept.

use chrono::Utc;
use metrics::counter;

use super::{truncate_chars, CollectorOutput, RunSummary};
use crate::classify::tables::{STORY_VALUE, USE_CASES};
use crate::classify::{classify_fields, Tier};
use crate::record::{Category, ClassifiedRecord, FetchStatus, RecordDetail, StoryDetail};
use crate::sentiment::SentimentAnalyzer;
use crate::sources::reddit::{ForumPost, ForumSearch};

/// Keywords searched per subreddit per run.
pub const KEYWORD_QUERIES: usize = 5;
pub const RESULTS_PER_SEARCH: u32 = 10;
const TITLE_CHARS: usize = 100;
const EXCERPT_CHARS: usize = 200;

/// Build a story row, or `None` when the post is not worth keeping.
pub fn story_record(
    subreddit: &str,
    post: &ForumPost,
    analyzer: &SentimentAnalyzer,
) -> Option<ClassifiedRecord> {
    let c = classify_fields(&[&post.title, &post.selftext], &STORY_VALUE);
    if c.tier == Tier::Low {
        return None;
    }

    let detail = StoryDetail {
        subreddit: format!("r/{subreddit}"),
        title: truncate_chars(&post.title, TITLE_CHARS),
        use_case: USE_CASES
            .categorize(&[&post.title, &post.selftext])
            .to_string(),
        sentiment: analyzer.sentiment(&format!("{} {}", post.title, post.selftext)),
        upvotes: post.score,
        comments: post.num_comments,
        url: post.url(),
        excerpt: truncate_chars(&post.selftext, EXCERPT_CHARS).replace('\n', " "),
    };
    Some(
        ClassifiedRecord::new(
            RecordDetail::Story(detail),
            c.tier,
            FetchStatus::Fetched,
            Utc::now(),
        )
        .with_classification(c),
    )
}

pub async fn collect(
    subreddits: &[String],
    keywords: &[String],
    search: &dyn ForumSearch,
) -> CollectorOutput {
    tracing::info!(
        target: "collector",
        subreddits = subreddits.len(),
        keywords = keywords.len().min(KEYWORD_QUERIES),
        "digital divide story run"
    );

    let analyzer = SentimentAnalyzer::new();
    let mut summary = RunSummary::default();
    let mut records = Vec::new();
    let mut dropped = 0u64;

    for sub in subreddits {
        for keyword in keywords.iter().take(KEYWORD_QUERIES) {
            match search.search(sub, keyword, RESULTS_PER_SEARCH).await {
                Ok(posts) => {
                    summary.count(FetchStatus::Fetched);
                    for post in &posts {
                        match story_record(sub, post, &analyzer) {
                            Some(r) => records.push(r),
                            None => dropped += 1,
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(target: "collector", error = ?e, subreddit = %sub, keyword = %keyword, "forum search failed");
                    counter!("collector_source_errors_total", "source" => "reddit").increment(1);
                    summary.count(FetchStatus::Failed);
                }
            }
        }
    }

    tracing::debug!(target: "collector", dropped, "low-value posts dropped");
    CollectorOutput { records, summary }.finish(Category::Stories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: &str) -> ForumPost {
        ForumPost {
            title: title.into(),
            selftext: body.into(),
            score: 4,
            num_comments: 2,
            permalink: "/r/raleigh/comments/x/".into(),
        }
    }

    #[test]
    fn low_value_posts_are_dropped() {
        let a = SentimentAnalyzer::new();
        assert!(story_record("raleigh", &post("Best laptop brand?", ""), &a).is_none());
    }

    #[test]
    fn kept_story_fields() {
        let a = SentimentAnalyzer::new();
        let body = "Single mom here,\nmy kid needs a laptop for school. Please help.";
        let r = story_record("raleigh", &post("Need a laptop for my student", body), &a)
            .expect("story kept");
        assert_eq!(r.tier, Tier::High);
        let RecordDetail::Story(d) = &r.detail else {
            panic!("expected story detail");
        };
        assert_eq!(d.subreddit, "r/raleigh");
        assert_eq!(d.use_case, "K-12 Student");
        assert!(!d.excerpt.contains('\n'));
        assert_eq!(d.url, "https://reddit.com/r/raleigh/comments/x/");
    }
}
