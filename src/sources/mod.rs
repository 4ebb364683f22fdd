// src/sources/mod.rs
//! Free data sources polled by the collectors: RSS feeds, the Grants.gov
//! search API and Reddit search. Each is a thin client behind a trait so
//! collector runs can be exercised with in-memory fakes.

pub mod grants_gov;
pub mod reddit;
pub mod rss;

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Normalize feed/API text: decode entities, strip tags, ASCII quotes, collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();
    let untagged = RE_TAGS.replace_all(&decoded, " ");
    let quoted = untagged
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    RE_WS.replace_all(&quoted, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_markup() {
        let s = "  <a href=\"x\">Kramden&nbsp;Institute</a>&nbsp;&nbsp; gets \u{201C}grant\u{201D}  ";
        assert_eq!(clean_text(s), "Kramden Institute gets \"grant\"");
    }
}
