// src/digest/html.rs
//! Self-contained HTML rendering of a [`Digest`]. Every style is inline so
//! mail clients that strip `<style>` blocks still render it.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use super::{Card, Digest, Section, Stat};
use crate::classify::Tier;

const ORANGE: &str = "#f58420";
const DARK: &str = "#1a1a1a";

fn badge(tier: Tier) -> String {
    let style = match tier {
        Tier::High => format!("background:{ORANGE};color:#fff"),
        Tier::Medium => "background:#e0e0e0;color:#333".to_string(),
        Tier::Low => "background:#f0f0f0;color:#777".to_string(),
    };
    format!(
        "<span style=\"display:inline-block;padding:4px 12px;border-radius:20px;font-size:11px;\
         font-weight:700;text-transform:uppercase;{style}\">{}</span>",
        tier.as_str()
    )
}

fn render_stats(out: &mut String, stats: &[Stat]) {
    if stats.is_empty() {
        return;
    }
    out.push_str("<table role=\"presentation\" width=\"100%\" style=\"border-spacing:8px;margin-bottom:16px\"><tr>");
    for s in stats {
        let _ = write!(
            out,
            "<td style=\"background:{DARK};border-radius:12px;padding:16px;text-align:center;color:#fff\">\
             <div style=\"font-size:28px;font-weight:800;color:{ORANGE}\">{}</div>\
             <div style=\"font-size:11px;text-transform:uppercase;opacity:0.85\">{}</div></td>",
            s.value,
            encode_text(s.label)
        );
    }
    out.push_str("</tr></table>");
}

fn render_card(out: &mut String, card: &Card) {
    let highlight = card.tier == Some(Tier::High);
    let bg = if highlight {
        format!("background:#fff3e0;border-left:5px solid {ORANGE}")
    } else {
        "background:#f5f5f7".to_string()
    };
    let _ = write!(
        out,
        "<div style=\"{bg};border-radius:12px;padding:16px;margin-bottom:12px\">"
    );
    if let Some(t) = card.tier {
        out.push_str(&badge(t));
    }
    let title = encode_text(&card.title);
    let title_html = match &card.url {
        Some(url) => format!(
            "<a href=\"{}\" style=\"color:{DARK};text-decoration:none\">{title}</a>",
            encode_double_quoted_attribute(url)
        ),
        None => title.to_string(),
    };
    let _ = write!(
        out,
        "<div style=\"font-size:16px;font-weight:700;color:{DARK};margin:8px 0\">{title_html}</div>\
         <div style=\"font-size:13px;color:#666\">{}</div></div>",
        encode_text(&card.meta)
    );
}

fn render_section(out: &mut String, section: &Section) {
    let _ = write!(
        out,
        "<div style=\"margin-bottom:32px\">\
         <div style=\"font-size:22px;font-weight:700;color:{DARK};padding-bottom:8px;\
         margin-bottom:16px;border-bottom:3px solid {ORANGE}\">{}</div>\
         <div style=\"font-size:12px;color:#999;margin-bottom:12px\">Report of {}</div>",
        encode_text(section.heading),
        section.report_date.format("%Y-%m-%d")
    );
    render_stats(out, &section.stats);
    for card in &section.cards {
        render_card(out, card);
    }
    out.push_str("</div>");
}

pub fn render(digest: &Digest) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\
         <title>Market Intelligence</title></head>\
         <body style=\"margin:0;padding:32px 16px;background:{ORANGE};\
         font-family:-apple-system,'Segoe UI',Roboto,sans-serif\">\
         <div style=\"max-width:680px;margin:0 auto;background:#fff;border-radius:24px;overflow:hidden\">\
         <div style=\"background:{DARK};padding:40px;text-align:center\">\
         <div style=\"color:{ORANGE};font-size:16px;font-weight:600;letter-spacing:2px;text-transform:uppercase\">\
         HubZone Technology Initiative</div>\
         <h1 style=\"color:#fff;font-size:28px;margin:8px 0\">Market Intelligence</h1>\
         <div style=\"color:#bbb;font-size:15px\">{}</div></div>\
         <div style=\"padding:32px\">",
        digest.date.format("%B %d, %Y")
    );

    if digest.is_empty() {
        out.push_str(
            "<p style=\"color:#666\">No reports were available for this digest.</p>",
        );
    }
    for section in &digest.sections {
        render_section(&mut out, section);
    }

    out.push_str(
        "</div><div style=\"background:#1a1a1a;padding:24px;text-align:center;color:#888;font-size:12px\">\
         HubZone Technology Initiative<br>Old Laptops. New Opportunities.</div></div></body></html>",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use chrono::NaiveDate;

    #[test]
    fn text_is_escaped() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let digest = Digest {
            date: day,
            sections: vec![Section {
                category: Category::Grants,
                heading: "Grant Opportunities",
                report_date: day,
                stats: vec![],
                cards: vec![Card {
                    tier: Some(Tier::High),
                    title: "<script>alert(1)</script> & more".into(),
                    meta: "a \"quoted\" <b>".into(),
                    url: Some("https://x.test/?a=1&b=\"2\"".into()),
                }],
            }],
        };
        let html = render(&digest);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(html.contains("href=\"https://x.test/?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("June 10, 2025"));
    }

    #[test]
    fn empty_digest_says_so() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let html = render(&Digest { date: day, sections: vec![] });
        assert!(html.contains("No reports were available"));
    }
}
