//! HTML digest composer.
//!
//! Renders the full ordered sequence of [`ReadyPost`]s into one HTML
//! document, grouped by source in the order sources were encountered.
//! Machine-translated posts get a per-post note, and a footer line appears
//! when any post in the digest was translated.
//!
//! Callers decide whether to send at all: an empty post list never reaches
//! this module in a normal run.

use std::fmt::Write;

use itertools::Itertools;

use crate::models::ReadyPost;

/// Render the digest document.
///
/// # Arguments
///
/// * `posts` - Surviving posts across all sources, in source order
/// * `send_date` - The run's date, shown in the heading
pub fn render_digest(posts: &[ReadyPost], send_date: &str) -> String {
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n");
    writeln!(doc, "<h1>Floydian Newsletter {}</h1>", escape(send_date)).unwrap();

    let grouped = posts.iter().chunk_by(|post| post.display_name.clone());
    for (source, group) in &grouped {
        writeln!(doc, "<h2>{}</h2>", escape(&source)).unwrap();
        for post in group {
            writeln!(
                doc,
                "<h3><a href=\"{}\">{}</a></h3>",
                escape(&post.link),
                escape(&post.title)
            )
            .unwrap();
            if let Some(date) = post.date {
                writeln!(doc, "<p class=\"date\">{}</p>", date.format("%d %B %Y")).unwrap();
            }
            for paragraph in &post.paragraphs {
                writeln!(doc, "<p>{}</p>", escape(paragraph)).unwrap();
            }
            if !post.tags.is_empty() {
                writeln!(doc, "<p class=\"tags\">{}</p>", escape(&post.tags.join(", "))).unwrap();
            }
            if post.is_translated() {
                writeln!(
                    doc,
                    "<p class=\"note\"><em>Translated from {}.</em></p>",
                    escape(&post.source_language)
                )
                .unwrap();
            }
        }
    }

    if posts.iter().any(ReadyPost::is_translated) {
        doc.push_str("<hr>\n<p><em>Some posts were translated automatically.</em></p>\n");
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
