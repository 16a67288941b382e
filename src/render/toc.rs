//! Contents-list generation from the finished node sequence.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::analyze::slug::slugify;
use crate::model::Node;

/// One contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Clamped level, 2-6.
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Collect every heading as a contents entry in document order.
pub fn toc_entries(nodes: &[Node]) -> Vec<TocEntry> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Heading {
                text, level, id, ..
            } if !text.is_empty() => Some(TocEntry {
                level: (*level).clamp(2, 6),
                id: id.clone().unwrap_or_else(|| slugify(text, "section")),
                text: text.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Render contents entries as an anchor-linked ordered list.
///
/// Empty when the document has no qualifying headings.
pub fn render_toc_list(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let items: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "<li data-level=\"{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                encode_double_quoted_attribute(&entry.id),
                encode_text(&entry.text),
            )
        })
        .collect();
    format!("<ol>\n{}\n</ol>", items.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_only_headings() {
        let nodes = vec![
            Node::Heading {
                text: "Intro".to_string(),
                level: 1,
                id: Some("intro".to_string()),
                page: 1,
            },
            Node::Paragraph {
                text: "body".to_string(),
                page: 1,
            },
            Node::Heading {
                text: "Deep".to_string(),
                level: 7,
                id: Some("deep".to_string()),
                page: 2,
            },
        ];
        let entries = toc_entries(&nodes);
        assert_eq!(entries.len(), 2);
        // Levels clamp into the 2-6 range.
        assert_eq!(entries[0].level, 2);
        assert_eq!(entries[1].level, 6);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_toc_list(&[]), "");
    }

    #[test]
    fn test_render_links() {
        let entries = vec![TocEntry {
            level: 2,
            id: "intro".to_string(),
            text: "Intro & More".to_string(),
        }];
        let html = render_toc_list(&entries);
        assert!(html.starts_with("<ol>"));
        assert!(html.contains("<a href=\"#intro\">Intro &amp; More</a>"));
        assert!(html.contains("data-level=\"2\""));
    }
}
