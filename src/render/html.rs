//! HTML body rendering.
//!
//! Renders the node sequence while maintaining a stack of open sectioning
//! elements. This is the only place escaping is applied; node text arrives
//! unescaped from the engine.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::analyze::slug::slugify;
use crate::model::Node;

/// Rendered heading levels are clamped into this range; the document title
/// is the only `<h1>`.
fn clamp_level(level: u8) -> u8 {
    level.clamp(2, 6)
}

/// Render the node sequence into nested sections.
///
/// A heading closes every open section at its level or deeper (siblings
/// and descendants), then opens a new one; other nodes render inside the
/// innermost open section. All sections are closed at the end.
pub fn render_body(nodes: &[Node]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut stack: Vec<u8> = Vec::new();

    for node in nodes {
        match node {
            Node::Heading {
                text, level, id, page,
            } => {
                if text.is_empty() {
                    continue;
                }
                let level = clamp_level(*level);
                while stack.last().is_some_and(|open| *open >= level) {
                    parts.push("</section>".to_string());
                    stack.pop();
                }
                let id = id.clone().unwrap_or_else(|| slugify(text, "section"));
                parts.push(format!("<section data-page=\"{}\">", page));
                parts.push(format!(
                    "<h{level} id=\"{}\">{}</h{level}>",
                    encode_double_quoted_attribute(&id),
                    encode_text(text),
                ));
                stack.push(level);
            }
            Node::Paragraph { text, page } => {
                if text.is_empty() {
                    continue;
                }
                parts.push(format!(
                    "<p data-page=\"{}\">{}</p>",
                    page,
                    encode_text(text)
                ));
            }
            Node::List { items, page } => {
                if items.is_empty() {
                    continue;
                }
                parts.push(format!("<ul data-page=\"{}\">", page));
                for item in items {
                    parts.push(format!("<li>{}</li>", encode_text(item)));
                }
                parts.push("</ul>".to_string());
            }
            Node::Figure {
                src,
                alt,
                caption,
                page,
            } => {
                parts.push(format!("<figure data-page=\"{}\">", page));
                parts.push(format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    encode_double_quoted_attribute(src),
                    encode_double_quoted_attribute(alt),
                ));
                if let Some(caption) = caption {
                    parts.push(format!("<figcaption>{}</figcaption>", encode_text(caption)));
                }
                parts.push("</figure>".to_string());
            }
        }
    }

    while stack.pop().is_some() {
        parts.push("</section>".to_string());
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str, level: u8, id: &str) -> Node {
        Node::Heading {
            text: text.to_string(),
            level,
            id: Some(id.to_string()),
            page: 1,
        }
    }

    fn paragraph(text: &str) -> Node {
        Node::Paragraph {
            text: text.to_string(),
            page: 1,
        }
    }

    #[test]
    fn test_sections_nest_and_close() {
        let nodes = vec![
            heading("One", 2, "one"),
            paragraph("in one"),
            heading("One A", 3, "one-a"),
            paragraph("in one a"),
            heading("Two", 2, "two"),
        ];
        let html = render_body(&nodes);

        // Sibling h2 closes both the h3 and the previous h2.
        let before_two = html.split("<h2 id=\"two\">").next().unwrap();
        assert_eq!(before_two.matches("</section>").count(), 2);
        // Every opened section is closed.
        assert_eq!(
            html.matches("<section").count(),
            html.matches("</section>").count()
        );
    }

    #[test]
    fn test_no_headings_no_sections() {
        let nodes = vec![paragraph("alpha"), paragraph("beta")];
        let html = render_body(&nodes);
        assert!(!html.contains("<section"));
        assert!(html.contains("<p data-page=\"1\">alpha</p>"));
    }

    #[test]
    fn test_levels_clamped_to_two() {
        let nodes = vec![heading("Top", 1, "top")];
        let html = render_body(&nodes);
        assert!(html.contains("<h2 id=\"top\">Top</h2>"));
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_text_is_escaped() {
        let nodes = vec![paragraph("a < b & c")];
        let html = render_body(&nodes);
        assert!(html.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_figure_with_caption() {
        let nodes = vec![Node::Figure {
            src: "images/page-001-img-001.png".to_string(),
            alt: "Figure 1 from page 1".to_string(),
            caption: Some("Figure 1: \"quoted\"".to_string()),
            page: 1,
        }];
        let html = render_body(&nodes);
        assert!(html.contains("<img src=\"images/page-001-img-001.png\""));
        assert!(html.contains("<figcaption>Figure 1: \"quoted\"</figcaption>"));
    }

    #[test]
    fn test_list_items_rendered() {
        let nodes = vec![Node::List {
            items: vec!["first".to_string(), "second".to_string()],
            page: 2,
        }];
        let html = render_body(&nodes);
        assert!(html.contains("<ul data-page=\"2\">"));
        assert!(html.contains("<li>first</li>"));
        assert!(html.contains("<li>second</li>"));
    }
}
