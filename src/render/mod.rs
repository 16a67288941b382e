//! HTML document rendering.
//!
//! Pure functions over the finished node sequence: the section-nesting body
//! renderer, the contents list, the JSON-LD block, and the full page shell.

mod html;
mod schema;
mod toc;

pub use html::render_body;
pub use schema::build_schema;
pub use toc::{render_toc_list, toc_entries, TocEntry};

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::DocMeta;

/// Fixed stylesheet embedded into every rendered document.
pub const STYLE_BLOCK: &str = r#":root {
  color-scheme: light;
  --text: #0b1524;
  --muted: #4b5a70;
  --border: #d7dde7;
  --accent: #1b4d89;
  --bg: #f6f8fb;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: "Source Serif 4", "Iowan Old Style", "Palatino", serif;
  color: var(--text);
  background: var(--bg);
  line-height: 1.6;
}
main {
  max-width: 980px;
  margin: 0 auto;
  padding: 40px 24px 80px;
  background: white;
  box-shadow: 0 24px 60px rgba(15, 23, 42, 0.08);
}
header.document-header {
  border-bottom: 1px solid var(--border);
  margin-bottom: 24px;
  padding-bottom: 16px;
}
header.document-header p {
  margin: 8px 0 0;
  color: var(--muted);
}
nav.toc {
  margin: 24px 0 40px;
  padding: 16px 20px;
  border: 1px solid var(--border);
  background: #fbfcff;
}
nav.toc h2 {
  margin-top: 0;
}
nav.toc ol {
  margin: 0;
  padding: 0 0 0 20px;
  column-count: 2;
  column-gap: 28px;
  list-style-position: inside;
}
nav.toc li { margin: 6px 0; }
nav.toc li { break-inside: avoid; }
nav.toc li[data-level="3"] { margin-left: 1rem; }
nav.toc li[data-level="4"] { margin-left: 2rem; }
nav.toc li[data-level="5"] { margin-left: 3rem; }
nav.toc li[data-level="6"] { margin-left: 4rem; }
nav.toc a {
  color: var(--accent);
  text-decoration: none;
}
nav.toc a:hover {
  text-decoration: underline;
}
@media (max-width: 720px) {
  nav.toc ol { column-count: 1; }
}
article h2, article h3, article h4 {
  margin-top: 32px;
  color: var(--accent);
}
figure {
  margin: 28px 0;
}
figure img {
  max-width: 100%;
  border: 1px solid var(--border);
}
figure figcaption {
  font-size: 0.95rem;
  color: var(--muted);
  margin-top: 8px;
}
.footer-meta {
  margin-top: 40px;
  padding-top: 16px;
  border-top: 1px solid var(--border);
  color: var(--muted);
  font-size: 0.95rem;
}"#;

/// Assemble the complete HTML document around a rendered body.
pub fn render_document(
    title: &str,
    meta: &DocMeta,
    toc_html: &str,
    body_html: &str,
    schema_json: &str,
) -> String {
    let description = meta.description.as_deref().unwrap_or("");
    let author = meta.author.as_deref().unwrap_or("");
    let keywords = meta.keywords_joined();
    let lang = meta.lang_or_und();

    let mut header_lines: Vec<String> = Vec::new();
    if !author.is_empty() {
        header_lines.push(format!(
            "<p><strong>Author:</strong> {}</p>",
            encode_text(author)
        ));
    }
    if let Some(date) = &meta.date {
        header_lines.push(format!(
            "<p><strong>Date:</strong> {}</p>",
            encode_text(date)
        ));
    }
    if let Some(publisher) = &meta.publisher {
        header_lines.push(format!(
            "<p><strong>Publisher:</strong> {}</p>",
            encode_text(publisher)
        ));
    }
    let header_html = header_lines.join("\n");

    let toc_block = if toc_html.is_empty() {
        String::new()
    } else {
        format!("<nav class=\"toc\"><h2>Contents</h2>{}</nav>", toc_html)
    };

    let footer_html = match &meta.source {
        Some(source) => format!(
            "<div><strong>Source PDF:</strong> {}</div>",
            encode_text(source)
        ),
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <meta name="author" content="{author}">
  <meta name="keywords" content="{keywords}">
  <meta name="generator" content="{generator}">
  <style>{style}</style>
  <script type="application/ld+json">{schema}</script>
</head>
<body>
  <main>
    <header class="document-header">
      <h1>{title}</h1>
      {header}
    </header>
    {toc}
    <article>
      {body}
    </article>
    <footer class="footer-meta">{footer}</footer>
  </main>
</body>
</html>"#,
        lang = encode_double_quoted_attribute(lang),
        title = encode_text(title),
        description = encode_double_quoted_attribute(description),
        author = encode_double_quoted_attribute(author),
        keywords = encode_double_quoted_attribute(&keywords),
        generator = concat!("sempdf ", env!("CARGO_PKG_VERSION")),
        style = STYLE_BLOCK,
        schema = schema_json,
        header = header_html,
        toc = toc_block,
        body = body_html,
        footer = footer_html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shell() {
        let meta = DocMeta {
            author: Some("Jane".to_string()),
            date: Some("2024-01-31".to_string()),
            lang: Some("en".to_string()),
            source: Some("input.pdf".to_string()),
            ..Default::default()
        };
        let html = render_document("My <Title>", &meta, "<ol></ol>", "<p>body</p>", "{}");

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<h1>My &lt;Title&gt;</h1>"));
        assert!(html.contains("<strong>Author:</strong> Jane"));
        assert!(html.contains("<strong>Date:</strong> 2024-01-31"));
        assert!(html.contains("<nav class=\"toc\"><h2>Contents</h2>"));
        assert!(html.contains("<strong>Source PDF:</strong> input.pdf"));
        assert!(html.contains("application/ld+json"));
    }

    #[test]
    fn test_no_toc_block_when_empty() {
        let html = render_document("T", &DocMeta::default(), "", "<p>x</p>", "{}");
        assert!(!html.contains("<nav class=\"toc\""));
        assert!(html.contains("lang=\"und\""));
    }
}
