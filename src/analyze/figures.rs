//! Figure extraction and caption binding.

use std::fs;
use std::path::PathBuf;

use crate::analyze::classify::is_figure_label;
use crate::error::Result;
use crate::layout::{ImageData, ImageRef, LayoutSource};
use crate::model::Node;

/// Writes extracted images to the sidecar directory under deterministic
/// names and tracks the document-wide figure ordinal.
#[derive(Debug)]
pub struct FigureSink {
    dir: PathBuf,
    ordinal: u32,
}

/// Result of saving one image: the figure node's `src` and generated `alt`.
#[derive(Debug, Clone)]
pub struct SavedFigure {
    pub src: String,
    pub alt: String,
}

impl FigureSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ordinal: 0,
        }
    }

    /// Number of images saved so far.
    pub fn count(&self) -> u32 {
        self.ordinal
    }

    /// Write one image and return its reference data.
    pub fn save(&mut self, page: u32, image: &ImageData) -> Result<SavedFigure> {
        self.ordinal += 1;
        let filename = format!(
            "page-{:03}-img-{:03}.{}",
            page, self.ordinal, image.ext
        );
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(&filename), &image.bytes)?;

        let prefix = self
            .dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "images".to_string());
        Ok(SavedFigure {
            src: format!("{}/{}", prefix, filename),
            alt: format!("Figure {} from page {}", self.ordinal, page),
        })
    }
}

/// Attach caption-like paragraphs to the figure immediately before them.
///
/// Scans the node range appended for one page (allowing the first node to
/// caption a figure that ended the previous page). Bound paragraphs are
/// recorded in `consumed` and filtered out before the sequence is final.
pub fn bind_captions(nodes: &mut [Node], page_start: usize, consumed: &mut Vec<usize>) {
    let start = page_start.max(1);
    for idx in start..nodes.len() {
        let label = match &nodes[idx] {
            Node::Paragraph { text, .. } if is_figure_label(text) => text.clone(),
            _ => continue,
        };
        if let Node::Figure { caption, .. } = &mut nodes[idx - 1] {
            if caption.is_none() {
                *caption = Some(label);
                consumed.push(idx);
            }
        }
    }
}

/// Document-wide fallback extraction via the image registry.
///
/// Runs only when the primary path produced zero figures: re-scans every
/// page's embedded images, orders them by vertical position when known,
/// and inserts each figure after the last node of its page.
pub fn fallback_figures<S: LayoutSource>(
    source: &S,
    nodes: &mut Vec<Node>,
    sink: &mut FigureSink,
) -> Result<()> {
    if nodes.iter().any(Node::is_figure) {
        return Ok(());
    }

    for page in 1..=source.page_count() {
        let mut refs: Vec<ImageRef> = match source.page_image_refs(page) {
            Ok(refs) => refs,
            Err(e) => {
                log::debug!("image registry unavailable for page {page}: {e}");
                continue;
            }
        };
        if refs.is_empty() {
            continue;
        }
        refs.sort_by(|a, b| {
            a.y.unwrap_or(0.0)
                .partial_cmp(&b.y.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut insert_at = nodes
            .iter()
            .rposition(|node| node.page() == page)
            .map(|idx| idx + 1)
            .unwrap_or(nodes.len());

        for image_ref in refs {
            let data = match source.resolve_image(&image_ref) {
                Ok(Some(data)) => data,
                Ok(None) => continue,
                Err(e) => {
                    log::debug!("skipping unresolvable image on page {page}: {e}");
                    continue;
                }
            };
            let saved = sink.save(page, &data)?;
            nodes.insert(
                insert_at,
                Node::Figure {
                    src: saved.src,
                    alt: saved.alt,
                    caption: None,
                    page,
                },
            );
            insert_at += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure(page: u32) -> Node {
        Node::Figure {
            src: format!("images/page-{page:03}-img-001.png"),
            alt: "Figure 1".to_string(),
            caption: None,
            page,
        }
    }

    fn paragraph(text: &str, page: u32) -> Node {
        Node::Paragraph {
            text: text.to_string(),
            page,
        }
    }

    #[test]
    fn test_caption_binds_to_preceding_figure() {
        let mut nodes = vec![figure(1), paragraph("Figure 1: overview", 1)];
        let mut consumed = Vec::new();
        bind_captions(&mut nodes, 0, &mut consumed);

        assert_eq!(consumed, vec![1]);
        match &nodes[0] {
            Node::Figure { caption, .. } => {
                assert_eq!(caption.as_deref(), Some("Figure 1: overview"));
            }
            _ => panic!("expected figure"),
        }
    }

    #[test]
    fn test_non_label_paragraph_not_bound() {
        let mut nodes = vec![figure(1), paragraph("Just some text", 1)];
        let mut consumed = Vec::new();
        bind_captions(&mut nodes, 0, &mut consumed);
        assert!(consumed.is_empty());
        assert!(matches!(&nodes[0], Node::Figure { caption: None, .. }));
    }

    #[test]
    fn test_figure_takes_at_most_one_caption() {
        let mut nodes = vec![
            figure(1),
            paragraph("Figure 1: first", 1),
            paragraph("Figure 2: second", 1),
        ];
        let mut consumed = Vec::new();
        bind_captions(&mut nodes, 0, &mut consumed);
        assert_eq!(consumed, vec![1]);
        match &nodes[0] {
            Node::Figure { caption, .. } => assert_eq!(caption.as_deref(), Some("Figure 1: first")),
            _ => panic!("expected figure"),
        }
    }

    #[test]
    fn test_caption_across_page_boundary() {
        // Figure at the end of page 1, label at the top of page 2.
        let mut nodes = vec![paragraph("body", 1), figure(1), paragraph("Fig. 7 graph", 2)];
        let mut consumed = Vec::new();
        bind_captions(&mut nodes, 2, &mut consumed);
        assert_eq!(consumed, vec![2]);
        match &nodes[1] {
            Node::Figure { caption, .. } => assert_eq!(caption.as_deref(), Some("Fig. 7 graph")),
            _ => panic!("expected figure"),
        }
    }

    #[test]
    fn test_sink_naming_and_counter() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let mut sink = FigureSink::new(&images);

        let data = ImageData {
            bytes: vec![1, 2, 3],
            ext: "png".to_string(),
        };
        let first = sink.save(2, &data).unwrap();
        assert_eq!(first.src, "images/page-002-img-001.png");
        assert_eq!(first.alt, "Figure 1 from page 2");

        let second = sink.save(3, &data).unwrap();
        assert_eq!(second.src, "images/page-003-img-002.png");
        assert_eq!(sink.count(), 2);
        assert!(images.join("page-002-img-001.png").exists());
    }
}
