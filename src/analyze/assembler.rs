//! Node tree assembly.
//!
//! Walks each page's blocks in top-to-bottom, left-to-right order,
//! maintaining a pending-paragraph accumulator so a paragraph split across
//! layout blocks (page breaks, justified text) is reconstructed as one
//! node. Headings, lists, and figures are never merged into a running
//! paragraph; producing one flushes the accumulator.

use crate::analyze::classify::{
    detect_heading, is_list_block, list_items, numbering_depth, strip_leader_dots,
};
use crate::analyze::figures::{bind_captions, fallback_figures, FigureSink};
use crate::analyze::line::{lines_from_block, merge_lines, starts_lowercase};
use crate::analyze::segment::page_is_toc;
use crate::analyze::slug::SlugSet;
use crate::error::Result;
use crate::layout::{Block, ImageRef, LayoutSource, PageLayout};
use crate::model::Node;

/// Assembly behavior toggles.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Retain contents pages in the body (leader-stripped, paragraphs only).
    pub keep_toc_pages: bool,
}

/// The pending-paragraph accumulator.
///
/// Owned by the assembler and flushed explicitly on page change, vertical
/// gap, non-mergeable node production, and page end.
#[derive(Debug, Default)]
struct Pending {
    state: Option<PendingParagraph>,
}

#[derive(Debug)]
struct PendingParagraph {
    text: String,
    page: u32,
    bottom: f32,
    size: f32,
}

impl Pending {
    /// Emit the accumulated paragraph, if any, as a node.
    fn flush(&mut self, nodes: &mut Vec<Node>) {
        if let Some(p) = self.state.take() {
            if !p.text.is_empty() {
                nodes.push(Node::Paragraph {
                    text: p.text,
                    page: p.page,
                });
            }
        }
    }

    /// Accept one line: start, merge, or flush-and-restart depending on the
    /// page and the vertical gap to the previous accumulated line.
    fn add_line(
        &mut self,
        nodes: &mut Vec<Node>,
        text: &str,
        size: f32,
        y0: f32,
        y1: f32,
        page: u32,
    ) {
        if text.is_empty() {
            return;
        }
        let mergeable = matches!(
            &self.state,
            Some(p) if p.page == page && y0 - p.bottom <= gap_threshold(p.size)
        );
        if !mergeable {
            self.flush(nodes);
            self.state = Some(PendingParagraph {
                text: text.to_string(),
                page,
                bottom: y1,
                size,
            });
            return;
        }

        if let Some(p) = self.state.as_mut() {
            if p.text.ends_with('-') && starts_lowercase(text) {
                p.text.pop();
                p.text.push_str(text);
            } else {
                p.text.push(' ');
                p.text.push_str(text);
            }
            p.bottom = y1;
            p.size = size;
        }
    }
}

/// Size-relative merge threshold for the vertical gap between lines.
fn gap_threshold(size: f32) -> f32 {
    (size * 0.9).max(2.0)
}

/// Build the ordered node sequence for a whole document.
///
/// `pages` is the pre-fetched layout of every page; `source` is consulted
/// for image cross-references and the fallback registry. `title_line`, when
/// set, suppresses the body block that repeats the adopted `<h1>` text.
/// Passing no sink disables figure extraction entirely.
pub fn assemble_nodes<S: LayoutSource>(
    source: &S,
    pages: &[PageLayout],
    body_size: f32,
    title_line: Option<&str>,
    mut sink: Option<&mut FigureSink>,
    options: &AssembleOptions,
) -> Result<Vec<Node>> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut pending = Pending::default();
    let mut consumed: Vec<usize> = Vec::new();
    let mut headings_seen = 0usize;

    for page in pages {
        let page_toc = page_is_toc(page);
        if page_toc && !options.keep_toc_pages {
            log::debug!("page {}: contents page omitted", page.number);
            continue;
        }
        let page_start = nodes.len();

        let mut blocks: Vec<&Block> = page.blocks.iter().collect();
        blocks.sort_by(|a, b| {
            let (ab, bb) = (a.bbox(), b.bbox());
            ab.y0
                .partial_cmp(&bb.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ab.x0.partial_cmp(&bb.x0).unwrap_or(std::cmp::Ordering::Equal))
        });

        for block in blocks {
            match block {
                Block::Image { data, xref, .. } => {
                    let Some(sink) = sink.as_deref_mut() else {
                        continue;
                    };
                    pending.flush(&mut nodes);
                    let payload = match data {
                        Some(data) => Some(data.clone()),
                        None => match xref {
                            Some(xref) => {
                                let image_ref = ImageRef {
                                    xref: *xref,
                                    y: None,
                                };
                                match source.resolve_image(&image_ref) {
                                    Ok(data) => data,
                                    Err(e) => {
                                        log::debug!(
                                            "page {}: unresolvable image {} skipped: {e}",
                                            page.number,
                                            xref
                                        );
                                        None
                                    }
                                }
                            }
                            None => None,
                        },
                    };
                    let Some(payload) = payload else {
                        log::debug!("page {}: image block without bytes skipped", page.number);
                        continue;
                    };
                    let saved = sink.save(page.number, &payload)?;
                    nodes.push(Node::Figure {
                        src: saved.src,
                        alt: saved.alt,
                        caption: None,
                        page: page.number,
                    });
                }
                Block::Text { bbox, lines } => {
                    let lines = lines_from_block(lines);
                    if lines.is_empty() {
                        continue;
                    }
                    if title_line.is_some_and(|title| lines[0].text == title) {
                        // Already rendered as the document <h1>.
                        continue;
                    }
                    if is_list_block(&lines) {
                        pending.flush(&mut nodes);
                        nodes.push(Node::List {
                            items: list_items(&lines),
                            page: page.number,
                        });
                        continue;
                    }

                    if lines.len() == 1 {
                        let line = &lines[0];
                        let (cleaned, had_leader) = strip_leader_dots(&line.text, page_toc);
                        if had_leader {
                            // Stripped contents entries stay paragraphs.
                            pending.add_line(
                                &mut nodes, &cleaned, line.size, bbox.y0, bbox.y1, page.number,
                            );
                            continue;
                        }
                        if let Some(level) = detect_heading(line, body_size, headings_seen) {
                            pending.flush(&mut nodes);
                            nodes.push(Node::Heading {
                                text: cleaned,
                                level,
                                id: None,
                                page: page.number,
                            });
                            headings_seen += 1;
                            continue;
                        }
                        pending.add_line(
                            &mut nodes, &cleaned, line.size, bbox.y0, bbox.y1, page.number,
                        );
                        continue;
                    }

                    pending.flush(&mut nodes);
                    let paragraph = merge_lines(&lines);
                    if paragraph.is_empty() {
                        continue;
                    }
                    let (cleaned, had_leader) = strip_leader_dots(&paragraph, page_toc);
                    if had_leader {
                        nodes.push(Node::Paragraph {
                            text: cleaned,
                            page: page.number,
                        });
                        continue;
                    }
                    if let Some(depth) = numbering_depth(&cleaned) {
                        nodes.push(Node::Heading {
                            text: cleaned,
                            level: depth.saturating_add(1).min(6) as u8,
                            id: None,
                            page: page.number,
                        });
                        headings_seen += 1;
                        continue;
                    }
                    nodes.push(Node::Paragraph {
                        text: cleaned,
                        page: page.number,
                    });
                }
            }
        }

        // Page end: flush first so a trailing caption paragraph is visible
        // to the binder, then bind this page's captions.
        pending.flush(&mut nodes);
        bind_captions(&mut nodes, page_start, &mut consumed);
    }
    pending.flush(&mut nodes);

    if !consumed.is_empty() {
        let drop: std::collections::HashSet<usize> = consumed.into_iter().collect();
        let mut idx = 0;
        nodes.retain(|_| {
            let keep = !drop.contains(&idx);
            idx += 1;
            keep
        });
    }

    if let Some(sink) = sink.as_deref_mut() {
        fallback_figures(source, &mut nodes, sink)?;
    }

    assign_heading_ids(&mut nodes);
    Ok(nodes)
}

/// Final pass: assign document-unique slugs to headings in order.
fn assign_heading_ids(nodes: &mut [Node]) {
    let mut slugs = SlugSet::new();
    let mut ordinal = 0usize;
    for node in nodes {
        if let Node::Heading { text, id, .. } = node {
            ordinal += 1;
            *id = Some(slugs.issue(text, &format!("section-{}", ordinal)));
        }
    }
}
