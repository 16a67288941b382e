//! Heuristic layout-to-semantic reconstruction.
//!
//! Turns the unordered stream of positioned text fragments and images
//! supplied by a layout source into an ordered sequence of typed nodes:
//! normalize spans into lines, merge lines into paragraphs, classify
//! headings and lists, detect contents pages, extract figures and bind
//! captions, and assign document-unique heading ids.

pub mod assembler;
pub mod classify;
pub mod figures;
pub mod line;
pub mod segment;
pub mod slug;

pub use assembler::{assemble_nodes, AssembleOptions};
pub use figures::FigureSink;
pub use line::Line;

use crate::layout::{Block, PageLayout};

/// Median of all span font sizes across the document; the reference scale
/// for every size-relative heuristic. Defaults to 12.0 with no spans.
pub fn document_body_size(pages: &[PageLayout]) -> f32 {
    let mut sizes: Vec<f32> = pages
        .iter()
        .flat_map(|page| page.blocks.iter())
        .filter_map(|block| match block {
            Block::Text { lines, .. } => Some(lines),
            Block::Image { .. } => None,
        })
        .flatten()
        .flat_map(|line| line.spans.iter().map(|span| span.size))
        .collect();
    median(&mut sizes, 12.0)
}

/// Median with the convention of averaging the two middle values.
pub(crate) fn median(values: &mut [f32], default: f32) -> f32 {
    if values.is_empty() {
        return default;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
