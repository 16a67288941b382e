//! Semantic node types produced by the reconstruction engine.

use serde::Serialize;

/// A semantic unit of the reconstructed document.
///
/// Nodes are created and ordered by the assembler; only the caption binder
/// (attaching a caption to a figure) and the heading-id pass (assigning
/// slugs) mutate them afterwards, each in one bounded pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Heading {
        text: String,
        /// Raw detected level (1-6); clamped to 2-6 at render time.
        level: u8,
        /// Document-unique slug, assigned by the final id pass.
        id: Option<String>,
        page: u32,
    },
    Paragraph {
        text: String,
        page: u32,
    },
    List {
        items: Vec<String>,
        page: u32,
    },
    Figure {
        /// Relative path to the extracted image (e.g., "images/page-001-img-001.png").
        src: String,
        alt: String,
        caption: Option<String>,
        page: u32,
    },
}

impl Node {
    /// The 1-based page this node came from.
    pub fn page(&self) -> u32 {
        match self {
            Node::Heading { page, .. }
            | Node::Paragraph { page, .. }
            | Node::List { page, .. }
            | Node::Figure { page, .. } => *page,
        }
    }

    pub fn is_figure(&self) -> bool {
        matches!(self, Node::Figure { .. })
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Node::Heading { .. })
    }
}
