//! Page-layout source abstraction.
//!
//! The reconstruction engine does not read PDFs itself: it consumes a
//! [`LayoutSource`], which supplies per-page positioned text blocks and
//! embedded images plus document-level properties. This isolates the
//! heuristics from the concrete PDF library and makes the engine testable
//! against in-memory sources.
//!
//! Coordinates are top-down: `y` grows toward the bottom of the page.

mod lopdf_source;

pub use lopdf_source::LopdfSource;

use serde::Serialize;

use crate::error::Result;

/// Style-flag bit marking a bold span.
pub const FLAG_BOLD: u32 = 1 << 1;

/// An axis-aligned bounding box in page coordinates (y top-down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// A run of text sharing one font, size, and style within a line.
#[derive(Debug, Clone, Serialize)]
pub struct Span {
    /// The text content.
    pub text: String,
    /// Font name as reported by the source (e.g., "Helvetica-Bold").
    pub font: String,
    /// Font size in points. 0.0 when the source could not determine it.
    pub size: f32,
    /// Style flags; see [`FLAG_BOLD`].
    pub flags: u32,
}

impl Span {
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
            flags: 0,
        }
    }

    /// Whether this span renders bold: the font name carries a bold marker
    /// or the bold style flag is set.
    pub fn is_bold(&self) -> bool {
        let font = self.font.to_lowercase();
        font.contains("bold")
            || font.contains("black")
            || font.contains("heavy")
            || self.flags & FLAG_BOLD != 0
    }
}

/// A source-reported line: an ordered run of spans on one baseline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawLine {
    pub spans: Vec<Span>,
}

impl RawLine {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

/// Raw bytes of an embedded raster image plus its format extension.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    /// File extension without the dot (e.g., "png", "jpg").
    pub ext: String,
}

/// A reference into the document-level image registry.
///
/// Used by the fallback extraction path when a source surfaces no inline
/// image blocks. `y` is the vertical position on the page when known.
#[derive(Debug, Clone, Copy)]
pub struct ImageRef {
    pub xref: u32,
    pub y: Option<f32>,
}

/// A positioned group on a page: either text lines or a single image.
#[derive(Debug, Clone)]
pub enum Block {
    Text {
        bbox: BBox,
        lines: Vec<RawLine>,
    },
    Image {
        bbox: BBox,
        /// Image payload when the source decoded it inline.
        data: Option<ImageData>,
        /// Cross-reference resolvable via [`LayoutSource::resolve_image`]
        /// when `data` is absent.
        xref: Option<u32>,
    },
}

impl Block {
    pub fn bbox(&self) -> BBox {
        match self {
            Block::Text { bbox, .. } | Block::Image { bbox, .. } => *bbox,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text { .. })
    }
}

/// One page of layout: an ordered set of positioned blocks.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page number (1-indexed).
    pub number: u32,
    pub blocks: Vec<Block>,
}

impl PageLayout {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Iterate the page's source-reported lines across all text blocks.
    pub fn text_lines(&self) -> impl Iterator<Item = &RawLine> {
        self.blocks.iter().flat_map(|block| match block {
            Block::Text { lines, .. } => lines.as_slice(),
            Block::Image { .. } => &[],
        })
    }
}

/// Document properties as reported by the layout source.
///
/// Values are raw: `created` keeps the source's date string (for PDF,
/// `D:YYYYMMDD...`); normalization happens in the metadata layer.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub created: Option<String>,
}

/// Abstract interface to a page-layout extraction library.
///
/// Implementations supply page enumeration, per-page block layout, document
/// properties, and the document-level image registry used by the fallback
/// figure path.
pub trait LayoutSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Layout of one page (1-indexed).
    fn page(&self, number: u32) -> Result<PageLayout>;

    /// Document properties (title/author if embedded).
    fn metadata(&self) -> SourceMetadata;

    /// All embedded images referenced by a page, for fallback extraction.
    fn page_image_refs(&self, number: u32) -> Result<Vec<ImageRef>>;

    /// Resolve an image reference to raw bytes and format.
    ///
    /// Returns `Ok(None)` when the referenced object has no usable payload;
    /// callers skip such images rather than failing.
    fn resolve_image(&self, image: &ImageRef) -> Result<Option<ImageData>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bold_by_font_name() {
        let span = Span::new("Test", "Helvetica-Bold", 12.0);
        assert!(span.is_bold());

        let span = Span::new("Test", "NotoSans-Black", 12.0);
        assert!(span.is_bold());

        let span = Span::new("Test", "Helvetica", 12.0);
        assert!(!span.is_bold());
    }

    #[test]
    fn test_span_bold_by_flag() {
        let mut span = Span::new("Test", "Helvetica", 12.0);
        span.flags = FLAG_BOLD;
        assert!(span.is_bold());
    }

    #[test]
    fn test_page_text_lines_skips_images() {
        let mut page = PageLayout::new(1);
        page.blocks.push(Block::Text {
            bbox: BBox::default(),
            lines: vec![RawLine::new(vec![Span::new("a", "F", 10.0)])],
        });
        page.blocks.push(Block::Image {
            bbox: BBox::default(),
            data: None,
            xref: Some(7),
        });
        page.blocks.push(Block::Text {
            bbox: BBox::default(),
            lines: vec![RawLine::new(vec![Span::new("b", "F", 10.0)])],
        });

        assert_eq!(page.text_lines().count(), 2);
    }
}
