//! # sempdf
//!
//! Semantic HTML reconstruction from PDF page layout.
//!
//! This library recovers a semantic document structure — headings,
//! paragraphs, lists, figures with captions, a table of contents — from the
//! positioned text fragments and images of a page-layout source, and
//! renders it as a single SEO-annotated HTML document with a sidecar
//! `images/` directory.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use sempdf::{convert_file, ConvertOptions};
//!
//! fn main() -> sempdf::Result<()> {
//!     let options = ConvertOptions::new().with_schema_type("Report");
//!     let result = convert_file(
//!         Path::new("document.pdf"),
//!         Path::new("out/document.html"),
//!         &options,
//!     )?;
//!     println!("{} ({} nodes)", result.title, result.nodes);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! Spans are normalized into lines, lines merged into paragraphs (with
//! hyphenation repair), and each merged unit classified by numbering
//! patterns and font-size ratios against the document's median span size.
//! Contents pages are detected by leader-dot density and skipped or
//! leader-stripped. Figures come from inline image blocks, with a
//! document-wide registry fallback, and adopt trailing caption-like
//! paragraphs. The finished node sequence gets document-unique heading
//! slugs and renders as nested `<section>`s plus a contents list and a
//! JSON-LD metadata block.
//!
//! Custom layout backends implement [`layout::LayoutSource`]; a concrete
//! `lopdf`-backed source is provided for PDF files.

pub mod analyze;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

pub use convert::{
    collect_inputs, convert_batch, convert_source, ConvertOptions, ConvertResult, DocumentOutcome,
};
pub use error::{Error, Result};
pub use layout::{LayoutSource, LopdfSource};
pub use model::{DocMeta, Node};

use std::path::Path;

/// Convert one PDF file to semantic HTML.
///
/// The sidecar `images/` directory is created next to `output_html` when
/// image extraction is enabled.
pub fn convert_file(
    input: &Path,
    output_html: &Path,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    convert::convert_file(input, output_html, options)
}
