//! Document conversion orchestration.
//!
//! Per document: open the layout source, compute the body-size baseline,
//! pick the title, assemble the node sequence, render, and write the HTML
//! in a single operation. Batch conversion runs one worker per document;
//! a failing document never aborts its siblings.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analyze::{
    assemble_nodes, document_body_size, line::lines_from_block, classify::title_candidate,
    AssembleOptions, FigureSink,
};
use crate::error::{Error, Result};
use crate::layout::{Block, LayoutSource, LopdfSource, PageLayout};
use crate::model::{DocMeta, Node};
use crate::render::{build_schema, render_body, render_document, render_toc_list, toc_entries};

/// Conversion configuration.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Extract embedded images into the sidecar directory.
    pub extract_images: bool,

    /// Generate the contents navigation block.
    pub include_toc: bool,

    /// Retain the source document's own contents pages in the body.
    pub keep_toc_pages: bool,

    /// Schema.org type for the structured-data block.
    pub schema_type: String,

    /// Explicit per-run metadata overrides (highest priority).
    pub overrides: DocMeta,

    /// JSON metadata file (between embedded properties and overrides).
    pub metadata_file: Option<PathBuf>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }

    pub fn with_kept_toc_pages(mut self, keep: bool) -> Self {
        self.keep_toc_pages = keep;
        self
    }

    pub fn with_schema_type(mut self, schema_type: impl Into<String>) -> Self {
        self.schema_type = schema_type.into();
        self
    }

    pub fn with_overrides(mut self, overrides: DocMeta) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_metadata_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_file = Some(path.into());
        self
    }

    /// Combine the metadata file and explicit overrides into the run-level
    /// template applied on top of each document's embedded properties.
    ///
    /// An invalid metadata file is fatal for the whole run, surfaced here
    /// before any document is processed.
    pub fn load_run_meta(&self) -> Result<DocMeta> {
        let mut meta = match &self.metadata_file {
            Some(path) => DocMeta::from_json_file(path)?,
            None => DocMeta::default(),
        };
        meta.apply(&self.overrides);
        Ok(meta)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extract_images: true,
            include_toc: true,
            keep_toc_pages: false,
            schema_type: "ScholarlyArticle".to_string(),
            overrides: DocMeta::default(),
            metadata_file: None,
        }
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Path of the written HTML file.
    pub output: PathBuf,

    /// Resolved document title.
    pub title: String,

    /// Pages in the source document.
    pub pages: u32,

    /// Nodes in the final sequence.
    pub nodes: usize,

    /// Relative paths of extracted figures.
    pub figures: Vec<String>,
}

/// Per-document outcome of a batch run.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub input: PathBuf,
    pub result: Result<ConvertResult>,
}

/// Convert one PDF file, loading the run-level metadata first.
pub fn convert_file(
    input: &Path,
    output_html: &Path,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let run_meta = options.load_run_meta()?;
    convert_file_with_meta(input, output_html, &run_meta, options)
}

/// Convert one PDF file with an already-resolved run-level metadata template.
pub fn convert_file_with_meta(
    input: &Path,
    output_html: &Path,
    run_meta: &DocMeta,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let source = LopdfSource::open(input)?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    convert_source(&source, &name, output_html, run_meta, options)
}

/// Convert a document supplied by any layout source.
pub fn convert_source<S: LayoutSource>(
    source: &S,
    source_name: &str,
    output_html: &Path,
    run_meta: &DocMeta,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let mut meta = DocMeta::from_source(&source.metadata());
    meta.apply(run_meta);
    meta.source = Some(source_name.to_string());

    let page_count = source.page_count();
    let mut pages: Vec<PageLayout> = Vec::with_capacity(page_count as usize);
    for number in 1..=page_count {
        pages.push(source.page(number)?);
    }

    let body_size = document_body_size(&pages);
    log::debug!("{source_name}: body size baseline {body_size:.1}pt");

    let title_line = pages.first().and_then(|page| {
        let lines: Vec<_> = page
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Text { lines, .. } => Some(lines_from_block(lines)),
                Block::Image { .. } => None,
            })
            .flatten()
            .collect();
        title_candidate(&lines, body_size)
    });

    let title = meta
        .title
        .clone()
        .or_else(|| title_line.clone())
        .unwrap_or_else(|| file_stem(source_name));
    meta.title = Some(title.clone());

    // Suppress the title line from the body only when it became the <h1>.
    let suppressed = title_line.as_deref().filter(|line| *line == title);

    let mut sink = if options.extract_images {
        let parent = output_html.parent().unwrap_or_else(|| Path::new("."));
        Some(FigureSink::new(parent.join("images")))
    } else {
        None
    };

    let nodes = assemble_nodes(
        source,
        &pages,
        body_size,
        suppressed,
        sink.as_mut(),
        &AssembleOptions {
            keep_toc_pages: options.keep_toc_pages,
        },
    )?;

    let toc_html = if options.include_toc {
        render_toc_list(&toc_entries(&nodes))
    } else {
        String::new()
    };
    let body_html = render_body(&nodes);

    let figures: Vec<String> = nodes
        .iter()
        .filter_map(|node| match node {
            Node::Figure { src, .. } => Some(src.clone()),
            _ => None,
        })
        .collect();

    let schema_json = build_schema(&meta, &title, &options.schema_type, &figures);
    let html = render_document(&title, &meta, &toc_html, &body_html, &schema_json);

    if let Some(parent) = output_html.parent() {
        fs::create_dir_all(parent)?;
    }
    // Single write: a failure earlier leaves no partial output file.
    fs::write(output_html, html)?;

    Ok(ConvertResult {
        output: output_html.to_path_buf(),
        title,
        pages: page_count,
        nodes: nodes.len(),
        figures,
    })
}

/// Convert a batch of documents, one rayon worker per document.
///
/// The metadata file is validated up front; a per-document failure is
/// reported in its outcome and never aborts the others. `on_document` is
/// invoked as each document finishes (e.g., to advance a progress bar).
pub fn convert_batch<F>(
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &ConvertOptions,
    on_document: F,
) -> Result<Vec<DocumentOutcome>>
where
    F: Fn(&DocumentOutcome) + Sync,
{
    if inputs.is_empty() {
        return Err(Error::NoInputs);
    }
    let run_meta = options.load_run_meta()?;

    Ok(inputs
        .par_iter()
        .map(|input| {
            let output = batch_output_path(input, out_dir);
            let result = convert_file_with_meta(input, &output, &run_meta, options);
            let outcome = DocumentOutcome {
                input: input.clone(),
                result,
            };
            on_document(&outcome);
            outcome
        })
        .collect())
}

/// Batch layout: each document gets its own directory with an `index.html`.
pub fn batch_output_path(input: &Path, out_dir: &Path) -> PathBuf {
    out_dir.join(file_stem_of(input)).join("index.html")
}

/// Single-document layout: an explicit `.html` target is used as-is,
/// anything else is treated as a directory.
pub fn single_output_path(input: &Path, out: &Path) -> PathBuf {
    let is_html = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    if is_html {
        out.to_path_buf()
    } else {
        out.join(format!("{}.html", file_stem_of(input)))
    }
}

/// Enumerate input PDFs: a `.pdf` file itself, or the `.pdf` files of a
/// directory (optionally recursive), sorted for deterministic order.
pub fn collect_inputs(input: &Path, recursive: bool) -> Vec<PathBuf> {
    fn is_pdf(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }

    fn walk(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if recursive {
                    walk(&path, recursive, out);
                }
            } else if is_pdf(&path) {
                out.push(path);
            }
        }
    }

    if input.is_file() {
        return if is_pdf(input) {
            vec![input.to_path_buf()]
        } else {
            Vec::new()
        };
    }
    let mut found = Vec::new();
    if input.is_dir() {
        walk(input, recursive, &mut found);
        found.sort();
    }
    found
}

fn file_stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn file_stem(name: &str) -> String {
    file_stem_of(Path::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new()
            .with_images(false)
            .with_toc(false)
            .with_kept_toc_pages(true)
            .with_schema_type("Report");

        assert!(!options.extract_images);
        assert!(!options.include_toc);
        assert!(options.keep_toc_pages);
        assert_eq!(options.schema_type, "Report");
    }

    #[test]
    fn test_options_defaults() {
        let options = ConvertOptions::default();
        assert!(options.extract_images);
        assert!(options.include_toc);
        assert!(!options.keep_toc_pages);
        assert_eq!(options.schema_type, "ScholarlyArticle");
    }

    #[test]
    fn test_run_meta_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(
            &path,
            r#"{"title": "From file", "publisher": "File publisher"}"#,
        )
        .unwrap();

        let options = ConvertOptions::new()
            .with_metadata_file(&path)
            .with_overrides(DocMeta {
                title: Some("From flags".to_string()),
                ..Default::default()
            });
        let meta = options.load_run_meta().unwrap();
        // Explicit overrides beat the file; the file's other keys survive.
        assert_eq!(meta.title.as_deref(), Some("From flags"));
        assert_eq!(meta.publisher.as_deref(), Some("File publisher"));
    }

    #[test]
    fn test_invalid_metadata_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, "\"just a string\"").unwrap();
        let options = ConvertOptions::new().with_metadata_file(&path);
        assert!(matches!(
            options.load_run_meta(),
            Err(Error::Metadata { .. })
        ));
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(
            batch_output_path(Path::new("docs/report.pdf"), Path::new("out")),
            PathBuf::from("out/report/index.html")
        );
        assert_eq!(
            single_output_path(Path::new("report.pdf"), Path::new("page.html")),
            PathBuf::from("page.html")
        );
        assert_eq!(
            single_output_path(Path::new("report.pdf"), Path::new("out")),
            PathBuf::from("out/report.html")
        );
    }

    #[test]
    fn test_collect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a.PDF"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.pdf"), b"x").unwrap();

        let flat = collect_inputs(dir.path(), false);
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);

        let deep = collect_inputs(dir.path(), true);
        assert_eq!(deep.len(), 3);

        let single = collect_inputs(&dir.path().join("b.pdf"), false);
        assert_eq!(single.len(), 1);

        let none = collect_inputs(&dir.path().join("notes.txt"), false);
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_batch_is_fatal() {
        let result = convert_batch(&[], Path::new("out"), &ConvertOptions::default(), |_| {});
        assert!(matches!(result, Err(Error::NoInputs)));
    }
}
