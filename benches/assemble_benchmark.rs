//! Benchmark for node assembly and HTML rendering over a synthetic document.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sempdf::analyze::{assemble_nodes, document_body_size, AssembleOptions};
use sempdf::error::Result;
use sempdf::layout::{
    BBox, Block, ImageData, ImageRef, LayoutSource, PageLayout, RawLine, SourceMetadata, Span,
};
use sempdf::render::{render_body, render_toc_list, toc_entries};

struct BenchSource {
    pages: Vec<PageLayout>,
}

impl LayoutSource for BenchSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageLayout> {
        Ok(self.pages[(number - 1) as usize].clone())
    }

    fn metadata(&self) -> SourceMetadata {
        SourceMetadata::default()
    }

    fn page_image_refs(&self, _number: u32) -> Result<Vec<ImageRef>> {
        Ok(Vec::new())
    }

    fn resolve_image(&self, _image: &ImageRef) -> Result<Option<ImageData>> {
        Ok(None)
    }
}

fn synthetic_document(pages: u32) -> BenchSource {
    let mut out = Vec::new();
    for number in 1..=pages {
        let mut page = PageLayout::new(number);
        let mut y = 20.0;
        page.blocks.push(Block::Text {
            bbox: BBox::new(0.0, y, 400.0, y + 14.0),
            lines: vec![RawLine::new(vec![Span::new(
                format!("{number}. Section on page {number}"),
                "Serif-Bold",
                14.0,
            )])],
        });
        y += 40.0;
        for para in 0..12 {
            let lines: Vec<RawLine> = (0..4)
                .map(|i| {
                    RawLine::new(vec![Span::new(
                        format!("Sentence {i} of paragraph {para} on page {number}."),
                        "Serif",
                        10.0,
                    )])
                })
                .collect();
            page.blocks.push(Block::Text {
                bbox: BBox::new(0.0, y, 400.0, y + 44.0),
                lines,
            });
            y += 60.0;
        }
        out.push(page);
    }
    BenchSource { pages: out }
}

fn bench_assemble(c: &mut Criterion) {
    let source = synthetic_document(40);
    let pages = source.pages.clone();
    let body_size = document_body_size(&pages);

    c.bench_function("assemble_40_pages", |b| {
        b.iter(|| {
            let nodes = assemble_nodes(
                black_box(&source),
                black_box(&pages),
                body_size,
                None,
                None,
                &AssembleOptions::default(),
            )
            .unwrap();
            black_box(nodes)
        })
    });

    let nodes = assemble_nodes(&source, &pages, body_size, None, None, &AssembleOptions::default())
        .unwrap();
    c.bench_function("render_40_pages", |b| {
        b.iter(|| {
            let body = render_body(black_box(&nodes));
            let toc = render_toc_list(&toc_entries(&nodes));
            black_box((body, toc))
        })
    });
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
