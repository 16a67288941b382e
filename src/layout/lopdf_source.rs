//! Concrete [`LayoutSource`] backed by `lopdf`.
//!
//! Walks page content streams into positioned spans, groups them into lines
//! and blocks, and places image XObjects via the graphics transform. The
//! output is expressed in top-down coordinates as required by the engine.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::layout::{
    BBox, Block, ImageData, ImageRef, LayoutSource, PageLayout, RawLine, SourceMetadata, Span,
};

/// Layout source reading a PDF file through `lopdf`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))
    }

    /// Page height in points, for flipping PDF's bottom-up y axis.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        self.media_box(page_id)
            .map(|[_, y0, _, y1]| y1 - y0)
            .unwrap_or(792.0)
    }

    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut dict_id = page_id;
        // MediaBox may be inherited from an ancestor Pages node.
        for _ in 0..32 {
            let dict = self.doc.get_dictionary(dict_id).ok()?;
            if let Ok(Object::Array(arr)) = dict.get(b"MediaBox") {
                if arr.len() == 4 {
                    let mut out = [0.0f32; 4];
                    for (i, obj) in arr.iter().enumerate() {
                        out[i] = number(obj).unwrap_or(0.0);
                    }
                    return Some(out);
                }
            }
            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => dict_id = *parent,
                _ => return None,
            }
        }
        None
    }

    fn page_content(&self, page_id: ObjectId) -> Vec<u8> {
        // A page without a readable content stream is treated as empty
        // rather than failing the document.
        match self.doc.get_page_content(page_id) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("unreadable content stream for page {page_id:?}: {e}");
                Vec::new()
            }
        }
    }

    /// Image XObject references in the page's resource dictionary.
    fn image_xobjects(&self, page_id: ObjectId) -> Vec<(Vec<u8>, ObjectId)> {
        let mut out = Vec::new();
        let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
            return out;
        };
        let resources = match page_dict.get(b"Resources") {
            Ok(Object::Reference(r)) => self.doc.get_dictionary(*r).ok(),
            Ok(Object::Dictionary(d)) => Some(d),
            _ => None,
        };
        let Some(resources) = resources else {
            return out;
        };
        let xobjects = match resources.get(b"XObject") {
            Ok(Object::Reference(r)) => self.doc.get_dictionary(*r).ok(),
            Ok(Object::Dictionary(d)) => Some(d),
            _ => None,
        };
        let Some(xobjects) = xobjects else {
            return out;
        };
        for (name, obj) in xobjects.iter() {
            if let Object::Reference(id) = obj {
                if self.is_image_stream(*id) {
                    out.push((name.clone(), *id));
                }
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    fn is_image_stream(&self, id: ObjectId) -> bool {
        match self.doc.get_object(id) {
            Ok(Object::Stream(s)) => s
                .dict
                .get(b"Subtype")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| n == b"Image")
                .unwrap_or(false),
            _ => false,
        }
    }

    fn image_payload(&self, id: ObjectId) -> Option<ImageData> {
        let Ok(Object::Stream(stream)) = self.doc.get_object(id) else {
            return None;
        };
        let filters: Vec<String> = stream
            .filters()
            .map(|names| {
                names
                    .iter()
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .collect()
            })
            .unwrap_or_default();

        // DCT and JPX payloads are complete image files as stored.
        if filters.iter().any(|f| f == "DCTDecode") {
            return Some(ImageData {
                bytes: stream.content.clone(),
                ext: "jpg".to_string(),
            });
        }
        if filters.iter().any(|f| f == "JPXDecode") {
            return Some(ImageData {
                bytes: stream.content.clone(),
                ext: "jp2".to_string(),
            });
        }

        let bytes = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        if bytes.is_empty() {
            return None;
        }
        let ext = sniff_ext(&bytes).unwrap_or("raw").to_string();
        Some(ImageData { bytes, ext })
    }

    fn resolve_object_number(&self, xref: u32) -> Option<ObjectId> {
        self.doc
            .objects
            .keys()
            .find(|(num, _)| *num == xref)
            .copied()
    }

    /// Walk the content stream into positioned spans and image placements.
    fn extract_page_items(
        &self,
        page_id: ObjectId,
        height: f32,
    ) -> Result<(Vec<PdfSpan>, Vec<Block>)> {
        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_default();
        let mut base_fonts: BTreeMap<Vec<u8>, String> = BTreeMap::new();
        for (name, font) in &fonts {
            let base = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            base_fonts.insert(name.clone(), base);
        }
        let images: BTreeMap<Vec<u8>, ObjectId> = self.image_xobjects(page_id).into_iter().collect();

        let raw = self.page_content(page_id);
        let content =
            lopdf::content::Content::decode(&raw).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans: Vec<PdfSpan> = Vec::new();
        let mut image_blocks: Vec<Block> = Vec::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font = String::new();
        let mut current_size: f32 = 12.0;
        let mut tm = TextMatrix::default();
        let mut ctm = Transform::identity();
        let mut ctm_stack: Vec<Transform> = Vec::new();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    tm = TextMatrix::default();
                }
                "ET" => in_text = false,
                "q" => ctm_stack.push(ctm),
                "Q" => ctm = ctm_stack.pop().unwrap_or_else(Transform::identity),
                "cm" => {
                    if op.operands.len() >= 6 {
                        let m = Transform {
                            a: number(&op.operands[0]).unwrap_or(1.0),
                            b: number(&op.operands[1]).unwrap_or(0.0),
                            c: number(&op.operands[2]).unwrap_or(0.0),
                            d: number(&op.operands[3]).unwrap_or(1.0),
                            e: number(&op.operands[4]).unwrap_or(0.0),
                            f: number(&op.operands[5]).unwrap_or(0.0),
                        };
                        ctm = ctm.then(&m);
                    }
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            current_font_name = name.clone();
                            current_font = base_fonts
                                .get(name)
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        current_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        tm.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        tm.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => tm.next_line(),
                "Tj" | "TJ" => {
                    if in_text {
                        let text = self.decode_op_text(&fonts, &current_font_name, &op);
                        self.push_span(
                            &mut spans,
                            text,
                            &current_font,
                            current_size,
                            &tm,
                            height,
                        );
                    }
                }
                "'" | "\"" => {
                    tm.next_line();
                    if in_text {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let text = self.decode_bytes(&fonts, &current_font_name, bytes);
                            self.push_span(
                                &mut spans,
                                text,
                                &current_font,
                                current_size,
                                &tm,
                                height,
                            );
                        }
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        if let Some(&id) = images.get(name) {
                            image_blocks.push(self.placed_image(id, &ctm, height));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok((spans, image_blocks))
    }

    fn placed_image(&self, id: ObjectId, ctm: &Transform, height: f32) -> Block {
        // An image XObject maps the unit square through the CTM.
        let x0 = ctm.e.min(ctm.e + ctm.a);
        let x1 = ctm.e.max(ctm.e + ctm.a);
        let y_bottom = ctm.f.min(ctm.f + ctm.d);
        let y_top = ctm.f.max(ctm.f + ctm.d);
        let bbox = BBox::new(x0, height - y_top, x1, height - y_bottom);
        Block::Image {
            bbox,
            data: self.image_payload(id),
            xref: Some(id.0),
        }
    }

    fn push_span(
        &self,
        spans: &mut Vec<PdfSpan>,
        text: String,
        font: &str,
        size: f32,
        tm: &TextMatrix,
        height: f32,
    ) {
        if text.trim().is_empty() {
            return;
        }
        let (x, y) = tm.position();
        let effective_size = size * tm.scale();
        // Width estimate for space insertion between adjacent spans.
        let width = effective_size * 0.5 * text.chars().count() as f32;
        spans.push(PdfSpan {
            text,
            font: font.to_string(),
            size: effective_size,
            x,
            y: height - y,
            width,
        });
    }

    fn decode_op_text(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font_name: &[u8],
        op: &lopdf::content::Operation,
    ) -> String {
        if op.operator == "TJ" {
            // TJ interleaves strings with kerning adjustments; large negative
            // adjustments stand in for word spaces.
            let Some(Object::Array(arr)) = op.operands.first() else {
                return String::new();
            };
            let mut combined = String::new();
            let space_threshold = 200.0;
            for item in arr {
                match item {
                    Object::String(bytes, _) => {
                        combined.push_str(&self.decode_bytes(fonts, font_name, bytes));
                    }
                    Object::Integer(n) => {
                        if -(*n as f32) > space_threshold && needs_space(&combined) {
                            combined.push(' ');
                        }
                    }
                    Object::Real(n) => {
                        if -n > space_threshold && needs_space(&combined) {
                            combined.push(' ');
                        }
                    }
                    _ => {}
                }
            }
            combined
        } else {
            match op.operands.first() {
                Some(Object::String(bytes, _)) => self.decode_bytes(fonts, font_name, bytes),
                _ => String::new(),
            }
        }
    }

    fn decode_bytes(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font_name: &[u8],
        bytes: &[u8],
    ) -> String {
        // Identity-encoded fonts typically carry 2-byte CID codes that map
        // to Unicode; try UTF-16BE for those before the generic fallback.
        if let Some(encoding) = font_encoding_name(fonts, font_name) {
            if encoding.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                let code_units: Vec<u16> = bytes
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                let decoded = String::from_utf16_lossy(&code_units);
                if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                    return decoded;
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Group spans into lines by baseline proximity, then lines into blocks
    /// by spacing, size, and indentation changes.
    fn build_text_blocks(&self, mut spans: Vec<PdfSpan>) -> Vec<Block> {
        if spans.is_empty() {
            return Vec::new();
        }
        spans.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<PdfLine> = Vec::new();
        let mut current: Vec<PdfSpan> = Vec::new();
        let mut current_y: Option<f32> = None;
        for span in spans {
            let tolerance = span.size.max(1.0) * 0.3;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        lines.push(PdfLine::from_spans(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            lines.push(PdfLine::from_spans(current));
        }

        let avg_spacing = average_line_spacing(&lines);
        let mut blocks: Vec<Block> = Vec::new();
        let mut block_lines: Vec<PdfLine> = Vec::new();
        for line in lines {
            let break_block = match block_lines.last() {
                None => false,
                Some(prev) => {
                    (line.y - prev.y).abs() > avg_spacing * 1.5
                        || (prev.size - line.size).abs() > 1.0
                        || (prev.x - line.x).abs() > 20.0
                }
            };
            if break_block && !block_lines.is_empty() {
                blocks.push(finish_block(std::mem::take(&mut block_lines)));
            }
            block_lines.push(line);
        }
        if !block_lines.is_empty() {
            blocks.push(finish_block(block_lines));
        }
        blocks
    }
}

impl LayoutSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageLayout> {
        let page_id = self.page_id(number)?;
        let height = self.page_height(page_id);
        let (spans, image_blocks) = self.extract_page_items(page_id, height)?;

        let mut page = PageLayout::new(number);
        page.blocks = self.build_text_blocks(spans);
        page.blocks.extend(image_blocks);
        Ok(page)
    }

    fn metadata(&self) -> SourceMetadata {
        let mut meta = SourceMetadata::default();
        let info = match self.doc.trailer.get(b"Info") {
            Ok(Object::Reference(r)) => self.doc.get_dictionary(*r).ok(),
            Ok(Object::Dictionary(d)) => Some(d),
            _ => None,
        };
        let Some(info) = info else {
            return meta;
        };
        meta.title = info_string(info, b"Title");
        meta.author = info_string(info, b"Author");
        meta.keywords = info_string(info, b"Keywords");
        meta.created = info_string(info, b"CreationDate");
        meta
    }

    fn page_image_refs(&self, number: u32) -> Result<Vec<ImageRef>> {
        let page_id = self.page_id(number)?;
        Ok(self
            .image_xobjects(page_id)
            .into_iter()
            .map(|(_, id)| ImageRef {
                xref: id.0,
                y: None,
            })
            .collect())
    }

    fn resolve_image(&self, image: &ImageRef) -> Result<Option<ImageData>> {
        let Some(id) = self.resolve_object_number(image.xref) else {
            log::debug!("image xref {} not found in document", image.xref);
            return Ok(None);
        };
        Ok(self.image_payload(id))
    }
}

/// A span with page position, before line grouping.
struct PdfSpan {
    text: String,
    font: String,
    size: f32,
    x: f32,
    y: f32,
    width: f32,
}

/// An assembled line of spans sharing a baseline.
struct PdfLine {
    spans: Vec<PdfSpan>,
    x: f32,
    y: f32,
    size: f32,
}

impl PdfLine {
    fn from_spans(mut spans: Vec<PdfSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let size = dominant_size(&spans);
        Self { spans, x, y, size }
    }

    /// Convert to the boundary line type, inserting inferred word spaces
    /// between spans separated by a visible gap.
    fn into_raw_line(self) -> RawLine {
        let mut out: Vec<Span> = Vec::with_capacity(self.spans.len());
        let mut prev_end: Option<f32> = None;
        for span in self.spans {
            let mut text = span.text;
            if let Some(end) = prev_end {
                let gap = span.x - end;
                let threshold = span.size.max(1.0) * 0.1;
                if gap > threshold
                    && !text.starts_with(' ')
                    && !out.last().is_some_and(|s: &Span| s.text.ends_with(' '))
                {
                    text.insert(0, ' ');
                }
            }
            prev_end = Some(span.x + span.width);
            out.push(Span::new(text, span.font, span.size));
        }
        RawLine::new(out)
    }
}

fn dominant_size(spans: &[PdfSpan]) -> f32 {
    let total: usize = spans.iter().map(|s| s.text.len()).sum();
    if total == 0 {
        return spans.first().map(|s| s.size).unwrap_or(0.0);
    }
    let weighted: f32 = spans.iter().map(|s| s.size * s.text.len() as f32).sum();
    weighted / total as f32
}

fn average_line_spacing(lines: &[PdfLine]) -> f32 {
    if lines.len() < 2 {
        return 12.0;
    }
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[1].y - w[0].y).abs())
        .filter(|s| *s > 0.1)
        .collect();
    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn finish_block(lines: Vec<PdfLine>) -> Block {
    let x0 = lines.iter().map(|l| l.x).fold(f32::MAX, f32::min);
    let x1 = lines
        .iter()
        .flat_map(|l| l.spans.iter().map(|s| s.x + s.width))
        .fold(f32::MIN, f32::max);
    // Baselines extended by approximate ascender/descender extents.
    let y0 = lines
        .iter()
        .map(|l| l.y - l.size * 0.8)
        .fold(f32::MAX, f32::min);
    let y1 = lines
        .iter()
        .map(|l| l.y + l.size * 0.2)
        .fold(f32::MIN, f32::max);
    Block::Text {
        bbox: BBox::new(x0, y0, x1, y1),
        lines: lines.into_iter().map(PdfLine::into_raw_line).collect(),
    }
}

fn needs_space(combined: &str) -> bool {
    !combined.is_empty() && !combined.ends_with(' ') && !combined.ends_with('\u{00A0}')
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// The font's declared `Encoding` name, when present as a direct name.
fn font_encoding_name(fonts: &BTreeMap<Vec<u8>, &Dictionary>, font_name: &[u8]) -> Option<String> {
    let font = fonts.get(font_name)?;
    match font.get(b"Encoding") {
        Ok(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    match info.get(key) {
        Ok(Object::String(bytes, _)) => {
            let text = decode_text_simple(bytes);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// Magic-byte format sniffing for decoded image payloads.
fn sniff_ext(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpg");
    }
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("png");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("gif");
    }
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
        return Some("tiff");
    }
    if data.starts_with(b"BM") {
        return Some("bmp");
    }
    None
}

/// Simple text decoding fallback when no font encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

/// Text matrix tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL-aware interpreter would refine this.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Graphics transform for placing image XObjects.
#[derive(Debug, Clone, Copy)]
struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Compose: apply `m` in the current coordinate system.
    fn then(&self, m: &Transform) -> Self {
        Self {
            a: m.a * self.a + m.b * self.c,
            b: m.a * self.b + m.b * self.d,
            c: m.c * self.a + m.d * self.c,
            d: m.c * self.b + m.d * self.d,
            e: m.e * self.a + m.f * self.c + self.e,
            f: m.e * self.b + m.f * self.d + self.f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_sniff_ext() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(sniff_ext(&jpeg), Some("jpg"));

        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(sniff_ext(&png), Some("png"));

        assert_eq!(sniff_ext(&[0u8; 8]), None);
    }

    #[test]
    fn test_transform_compose_translation() {
        let base = Transform::identity();
        let moved = base.then(&Transform {
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: 3.0,
            e: 10.0,
            f: 20.0,
        });
        assert_eq!(moved.e, 10.0);
        assert_eq!(moved.f, 20.0);
        assert_eq!(moved.a, 2.0);
        assert_eq!(moved.d, 3.0);
    }

    #[test]
    fn test_text_matrix_translate() {
        let mut tm = TextMatrix::default();
        tm.translate(5.0, 7.0);
        assert_eq!(tm.position(), (5.0, 7.0));
        tm.translate(1.0, 0.0);
        assert_eq!(tm.position(), (6.0, 7.0));
    }

    #[test]
    fn test_line_grouping_by_baseline() {
        let source_spans = vec![
            PdfSpan {
                text: "world".into(),
                font: "F".into(),
                size: 10.0,
                x: 40.0,
                y: 100.5,
                width: 25.0,
            },
            PdfSpan {
                text: "hello".into(),
                font: "F".into(),
                size: 10.0,
                x: 10.0,
                y: 100.0,
                width: 25.0,
            },
            PdfSpan {
                text: "next".into(),
                font: "F".into(),
                size: 10.0,
                x: 10.0,
                y: 114.0,
                width: 20.0,
            },
        ];
        let doc = LopdfSource {
            doc: LopdfDocument::with_version("1.5"),
            pages: BTreeMap::new(),
        };
        let blocks = doc.build_text_blocks(source_spans);
        let lines: Vec<_> = blocks
            .iter()
            .flat_map(|b| match b {
                Block::Text { lines, .. } => lines.clone(),
                _ => vec![],
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].text, "hello");
        assert_eq!(lines[0].spans[1].text, " world");
    }
}
