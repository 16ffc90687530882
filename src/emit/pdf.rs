//! PDF emitter built on `pdf-writer`.
//!
//! Fonts are the standard Type 1 faces, so nothing is embedded and text is
//! encoded as WinAnsi. Page positions are measured from the top edge; PDF
//! user space grows upwards, so every y is flipped against the page height.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, trace};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::{Error, Result};
use crate::model::{FontWeight, Page, PageGeometry, PaginatedDocument, StyleSheet, StyleSpec};

use super::{DocumentEmitter, EmitOptions};

/// Share of the leading drawn below the baseline for background bands.
const DESCENT_RATIO: f32 = 0.3;

/// PDF emitter.
#[derive(Debug, Clone)]
pub struct PdfEmitter {
    compress: bool,
}

impl PdfEmitter {
    /// Create a PDF emitter with compressed content streams.
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for PdfEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEmitter for PdfEmitter {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extension(&self) -> &str {
        "pdf"
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn emit(&self, doc: &PaginatedDocument, options: &EmitOptions) -> Result<Vec<u8>> {
        let fonts = FontTable::new(&options.styles);
        let pages: Vec<&Page> = options.pages.select(&doc.pages).collect();

        let mut refs = RefAlloc::default();
        let catalog_id = refs.next();
        let tree_id = refs.next();
        let font_ids: Vec<Ref> = fonts.entries.iter().map(|_| refs.next()).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);

        for (entry, id) in fonts.entries.iter().zip(&font_ids) {
            pdf.type1_font(*id)
                .base_font(Name(entry.base_font.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in &pages {
            let page_id = refs.next();
            let content_id = refs.next();
            page_ids.push(page_id);

            let content = page_content(page, &doc.geometry, &options.styles, &fonts)?;
            if self.compress {
                let compressed = deflate(&content)?;
                pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
            } else {
                pdf.stream(content_id, &content);
            }

            let mut pdf_page = pdf.page(page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, doc.geometry.width, doc.geometry.height))
                .parent(tree_id)
                .contents(content_id);
            {
                let mut resources = pdf_page.resources();
                let mut dict = resources.fonts();
                for (entry, id) in fonts.entries.iter().zip(&font_ids) {
                    dict.pair(Name(entry.resource.as_bytes()), *id);
                }
                dict.finish();
            }
            pdf_page.finish();

            trace!("pdf page {}: {} lines", page.number, page.lines.len());
        }

        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        let info_id = refs.next();
        let mut info = pdf.document_info(info_id);
        if let Some(title) = &options.title {
            info.title(TextStr(title.as_str()));
        }
        info.producer(TextStr(concat!("pagemark ", env!("CARGO_PKG_VERSION"))));
        info.finish();

        let bytes = pdf.finish();
        debug!("pdf: {} pages, {} bytes", page_ids.len(), bytes.len());
        Ok(bytes)
    }
}

#[derive(Debug, Default)]
struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FontEntry {
    base_font: &'static str,
    resource: String,
}

/// Standard fonts used by a style sheet, with their resource names.
#[derive(Debug, Default)]
struct FontTable {
    entries: Vec<FontEntry>,
}

impl FontTable {
    fn new(styles: &StyleSheet) -> Self {
        let mut table = Self::default();
        for (_, spec) in styles.iter() {
            let base_font = base_font(spec);
            if table.resource(base_font).is_none() {
                let resource = format!("F{}", table.entries.len() + 1);
                table.entries.push(FontEntry { base_font, resource });
            }
        }
        table
    }

    fn resource(&self, base_font: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.base_font == base_font)
            .map(|e| e.resource.as_str())
    }
}

/// Map a style to the closest standard Type 1 face.
fn base_font(spec: &StyleSpec) -> &'static str {
    let bold = spec.weight == FontWeight::Bold;
    let family = spec.font_family.to_ascii_lowercase();

    if spec.is_monospace() {
        if bold {
            "Courier-Bold"
        } else {
            "Courier"
        }
    } else if family.contains("times") || (family.contains("serif") && !family.contains("sans")) {
        if bold {
            "Times-Bold"
        } else {
            "Times-Roman"
        }
    } else if bold {
        "Helvetica-Bold"
    } else {
        "Helvetica"
    }
}

/// Build the uncompressed content stream for one page.
fn page_content(
    page: &Page,
    geometry: &PageGeometry,
    styles: &StyleSheet,
    fonts: &FontTable,
) -> Result<Vec<u8>> {
    let mut content = Content::new();

    for placed in page.drawable_lines() {
        let Some(spec) = styles.spec(placed.line.style) else {
            continue;
        };
        let resource = fonts.resource(base_font(spec)).ok_or_else(|| {
            Error::Render(format!("no font registered for '{}'", spec.font_family))
        })?;
        let baseline = geometry.height - placed.y;

        if let Some(bg) = spec.background {
            content.set_fill_rgb(bg.r, bg.g, bg.b);
            content.rect(
                geometry.left_margin,
                baseline - geometry.leading * DESCENT_RATIO,
                geometry.content_width(),
                geometry.leading,
            );
            content.fill_nonzero();
        }

        if placed.line.text.is_empty() {
            continue;
        }

        let encoded = to_win_ansi(&placed.line.text);
        content.set_fill_rgb(spec.color.r, spec.color.g, spec.color.b);
        content.begin_text();
        content.set_font(Name(resource.as_bytes()), spec.size);
        content.next_line(geometry.left_margin, baseline);
        content.show(Str(&encoded));
        content.end_text();
    }

    Ok(content.finish())
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Encode text for a WinAnsi font; unmappable characters become `?`.
pub(crate) fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}
