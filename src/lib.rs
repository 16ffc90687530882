//! # pagemark
//!
//! Deterministic layout engine that turns lightweight markup into paginated
//! documents.
//!
//! Input text is segmented into blocks (headings, paragraphs, fenced code,
//! blank-line spacers), wrapped to the page's content width with an injected
//! text measurer, styled, and assigned to pages with vertical positions.
//! Emitters then write the result as PDF, JSON, or plain text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagemark::{render_file, RenderOptions};
//!
//! fn main() -> pagemark::Result<()> {
//!     let doc = render_file("notes.md", &RenderOptions::default())?;
//!     println!("{} pages", doc.page_count());
//!
//!     let pdf = pagemark::emit_pdf(&doc, &RenderOptions::default())?;
//!     std::fs::write("notes.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pluggable measurement**: heuristic glyph widths or real font files
//! - **Multiple output formats**: PDF, JSON, plain text
//! - **Atomic output**: temp file + rename, with a timestamped fallback
//! - **Parallel batches**: independent documents render on Rayon
//! - **Async file rendering**: behind the `async` feature

pub mod detect;
pub mod emit;
pub mod error;
pub mod layout;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use emit::{
    DocumentEmitter, EmitOptions, EmitterRegistry, JsonFormat, OutputFormat, PageSelection,
};
pub use error::{Error, Result, Warning};
pub use layout::{
    paginate, resolve_style, wrap, FontFileMeasurer, HeuristicMeasurer, Paginator, TextMeasurer,
};
pub use model::{
    Block, BlockKind, Color, FontWeight, Page, PageGeometry, PaginatedDocument, PlacedLine,
    RenderStats, Segmentation, StyleId, StyleSheet, StyleSpec, StyledLine,
};
pub use parser::{segment, ErrorMode, ParseOptions};
pub use render::{render_batch, CancelToken, RenderConfig, RenderOptions, Renderer};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Render a string with default options.
///
/// # Example
///
/// ```
/// let doc = pagemark::render_str("# Title\n\nHello world").unwrap();
/// assert_eq!(doc.page_count(), 1);
/// assert_eq!(doc.pages[0].lines[0].line.text, "Title");
/// ```
pub fn render_str(raw: &str) -> Result<PaginatedDocument> {
    render::render(raw, &RenderOptions::default())
}

/// Read, decode, and render a file.
pub fn render_file<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<PaginatedDocument> {
    let raw = detect::read_input(path)?;
    render::render(&raw, options)
}

/// Read and render a file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn render_file_async<P: AsRef<Path>>(
    path: P,
    options: RenderOptions,
) -> Result<PaginatedDocument> {
    let data = tokio::fs::read(path.as_ref()).await?;
    let raw = detect::decode_input(&data)?;
    tokio::task::spawn_blocking(move || render::render(&raw, &options))
        .await
        .map_err(|e| Error::Other(format!("render task failed: {}", e)))?
}

fn emit_options_for(options: &RenderOptions) -> EmitOptions {
    EmitOptions::new().with_styles(options.styles.clone())
}

fn emit_string(format: OutputFormat, doc: &PaginatedDocument, options: &EmitOptions) -> Result<String> {
    let bytes = format.emitter().emit(doc, options)?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("{} output is not UTF-8: {}", format, e)))
}

/// Write a rendered document as PDF bytes.
pub fn emit_pdf(doc: &PaginatedDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    OutputFormat::Pdf
        .emitter()
        .emit(doc, &emit_options_for(options))
}

/// Render text straight to PDF bytes.
pub fn to_pdf(raw: &str, options: &RenderOptions) -> Result<Vec<u8>> {
    let doc = render::render(raw, options)?;
    emit_pdf(&doc, options)
}

/// Render text to JSON.
///
/// # Example
///
/// ```
/// use pagemark::{to_json, JsonFormat, RenderOptions};
///
/// let json = to_json("hello", &RenderOptions::default(), JsonFormat::Compact).unwrap();
/// assert!(json.contains("\"text\":\"hello\""));
/// ```
pub fn to_json(raw: &str, options: &RenderOptions, format: JsonFormat) -> Result<String> {
    let doc = render::render(raw, options)?;
    emit_string(
        OutputFormat::Json,
        &doc,
        &emit_options_for(options).with_json_format(format),
    )
}

/// Render text to paginated plain text (form feeds between pages).
pub fn to_text(raw: &str, options: &RenderOptions) -> Result<String> {
    let doc = render::render(raw, options)?;
    emit_string(OutputFormat::Text, &doc, &emit_options_for(options))
}

/// Render `input` and commit the result to `output`.
///
/// The output format follows the extension of `output`. Returns the path
/// actually written.
///
/// # Example
///
/// ```no_run
/// use pagemark::{convert_file, RenderOptions};
///
/// let written = convert_file("notes.md", "notes.pdf", &RenderOptions::default()).unwrap();
/// println!("{}", written.display());
/// ```
pub fn convert_file<P, Q>(input: P, output: Q, options: &RenderOptions) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let doc = render_file(input, options)?;
    EmitterRegistry::with_defaults().emit_to_path(&doc, output.as_ref(), &emit_options_for(options))
}

/// Builder for rendering and emitting documents.
///
/// # Example
///
/// ```no_run
/// use pagemark::{PageGeometry, PageSelection, Pagemark};
///
/// let written = Pagemark::new()
///     .with_geometry(PageGeometry::a4())
///     .with_pages(PageSelection::Range(1..=2))
///     .with_title("Notes")
///     .strict()
///     .render_file("notes.md")?
///     .save("notes.pdf")?;
/// # Ok::<(), pagemark::Error>(())
/// ```
pub struct Pagemark {
    render_options: RenderOptions,
    emit_options: EmitOptions,
}

impl Pagemark {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
            emit_options: EmitOptions::default(),
        }
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.render_options = self.render_options.with_geometry(geometry);
        self
    }

    /// Set the style sheet.
    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.render_options = self.render_options.with_styles(styles);
        self
    }

    /// Apply a loaded configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.render_options = self.render_options.with_config(config);
        self
    }

    /// Fail on unterminated fences.
    pub fn strict(mut self) -> Self {
        self.render_options = self.render_options.strict();
        self
    }

    /// Apply NFC normalization before segmenting.
    pub fn normalize_unicode(mut self) -> Self {
        let parse = self.render_options.parse.clone().with_normalization(true);
        self.render_options = self.render_options.with_parse_options(parse);
        self
    }

    /// Set the text measurer.
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.render_options = self.render_options.with_shared_measurer(measurer);
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.render_options = self.render_options.with_cancel(token);
        self
    }

    /// Limit emitted pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.emit_options = self.emit_options.with_pages(pages);
        self
    }

    /// Set the document title written to output metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.emit_options = self.emit_options.with_title(title);
        self
    }

    /// Set the JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.emit_options = self.emit_options.with_json_format(format);
        self
    }

    /// Render a string.
    pub fn render(self, raw: &str) -> Result<PagemarkOutput> {
        let document = render::render(raw, &self.render_options)?;
        Ok(self.into_output(document))
    }

    /// Read and render a file.
    pub fn render_file<P: AsRef<Path>>(self, path: P) -> Result<PagemarkOutput> {
        let document = render_file(path, &self.render_options)?;
        Ok(self.into_output(document))
    }

    fn into_output(self, document: PaginatedDocument) -> PagemarkOutput {
        PagemarkOutput {
            document,
            emit_options: self.emit_options.with_styles(self.render_options.styles),
        }
    }
}

impl Default for Pagemark {
    fn default() -> Self {
        Self::new()
    }
}

/// A rendered document with the options to emit it.
pub struct PagemarkOutput {
    /// The paginated document
    pub document: PaginatedDocument,
    /// Emit options to use
    emit_options: EmitOptions,
}

impl PagemarkOutput {
    /// Emit PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        OutputFormat::Pdf.emitter().emit(&self.document, &self.emit_options)
    }

    /// Emit JSON.
    pub fn to_json(&self) -> Result<String> {
        emit_string(OutputFormat::Json, &self.document, &self.emit_options)
    }

    /// Emit plain text.
    pub fn to_text(&self) -> Result<String> {
        emit_string(OutputFormat::Text, &self.document, &self.emit_options)
    }

    /// Emit by the extension of `path` and commit atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        EmitterRegistry::with_defaults().emit_to_path(&self.document, path.as_ref(), &self.emit_options)
    }

    /// Get plain text of all pages.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &PaginatedDocument {
        &self.document
    }
}
