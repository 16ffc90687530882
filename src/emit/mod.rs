//! Document emitters: output-format adapters over finalized pages.
//!
//! The layout core decides what goes where; an emitter only turns the
//! placed lines into bytes. Emitters are registered by extension and name
//! so the output format can follow the destination path.
//!
//! # Example
//!
//! ```no_run
//! use pagemark::emit::{EmitOptions, EmitterRegistry};
//! use pagemark::render::{render, RenderOptions};
//! use std::path::Path;
//!
//! fn main() -> pagemark::Result<()> {
//!     let doc = render("# Notes\n\nHello", &RenderOptions::default())?;
//!     let registry = EmitterRegistry::with_defaults();
//!     let written = registry.emit_to_path(&doc, Path::new("notes.pdf"), &EmitOptions::default())?;
//!     println!("wrote {}", written.display());
//!     Ok(())
//! }
//! ```

mod json;
mod options;
mod pdf;
mod text;

pub use json::JsonEmitter;
pub use options::{EmitOptions, JsonFormat, PageSelection};
pub use pdf::PdfEmitter;
pub use text::TextEmitter;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::PaginatedDocument;
use crate::output;

/// Trait for document emitters.
///
/// Implement this trait to add a new output format. Emitters must preserve
/// page membership, in-page order, and vertical positions.
pub trait DocumentEmitter: Send + Sync {
    /// Get the name of this emitter.
    fn name(&self) -> &str;

    /// File extension, lowercase without the leading dot.
    fn extension(&self) -> &str;

    /// MIME type of the output.
    fn mime_type(&self) -> &'static str;

    /// Serialize a paginated document.
    fn emit(&self, doc: &PaginatedDocument, options: &EmitOptions) -> Result<Vec<u8>>;
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// PDF document
    #[default]
    Pdf,

    /// JSON structure
    Json,

    /// Plain text
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }

    /// Create the emitter for this format.
    pub fn emitter(self) -> Arc<dyn DocumentEmitter> {
        match self {
            OutputFormat::Pdf => Arc::new(PdfEmitter::new()),
            OutputFormat::Json => Arc::new(JsonEmitter::new()),
            OutputFormat::Text => Arc::new(TextEmitter::new()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "json" => Ok(OutputFormat::Json),
            "txt" | "text" => Ok(OutputFormat::Text),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Registry for document emitters.
///
/// Maps file extensions and names to emitters.
pub struct EmitterRegistry {
    by_extension: HashMap<String, Arc<dyn DocumentEmitter>>,
    by_name: HashMap<String, Arc<dyn DocumentEmitter>>,
}

impl EmitterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_extension: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, JSON, and text emitters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for format in [OutputFormat::Pdf, OutputFormat::Json, OutputFormat::Text] {
            registry.register(format.emitter());
        }
        registry
    }

    /// Register an emitter under its extension and name.
    ///
    /// A later registration replaces an earlier one with the same key.
    pub fn register(&mut self, emitter: Arc<dyn DocumentEmitter>) {
        self.by_extension
            .insert(emitter.extension().to_lowercase(), emitter.clone());
        self.by_name.insert(emitter.name().to_lowercase(), emitter);
    }

    /// Get an emitter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentEmitter>> {
        self.by_extension.get(&ext.to_lowercase()).cloned()
    }

    /// Get an emitter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentEmitter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.by_extension.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Find the emitter for a destination path.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn DocumentEmitter>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnknownFormat(format!("{} has no extension", path.display())))?;

        self.get_by_extension(ext)
            .ok_or_else(|| Error::UnknownFormat(ext.to_string()))
    }

    /// Emit with the emitter registered for `ext`.
    pub fn emit(&self, doc: &PaginatedDocument, ext: &str, options: &EmitOptions) -> Result<Vec<u8>> {
        let emitter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnknownFormat(ext.to_string()))?;
        emitter.emit(doc, options)
    }

    /// Emit to `path` and commit atomically.
    ///
    /// Returns the path actually written, which differs from `path` when
    /// the commit fell back to a timestamped name.
    pub fn emit_to_path(
        &self,
        doc: &PaginatedDocument,
        path: &Path,
        options: &EmitOptions,
    ) -> Result<PathBuf> {
        let emitter = self.for_path(path)?;
        let bytes = emitter.emit(doc, options)?;
        output::commit(path, &bytes)
    }
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
