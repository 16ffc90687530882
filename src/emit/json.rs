//! JSON emitter.

use serde::Serialize;

use crate::error::{Result, Warning};
use crate::model::{Page, PageGeometry, PaginatedDocument, RenderStats};

use super::{DocumentEmitter, EmitOptions, JsonFormat};

/// Serializes the paginated document with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl JsonEmitter {
    /// Create a new JSON emitter.
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    geometry: &'a PageGeometry,
    pages: Vec<&'a Page>,
    warnings: &'a [Warning],
    stats: &'a RenderStats,
}

impl DocumentEmitter for JsonEmitter {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn emit(&self, doc: &PaginatedDocument, options: &EmitOptions) -> Result<Vec<u8>> {
        let view = JsonDocument {
            title: options.title.as_deref(),
            geometry: &doc.geometry,
            pages: options.pages.select(&doc.pages).collect(),
            warnings: &doc.warnings,
            stats: &doc.stats,
        };

        let bytes = match options.json_format {
            JsonFormat::Pretty => serde_json::to_vec_pretty(&view)?,
            JsonFormat::Compact => serde_json::to_vec(&view)?,
        };
        Ok(bytes)
    }
}
