//! Plain text emitter.

use crate::error::Result;
use crate::model::PaginatedDocument;

use super::{DocumentEmitter, EmitOptions};

/// Form feed, the conventional plain-text page break.
const PAGE_BREAK: char = '\u{000C}';

/// Writes one line per placed line; pages are separated by form feeds.
///
/// Spacers become empty lines so vertical rhythm survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEmitter;

impl TextEmitter {
    /// Create a new text emitter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentEmitter for TextEmitter {
    fn name(&self) -> &str {
        "text"
    }

    fn extension(&self) -> &str {
        "txt"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn emit(&self, doc: &PaginatedDocument, options: &EmitOptions) -> Result<Vec<u8>> {
        let mut out = String::new();

        for (i, page) in options.pages.select(&doc.pages).enumerate() {
            if i > 0 {
                out.push(PAGE_BREAK);
            }
            for placed in &page.lines {
                out.push_str(&placed.line.text);
                out.push('\n');
            }
        }

        Ok(out.into_bytes())
    }
}
