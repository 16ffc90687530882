//! Document-level types.

use super::{Block, BlockKind, Page, PageGeometry};
use crate::error::Warning;
use serde::{Deserialize, Serialize};

/// A fully paginated document, ready for an emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedDocument {
    /// Geometry the document was laid out with
    pub geometry: PageGeometry,

    /// Finalized pages, numbered from 1
    pub pages: Vec<Page>,

    /// Recoverable structural warnings
    pub warnings: Vec<Warning>,

    /// Layout statistics
    pub stats: RenderStats,
}

impl PaginatedDocument {
    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check if any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Total number of placed lines (spacers included).
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    /// Get plain text content of the whole document; pages are separated
    /// by a blank line.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Statistics collected while laying out a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of finalized pages
    pub page_count: u32,

    /// Number of placed lines, spacers included
    pub line_count: u32,

    /// Number of heading blocks
    pub heading_count: u32,

    /// Number of paragraph blocks
    pub paragraph_count: u32,

    /// Number of code blocks
    pub code_block_count: u32,

    /// Number of spacer blocks
    pub spacer_count: u32,

    /// Whitespace-separated words in headings and paragraphs
    pub word_count: u32,

    /// Tokens wider than the content width, placed unbroken
    pub overflow_token_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        match block.kind() {
            BlockKind::Heading => self.heading_count += 1,
            BlockKind::Paragraph => self.paragraph_count += 1,
            BlockKind::CodeBlock => self.code_block_count += 1,
            BlockKind::Spacer => self.spacer_count += 1,
        }
        if let Some(text) = block.text() {
            self.word_count += text.split_whitespace().count() as u32;
        }
    }

    /// Record tokens that did not fit the content width.
    pub fn add_overflow_tokens(&mut self, count: usize) {
        self.overflow_token_count += count as u32;
    }

    /// Record the final page layout.
    pub fn set_layout(&mut self, pages: &[Page]) {
        self.page_count = pages.len() as u32;
        self.line_count = pages.iter().map(|p| p.lines.len() as u32).sum();
    }

    /// Total number of blocks counted.
    pub fn block_count(&self) -> u32 {
        self.heading_count + self.paragraph_count + self.code_block_count + self.spacer_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.page_count += other.page_count;
        self.line_count += other.line_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.code_block_count += other.code_block_count;
        self.spacer_count += other.spacer_count;
        self.word_count += other.word_count;
        self.overflow_token_count += other.overflow_token_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StyleId, StyledLine};

    #[test]
    fn test_stats_add_block() {
        let mut stats = RenderStats::new();
        stats.add_block(&Block::heading(1, "Hello world"));
        stats.add_block(&Block::paragraph("one two three"));
        stats.add_block(&Block::code(["let x = 1;"]));
        stats.add_block(&Block::Spacer);

        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.code_block_count, 1);
        assert_eq!(stats.spacer_count, 1);
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.block_count(), 4);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = RenderStats {
            page_count: 2,
            paragraph_count: 5,
            ..Default::default()
        };
        let b = RenderStats {
            page_count: 1,
            paragraph_count: 3,
            overflow_token_count: 4,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.page_count, 3);
        assert_eq!(a.paragraph_count, 8);
        assert_eq!(a.overflow_token_count, 4);
    }

    #[test]
    fn test_get_page() {
        let mut page = Page::new(1);
        page.place(StyledLine::new("a", StyleId::Body, 0), 72.0);
        let doc = PaginatedDocument {
            geometry: PageGeometry::letter(),
            pages: vec![page, Page::new(2)],
            warnings: Vec::new(),
            stats: RenderStats::default(),
        };
        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).unwrap().number, 2);
        assert!(doc.get_page(3).is_none());
        assert_eq!(doc.line_count(), 1);
        assert!(!doc.has_warnings());
    }
}
