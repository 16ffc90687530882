//! Page-level types.

use super::StyleId;
use serde::{Deserialize, Serialize};

/// One display line with its resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledLine {
    /// Text to draw (empty for spacers)
    pub text: String,

    /// Resolved style
    pub style: StyleId,

    /// Index of the block this line came from
    pub source_block_index: usize,
}

impl StyledLine {
    /// Create a styled line.
    pub fn new(text: impl Into<String>, style: StyleId, source_block_index: usize) -> Self {
        Self {
            text: text.into(),
            style,
            source_block_index,
        }
    }

    /// Create a spacer line for the given block.
    pub fn spacer(source_block_index: usize) -> Self {
        Self::new(String::new(), StyleId::Spacer, source_block_index)
    }

    /// Check if this line draws anything.
    pub fn is_drawable(&self) -> bool {
        self.style.is_visible()
    }
}

/// A line positioned on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    /// The line itself
    #[serde(flatten)]
    pub line: StyledLine,

    /// Vertical position, measured downwards from the top edge
    pub y: f32,
}

/// A single finalized page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Lines in placement order
    pub lines: Vec<PlacedLine>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            lines: Vec::new(),
        }
    }

    /// Place a line at `y`.
    pub fn place(&mut self, line: StyledLine, y: f32) {
        self.lines.push(PlacedLine { line, y });
    }

    /// Check if nothing was placed on the page.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check if at least one placed line is drawable.
    pub fn has_drawable_lines(&self) -> bool {
        self.lines.iter().any(|l| l.line.is_drawable())
    }

    /// Iterate over drawable lines only.
    pub fn drawable_lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.lines.iter().filter(|l| l.line.is_drawable())
    }

    /// Get plain text content of the page, one line per placed entry.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
