//! Block-level types produced by the segmenter.

use crate::error::Warning;
use serde::{Deserialize, Serialize};

/// A classified unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading line (`#` run followed by text)
    Heading {
        /// Number of leading `#` characters (always >= 1)
        level: u8,
        /// Heading text with the marker run and surrounding whitespace removed
        text: String,
    },

    /// A single line of running text
    Paragraph {
        /// Paragraph text
        text: String,
    },

    /// A fenced code region
    CodeBlock {
        /// Source lines, verbatim
        lines: Vec<String>,
        /// Language tag from the opening fence, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },

    /// A blank-line marker
    Spacer,
}

impl Block {
    /// Create a heading block.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.max(1),
            text: text.into(),
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Create a code block without a language tag.
    pub fn code<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::CodeBlock {
            lines: lines.into_iter().map(Into::into).collect(),
            language: None,
        }
    }

    /// Get the kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::CodeBlock { .. } => BlockKind::CodeBlock,
            Block::Spacer => BlockKind::Spacer,
        }
    }

    /// Text of a heading or paragraph; `None` for code blocks and spacers.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text } => Some(text),
            _ => None,
        }
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a code block.
    pub fn is_code(&self) -> bool {
        matches!(self, Block::CodeBlock { .. })
    }

    /// Check if this block is a spacer.
    pub fn is_spacer(&self) -> bool {
        matches!(self, Block::Spacer)
    }
}

/// Discriminant of [`Block`], handy for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Heading block
    Heading,
    /// Paragraph block
    Paragraph,
    /// Code block
    CodeBlock,
    /// Spacer block
    Spacer,
}

/// Output of the segmenter: blocks in reading order plus structural warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Blocks in source order
    pub blocks: Vec<Block>,

    /// Recoverable problems found while segmenting
    pub warnings: Vec<Warning>,
}

impl Segmentation {
    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no blocks were produced.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Count blocks of the given kind.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.iter().filter(|b| b.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_constructors() {
        let h = Block::heading(0, "Title");
        assert_eq!(
            h,
            Block::Heading {
                level: 1,
                text: "Title".into()
            }
        );
        assert!(h.is_heading());
        assert_eq!(h.text(), Some("Title"));

        let code = Block::code(["a", "  b"]);
        assert!(code.is_code());
        assert_eq!(code.text(), None);
        assert_eq!(code.kind(), BlockKind::CodeBlock);
    }

    #[test]
    fn test_block_json_tagging() {
        let json = serde_json::to_string(&Block::Spacer).unwrap();
        assert_eq!(json, r#"{"type":"spacer"}"#);

        let json = serde_json::to_string(&Block::code(["x"])).unwrap();
        assert_eq!(json, r#"{"type":"code_block","lines":["x"]}"#);
    }

    #[test]
    fn test_segmentation_count() {
        let seg = Segmentation {
            blocks: vec![Block::Spacer, Block::paragraph("a"), Block::Spacer],
            warnings: Vec::new(),
        };
        assert_eq!(seg.len(), 3);
        assert_eq!(seg.count(BlockKind::Spacer), 2);
        assert_eq!(seg.count(BlockKind::Heading), 0);
    }
}
