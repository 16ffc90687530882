//! Block-to-style mapping.

use crate::model::{Block, StyleId};

/// Resolve the style for a block.
///
/// Total over every variant. Heading levels beyond 3 share the
/// sub-heading style.
pub fn resolve_style(block: &Block) -> StyleId {
    match block {
        Block::Heading { level: 1, .. } => StyleId::Title,
        Block::Heading { level: 2, .. } => StyleId::Section,
        Block::Heading { .. } => StyleId::Subsection,
        Block::Paragraph { .. } => StyleId::Body,
        Block::CodeBlock { .. } => StyleId::Code,
        Block::Spacer => StyleId::Spacer,
    }
}
