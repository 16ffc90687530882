//! Document model types for paginated content.
//!
//! This module defines the intermediate representation that bridges
//! segmentation, layout, and emission. Every type here is plain data:
//! built once per render call and never mutated after its stage completes.

mod block;
mod document;
mod geometry;
mod page;
mod style;

pub use block::{Block, BlockKind, Segmentation};
pub use document::{PaginatedDocument, RenderStats};
pub use geometry::PageGeometry;
pub use page::{Page, PlacedLine, StyledLine};
pub use style::{Color, FontWeight, StyleId, StyleSheet, StyleSpec};
