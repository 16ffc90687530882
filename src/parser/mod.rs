//! Markdown-like text segmentation.

mod options;
mod segmenter;

pub use options::{ErrorMode, ParseOptions};
pub use segmenter::{segment, segment_with_options, Segmenter};
