//! The segment → wrap/style → paginate pipeline.

use log::debug;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::layout::{checked_measure, paginate, resolve_style, wrap_with_report};
use crate::model::{Block, PaginatedDocument, RenderStats, Segmentation, StyledLine};
use crate::parser::segment_with_options;

use super::RenderOptions;

/// Render raw text to a paginated document.
pub fn render(raw: &str, options: &RenderOptions) -> Result<PaginatedDocument> {
    Renderer::new(options.clone()).render(raw)
}

/// Render several independent documents in parallel.
///
/// Each input gets its own pipeline; results keep the input order.
pub fn render_batch<S>(inputs: &[S], options: &RenderOptions) -> Vec<Result<PaginatedDocument>>
where
    S: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|raw| render(raw.as_ref(), options))
        .collect()
}

/// Document renderer.
///
/// Each stage consumes the complete output of the previous one: all blocks
/// are segmented, then flattened into styled lines, then paginated.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a new renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render raw text.
    pub fn render(&self, raw: &str) -> Result<PaginatedDocument> {
        self.options.validate()?;
        let segmentation = segment_with_options(raw, &self.options.parse)?;
        self.render_segmentation(segmentation)
    }

    /// Render already-segmented blocks.
    pub fn render_segmentation(&self, segmentation: Segmentation) -> Result<PaginatedDocument> {
        self.options.validate()?;

        let mut stats = RenderStats::new();
        let lines = self.styled_lines(&segmentation.blocks, &mut stats)?;
        let pages = paginate(lines, &self.options.geometry)?;
        stats.set_layout(&pages);

        debug!(
            "rendered {} blocks into {} lines on {} pages",
            segmentation.blocks.len(),
            stats.line_count,
            stats.page_count
        );

        Ok(PaginatedDocument {
            geometry: self.options.geometry,
            pages,
            warnings: segmentation.warnings,
            stats,
        })
    }

    /// Flatten blocks into the styled line stream.
    ///
    /// Headings and paragraphs are wrapped to the content width; code lines
    /// pass through unchanged; each spacer becomes one blank line.
    pub fn styled_lines(&self, blocks: &[Block], stats: &mut RenderStats) -> Result<Vec<StyledLine>> {
        let width = self.options.geometry.content_width();
        let measurer = self.options.measurer.as_ref();
        let mut lines = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            if let Some(cancel) = &self.options.cancel {
                cancel.check()?;
            }
            stats.add_block(block);

            let style = resolve_style(block);
            match block {
                Block::Heading { text, .. } | Block::Paragraph { text } => {
                    let spec = self.options.styles.spec(style).ok_or_else(|| {
                        Error::Configuration(format!("no style for '{}'", style.as_str()))
                    })?;
                    let wrapped =
                        wrap_with_report(text, width, |s| checked_measure(measurer, s, spec))?;
                    stats.add_overflow_tokens(wrapped.overflow_tokens);
                    lines.extend(
                        wrapped
                            .lines
                            .into_iter()
                            .map(|line| StyledLine::new(line, style, index)),
                    );
                }
                Block::CodeBlock { lines: code, .. } => {
                    lines.extend(code.iter().map(|line| StyledLine::new(line.clone(), style, index)));
                }
                Block::Spacer => lines.push(StyledLine::spacer(index)),
            }
        }

        Ok(lines)
    }
}
