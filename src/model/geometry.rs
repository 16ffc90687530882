//! Page geometry configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed page geometry for a whole document, in device units (points).
///
/// Vertical positions grow downwards from the top edge of the page. The
/// horizontal content area is symmetric: the right margin mirrors
/// `left_margin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,

    /// Page height
    pub height: f32,

    /// Left (and mirrored right) margin
    pub left_margin: f32,

    /// Distance from the top edge to the first line position
    pub top_margin: f32,

    /// Distance from the bottom edge to the lowest allowed line position
    pub bottom_margin: f32,

    /// Vertical advance per line
    pub leading: f32,
}

impl PageGeometry {
    /// Create a geometry from explicit values.
    pub fn new(
        width: f32,
        height: f32,
        left_margin: f32,
        top_margin: f32,
        bottom_margin: f32,
        leading: f32,
    ) -> Self {
        Self {
            width,
            height,
            left_margin,
            top_margin,
            bottom_margin,
            leading,
        }
    }

    /// US Letter (8.5 x 11 inches) with one-inch margins and 14pt leading.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0, 72.0, 72.0, 72.0, 14.0)
    }

    /// A4 (210 x 297 mm) with the same margins and leading as [`letter`](Self::letter).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0, 72.0, 72.0, 72.0, 14.0)
    }

    /// Set the margins on every side.
    pub fn with_margins(mut self, margin: f32) -> Self {
        self.left_margin = margin;
        self.top_margin = margin;
        self.bottom_margin = margin;
        self
    }

    /// Set the leading.
    pub fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    /// Width available to wrapped text.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.left_margin
    }

    /// Lowest y at which a line may still be placed.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.bottom_margin
    }

    /// Number of lines that fit on one page.
    pub fn lines_per_page(&self) -> usize {
        ((self.content_bottom() - self.top_margin) / self.leading).floor() as usize + 1
    }

    /// Check that the geometry can paginate any input.
    ///
    /// Runs before any block is processed; an invalid geometry would
    /// otherwise loop forever in the paginator.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("leading", self.leading),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Configuration(format!(
                    "{} must be positive (got {})",
                    name, value
                )));
            }
        }

        let margins = [
            ("left_margin", self.left_margin),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
        ];
        for (name, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Configuration(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(Error::Configuration(format!(
                "content width must be positive (page width {} with {} margins)",
                self.width, self.left_margin
            )));
        }

        if self.top_margin > self.content_bottom() {
            return Err(Error::Configuration(format!(
                "top margin {} leaves no room above bottom limit {}",
                self.top_margin,
                self.content_bottom()
            )));
        }

        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}
