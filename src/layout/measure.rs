//! Text measurement collaborators.
//!
//! The layout core never computes font metrics itself. It asks a
//! [`TextMeasurer`] for the width of a string in a given style and rejects
//! any answer that is not a finite, non-negative number.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use ttf_parser::{Face, GlyphId};

use crate::error::{Error, Result};
use crate::model::{FontWeight, StyleSpec};

/// Width measurement for a string in a style, in device units.
///
/// Implementations must be pure: equal inputs give equal widths.
pub trait TextMeasurer: Send + Sync {
    /// Measure the advance width of `text` set in `style`.
    fn measure(&self, text: &str, style: &StyleSpec) -> Result<f32>;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &StyleSpec) -> Result<f32> + Send + Sync,
{
    fn measure(&self, text: &str, style: &StyleSpec) -> Result<f32> {
        self(text, style)
    }
}

/// Measure and reject non-finite or negative widths.
pub fn checked_measure(measurer: &dyn TextMeasurer, text: &str, style: &StyleSpec) -> Result<f32> {
    let width = measurer.measure(text, style)?;
    if !width.is_finite() {
        return Err(Error::measurement(text, format!("width is not finite ({})", width)));
    }
    if width < 0.0 {
        return Err(Error::measurement(text, format!("width is negative ({})", width)));
    }
    Ok(width)
}

/// Glyph-class width model for when no font files are available.
///
/// Proportional families use per-class em widths; monospace families use a
/// fixed advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl HeuristicMeasurer {
    /// Create a heuristic measurer.
    pub fn new() -> Self {
        Self
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, style: &StyleSpec) -> Result<f32> {
        let em: f32 = if style.is_monospace() {
            text.chars().count() as f32 * 0.6
        } else {
            text.chars().map(proportional_em_width).sum()
        };
        let scale = match style.weight {
            FontWeight::Bold => 1.05,
            FontWeight::Regular => 1.0,
        };
        Ok(em * style.size * scale)
    }
}

fn proportional_em_width(ch: char) -> f32 {
    match ch {
        ' ' | '\u{00A0}' => 0.28,
        '\t' => 1.12,
        'i' | 'j' | 'l' | 'I' | '|' | '!' => 0.22,
        '.' | ',' | ':' | ';' | '\'' | '"' | '`' => 0.28,
        'f' | 't' | 'r' | '-' => 0.33,
        '(' | ')' | '[' | ']' | '{' | '}' => 0.33,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.83,
        c if c.is_ascii_digit() => 0.56,
        c if c.is_ascii_uppercase() => 0.67,
        c if c.is_ascii_lowercase() => 0.52,
        c if c.is_whitespace() => 0.28,
        _ => 0.58,
    }
}

/// Measures text with advance widths read from TrueType/OpenType files.
///
/// Fonts are registered per family; a bold variant may be registered as
/// `"<family>-bold"`. Measuring a family with no registered font is an
/// error, never a silent fallback.
#[derive(Debug, Clone, Default)]
pub struct FontFileMeasurer {
    fonts: HashMap<String, Vec<u8>>,
}

impl FontFileMeasurer {
    /// Create a measurer with no fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font data for a family.
    pub fn add_font(&mut self, family: &str, data: Vec<u8>) -> Result<()> {
        Face::parse(&data, 0).map_err(|e| {
            Error::Configuration(format!("invalid font data for '{}': {}", family, e))
        })?;
        debug!("registered font '{}' ({} bytes)", family, data.len());
        self.fonts.insert(family.to_ascii_lowercase(), data);
        Ok(())
    }

    /// Register a font file for a family.
    pub fn load<P: AsRef<Path>>(&mut self, family: &str, path: P) -> Result<()> {
        let data = fs::read(path.as_ref())?;
        self.add_font(family, data)
    }

    /// Check if a family has a registered font.
    pub fn has_family(&self, family: &str) -> bool {
        self.fonts.contains_key(&family.to_ascii_lowercase())
    }

    /// Number of registered fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Check if no fonts are registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn font_for(&self, style: &StyleSpec) -> Option<&[u8]> {
        let family = style.font_family.to_ascii_lowercase();
        let bold = match style.weight {
            FontWeight::Bold => self.fonts.get(&format!("{}-bold", family)),
            FontWeight::Regular => None,
        };
        bold.or_else(|| self.fonts.get(&family)).map(Vec::as_slice)
    }
}

impl TextMeasurer for FontFileMeasurer {
    fn measure(&self, text: &str, style: &StyleSpec) -> Result<f32> {
        let data = self.font_for(style).ok_or_else(|| {
            Error::measurement(
                text,
                format!("no font registered for family '{}'", style.font_family),
            )
        })?;
        let face = Face::parse(data, 0).map_err(|e| Error::measurement(text, e.to_string()))?;

        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return Err(Error::measurement(text, "font reports zero units per em"));
        }

        let fallback = face.glyph_hor_advance(GlyphId(0)).unwrap_or(0);
        let units: u32 = text
            .chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|g| face.glyph_hor_advance(g))
                    .unwrap_or(fallback) as u32
            })
            .sum();

        Ok(units as f32 * style.size / units_per_em)
    }
}
