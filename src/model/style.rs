//! Style identifiers and the style sheet that maps them to font metrics.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Opaque identifier selecting font, color, and background for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    /// Level-1 heading
    Title,
    /// Level-2 heading
    Section,
    /// Level-3 and deeper headings
    Subsection,
    /// Running text
    Body,
    /// Code block lines
    Code,
    /// Blank vertical space, never drawn
    Spacer,
}

impl StyleId {
    /// All identifiers, in a stable order.
    pub const ALL: [StyleId; 6] = [
        StyleId::Title,
        StyleId::Section,
        StyleId::Subsection,
        StyleId::Body,
        StyleId::Code,
        StyleId::Spacer,
    ];

    /// Check if lines with this style produce visible output.
    pub fn is_visible(self) -> bool {
        self != StyleId::Spacer
    }

    /// Snake-case name, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleId::Title => "title",
            StyleId::Section => "section",
            StyleId::Subsection => "subsection",
            StyleId::Body => "body",
            StyleId::Code => "code",
            StyleId::Spacer => "spacer",
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Regular weight
    #[default]
    Regular,
    /// Bold weight
    Bold,
}

/// RGB color with components in `0.0..=1.0`.
///
/// Deserializes from either `{"r": .., "g": .., "b": ..}` or a `"#RRGGBB"`
/// string; always serializes as components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Light grey used behind code lines.
    pub const LIGHT_GREY: Color = Color::rgb(0.9, 0.9, 0.9);

    /// Create a color from components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(hex.get(i..i + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgb { r: f32, g: f32, b: f32 },
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => {
                Color::from_hex(&hex).ok_or_else(|| format!("invalid hex color '{}'", hex))
            }
            ColorRepr::Rgb { r, g, b } => Ok(Color::rgb(r, g, b)),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Presentation descriptor for one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    /// Font family name (e.g., "Helvetica", "Courier")
    pub font_family: String,

    /// Font size in points
    pub size: f32,

    /// Font weight
    #[serde(default)]
    pub weight: FontWeight,

    /// Text color
    #[serde(default)]
    pub color: Color,

    /// Background fill behind each line, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

impl StyleSpec {
    /// Create a regular-weight style.
    pub fn new(font_family: impl Into<String>, size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            size,
            weight: FontWeight::Regular,
            color: Color::BLACK,
            background: None,
        }
    }

    /// Make the style bold.
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    /// Set a background fill.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Check if the family is a monospace family.
    pub fn is_monospace(&self) -> bool {
        let family = self.font_family.to_ascii_lowercase();
        family.contains("mono") || family.contains("courier") || family.contains("fixed")
    }
}

/// Maps every visible [`StyleId`] to a [`StyleSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Level-1 heading style
    pub title: StyleSpec,
    /// Level-2 heading style
    pub section: StyleSpec,
    /// Level-3+ heading style
    pub subsection: StyleSpec,
    /// Body text style
    pub body: StyleSpec,
    /// Code style
    pub code: StyleSpec,
}

impl StyleSheet {
    /// Get the descriptor for a style; spacers have none.
    pub fn spec(&self, id: StyleId) -> Option<&StyleSpec> {
        match id {
            StyleId::Title => Some(&self.title),
            StyleId::Section => Some(&self.section),
            StyleId::Subsection => Some(&self.subsection),
            StyleId::Body => Some(&self.body),
            StyleId::Code => Some(&self.code),
            StyleId::Spacer => None,
        }
    }

    /// Iterate over the visible styles and their descriptors.
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &StyleSpec)> {
        StyleId::ALL
            .into_iter()
            .filter_map(move |id| self.spec(id).map(|spec| (id, spec)))
    }

    /// Check that every style has a usable size.
    pub fn validate(&self) -> Result<()> {
        for (id, spec) in self.iter() {
            if !spec.size.is_finite() || spec.size <= 0.0 {
                return Err(Error::Configuration(format!(
                    "style '{}' must have a positive font size (got {})",
                    id.as_str(),
                    spec.size
                )));
            }
            if spec.font_family.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "style '{}' has an empty font family",
                    id.as_str()
                )));
            }
        }
        Ok(())
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            title: StyleSpec::new("Helvetica", 18.0).bold(),
            section: StyleSpec::new("Helvetica", 14.0).bold(),
            subsection: StyleSpec::new("Helvetica", 12.0).bold(),
            body: StyleSpec::new("Helvetica", 10.0),
            code: StyleSpec::new("Courier", 9.0).with_background(Color::LIGHT_GREY),
        }
    }
}
