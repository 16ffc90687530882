//! Emitter options.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::model::{Page, StyleSheet};

/// Options shared by all emitters.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Pages to emit
    pub pages: PageSelection,

    /// Style sheet used for fonts, sizes, and colors
    pub styles: StyleSheet,

    /// JSON output format
    pub json_format: JsonFormat,

    /// Document title written to output metadata
    pub title: Option<String>,
}

impl EmitOptions {
    /// Create new emit options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the style sheet.
    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.styles = styles;
        self
    }

    /// Set the JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Page selection for emitting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Emit all pages
    #[default]
    All,
    /// Emit a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Emit specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Filter pages, keeping document order.
    pub fn select<'a>(&'a self, pages: &'a [Page]) -> impl Iterator<Item = &'a Page> + 'a {
        pages.iter().filter(move |page| self.includes(page.number))
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page(start, s)?;
                let end = parse_page(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!(
                        "'{}': start page is after end page",
                        s
                    )));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page(start, s)?;
                let end = parse_page(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!(
                        "'{}': start page is after end page",
                        part
                    )));
                }
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p = parse_page(part, s)?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        pages.sort_unstable();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange(format!(
            "'{}': pages are numbered from 1",
            whole
        ))),
        Ok(page) => Ok(page),
        Err(_) => Err(Error::InvalidPageRange(format!(
            "'{}': invalid page number '{}'",
            whole,
            part.trim()
        ))),
    }
}
