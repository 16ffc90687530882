//! Rendering options and configuration.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{HeuristicMeasurer, TextMeasurer};
use crate::model::{PageGeometry, StyleSheet};
use crate::parser::ParseOptions;

use super::CancelToken;

/// Options for rendering a document.
#[derive(Clone)]
pub struct RenderOptions {
    /// Page geometry
    pub geometry: PageGeometry,

    /// Style sheet
    pub styles: StyleSheet,

    /// Segmentation options
    pub parse: ParseOptions,

    /// Width measurement collaborator
    pub measurer: Arc<dyn TextMeasurer>,

    /// Cancellation token, checked between blocks
    pub cancel: Option<CancelToken>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the style sheet.
    pub fn with_styles(mut self, styles: StyleSheet) -> Self {
        self.styles = styles;
        self
    }

    /// Apply a loaded configuration (geometry and styles).
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.geometry = config.geometry;
        self.styles = config.styles;
        self
    }

    /// Set segmentation options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Fail on structural warnings instead of recording them.
    pub fn strict(mut self) -> Self {
        self.parse = self.parse.strict();
        self
    }

    /// Set the measurement collaborator.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Arc::new(measurer);
        self
    }

    /// Set a shared measurement collaborator.
    pub fn with_shared_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Check geometry and styles before any block is processed.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.styles.validate()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::letter(),
            styles: StyleSheet::default(),
            parse: ParseOptions::default(),
            measurer: Arc::new(HeuristicMeasurer::new()),
            cancel: None,
        }
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("geometry", &self.geometry)
            .field("styles", &self.styles)
            .field("parse", &self.parse)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// Serializable layout configuration (geometry and style sheet).
///
/// Missing sections fall back to the US Letter profile and the default
/// style sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Page geometry
    #[serde(default)]
    pub geometry: PageGeometry,

    /// Style sheet
    #[serde(default)]
    pub styles: StyleSheet,
}

impl RenderConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid config: {}", e)))?;
        config.geometry.validate()?;
        config.styles.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
