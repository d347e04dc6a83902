//! Snapshot handed over by the snapshot provider

use crate::dom::{ElementTreeNode, Size};
use crate::error::{LocatorError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// One captured UI state: element tree, screenshot and optional page size
///
/// Owned by the caller for the duration of a resolution; the only mutation
/// the engine applies is appending synthetic elements to `tree`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UiContext {
    pub tree: ElementTreeNode,

    /// Screenshot, base64 or data URL
    #[serde(default)]
    pub screenshot_base64: String,

    /// Same screenshot with element markers drawn on it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_base64_with_marker: Option<String>,

    /// Page size in pixels; derived from the screenshot when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl UiContext {
    /// Create a new UiContext
    pub fn new(tree: ElementTreeNode, screenshot_base64: impl Into<String>) -> Self {
        Self {
            tree,
            screenshot_base64: screenshot_base64.into(),
            screenshot_base64_with_marker: None,
            size: None,
        }
    }

    /// Builder method: set page size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Builder method: set marker screenshot
    pub fn with_marker_screenshot(mut self, screenshot: impl Into<String>) -> Self {
        self.screenshot_base64_with_marker = Some(screenshot.into());
        self
    }

    /// Load a snapshot saved as JSON
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| LocatorError::SnapshotParse(format!("{}: {}", path.display(), e)))
    }

    /// Screenshot to show the AI, preferring the marked one
    pub fn screenshot_for_ai(&self) -> &str {
        self.screenshot_base64_with_marker
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.screenshot_base64)
    }

    /// Page size, from the context or from the screenshot header
    pub fn resolve_size(&self) -> Result<Size> {
        match self.size {
            Some(size) => Ok(size),
            None => image_size_of_base64(&self.screenshot_base64),
        }
    }
}

/// Pixel size of a base64-encoded image (raw or `data:` URL)
///
/// Only the image header is read.
pub fn image_size_of_base64(data: &str) -> Result<Size> {
    let encoded = match data.split_once(";base64,") {
        Some((header, payload)) if header.starts_with("data:") => payload,
        _ => data,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| LocatorError::ScreenshotDecode(format!("invalid base64: {}", e)))?;

    let (width, height) = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LocatorError::ScreenshotDecode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| LocatorError::ScreenshotDecode(e.to_string()))?;

    Ok(Size::new(f64::from(width), f64::from(height)))
}
