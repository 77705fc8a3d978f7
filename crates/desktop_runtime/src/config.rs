//! Desktop runtime configuration.
//!
//! Every tunable constant of the window manager, icon grid, and filesystem persistence lives in
//! [`DesktopConfig`]. Defaults match the shipped desktop; a partial TOML document can override
//! any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::SizeSpec;

/// Storage key holding the serialized filesystem tree.
pub const DEFAULT_FS_STORAGE_KEY: &str = "desktopOS_fileSystem";
/// Folder (directly under the root) backing desktop icons.
pub const DEFAULT_DESKTOP_FOLDER: &str = "Desktop";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Desktop icon cell geometry in pixels.
pub struct GridSize {
    /// Icon width.
    pub width: f64,
    /// Icon height.
    pub height: f64,
    /// Gap between neighboring cells and from the desktop edge.
    pub gap: f64,
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 100.0,
            gap: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Runtime configuration for the desktop core.
pub struct DesktopConfig {
    /// Storage key for the serialized filesystem tree.
    pub fs_storage_key: String,
    /// Name of the root-level folder backing desktop icons.
    pub desktop_folder: String,
    /// Desktop icon grid geometry.
    pub grid: GridSize,
    /// Gap multiplier applied to icon layout inside explorer/folder views.
    pub explorer_gap_multiplier: f64,
    /// Default window width when an app does not specify one.
    pub default_window_width: SizeSpec,
    /// Default window height when an app does not specify one.
    pub default_window_height: SizeSpec,
    /// First z-index handed out by the window stack counter.
    pub z_index_base: u64,
    /// Height reserved for the taskbar at the bottom of the viewport.
    pub taskbar_height: i32,
    /// Quiet interval before icons are repositioned after a viewport resize.
    pub resize_debounce_ms: u64,
    /// Per-icon cascade offset applied when pasting several icons.
    pub paste_cascade_px: f64,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            fs_storage_key: DEFAULT_FS_STORAGE_KEY.to_string(),
            desktop_folder: DEFAULT_DESKTOP_FOLDER.to_string(),
            grid: GridSize::default(),
            explorer_gap_multiplier: 6.0,
            default_window_width: SizeSpec::ViewportWidth(80.0),
            default_window_height: SizeSpec::ViewportHeight(80.0),
            z_index_base: 1000,
            taskbar_height: 40,
            resize_debounce_ms: 100,
            paste_cascade_px: 10.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration loading errors.
pub enum ConfigError {
    /// The TOML document could not be parsed into a [`DesktopConfig`].
    #[error("invalid desktop config: {0}")]
    Parse(String),
}

impl DesktopConfig {
    /// Parses a (possibly partial) TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid TOML or a field has the wrong
    /// type.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
