//! # Render Configuration
//!
//! Presentation settings for both renderers. Every field has a default
//! matching the classic plot: black cubes with white edges at 75% opacity
//! on a white background, seen from 20° elevation and 30° azimuth.
//!
//! A JSON file named by the `MENGER_CONFIG` environment variable may
//! override any subset of the fields.

use crate::error::RenderError;
use crate::render::camera::{Camera, DEFAULT_AZIMUTH, DEFAULT_ELEVATION};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "MENGER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image or window width in pixels.
    pub width: u32,
    /// Image or window height in pixels.
    pub height: u32,
    /// Camera elevation in degrees.
    pub elevation: f64,
    /// Camera azimuth in degrees.
    pub azimuth: f64,
    pub fill_color: [u8; 3],
    pub edge_color: [u8; 3],
    pub background: [u8; 3],
    /// Face opacity in `[0, 1]`.
    pub alpha: f64,
    /// Edge line width in points.
    pub edge_width: f64,
    /// When set, always render headless to this PNG path.
    pub output: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            elevation: DEFAULT_ELEVATION,
            azimuth: DEFAULT_AZIMUTH,
            fill_color: [0, 0, 0],
            edge_color: [255, 255, 255],
            background: [255, 255, 255],
            alpha: 0.75,
            edge_width: 0.5,
            output: None,
        }
    }
}

impl RenderConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, RenderError> {
        let config: RenderConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Loads the file named by `MENGER_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, RenderError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                debug!("Loading render config from {:?}", path);
                Self::from_file(Path::new(&path))
            }
            None => {
                debug!("{} not set, using default render config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(RenderError::InvalidConfig(format!(
                "alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }
        if !(self.edge_width.is_finite() && self.edge_width >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "edge width must be non-negative, got {}",
                self.edge_width
            )));
        }
        if !(self.elevation.is_finite() && self.azimuth.is_finite()) {
            return Err(RenderError::InvalidConfig(
                "camera angles must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.elevation, self.azimuth)
    }

    /// Output path for a headless render of the given depth.
    pub fn output_path(&self, depth: u32) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("menger_sponge_depth_{}.png", depth)))
    }
}
