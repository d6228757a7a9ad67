// Demo configuration: optional JSON file under the user config directory.

mod tests;

use std::path::PathBuf;

use serde::Deserialize;

use crisp_core::{ProjectionRect, Result, Tuning};
use crisp_renderer::RendererConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label font size in logical pixels, scaled by the window scale factor.
    pub font_size: f32,
    pub text_color: [f32; 4],
    pub background: [f32; 4],
    pub data: DataRect,
    /// Ticks per axis, both ends included.
    pub tick_count: usize,
    pub tuning: Tuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            text_color: [0.0, 0.0, 0.0, 1.0],
            background: [1.0, 1.0, 1.0, 1.0],
            data: DataRect::default(),
            tick_count: 6,
            tuning: Tuning::default(),
        }
    }
}

/// The plotted data range, before label margins.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataRect {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for DataRect {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: 10000.0,
            bottom: 0.0,
            top: 10.0,
        }
    }
}

impl DataRect {
    pub fn to_projection(self) -> Result<ProjectionRect> {
        ProjectionRect::new(self.left, self.right, self.bottom, self.top)
    }
}

/// `<config dir>/crisp`, or `./crisp` when the platform has no config dir.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crisp")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

impl Config {
    /// Load config from the default path. Returns defaults if the file
    /// doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = config_path();
        let data = match std::fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("config: failed to read {}: {e}", path.display());
                }
                return Self::default();
            }
        };

        match Self::from_json(&data) {
            Ok(cfg) => {
                log::info!("config: loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("config: parse error in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Label font size in whole device pixels at `scale_factor`.
    pub fn font_size_px(&self, scale_factor: f32) -> f32 {
        (self.font_size * scale_factor).round().max(1.0)
    }

    /// Renderer settings for a window with the given scale factor.
    pub fn renderer_config(&self, scale_factor: f32) -> Result<RendererConfig> {
        Ok(RendererConfig {
            font_size_px: self.font_size_px(scale_factor),
            text_color: self.text_color,
            projection: self.data.to_projection()?,
            tuning: self.tuning,
        })
    }

    pub fn background_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.background.map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}
