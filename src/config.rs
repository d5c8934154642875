//! Defaults and runtime configuration.
//!
//! The library itself reads no environment and persists nothing; the binary
//! builds a [`Config`] from its command line and hands it to
//! [`App`](crate::app::App).

use std::path::PathBuf;

use crate::colors::{self, Color};
use crate::render::FillRule;

pub const WINDOW_TITLE: &str = "tinyrast";
pub const WINDOW_WIDTH: u32 = 960;
pub const WINDOW_HEIGHT: u32 = 540;
/// Window pixels per buffer pixel.
pub const RASTER_SCALE: u32 = 4;
/// Viewer frame rate target.
pub const FPS: u64 = 60;
/// Seed for per-triangle model colors.
pub const DEFAULT_SEED: u64 = 0x5EED;
/// Where headless runs and the save key write when no path is given.
pub const DEFAULT_SNAPSHOT: &str = "snapshot.bmp";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    pub scale: u32,
    pub fps: u64,
    pub seed: u64,
    pub fill_rule: FillRule,
    pub background: Color,
    pub model: Option<PathBuf>,
    pub snapshot: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            scale: RASTER_SCALE,
            fps: FPS,
            seed: DEFAULT_SEED,
            fill_rule: FillRule::default(),
            background: colors::BACKGROUND,
            model: None,
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT),
        }
    }
}

impl Config {
    /// Pixel buffer size: the window divided by the scale, at least 1x1.
    pub fn buffer_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        (
            (self.window_width / scale).max(1),
            (self.window_height / scale).max(1),
        )
    }
}
