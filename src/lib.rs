//! Codeshot Engine
//!
//! A headless "code screenshot" engine for Rust: hand it source code and
//! cosmetic settings (window-frame chrome, background color/gradient/image,
//! watermark, line numbers, title) and it renders a styled preview tree and
//! exports it as a PNG. A comparison mode renders two panels side by side
//! for before/after or language-comparison screenshots.
//!
//! # Architecture
//!
//! - **Settings** are plain records in an injectable [`SettingsStore`]
//! - **Preview** builds a serializable style tree from the settings
//! - **Export** clones the tree, patches styles, normalizes colors the
//!   rasterizer cannot interpret, and captures at 2x on a transparent canvas
//! - **Rasterizer** is a trait; the built-in backend is pure software
//!
//! # Example
//!
//! ```no_run
//! use codeshot::{ExportConfig, ExportPipeline, SettingsStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SettingsStore::new();
//! store.set_code("fn main() { println!(\"hello\"); }");
//! store.set_watermark("@codeshot");
//!
//! let config = ExportConfig::default();
//! let preview = codeshot::build_preview(store.display(), store.background(), &config);
//! let exporter = ExportPipeline::new(config);
//! let artifact = exporter.export_to_png(&preview, store.background()).await?;
//! std::fs::write(&artifact.filename, &artifact.png_data)?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod settings;
pub use settings::{
    BackgroundKind, BackgroundSettings, ComparisonLayout, ComparisonSettings, DisplaySettings,
    FrameKind, ImageSize, Language, PanelSettings, SettingsStore,
};

pub mod gradient;
pub use gradient::{build_gradient_css, GradientPreset, GRADIENT_PRESETS};

pub mod background;
pub use background::{resolve_background, BackgroundPreset, ResolvedBackground, BACKGROUND_PRESETS};

pub mod dom;
pub use dom::{Document, MountId, Rect, Style, StyleAccess, StyleNode};

pub mod normalize;
pub use normalize::normalize_colors;

pub mod preview;
pub use preview::{build_comparison, build_preview};

pub mod rendering;
pub use rendering::raster::{RasterOptions, Rasterizer, SoftwareRasterizer};
pub use rendering::Screenshot;

pub mod export;
pub use export::{ExportArtifact, ExportPipeline};

pub mod util;
pub use util::Debouncer;

/// Capture configuration for the export pipeline.
///
/// Defaults follow the carbon-style sizing of the original: width derived
/// from the longest code line within `[600, 1000]` pixels, 40px padding,
/// 2x capture scale, and a 50ms settle delay before capture.
///
/// # Examples
///
/// ```
/// let cfg = codeshot::ExportConfig::default();
/// assert_eq!(cfg.scale, 2);
/// assert_eq!(cfg.settle_delay_ms, 50);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Device-pixel multiplier for the capture.
    pub scale: u32,
    /// Fixed wait before capture, letting layout settle. A pragmatic
    /// bound, not an event-driven readiness signal.
    pub settle_delay_ms: u64,
    /// Lower bound of the estimated preview width.
    pub min_width: u32,
    /// Upper bound of the estimated preview width.
    pub max_width: u32,
    /// Height budget for the code area.
    pub max_height: u32,
    /// Padding between the panel edge and the editor frame.
    pub padding: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            settle_delay_ms: 50,
            min_width: 600,
            max_width: 1000,
            max_height: 900,
            padding: 40,
        }
    }
}

/// Create an export pipeline with the default software backend.
pub fn new_exporter(config: ExportConfig) -> ExportPipeline {
    ExportPipeline::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.min_width, 600);
        assert_eq!(config.max_width, 1000);
        assert_eq!(config.padding, 40);
        assert_eq!(config.scale, 2);
    }

    #[test]
    fn test_new_exporter_uses_the_config() {
        let exporter = new_exporter(ExportConfig {
            scale: 3,
            ..Default::default()
        });
        assert_eq!(exporter.config().scale, 3);
        assert_eq!(exporter.document().mounted_count(), 0);
    }
}
