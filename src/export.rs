//! The export pipeline: preview node in, downloadable PNG artifact out.
//!
//! A single linear sequence per capture: clone the preview tree, patch
//! styles for export, normalize colors, mount the clone off-screen, wait a
//! fixed settle interval, rasterize, unmount, encode. The mounted clone is
//! removed on success and failure alike; the shared [`Document`] never
//! accumulates leftovers. Failures surface as typed errors so callers can
//! report them — the engine itself never shows UI.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as Base64Engine;
use serde::Serialize;

use crate::background::{resolve_background, ResolvedBackground};
use crate::dom::{Document, Rect, StyleNode};
use crate::error::{Error, Result};
use crate::normalize::normalize_colors;
use crate::rendering::raster::{RasterOptions, Rasterizer, SoftwareRasterizer};
use crate::settings::BackgroundSettings;
use crate::ExportConfig;

/// Horizontal offset for mounted capture clones, far outside any viewport.
const OFFSCREEN_LEFT: i32 = -9999;

/// The product of one export: encoded PNG bytes plus the download metadata
/// the original handed to the browser anchor.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    /// `code-<unix-epoch-ms>.png`
    pub filename: String,
    #[serde(skip)]
    pub png_data: Vec<u8>,
    /// `data:image/png;base64,...` form of the PNG.
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Orchestrates capture of preview trees into PNG artifacts.
pub struct ExportPipeline {
    document: Arc<Document>,
    rasterizer: Box<dyn Rasterizer>,
    config: ExportConfig,
}

impl ExportPipeline {
    /// Pipeline backed by the built-in software rasterizer.
    pub fn new(config: ExportConfig) -> Self {
        Self::with_rasterizer(config, Box::new(SoftwareRasterizer::new()))
    }

    /// Pipeline with a caller-provided rasterizer backend.
    pub fn with_rasterizer(config: ExportConfig, rasterizer: Box<dyn Rasterizer>) -> Self {
        Self {
            document: Arc::new(Document::new()),
            rasterizer,
            config,
        }
    }

    /// The shared mount surface. Exposed so callers can observe mount
    /// hygiene (the count is identical before and after every export).
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Capture a preview node into a PNG artifact.
    ///
    /// The live tree is never touched: all fixups happen on a deep clone.
    /// Concurrent calls are permitted; each operates on its own clone and
    /// mount entry.
    pub async fn export_to_png(
        &self,
        preview: &StyleNode,
        background: &BackgroundSettings,
    ) -> Result<ExportArtifact> {
        // Clone, so live editor state is undisturbed.
        let mut clone = preview.clone();

        // Square corners for the exported image, then the resolved
        // background for the current settings.
        clone.style.border_radius = Some(0);
        apply_export_background(&mut clone, background);

        // Rewrite colors the rasterizer cannot interpret.
        normalize_colors(&mut clone);

        // Mount fixed and off-viewport at the live node's measured size.
        clone.style.position = Some("fixed".to_string());
        clone.style.left = Some(OFFSCREEN_LEFT);
        clone.style.top = Some(0);
        clone.style.z_index = Some(9999);
        clone.translate(OFFSCREEN_LEFT - clone.rect.x, -clone.rect.y);
        let id = self.document.mount(clone);

        // Let layout settle before capture. A fixed bound, not a readiness
        // signal; see ExportConfig::settle_delay_ms.
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let raster_result = match self.document.get(id) {
            Some(mounted) => self.rasterizer.rasterize(
                &mounted,
                &RasterOptions {
                    scale: self.config.scale,
                    transparent_background: true,
                },
            ),
            None => Err(Error::ExportError(
                "mounted clone disappeared before capture".to_string(),
            )),
        };

        // Unmount before propagating any capture error.
        let _ = self.document.unmount(id);
        let screenshot = raster_result?;

        let data_url = format!("data:image/png;base64,{}", BASE64.encode(&screenshot.png_data));
        let filename = format!("code-{}.png", epoch_millis());
        log::debug!(
            "Exported {} ({}x{}, {} bytes)",
            filename,
            screenshot.width,
            screenshot.height,
            screenshot.png_data.len()
        );

        Ok(ExportArtifact {
            filename,
            png_data: screenshot.png_data,
            data_url,
            width: screenshot.width,
            height: screenshot.height,
        })
    }
}

/// Apply the resolved background to an export clone.
///
/// Image backgrounds become two layers: the solid fallback color on the
/// clone plus an overlay child carrying the image at negative z-index. The
/// rasterizer does not reliably composite image, opacity and color on one
/// element, so opacity lives only on the overlay.
fn apply_export_background(clone: &mut StyleNode, background: &BackgroundSettings) {
    match resolve_background(background) {
        ResolvedBackground::Solid { color } => {
            clone.style.background_color = Some(color.clone());
            clone.computed_background = color;
            clone.style.background_image = None;
        }
        ResolvedBackground::Gradient { css } => {
            clone.style.background_image = Some(css);
            clone.style.background_color = Some("transparent".to_string());
            clone.computed_background = "transparent".to_string();
        }
        ResolvedBackground::Image { fallback_color, layer } => {
            clone.style.background_color = Some(fallback_color.clone());
            clone.computed_background = fallback_color;
            clone.style.background_image = None;
            clone.style.position = Some("relative".to_string());

            let mut overlay = StyleNode::new("div");
            overlay.rect = Rect::new(clone.rect.x, clone.rect.y, clone.rect.width, clone.rect.height);
            overlay.computed_background = "transparent".to_string();
            overlay.style.background_image = Some(format!("url({})", layer.url));
            overlay.style.background_size = Some(layer.size.as_str().to_string());
            overlay.style.background_position = Some(layer.position);
            overlay.style.background_repeat = Some("repeat".to_string());
            overlay.style.opacity = Some(layer.opacity);
            overlay.style.position = Some("absolute".to_string());
            overlay.style.z_index = Some(-1);
            clone.children.insert(0, overlay);
        }
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
