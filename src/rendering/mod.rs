//! Rendering: layout estimation, paint-command lowering, rasterization.

pub mod layout;
pub mod paint;
pub mod raster;

/// A finished raster capture: CSS-pixel dimensions times the capture scale,
/// plus the encoded PNG bytes.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}
