//! Software rasterizer backend.
//!
//! Executes paint commands against an RGBA pixel buffer and encodes the
//! result as PNG. Text runs use the `font8x8` bitmap glyphs; each glyph is
//! drawn into the fixed monospace advance the layout estimator assumes.
//! Captures happen at `scale` times the CSS-pixel dimensions of the target
//! node with a transparent canvas underneath, matching the browser capture
//! settings (2x, `backgroundColor: null`).

use font8x8::{UnicodeFonts, BASIC_FONTS};

use crate::dom::StyleNode;
use crate::error::{Error, Result};
use crate::rendering::layout::{CHAR_WIDTH_PX, LINE_HEIGHT_PX};
use crate::rendering::paint::{build_commands, PaintCommand, Rgba};
use crate::rendering::Screenshot;
use crate::settings::ImageSize;

/// Capture options, mirroring the browser rasterizer's knobs.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Device-pixel multiplier applied to all CSS-pixel coordinates.
    pub scale: u32,
    /// Leave uncovered canvas pixels fully transparent instead of white.
    pub transparent_background: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 2, transparent_background: true }
    }
}

/// Converts a style tree into a pixel capture.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, node: &StyleNode, opts: &RasterOptions) -> Result<Screenshot>;
}

/// Pure-Rust rasterizer with no external process or GPU dependency.
#[derive(Debug, Default)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&self, node: &StyleNode, opts: &RasterOptions) -> Result<Screenshot> {
        if opts.scale == 0 {
            return Err(Error::ConfigError("capture scale must be nonzero".into()));
        }
        if node.rect.width == 0 || node.rect.height == 0 {
            return Err(Error::RenderError(format!(
                "target node <{}> has a zero-sized rect",
                node.tag
            )));
        }

        // Shift the subtree so the target's origin lands at (0, 0); mounted
        // clones sit at a far-negative offset.
        let mut local = node.clone();
        local.translate(-node.rect.x, -node.rect.y);

        let width = local.rect.width * opts.scale;
        let height = local.rect.height * opts.scale;
        let mut canvas = Canvas::new(width, height, opts.transparent_background);

        for cmd in build_commands(&local) {
            execute(&mut canvas, &cmd, opts.scale);
        }

        let png_data = encode_png(width, height, &canvas.buffer)?;
        Ok(Screenshot { width, height, png_data })
    }
}

/// RGBA pixel buffer with source-over blending.
struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, transparent: bool) -> Self {
        let size = (width as usize) * (height as usize) * 4;
        let buffer = if transparent {
            vec![0; size]
        } else {
            vec![255; size]
        };
        Self { width, height, buffer }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, (r, g, b, a): Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || a == 0 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        if a == 255 {
            self.buffer[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
            return;
        }
        let sa = a as u32;
        let da = self.buffer[idx + 3] as u32;
        let out_a = sa + da * (255 - sa) / 255;
        if out_a == 0 {
            return;
        }
        for (i, s) in [r, g, b].into_iter().enumerate() {
            let d = self.buffer[idx + i] as u32;
            let blended = (s as u32 * sa + d * da * (255 - sa) / 255) / out_a;
            self.buffer[idx + i] = blended.min(255) as u8;
        }
        self.buffer[idx + 3] = out_a.min(255) as u8;
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, rgba: Rgba) {
        for iy in y..y + h as i64 {
            for ix in x..x + w as i64 {
                self.blend_pixel(ix, iy, rgba);
            }
        }
    }
}

fn execute(canvas: &mut Canvas, cmd: &PaintCommand, scale: u32) {
    let s = scale as i64;
    match cmd {
        PaintCommand::SolidRect { rect, rgba } => {
            canvas.fill_rect(
                rect.x as i64 * s,
                rect.y as i64 * s,
                rect.width * scale,
                rect.height * scale,
                *rgba,
            );
        }
        PaintCommand::GradientRect { rect, angle_deg, stops } => {
            fill_gradient(canvas, rect, *angle_deg, stops, scale);
        }
        PaintCommand::Image { rect, img_width, img_height, pixels, size, opacity } => {
            fill_image(canvas, rect, *img_width, *img_height, pixels, *size, *opacity, scale);
        }
        PaintCommand::Text { x, y, text, rgba, scale: text_scale } => {
            draw_text(canvas, *x, *y, text, *rgba, *text_scale, scale);
        }
    }
}

/// Fill a rect with a linear gradient. CSS angle convention: 0deg points
/// up, 90deg points right; stops are spaced evenly along the axis.
fn fill_gradient(
    canvas: &mut Canvas,
    rect: &crate::dom::Rect,
    angle_deg: u16,
    stops: &[Rgba],
    scale: u32,
) {
    debug_assert!(stops.len() >= 2);
    let theta = (angle_deg as f32).to_radians();
    // Screen y grows downward.
    let (dx, dy) = (theta.sin(), -theta.cos());
    let w = (rect.width * scale) as f32;
    let h = (rect.height * scale) as f32;
    // Projection span of the rect onto the gradient axis.
    let span = (w * dx.abs() + h * dy.abs()).max(1.0);
    let (cx, cy) = (w / 2.0, h / 2.0);

    let x0 = rect.x as i64 * scale as i64;
    let y0 = rect.y as i64 * scale as i64;
    for py in 0..rect.height * scale {
        for px in 0..rect.width * scale {
            let proj = (px as f32 - cx) * dx + (py as f32 - cy) * dy;
            let t = (proj / span + 0.5).clamp(0.0, 1.0);
            let rgba = sample_stops(stops, t);
            canvas.blend_pixel(x0 + px as i64, y0 + py as i64, rgba);
        }
    }
}

fn sample_stops(stops: &[Rgba], t: f32) -> Rgba {
    let segments = (stops.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(stops.len() - 2);
    let frac = pos - idx as f32;
    let (a, b) = (stops[idx], stops[idx + 1]);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * frac).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2), lerp(a.3, b.3))
}

/// Tile an image layer across a rect, honoring the background-size mode.
#[allow(clippy::too_many_arguments)]
fn fill_image(
    canvas: &mut Canvas,
    rect: &crate::dom::Rect,
    img_width: u32,
    img_height: u32,
    pixels: &[u8],
    size: ImageSize,
    opacity: f32,
    scale: u32,
) {
    if img_width == 0 || img_height == 0 {
        return;
    }
    let dest_w = rect.width as f32;
    let dest_h = rect.height as f32;
    let factor = match size {
        ImageSize::Cover => (dest_w / img_width as f32).max(dest_h / img_height as f32),
        ImageSize::Contain => (dest_w / img_width as f32).min(dest_h / img_height as f32),
        ImageSize::Auto => 1.0,
    };
    let tile_w = img_width as f32 * factor;
    let tile_h = img_height as f32 * factor;
    let alpha = opacity.clamp(0.0, 1.0);

    let x0 = rect.x as i64 * scale as i64;
    let y0 = rect.y as i64 * scale as i64;
    for py in 0..rect.height * scale {
        for px in 0..rect.width * scale {
            // Nearest-neighbor sample, tiled (background-repeat: repeat).
            let u = (px as f32 / scale as f32).rem_euclid(tile_w) / factor;
            let v = (py as f32 / scale as f32).rem_euclid(tile_h) / factor;
            let sx = (u as u32).min(img_width - 1);
            let sy = (v as u32).min(img_height - 1);
            let idx = ((sy * img_width + sx) * 4) as usize;
            let a = (pixels[idx + 3] as f32 * alpha).round() as u8;
            canvas.blend_pixel(
                x0 + px as i64,
                y0 + py as i64,
                (pixels[idx], pixels[idx + 1], pixels[idx + 2], a),
            );
        }
    }
}

/// Draw a text run with 8x8 bitmap glyphs, centered in the line height.
fn draw_text(canvas: &mut Canvas, x: i32, y: i32, text: &str, rgba: Rgba, text_scale: u32, scale: u32) {
    let s = (text_scale * scale) as i64;
    let advance = (CHAR_WIDTH_PX * text_scale * scale) as i64;
    let baseline_pad = ((LINE_HEIGHT_PX.saturating_sub(8) / 2) * text_scale * scale) as i64;
    let mut pen_x = x as i64 * scale as i64;
    let pen_y = y as i64 * scale as i64 + baseline_pad;

    for c in text.chars() {
        if let Some(glyph) = BASIC_FONTS.get(c) {
            for (row, byte) in glyph.iter().enumerate() {
                for col in 0..8 {
                    if (byte & (1 << col)) != 0 {
                        // Each font pixel covers an s-by-s block.
                        for oy in 0..s {
                            for ox in 0..s {
                                canvas.blend_pixel(
                                    pen_x + col as i64 * s + ox,
                                    pen_y + row as i64 * s + oy,
                                    rgba,
                                );
                            }
                        }
                    }
                }
            }
        }
        // Unknown glyphs still advance the pen.
        pen_x += advance;
    }
}

/// Encode an RGBA buffer as a PNG byte stream.
pub fn encode_png(width: u32, height: u32, buffer: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::EncodeError(e.to_string()))?;
        writer
            .write_image_data(buffer)
            .map_err(|e| Error::EncodeError(e.to_string()))?;
    }
    Ok(out)
}
