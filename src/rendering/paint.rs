//! Lowering a style tree to a flat paint-command list.
//!
//! The painter walks the tree in paint order (node background, negative
//! z-index children, remaining children) and emits simple commands the
//! rasterizer executes against an RGBA buffer. Colors are expected to be in
//! rasterizer-safe form by the time painting happens; anything the parser
//! does not understand is skipped with a debug log rather than failing the
//! capture.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as Base64Engine;

use crate::dom::{Rect, StyleNode};
use crate::gradient::parse_gradient_colors;
use crate::settings::ImageSize;

/// Straight-alpha RGBA color.
pub type Rgba = (u8, u8, u8, u8);

/// One paint operation. Coordinates are CSS pixels; the rasterizer applies
/// the capture scale.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        rect: Rect,
        rgba: Rgba,
    },
    GradientRect {
        rect: Rect,
        angle_deg: u16,
        stops: Vec<Rgba>,
    },
    /// Decoded raster image tiled across a destination rect.
    Image {
        rect: Rect,
        img_width: u32,
        img_height: u32,
        pixels: Vec<u8>,
        size: ImageSize,
        opacity: f32,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        rgba: Rgba,
        scale: u32,
    },
}

/// Parse a CSS color serialization into straight-alpha RGBA.
///
/// Supports `#rgb`, `#rrggbb`, `#rrggbbaa`, the `transparent` keyword and
/// `rgb()`/`rgba()` functions. Everything else (notably `oklch(...)`, which
/// normalization is expected to have removed) yields `None`.
pub fn parse_color(value: &str) -> Option<Rgba> {
    let v = value.trim();
    if v == "transparent" {
        return Some((0, 0, 0, 0));
    }
    if let Some(hex) = v.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some((r * 17, g * 17, b * 17, 255))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = if hex.len() == 8 {
                    u8::from_str_radix(&hex[6..8], 16).ok()?
                } else {
                    255
                };
                Some((r, g, b, a))
            }
            _ => None,
        };
    }
    if v.starts_with("rgb(") || v.starts_with("rgba(") {
        let inner = v.split_once('(')?.1.strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let r: u8 = parts[0].parse().ok()?;
        let g: u8 = parts[1].parse().ok()?;
        let b: u8 = parts[2].parse().ok()?;
        let a = if parts.len() > 3 {
            (parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };
        return Some((r, g, b, a));
    }
    None
}

/// First `<digits>deg` token of a gradient string, defaulting to 135.
fn parse_gradient_angle(css: &str) -> u16 {
    let bytes = css.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if css[i..].starts_with("deg") {
                return css[start..i].parse().unwrap_or(135);
            }
        } else {
            i += 1;
        }
    }
    135
}

fn scale_alpha(rgba: Rgba, opacity: f32) -> Rgba {
    let (r, g, b, a) = rgba;
    (r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8)
}

/// Decode a `data:image/png;base64,...` URL into raw RGBA pixels.
fn decode_png_data_url(url: &str) -> Option<(u32, u32, Vec<u8>)> {
    let b64 = url.strip_prefix("data:image/png;base64,")?;
    let bytes = BASE64.decode(b64.trim()).ok()?;
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let mut reader = decoder.read_info().ok()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).ok()?;
    buf.truncate(info.buffer_size());
    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => {
            let mut out = Vec::with_capacity(buf.len() / 3 * 4);
            for px in buf.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            out
        }
        other => {
            log::debug!("Unsupported PNG color type for background image: {:?}", other);
            return None;
        }
    };
    Some((info.width, info.height, rgba))
}

/// Lower a style tree to paint commands, in paint order.
pub fn build_commands(node: &StyleNode) -> Vec<PaintCommand> {
    let mut out = Vec::new();
    paint_node(node, 1.0, &mut out);
    out
}

fn paint_node(node: &StyleNode, inherited_opacity: f32, out: &mut Vec<PaintCommand>) {
    let opacity = inherited_opacity * node.style.opacity.unwrap_or(1.0);

    // Background color first.
    match parse_color(node.effective_background()) {
        Some(rgba) if rgba.3 > 0 => out.push(PaintCommand::SolidRect {
            rect: node.rect,
            rgba: scale_alpha(rgba, opacity),
        }),
        Some(_) => {}
        None => {
            if !node.effective_background().is_empty() {
                log::debug!(
                    "Skipping unparseable background color {:?} on <{}>",
                    node.effective_background(),
                    node.tag
                );
            }
        }
    }

    // Background image (gradient or raster) over the color.
    if let Some(image) = node.style.background_image.as_deref() {
        if image.contains("-gradient(") {
            let stops: Vec<Rgba> = parse_gradient_colors(image)
                .iter()
                .filter_map(|c| parse_color(c))
                .map(|c| scale_alpha(c, opacity))
                .collect();
            if stops.len() >= 2 {
                out.push(PaintCommand::GradientRect {
                    rect: node.rect,
                    angle_deg: parse_gradient_angle(image),
                    stops,
                });
            } else {
                log::debug!("Gradient with fewer than two parseable stops: {:?}", image);
            }
        } else if let Some(url) = image
            .strip_prefix("url(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            if let Some((w, h, pixels)) = decode_png_data_url(url.trim_matches(|c| c == '"' || c == '\'')) {
                out.push(PaintCommand::Image {
                    rect: node.rect,
                    img_width: w,
                    img_height: h,
                    pixels,
                    size: node
                        .style
                        .background_size
                        .as_deref()
                        .and_then(parse_background_size)
                        .unwrap_or(ImageSize::Auto),
                    opacity,
                });
            } else {
                // SVG patterns and non-PNG rasters are not decodable by the
                // software backend; the fallback color underneath remains.
                log::warn!("Background image is not a decodable PNG data URL; skipping layer");
            }
        }
    }

    // Text run.
    if let Some(text) = node.text.as_deref() {
        if let Some(rgba) = parse_color(node.effective_color()) {
            out.push(PaintCommand::Text {
                x: node.rect.x,
                y: node.rect.y,
                text: text.to_string(),
                rgba: scale_alpha(rgba, opacity),
                scale: node.scale.max(1),
            });
        } else {
            log::debug!(
                "Skipping text with unparseable color {:?} on <{}>",
                node.effective_color(),
                node.tag
            );
        }
    }

    // Negative z-index children paint before the rest.
    for child in node.children.iter().filter(|c| c.style.z_index.unwrap_or(0) < 0) {
        paint_node(child, opacity, out);
    }
    for child in node.children.iter().filter(|c| c.style.z_index.unwrap_or(0) >= 0) {
        paint_node(child, opacity, out);
    }
}

fn parse_background_size(value: &str) -> Option<ImageSize> {
    match value {
        "cover" => Some(ImageSize::Cover),
        "contain" => Some(ImageSize::Contain),
        "auto" => Some(ImageSize::Auto),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_handles_hex_forms() {
        assert_eq!(parse_color("#fff"), Some((255, 255, 255, 255)));
        assert_eq!(parse_color("#111827"), Some((0x11, 0x18, 0x27, 255)));
        assert_eq!(parse_color("#11182780"), Some((0x11, 0x18, 0x27, 0x80)));
        assert_eq!(parse_color("transparent"), Some((0, 0, 0, 0)));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some((1, 2, 3, 255)));
        assert_eq!(parse_color("rgba(1, 2, 3, 0.5)"), Some((1, 2, 3, 128)));
        assert_eq!(parse_color("oklch(0.2 0.03 264)"), None);
    }

    #[test]
    fn background_color_becomes_a_solid_rect() {
        let mut node = StyleNode::new("div");
        node.rect = Rect::new(0, 0, 10, 10);
        node.computed_background = "#111827".to_string();
        let cmds = build_commands(&node);
        assert_eq!(
            cmds,
            vec![PaintCommand::SolidRect {
                rect: Rect::new(0, 0, 10, 10),
                rgba: (0x11, 0x18, 0x27, 255),
            }]
        );
    }

    #[test]
    fn gradient_background_emits_stops_in_order() {
        let mut node = StyleNode::new("div");
        node.rect = Rect::new(0, 0, 10, 10);
        node.style.background_image =
            Some("linear-gradient(90deg, #667eea 0%, #764ba2 100%)".to_string());
        let cmds = build_commands(&node);
        match &cmds[0] {
            PaintCommand::GradientRect { angle_deg, stops, .. } => {
                assert_eq!(*angle_deg, 90);
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[0], (0x66, 0x7e, 0xea, 255));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn negative_z_children_paint_first() {
        let mut root = StyleNode::new("div");
        root.rect = Rect::new(0, 0, 10, 10);
        let mut overlay = StyleNode::new("div");
        overlay.style.z_index = Some(-1);
        overlay.computed_background = "#000000".to_string();
        overlay.rect = Rect::new(0, 0, 10, 10);
        let mut content = StyleNode::new("span");
        content.text = Some("hi".to_string());
        content.computed_color = "#f9fafb".to_string();
        content.rect = Rect::new(1, 1, 8, 8);
        // Children deliberately pushed content-first.
        root.children.push(content);
        root.children.push(overlay);

        let cmds = build_commands(&root);
        assert_eq!(cmds.len(), 2);
        // Overlay rect first despite being pushed last, then the text.
        assert!(matches!(cmds[0], PaintCommand::SolidRect { .. }));
        assert!(matches!(cmds[1], PaintCommand::Text { .. }));
    }

    #[test]
    fn node_opacity_scales_text_alpha() {
        let mut node = StyleNode::new("span");
        node.text = Some("mark".to_string());
        node.computed_color = "#ffffff".to_string();
        node.style.opacity = Some(0.5);
        let cmds = build_commands(&node);
        match &cmds[0] {
            PaintCommand::Text { rgba, .. } => assert_eq!(rgba.3, 128),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
