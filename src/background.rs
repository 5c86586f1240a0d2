//! Background pattern catalog and background style resolution.
//!
//! The catalog carries a handful of tiling SVG patterns shipped as data
//! URLs. [`resolve_background`] maps the current [`BackgroundSettings`] to
//! the concrete style the preview and the export clone should carry; for
//! image backgrounds the resolution is two-layer (solid fallback color on
//! the panel plus a dedicated overlay layer for the image) because the
//! rasterizer does not reliably composite background-image, opacity and
//! background-color on a single element.

use serde::Serialize;

use crate::gradient::build_gradient_css;
use crate::settings::{BackgroundKind, BackgroundSettings, ImageSize};

/// Whether a preset tiles as a pattern or covers as a full image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    Pattern,
    Image,
}

/// Visual grouping used by selection UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Geometric,
    Organic,
    Tech,
    Abstract,
}

/// A predefined background pattern selectable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundPreset {
    pub id: &'static str,
    pub name: &'static str,
    /// SVG pattern tile as a data URL.
    pub url: &'static str,
    pub kind: PresetKind,
    pub category: PresetCategory,
}

pub const BACKGROUND_PRESETS: &[BackgroundPreset] = &[
    BackgroundPreset {
        id: "dots",
        name: "Dots",
        url: "data:image/svg+xml,%3Csvg width='60' height='60' viewBox='0 0 60 60' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='none' fill-rule='evenodd'%3E%3Cg fill='%23ffffff' fill-opacity='0.1'%3E%3Ccircle cx='30' cy='30' r='4'/%3E%3C/g%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Geometric,
    },
    BackgroundPreset {
        id: "grid",
        name: "Grid",
        url: "data:image/svg+xml,%3Csvg width='40' height='40' viewBox='0 0 40 40' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='%23ffffff' fill-opacity='0.05' fill-rule='evenodd'%3E%3Cpath d='m0 40h40v-40h-40z'/%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Geometric,
    },
    BackgroundPreset {
        id: "diagonal-lines",
        name: "Diagonal",
        url: "data:image/svg+xml,%3Csvg width='40' height='40' viewBox='0 0 40 40' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='%23ffffff' fill-opacity='0.08' fill-rule='evenodd'%3E%3Cpath d='m0 40l40-40h-40z'/%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Geometric,
    },
    BackgroundPreset {
        id: "hexagons",
        name: "Hexagons",
        url: "data:image/svg+xml,%3Csvg width='56' height='28' viewBox='0 0 56 28' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='none' fill-rule='evenodd'%3E%3Cg fill='%23ffffff' fill-opacity='0.06'%3E%3Cpath d='m28 0l14 8.1v16.2l-14 8.1-14-8.1v-16.2z'/%3E%3C/g%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Geometric,
    },
    BackgroundPreset {
        id: "bubbles",
        name: "Bubbles",
        url: "data:image/svg+xml,%3Csvg width='60' height='60' viewBox='0 0 60 60' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='none' fill-rule='evenodd'%3E%3Cg fill='%23ffffff' fill-opacity='0.08'%3E%3Ccircle cx='30' cy='30' r='8'/%3E%3Ccircle cx='10' cy='10' r='4'/%3E%3Ccircle cx='50' cy='50' r='6'/%3E%3C/g%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Organic,
    },
    BackgroundPreset {
        id: "waves",
        name: "Waves",
        url: "data:image/svg+xml,%3Csvg width='40' height='40' viewBox='0 0 40 40' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='%23ffffff' fill-opacity='0.05' fill-rule='evenodd'%3E%3Cpath d='M0 40c13.3 0 20-13.3 20-20S26.7 0 40 0v40z'/%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Organic,
    },
    BackgroundPreset {
        id: "circuit",
        name: "Circuit",
        url: "data:image/svg+xml,%3Csvg width='80' height='80' viewBox='0 0 80 80' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='none' fill-rule='evenodd'%3E%3Cg fill='%23ffffff' fill-opacity='0.06'%3E%3Cpath d='M0 0h40v40H0V0zm40 40h40v40H40V40z'/%3E%3Ccircle cx='20' cy='20' r='4'/%3E%3Ccircle cx='60' cy='60' r='4'/%3E%3C/g%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Tech,
    },
    BackgroundPreset {
        id: "binary",
        name: "Binary",
        url: "data:image/svg+xml,%3Csvg width='40' height='40' viewBox='0 0 40 40' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='%23ffffff' fill-opacity='0.04'%3E%3Ctext x='5' y='15' font-family='monospace' font-size='8'%3E01%3C/text%3E%3Ctext x='5' y='35' font-family='monospace' font-size='8'%3E10%3C/text%3E%3Ctext x='25' y='15' font-family='monospace' font-size='8'%3E11%3C/text%3E%3Ctext x='25' y='35' font-family='monospace' font-size='8'%3E00%3C/text%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Tech,
    },
    BackgroundPreset {
        id: "triangles",
        name: "Triangles",
        url: "data:image/svg+xml,%3Csvg width='60' height='60' viewBox='0 0 60 60' xmlns='http://www.w3.org/2000/svg'%3E%3Cg fill='none' fill-rule='evenodd'%3E%3Cg fill='%23ffffff' fill-opacity='0.07'%3E%3Cpolygon points='30 0 60 52 0 52'/%3E%3C/g%3E%3C/g%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Abstract,
    },
    BackgroundPreset {
        id: "noise",
        name: "Noise",
        url: "data:image/svg+xml,%3Csvg width='200' height='200' viewBox='0 0 200 200' xmlns='http://www.w3.org/2000/svg'%3E%3Cfilter id='noiseFilter'%3E%3CfeTurbulence type='fractalNoise' baseFrequency='0.85' numOctaves='4' stitchTiles='stitch'/%3E%3C/filter%3E%3Crect width='100%25' height='100%25' filter='url(%23noiseFilter)' opacity='0.05'/%3E%3C/svg%3E",
        kind: PresetKind::Pattern,
        category: PresetCategory::Abstract,
    },
];

pub fn preset_by_id(id: &str) -> Option<&'static BackgroundPreset> {
    BACKGROUND_PRESETS.iter().find(|p| p.id == id)
}

pub fn presets_by_category(category: PresetCategory) -> Vec<&'static BackgroundPreset> {
    BACKGROUND_PRESETS
        .iter()
        .filter(|p| p.category == category)
        .collect()
}

/// The overlay layer carrying a background image during export.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub url: String,
    pub size: ImageSize,
    pub position: String,
    pub opacity: f32,
}

/// Concrete background style for a panel, resolved from settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBackground {
    Solid { color: String },
    Gradient { css: String },
    /// Solid fallback on the panel itself plus a separate image layer.
    /// Opacity is applied only to the layer, never to the panel.
    Image { fallback_color: String, layer: ImageLayer },
}

/// Map the current background settings to a concrete panel style.
///
/// An image kind with no image set degrades to the solid color, matching
/// the on-screen behavior before an upload completes.
pub fn resolve_background(bg: &BackgroundSettings) -> ResolvedBackground {
    match bg.kind {
        BackgroundKind::Gradient => ResolvedBackground::Gradient {
            css: build_gradient_css(
                &bg.gradient_preset_id,
                bg.gradient_angle_deg,
                &bg.custom_gradient_css,
            ),
        },
        BackgroundKind::Image if !bg.image_data_url.is_empty() => ResolvedBackground::Image {
            fallback_color: bg.solid_color.clone(),
            layer: ImageLayer {
                url: bg.image_data_url.clone(),
                size: bg.image_size,
                position: bg.image_position.clone(),
                opacity: bg.image_opacity,
            },
        },
        _ => ResolvedBackground::Solid {
            color: bg.solid_color.clone(),
        },
    }
}
