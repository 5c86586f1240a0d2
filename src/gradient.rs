//! Gradient preset catalog and CSS gradient string building.
//!
//! Presets are static catalog entries whose template carries an embedded
//! `135deg` angle token; [`build_gradient_css`] substitutes the requested
//! angle at render time. All functions here are pure and never fail: unknown
//! preset ids fall back to the first catalog entry, and a caller-provided
//! custom gradient string wins outright, unvalidated.

use serde::Serialize;

/// A named, predefined gradient selectable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradientPreset {
    pub id: &'static str,
    pub name: &'static str,
    /// CSS template with a degree-angle token replaced at render time.
    pub css_template: &'static str,
}

/// The static preset catalog. Loaded once, never mutated.
pub const GRADIENT_PRESETS: &[GradientPreset] = &[
    GradientPreset { id: "ocean", name: "Ocean", css_template: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)" },
    GradientPreset { id: "sunset", name: "Sunset", css_template: "linear-gradient(135deg, #ff6b6b 0%, #ffa500 100%)" },
    GradientPreset { id: "forest", name: "Forest", css_template: "linear-gradient(135deg, #134e5e 0%, #71b280 100%)" },
    GradientPreset { id: "royal", name: "Royal", css_template: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)" },
    GradientPreset { id: "cosmic", name: "Cosmic", css_template: "linear-gradient(135deg, #8360c3 0%, #2ebf91 100%)" },
    GradientPreset { id: "candy", name: "Candy", css_template: "linear-gradient(135deg, #ff9a9e 0%, #fecfef 100%)" },
    GradientPreset { id: "ember", name: "Ember", css_template: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)" },
    GradientPreset { id: "midnight", name: "Midnight", css_template: "linear-gradient(135deg, #2c3e50 0%, #34495e 100%)" },
    GradientPreset { id: "aurora", name: "Aurora", css_template: "linear-gradient(135deg, #00c6ff 0%, #0072ff 100%)" },
    GradientPreset { id: "spring", name: "Spring", css_template: "linear-gradient(135deg, #a8edea 0%, #fed6e3 100%)" },
    GradientPreset { id: "volcano", name: "Volcano", css_template: "linear-gradient(135deg, #ff4b1f 0%, #ff9068 100%)" },
    GradientPreset { id: "lavender", name: "Lavender", css_template: "linear-gradient(135deg, #e3ffe7 0%, #d9e7ff 100%)" },
    GradientPreset { id: "neon", name: "Neon", css_template: "linear-gradient(135deg, #ff00cc 0%, #333399 100%)" },
    GradientPreset { id: "citrus", name: "Citrus", css_template: "linear-gradient(135deg, #ff9a56 0%, #ff6b95 100%)" },
    GradientPreset { id: "ice", name: "Ice", css_template: "linear-gradient(135deg, #74b9ff 0%, #0984e3 100%)" },
    GradientPreset { id: "fire", name: "Fire", css_template: "linear-gradient(135deg, #fdcb6e 0%, #e84393 100%)" },
    GradientPreset { id: "mint", name: "Mint", css_template: "linear-gradient(135deg, #00b894 0%, #00cec9 100%)" },
    GradientPreset { id: "purple", name: "Purple", css_template: "linear-gradient(135deg, #a29bfe 0%, #6c5ce7 100%)" },
    GradientPreset { id: "gold", name: "Gold", css_template: "linear-gradient(135deg, #fdcb6e 0%, #f39c12 100%)" },
    GradientPreset { id: "emerald", name: "Emerald", css_template: "linear-gradient(135deg, #55a3ff 0%, #003d82 100%)" },
    GradientPreset { id: "rose", name: "Rose", css_template: "linear-gradient(135deg, #fd79a8 0%, #e84393 100%)" },
    GradientPreset { id: "steel", name: "Steel", css_template: "linear-gradient(135deg, #636e72 0%, #2d3436 100%)" },
    GradientPreset { id: "coral", name: "Coral", css_template: "linear-gradient(135deg, #fab1a0 0%, #e17055 100%)" },
    GradientPreset { id: "teal", name: "Teal", css_template: "linear-gradient(135deg, #81ecec 0%, #00b894 100%)" },
    GradientPreset { id: "crimson", name: "Crimson", css_template: "linear-gradient(135deg, #ff7675 0%, #d63031 100%)" },
    GradientPreset { id: "amber", name: "Amber", css_template: "linear-gradient(135deg, #ffeaa7 0%, #fab1a0 100%)" },
    GradientPreset { id: "navy", name: "Navy", css_template: "linear-gradient(135deg, #74b9ff 0%, #0984e3 100%)" },
    GradientPreset { id: "lime", name: "Lime", css_template: "linear-gradient(135deg, #00b894 0%, #55a3ff 100%)" },
    GradientPreset { id: "magenta", name: "Magenta", css_template: "linear-gradient(135deg, #fd79a8 0%, #a29bfe 100%)" },
    GradientPreset { id: "bronze", name: "Bronze", css_template: "linear-gradient(135deg, #e17055 0%, #636e72 100%)" },
    GradientPreset { id: "peachy", name: "Peachy", css_template: "linear-gradient(135deg, #fab1a0 0%, #ffeaa7 100%)" },
    GradientPreset { id: "aqua", name: "Aqua", css_template: "linear-gradient(135deg, #81ecec 0%, #74b9ff 100%)" },
    GradientPreset { id: "berry", name: "Berry", css_template: "linear-gradient(135deg, #e84393 0%, #6c5ce7 100%)" },
    GradientPreset { id: "copper", name: "Copper", css_template: "linear-gradient(135deg, #e17055 0%, #fdcb6e 100%)" },
    GradientPreset { id: "sage", name: "Sage", css_template: "linear-gradient(135deg, #00cec9 0%, #55a3ff 100%)" },
    GradientPreset { id: "plum", name: "Plum", css_template: "linear-gradient(135deg, #a29bfe 0%, #fd79a8 100%)" },
];

/// Look up a preset by id.
pub fn preset_by_id(id: &str) -> Option<&'static GradientPreset> {
    GRADIENT_PRESETS.iter().find(|p| p.id == id)
}

/// Build the final CSS background-image value for a gradient background.
///
/// A non-empty `custom_css` is returned unchanged (full override, no syntax
/// validation). Otherwise the preset template is resolved, falling back to
/// the first catalog entry for unknown ids, and its first degree-angle token
/// is replaced with `angle_deg`.
pub fn build_gradient_css(preset_id: &str, angle_deg: u16, custom_css: &str) -> String {
    if !custom_css.is_empty() {
        return custom_css.to_string();
    }

    let preset = preset_by_id(preset_id).unwrap_or(&GRADIENT_PRESETS[0]);
    replace_angle(preset.css_template, angle_deg)
}

/// Preview CSS for a preset id, angle untouched. Unknown ids fall back to
/// the first catalog entry.
pub fn gradient_preview(preset_id: &str) -> &'static str {
    preset_by_id(preset_id)
        .unwrap_or(&GRADIENT_PRESETS[0])
        .css_template
}

/// Replace the first `<digits>deg` token in a gradient template.
fn replace_angle(template: &str, angle_deg: u16) -> String {
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if template[i..].starts_with("deg") {
                let mut out = String::with_capacity(template.len());
                out.push_str(&template[..start]);
                out.push_str(&angle_deg.to_string());
                out.push_str(&template[i..]);
                return out;
            }
        } else {
            i += 1;
        }
    }
    template.to_string()
}

/// Extract the color tokens of a gradient string, in order of appearance.
///
/// Recognizes `#rrggbb`/`#rgb` hex colors and `rgb()`/`rgba()`/`hsl()`/
/// `hsla()` function tokens. Used by the software painter to derive gradient
/// stops for rasterization.
pub fn parse_gradient_colors(gradient: &str) -> Vec<String> {
    let mut colors = Vec::new();
    let bytes = gradient.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'#' {
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                i += 1;
            }
            let len = i - start - 1;
            if len == 3 || len == 6 {
                colors.push(gradient[start..i].to_string());
            }
        } else if bytes[i..].starts_with(b"rgb") || bytes[i..].starts_with(b"hsl") {
            let start = i;
            if let Some(close) = bytes[i..].iter().position(|&b| b == b')') {
                colors.push(gradient[start..i + close + 1].to_string());
                i += close + 1;
            } else {
                break;
            }
        } else {
            i += 1;
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_gradient_always_wins() {
        let css = build_gradient_css("ocean", 45, "linear-gradient(10deg, red, blue)");
        assert_eq!(css, "linear-gradient(10deg, red, blue)");
    }

    #[test]
    fn unknown_preset_falls_back_to_first_entry() {
        let css = build_gradient_css("nonexistent-id", 90, "");
        assert_eq!(css, replace_angle(GRADIENT_PRESETS[0].css_template, 90));
        assert!(css.starts_with("linear-gradient(90deg,"));
    }

    #[test]
    fn angle_substitution_is_deterministic() {
        let a = build_gradient_css("sunset", 270, "");
        let b = build_gradient_css("sunset", 270, "");
        assert_eq!(a, b);
        assert_eq!(a, "linear-gradient(270deg, #ff6b6b 0%, #ffa500 100%)");
    }

    #[test]
    fn replace_angle_only_touches_the_first_token() {
        let out = replace_angle("linear-gradient(135deg, red 0%, blue 100%)", 7);
        assert_eq!(out, "linear-gradient(7deg, red 0%, blue 100%)");
    }

    #[test]
    fn parse_gradient_colors_extracts_hex_stops() {
        let colors = parse_gradient_colors("linear-gradient(135deg, #667eea 0%, #764ba2 100%)");
        assert_eq!(colors, vec!["#667eea", "#764ba2"]);
    }

    #[test]
    fn parse_gradient_colors_recognizes_function_tokens() {
        let colors = parse_gradient_colors("linear-gradient(90deg, rgb(1, 2, 3), hsla(120, 50%, 50%, 0.5))");
        assert_eq!(colors, vec!["rgb(1, 2, 3)", "hsla(120, 50%, 50%, 0.5)"]);
    }

    #[test]
    fn gradient_preview_ignores_angle() {
        assert_eq!(gradient_preview("mint"), "linear-gradient(135deg, #00b894 0%, #00cec9 100%)");
        assert_eq!(gradient_preview("nope"), GRADIENT_PRESETS[0].css_template);
    }
}
