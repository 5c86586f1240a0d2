//! Preview tree construction.
//!
//! Builds the [`StyleNode`] tree for a code screenshot from the current
//! settings: panel background, window-frame chrome (traffic-light controls
//! and title bar), the code area with optional line-number gutter, and the
//! display-title / watermark overlays. The comparison builder composes two
//! such frames side by side or stacked.
//!
//! Computed colors are recorded the way the ambient design system
//! serializes them, which for the panel surfaces means `oklch(...)` forms
//! and `transparent` line backgrounds; the export pipeline's normalization
//! pass rewrites those before capture.

use crate::background::{resolve_background, ResolvedBackground};
use crate::dom::{Rect, StyleNode};
use crate::rendering::layout::{estimate_editor_height, estimate_width, CHAR_WIDTH_PX, LINE_HEIGHT_PX};
use crate::settings::{
    BackgroundSettings, ComparisonLayout, ComparisonSettings, DisplaySettings, FrameKind,
};
use crate::ExportConfig;

const TITLE_BAR_HEIGHT: u32 = 40;
const CODE_PADDING: u32 = 16;
const DISPLAY_TITLE_HEIGHT: u32 = 36;
const PANEL_RADIUS: u32 = 8;
const COMPARISON_GAP: u32 = 24;

/// Dark-theme chrome palette for a frame kind.
struct FramePalette {
    background: &'static str,
    titlebar: &'static str,
    text: &'static str,
}

const CONTROL_COLORS: [&str; 3] = ["#ff5f56", "#ffbd2e", "#27c93f"];

fn frame_palette(kind: FrameKind) -> FramePalette {
    match kind {
        FrameKind::Vscode => FramePalette { background: "#1e1e1e", titlebar: "#333333", text: "#cccccc" },
        FrameKind::Jetbrains => FramePalette { background: "#2b2b2b", titlebar: "#3c3f41", text: "#cccccc" },
        FrameKind::Sublime => FramePalette { background: "#272822", titlebar: "#333333", text: "#cccccc" },
        FrameKind::Atom => FramePalette { background: "#282c34", titlebar: "#21252b", text: "#abb2bf" },
        FrameKind::Terminal => FramePalette { background: "#000000", titlebar: "#333333", text: "#f8f8f2" },
        FrameKind::Browser => FramePalette { background: "#1e1e1e", titlebar: "#333333", text: "#cccccc" },
    }
}

/// Title-bar text for a frame. Browser chrome shows the title as a URL.
fn frame_title(kind: FrameKind, title: &str) -> String {
    let title = if title.is_empty() { "code.tsx" } else { title };
    match kind {
        FrameKind::Browser if !title.starts_with("http") => format!("https://{}", title),
        _ => title.to_string(),
    }
}

/// Apply a resolved background to a panel node's on-screen style.
fn apply_background(panel: &mut StyleNode, resolved: &ResolvedBackground) {
    match resolved {
        ResolvedBackground::Solid { color } => {
            panel.style.background_color = Some(color.clone());
            panel.computed_background = color.clone();
        }
        ResolvedBackground::Gradient { css } => {
            panel.style.background_image = Some(css.clone());
            panel.style.background_color = Some("transparent".to_string());
            panel.computed_background = "transparent".to_string();
        }
        ResolvedBackground::Image { fallback_color, .. } => {
            // On screen the image is painted by the live view; the panel
            // carries only the fallback color. The export pipeline inserts
            // the dedicated overlay layer on the clone.
            panel.style.background_color = Some(fallback_color.clone());
            panel.computed_background = fallback_color.clone();
        }
    }
}

/// Build the single-panel preview tree for the current settings.
pub fn build_preview(
    display: &DisplaySettings,
    background: &BackgroundSettings,
    config: &ExportConfig,
) -> StyleNode {
    let width = estimate_width(&display.code, config.min_width, config.max_width, config.padding);
    let frame_width = width.saturating_sub(config.padding * 2);
    let line_count = display.code.lines().count().max(1) as u32;
    let editor_height = estimate_editor_height(line_count, config.max_height, config.padding);
    let title_offset = if display.display_title.is_empty() { 0 } else { DISPLAY_TITLE_HEIGHT };
    let height = config.padding * 2 + title_offset + TITLE_BAR_HEIGHT + editor_height;

    let mut panel = StyleNode::new("div");
    panel.rect = Rect::new(0, 0, width, height);
    panel.style.border_radius = Some(PANEL_RADIUS);
    apply_background(&mut panel, &resolve_background(background));

    if !display.display_title.is_empty() {
        let mut title = StyleNode::new("h2");
        title.text = Some(display.display_title.clone());
        title.scale = 2;
        title.computed_background = "transparent".to_string();
        title.computed_color = "oklch(0.985 0.002 247.839)".to_string();
        let text_width = display.display_title.chars().count() as u32 * CHAR_WIDTH_PX * 2;
        let x = (width.saturating_sub(text_width) / 2) as i32;
        title.rect = Rect::new(x, config.padding as i32, text_width.min(width), DISPLAY_TITLE_HEIGHT);
        panel.children.push(title);
    }

    let frame = build_frame(
        &display.code,
        &display.title,
        display,
        config.padding as i32,
        (config.padding + title_offset) as i32,
        frame_width,
        editor_height,
    );
    panel.children.push(frame);

    if !display.watermark_text.is_empty() {
        panel.children.push(build_watermark(display, width, height));
    }

    panel
}

/// Build the two-panel comparison preview.
///
/// Row layout places the panels side by side with a gap; column stacks
/// them. Display title and watermark come from the shared settings, as in
/// the single view.
pub fn build_comparison(
    comparison: &ComparisonSettings,
    display: &DisplaySettings,
    background: &BackgroundSettings,
    config: &ExportConfig,
) -> StyleNode {
    // Each side is sized independently from its own longest line, with a
    // narrower floor than the single view so a row fits side by side.
    let side_min = config.min_width / 2;
    let left_w = estimate_width(&comparison.left.code, side_min, config.max_width, config.padding);
    let right_w = estimate_width(&comparison.right.code, side_min, config.max_width, config.padding);

    let left_lines = comparison.left.code.lines().count().max(1) as u32;
    let right_lines = comparison.right.code.lines().count().max(1) as u32;
    let left_h = TITLE_BAR_HEIGHT + estimate_editor_height(left_lines, config.max_height, config.padding);
    let right_h = TITLE_BAR_HEIGHT + estimate_editor_height(right_lines, config.max_height, config.padding);

    let title_offset = if display.display_title.is_empty() { 0 } else { DISPLAY_TITLE_HEIGHT };
    let (width, height) = match comparison.layout {
        ComparisonLayout::Row => (
            config.padding * 2 + left_w + COMPARISON_GAP + right_w,
            config.padding * 2 + title_offset + left_h.max(right_h),
        ),
        ComparisonLayout::Column => (
            config.padding * 2 + left_w.max(right_w),
            config.padding * 2 + title_offset + left_h + COMPARISON_GAP + right_h,
        ),
    };

    let mut panel = StyleNode::new("div");
    panel.rect = Rect::new(0, 0, width, height);
    panel.style.border_radius = Some(PANEL_RADIUS);
    apply_background(&mut panel, &resolve_background(background));

    if !display.display_title.is_empty() {
        let mut title = StyleNode::new("h2");
        title.text = Some(display.display_title.clone());
        title.scale = 2;
        title.computed_background = "transparent".to_string();
        title.computed_color = "oklch(0.985 0.002 247.839)".to_string();
        let text_width = display.display_title.chars().count() as u32 * CHAR_WIDTH_PX * 2;
        let x = (width.saturating_sub(text_width) / 2) as i32;
        title.rect = Rect::new(x, config.padding as i32, text_width.min(width), DISPLAY_TITLE_HEIGHT);
        panel.children.push(title);
    }

    let top = (config.padding + title_offset) as i32;
    let left_frame = build_frame(
        &comparison.left.code,
        &comparison.left.title,
        display,
        config.padding as i32,
        top,
        left_w,
        left_h - TITLE_BAR_HEIGHT,
    );
    let right_frame = match comparison.layout {
        ComparisonLayout::Row => build_frame(
            &comparison.right.code,
            &comparison.right.title,
            display,
            (config.padding + left_w + COMPARISON_GAP) as i32,
            top,
            right_w,
            right_h - TITLE_BAR_HEIGHT,
        ),
        ComparisonLayout::Column => build_frame(
            &comparison.right.code,
            &comparison.right.title,
            display,
            config.padding as i32,
            top + (left_h + COMPARISON_GAP) as i32,
            right_w,
            right_h - TITLE_BAR_HEIGHT,
        ),
    };
    panel.children.push(left_frame);
    panel.children.push(right_frame);

    if !display.watermark_text.is_empty() {
        panel.children.push(build_watermark(display, width, height));
    }

    panel
}

/// One editor frame: title bar with window controls, then the code area.
fn build_frame(
    code: &str,
    title: &str,
    display: &DisplaySettings,
    x: i32,
    y: i32,
    width: u32,
    editor_height: u32,
) -> StyleNode {
    let palette = frame_palette(display.frame);

    let mut frame = StyleNode::new("div");
    frame.rect = Rect::new(x, y, width, TITLE_BAR_HEIGHT + editor_height);
    frame.computed_background = palette.background.to_string();
    frame.style.border_radius = Some(PANEL_RADIUS);

    // Title bar with the three window controls.
    let mut bar = StyleNode::new("div");
    bar.rect = Rect::new(x, y, width, TITLE_BAR_HEIGHT);
    bar.computed_background = palette.titlebar.to_string();
    for (i, color) in CONTROL_COLORS.iter().enumerate() {
        let mut dot = StyleNode::new("span");
        dot.rect = Rect::new(x + 16 + (i as i32) * 20, y + 14, 12, 12);
        dot.computed_background = color.to_string();
        bar.children.push(dot);
    }
    let bar_title = frame_title(display.frame, title);
    let mut title_node = StyleNode::new("span");
    title_node.text = Some(bar_title.clone());
    title_node.computed_background = "transparent".to_string();
    title_node.computed_color = palette.text.to_string();
    let title_width = bar_title.chars().count() as u32 * CHAR_WIDTH_PX;
    title_node.rect = Rect::new(
        x + (width.saturating_sub(title_width) / 2) as i32,
        y + ((TITLE_BAR_HEIGHT - LINE_HEIGHT_PX) / 2) as i32,
        title_width.min(width),
        LINE_HEIGHT_PX,
    );
    bar.children.push(title_node);
    frame.children.push(bar);

    // Code area below the bar.
    let mut area = StyleNode::new("pre");
    area.rect = Rect::new(x, y + TITLE_BAR_HEIGHT as i32, width, editor_height);
    area.computed_background = palette.background.to_string();

    let lines: Vec<&str> = code.split('\n').collect();
    let gutter_width = if display.show_line_numbers {
        let digits = lines.len().to_string().len() as u32;
        digits * CHAR_WIDTH_PX + CODE_PADDING
    } else {
        0
    };
    let code_x = x + (CODE_PADDING + gutter_width) as i32;
    let mut line_y = y + (TITLE_BAR_HEIGHT + CODE_PADDING / 2) as i32;
    let area_bottom = area.rect.y + area.rect.height as i32;

    for (i, line) in lines.iter().enumerate() {
        // The estimator already bounded the area; clip what does not fit.
        if line_y + LINE_HEIGHT_PX as i32 > area_bottom {
            break;
        }
        if display.show_line_numbers {
            let mut number = StyleNode::new("span");
            number.text = Some(format!("{}", i + 1));
            number.computed_background = "transparent".to_string();
            number.computed_color = "oklch(0.707 0.022 261.325)".to_string();
            number.rect = Rect::new(
                x + CODE_PADDING as i32,
                line_y,
                gutter_width.saturating_sub(CODE_PADDING),
                LINE_HEIGHT_PX,
            );
            area.children.push(number);
        }
        if !line.is_empty() {
            let mut text = StyleNode::new("span");
            text.text = Some((*line).to_string());
            text.computed_background = "transparent".to_string();
            text.computed_color = palette.text.to_string();
            let text_width = line.chars().count() as u32 * CHAR_WIDTH_PX;
            text.rect = Rect::new(code_x, line_y, text_width, LINE_HEIGHT_PX);
            area.children.push(text);
        }
        line_y += LINE_HEIGHT_PX as i32;
    }
    frame.children.push(area);
    frame
}

fn build_watermark(display: &DisplaySettings, panel_width: u32, panel_height: u32) -> StyleNode {
    let mut mark = StyleNode::new("span");
    mark.text = Some(display.watermark_text.clone());
    mark.computed_background = "transparent".to_string();
    mark.computed_color = "#ffffff".to_string();
    mark.style.opacity = Some(display.watermark_opacity);
    let text_width = display.watermark_text.chars().count() as u32 * CHAR_WIDTH_PX;
    mark.rect = Rect::new(
        panel_width.saturating_sub(text_width + CODE_PADDING) as i32,
        panel_height.saturating_sub(LINE_HEIGHT_PX + 6) as i32,
        text_width,
        LINE_HEIGHT_PX,
    );
    mark
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;

    fn config() -> ExportConfig {
        ExportConfig::default()
    }

    #[test]
    fn preview_width_tracks_the_longest_line() {
        let store = SettingsStore::new();
        let node = build_preview(store.display(), store.background(), &config());
        let expected = estimate_width(&store.display().code, 600, 1000, 40);
        assert_eq!(node.rect.width, expected);
    }

    #[test]
    fn line_numbers_add_a_gutter_node_per_line() {
        let mut store = SettingsStore::new();
        store.set_code("one\ntwo\nthree");
        let node = build_preview(store.display(), store.background(), &config());
        let frame = &node.children[0];
        let area = frame.children.last().unwrap();
        let gutters: Vec<_> = area
            .children
            .iter()
            .filter(|n| n.computed_color.contains("oklch"))
            .collect();
        assert_eq!(gutters.len(), 3);
        assert_eq!(gutters[0].text.as_deref(), Some("1"));

        store.set_show_line_numbers(false);
        let node = build_preview(store.display(), store.background(), &config());
        let area = node.children[0].children.last().unwrap().clone();
        assert!(area.children.iter().all(|n| !n.computed_color.contains("oklch")));
    }

    #[test]
    fn watermark_carries_the_configured_opacity() {
        let mut store = SettingsStore::new();
        store.set_watermark("@codeshot");
        store.set_watermark_opacity(0.3);
        let node = build_preview(store.display(), store.background(), &config());
        let mark = node.children.last().unwrap();
        assert_eq!(mark.text.as_deref(), Some("@codeshot"));
        assert_eq!(mark.style.opacity, Some(0.3));
    }

    #[test]
    fn display_title_offsets_the_frame() {
        let mut store = SettingsStore::new();
        let without = build_preview(store.display(), store.background(), &config());
        store.set_display_title("Before & After");
        let with = build_preview(store.display(), store.background(), &config());
        assert_eq!(with.rect.height, without.rect.height + DISPLAY_TITLE_HEIGHT);
        assert_eq!(with.children[0].scale, 2);
    }

    #[test]
    fn width_budget_smaller_than_the_padding_does_not_panic() {
        let mut store = SettingsStore::new();
        store.set_code("");
        let config = ExportConfig {
            min_width: 0,
            max_width: 50,
            padding: 40,
            ..Default::default()
        };
        let node = build_preview(store.display(), store.background(), &config);
        assert_eq!(node.rect.width, 50);
        // The frame collapses rather than wrapping around.
        assert_eq!(node.children[0].rect.width, 0);
    }

    #[test]
    fn row_comparison_places_panels_side_by_side() {
        let store = SettingsStore::new();
        let node = build_comparison(
            store.comparison(),
            store.display(),
            store.background(),
            &config(),
        );
        let frames: Vec<_> = node.children.iter().filter(|c| c.tag == "div").collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].rect.y, frames[1].rect.y);
        assert!(frames[1].rect.x > frames[0].rect.x + frames[0].rect.width as i32);
    }

    #[test]
    fn column_comparison_stacks_panels() {
        let mut store = SettingsStore::new();
        store.set_comparison_layout(ComparisonLayout::Column);
        let node = build_comparison(
            store.comparison(),
            store.display(),
            store.background(),
            &config(),
        );
        let frames: Vec<_> = node.children.iter().filter(|c| c.tag == "div").collect();
        assert_eq!(frames[0].rect.x, frames[1].rect.x);
        assert!(frames[1].rect.y > frames[0].rect.y + frames[0].rect.height as i32);
    }

    #[test]
    fn browser_frame_shows_the_title_as_a_url() {
        let mut store = SettingsStore::new();
        store.set_frame(FrameKind::Browser);
        store.set_title("example.com");
        let node = build_preview(store.display(), store.background(), &config());
        let bar = &node.children[0].children[0];
        assert_eq!(
            bar.children.last().unwrap().text.as_deref(),
            Some("https://example.com")
        );

        // Titles that are already URLs pass through untouched.
        store.set_title("http://localhost:3000");
        let node = build_preview(store.display(), store.background(), &config());
        let bar = &node.children[0].children[0];
        assert_eq!(
            bar.children.last().unwrap().text.as_deref(),
            Some("http://localhost:3000")
        );
    }

    #[test]
    fn frame_titles_fall_back_to_the_default() {
        let store = SettingsStore::new();
        let node = build_preview(store.display(), store.background(), &config());
        let bar = &node.children[0].children[0];
        let title = bar.children.last().unwrap();
        assert_eq!(title.text.as_deref(), Some("code.tsx"));
    }
}
