//! Width and height estimation for the preview canvas.
//!
//! No font metrics are consulted: a fixed per-character pixel constant
//! approximates monospace width, trading accuracy for a bounded,
//! deterministic canvas size.

/// Approximate advance of one monospace character at the preview font size.
pub const CHAR_WIDTH_PX: u32 = 9;

/// Line height of the code area.
pub const LINE_HEIGHT_PX: u32 = 18;

/// Estimate the preview width in pixels from the longest code line.
///
/// `clamp(longest_line_chars * CHAR_WIDTH_PX + 2 * padding, min, max)`.
/// Total and deterministic; empty code floors to `min_width`, and lines
/// past the cap are clipped by `max_width` rather than widening the canvas.
pub fn estimate_width(code: &str, min_width: u32, max_width: u32, padding: u32) -> u32 {
    let longest_line = code.split('\n').map(|line| line.chars().count()).max().unwrap_or(0) as u32;
    (longest_line * CHAR_WIDTH_PX + padding * 2).clamp(min_width, max_width)
}

/// Estimate the code-area height from the line count.
///
/// Ideal height is `lines * LINE_HEIGHT_PX + 20`, bounded below by 80px and
/// above by the panel budget (`max_height` less padding and chrome).
pub fn estimate_editor_height(line_count: u32, max_height: u32, padding: u32) -> u32 {
    let min = 80u32;
    let max = max_height.saturating_sub(padding * 2).saturating_sub(60);
    let ideal = line_count * LINE_HEIGHT_PX + 20;
    ideal.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_floors_to_min_width() {
        assert_eq!(estimate_width("a", 600, 1000, 40), 600);
    }

    #[test]
    fn long_line_caps_to_max_width() {
        let code = "a".repeat(200);
        assert_eq!(estimate_width(&code, 600, 1000, 40), 1000);
    }

    #[test]
    fn empty_code_yields_min_width() {
        assert_eq!(estimate_width("", 600, 1000, 40), 600);
    }

    #[test]
    fn width_is_monotone_until_the_cap() {
        let mut prev = 0;
        for n in 0..200 {
            let code = "x".repeat(n);
            let w = estimate_width(&code, 600, 1000, 40);
            assert!(w >= prev, "width regressed at {} chars", n);
            assert!((600..=1000).contains(&w));
            prev = w;
        }
        assert_eq!(prev, 1000);
    }

    #[test]
    fn width_uses_the_longest_line_only() {
        // 70 chars * 9 + 80 = 710
        let code = format!("short\n{}\nalso short", "y".repeat(70));
        assert_eq!(estimate_width(&code, 600, 1000, 40), 710);
    }

    #[test]
    fn editor_height_respects_floor_and_budget() {
        assert_eq!(estimate_editor_height(1, 900, 40), 80);
        // 10 lines: ideal 200
        assert_eq!(estimate_editor_height(10, 900, 40), 200);
        // Large count hits the budget: 900 - 80 - 60 = 760
        assert_eq!(estimate_editor_height(100, 900, 40), 760);
    }
}
