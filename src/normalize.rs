//! Rasterizer-safe color normalization.
//!
//! The ambient design system serializes its computed colors with the
//! wide-gamut `oklch(...)` function, which the rasterizer cannot interpret;
//! fully transparent backgrounds likewise capture as solid black. This pass
//! walks a detached subtree pre-order and rewrites exactly two conditions to
//! concrete hex fallbacks:
//!
//! - background serializes with `oklch` OR equals `transparent` → `#111827`
//! - text color serializes with `oklch` → `#f9fafb`
//!
//! This is a heuristic patch, not a color-space converter: other color
//! forms pass through untouched by design, and the two conditions are kept
//! as-is for compatibility with captures produced by earlier versions.

use crate::dom::StyleAccess;

/// Dark fallback applied to unsupported or transparent backgrounds.
pub const FALLBACK_BACKGROUND: &str = "#111827";

/// Light fallback applied to unsupported text colors.
pub const FALLBACK_TEXT: &str = "#f9fafb";

/// Color function the rasterizer cannot interpret.
const UNSUPPORTED_COLOR_FN: &str = "oklch";

/// Rewrite unsupported computed colors in-place across a detached subtree.
///
/// Recurses into children regardless of whether the current node was
/// rewritten; after the pass, no descendant's effective background or text
/// color depends on the unsupported function.
pub fn normalize_colors<N: StyleAccess>(node: &mut N) {
    if node.background().contains(UNSUPPORTED_COLOR_FN) || node.background() == "transparent" {
        node.set_background(FALLBACK_BACKGROUND);
    }
    if node.color().contains(UNSUPPORTED_COLOR_FN) {
        node.set_color(FALLBACK_TEXT);
    }
    for child in node.children_mut() {
        normalize_colors(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::StyleNode;

    fn node(bg: &str, color: &str) -> StyleNode {
        let mut n = StyleNode::new("div");
        n.computed_background = bg.to_string();
        n.computed_color = color.to_string();
        n
    }

    #[test]
    fn transparent_backgrounds_get_the_dark_fallback() {
        let mut root = node("#1e1e1e", "#cccccc");
        root.children.push(node("transparent", "#cccccc"));
        normalize_colors(&mut root);
        assert_eq!(root.background(), "#1e1e1e");
        assert_eq!(root.children[0].background(), FALLBACK_BACKGROUND);
    }

    #[test]
    fn oklch_colors_are_rewritten_everywhere_in_the_subtree() {
        let mut root = node("oklch(0.21 0.034 264.665)", "#cccccc");
        let mut mid = node("#222222", "oklch(0.985 0.002 247.839)");
        mid.children.push(node("transparent", "oklch(0.7 0.1 50)"));
        root.children.push(mid);

        normalize_colors(&mut root);

        assert_eq!(root.background(), FALLBACK_BACKGROUND);
        assert_eq!(root.children[0].color(), FALLBACK_TEXT);
        assert_eq!(root.children[0].children[0].background(), FALLBACK_BACKGROUND);
        assert_eq!(root.children[0].children[0].color(), FALLBACK_TEXT);

        // No trigger condition remains anywhere in the subtree.
        fn assert_clean(n: &StyleNode) {
            assert!(!n.background().contains("oklch"));
            assert_ne!(n.background(), "transparent");
            assert!(!n.color().contains("oklch"));
            for c in &n.children {
                assert_clean(c);
            }
        }
        assert_clean(&root);
    }

    #[test]
    fn unrelated_colors_are_preserved_unchanged() {
        let mut root = node("#abcdef", "rgb(10, 20, 30)");
        root.children.push(node("rgba(0, 0, 0, 0.5)", "#123456"));
        normalize_colors(&mut root);
        assert_eq!(root.background(), "#abcdef");
        assert_eq!(root.color(), "rgb(10, 20, 30)");
        // rgba(...,0.5) is not the literal "transparent" keyword; only the
        // two documented conditions trigger a rewrite.
        assert_eq!(root.children[0].background(), "rgba(0, 0, 0, 0.5)");
        assert_eq!(root.children[0].color(), "#123456");
    }
}
