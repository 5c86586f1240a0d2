//! Cosmetic settings that drive the preview renderer and the export pipeline.
//!
//! All settings live in plain value records held by a [`SettingsStore`]. The
//! store is an explicit, injectable object: renderers and exporters receive a
//! reference to it (or to the records it holds) rather than reaching for an
//! ambient singleton, which keeps the pure helpers independently testable.
//! Nothing here persists beyond the process; defaults are applied at
//! construction and last write wins.

use serde::{Deserialize, Serialize};

/// Languages the preview can tag a snippet with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Html,
    Go,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Html => "html",
            Language::Go => "go",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::Javascript),
            "html" => Ok(Language::Html),
            "go" => Ok(Language::Go),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown language: {}",
                other
            ))),
        }
    }
}

/// Window-frame chrome variants for the preview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    #[default]
    Vscode,
    Jetbrains,
    Sublime,
    Atom,
    Terminal,
    Browser,
}

/// Content and chrome settings for a single preview panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub code: String,
    pub language: Language,
    pub show_line_numbers: bool,
    pub title: String,
    pub display_title: String,
    pub watermark_text: String,
    /// Opacity of the watermark overlay, in `[0, 1]`.
    pub watermark_opacity: f32,
    pub frame: FrameKind,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            code: concat!(
                "// JavaScript Example\n",
                "function greet(name) {\n",
                "  return `Hello, ${name}!`;\n",
                "}\n",
                "console.log(greet('World'));"
            )
            .to_string(),
            language: Language::Javascript,
            show_line_numbers: true,
            title: String::new(),
            display_title: String::new(),
            watermark_text: String::new(),
            watermark_opacity: 0.5,
            frame: FrameKind::Vscode,
        }
    }
}

/// How the preview background is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Solid,
    Gradient,
    Image,
}

/// Sizing mode for background images, mirroring CSS `background-size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    #[default]
    Cover,
    Contain,
    Auto,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Cover => "cover",
            ImageSize::Contain => "contain",
            ImageSize::Auto => "auto",
        }
    }
}

/// Background settings shared by the single and comparison previews.
///
/// Invariant: a non-empty `custom_gradient_css` overrides
/// `gradient_preset_id` and `gradient_angle_deg` entirely (the gradient
/// builder short-circuits on it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundSettings {
    pub kind: BackgroundKind,
    pub solid_color: String,
    pub gradient_preset_id: String,
    /// Gradient angle in degrees, `[0, 360]`.
    pub gradient_angle_deg: u16,
    /// Raw CSS gradient string; empty means "use the preset".
    pub custom_gradient_css: String,
    /// Background image as a data URL; empty means "no image".
    pub image_data_url: String,
    /// Opacity of the background image layer, in `[0, 1]`.
    pub image_opacity: f32,
    pub image_size: ImageSize,
    pub image_position: String,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Solid,
            solid_color: "#374151".to_string(),
            gradient_preset_id: "ocean".to_string(),
            gradient_angle_deg: 45,
            custom_gradient_css: String::new(),
            image_data_url: String::new(),
            image_opacity: 1.0,
            image_size: ImageSize::Cover,
            image_position: "center".to_string(),
        }
    }
}

/// Row/column arrangement of the two comparison panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonLayout {
    #[default]
    Row,
    Column,
}

/// Per-side content for the comparison view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    pub code: String,
    pub title: String,
    pub language: Language,
}

/// The comparison view duplicates code/title/language per side and shares a
/// single display/background pair with the main view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSettings {
    pub left: PanelSettings,
    pub right: PanelSettings,
    pub layout: ComparisonLayout,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            left: PanelSettings {
                code: concat!(
                    "// Erlang\n",
                    "-module(hello_module).\n",
                    "-export([some_fun/0, some_fun/1]).\n",
                    "\n",
                    "% A \"Hello world\" function\n",
                    "some_fun() ->\n",
                    "    io:format(\"~s~n\", [\"Hello world!\"]).\n",
                    "\n",
                    "% Non-exported functions are private\n",
                    "priv() ->\n",
                    "    secret_info."
                )
                .to_string(),
                title: "Erlang".to_string(),
                language: Language::Javascript,
            },
            right: PanelSettings {
                code: concat!(
                    "# Elixir\n",
                    "defmodule Hello do\n",
                    "  # A \"Hello world\" function\n",
                    "  def some_fun do\n",
                    "    IO.puts \"Hello world!\"\n",
                    "  end\n",
                    "\n",
                    "  # A private function\n",
                    "  defp priv do\n",
                    "    :secret_info\n",
                    "  end\n",
                    "end"
                )
                .to_string(),
                title: "Elixir".to_string(),
                language: Language::Javascript,
            },
            layout: ComparisonLayout::Row,
        }
    }
}

/// Holder for the current settings records.
///
/// Setters mirror the form controls of the UI this engine serves: sliders
/// clamp opacity into `[0, 1]`, everything else is taken as-is with no
/// validation. Direct construction of the records bypasses the clamps, which
/// matches the behavior callers of the original relied on.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    display: DisplaySettings,
    background: BackgroundSettings,
    comparison: ComparisonSettings,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn background(&self) -> &BackgroundSettings {
        &self.background
    }

    pub fn comparison(&self) -> &ComparisonSettings {
        &self.comparison
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.display.code = code.into();
    }

    pub fn set_language(&mut self, language: Language) {
        self.display.language = language;
    }

    pub fn set_show_line_numbers(&mut self, show: bool) {
        self.display.show_line_numbers = show;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.display.title = title.into();
    }

    pub fn set_display_title(&mut self, title: impl Into<String>) {
        self.display.display_title = title.into();
    }

    pub fn set_watermark(&mut self, text: impl Into<String>) {
        self.display.watermark_text = text.into();
    }

    pub fn set_watermark_opacity(&mut self, opacity: f32) {
        self.display.watermark_opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_frame(&mut self, frame: FrameKind) {
        self.display.frame = frame;
    }

    pub fn set_background_kind(&mut self, kind: BackgroundKind) {
        self.background.kind = kind;
    }

    pub fn set_solid_color(&mut self, color: impl Into<String>) {
        self.background.solid_color = color.into();
    }

    pub fn set_gradient_preset(&mut self, id: impl Into<String>) {
        self.background.gradient_preset_id = id.into();
    }

    pub fn set_gradient_angle(&mut self, angle_deg: u16) {
        self.background.gradient_angle_deg = angle_deg.min(360);
    }

    pub fn set_custom_gradient(&mut self, css: impl Into<String>) {
        self.background.custom_gradient_css = css.into();
    }

    pub fn set_image_data_url(&mut self, url: impl Into<String>) {
        self.background.image_data_url = url.into();
    }

    pub fn set_image_opacity(&mut self, opacity: f32) {
        self.background.image_opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_image_size(&mut self, size: ImageSize) {
        self.background.image_size = size;
    }

    pub fn set_image_position(&mut self, position: impl Into<String>) {
        self.background.image_position = position.into();
    }

    pub fn set_comparison_layout(&mut self, layout: ComparisonLayout) {
        self.comparison.layout = layout;
    }

    pub fn left_panel_mut(&mut self) -> &mut PanelSettings {
        &mut self.comparison.left
    }

    pub fn right_panel_mut(&mut self) -> &mut PanelSettings {
        &mut self.comparison.right
    }
}
