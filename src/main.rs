use std::path::PathBuf;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as Base64Engine;
use clap::Parser;

use codeshot::background::{preset_by_id, presets_by_category, PresetCategory};
use codeshot::{
    build_comparison, build_preview, BackgroundKind, ComparisonLayout, ExportConfig,
    ExportPipeline, FrameKind, ImageSize, Language, SettingsStore,
};

/// Render a source snippet to a styled PNG screenshot.
#[derive(Parser, Debug)]
#[command(name = "codeshot", version, about)]
struct Args {
    /// Code file to render (stdin if omitted and piped)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Language tag for the snippet
    #[arg(short, long, default_value = "javascript")]
    language: String,

    /// Output PNG path (defaults to the generated code-<epoch>.png name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frame title shown in the window chrome
    #[arg(long)]
    title: Option<String>,

    /// Heading rendered above the frame
    #[arg(long)]
    display_title: Option<String>,

    /// Watermark text overlaid bottom-right
    #[arg(long)]
    watermark: Option<String>,

    /// Watermark opacity in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    watermark_opacity: f32,

    /// Disable the line-number gutter
    #[arg(long)]
    no_line_numbers: bool,

    /// Window chrome: vscode, jetbrains, sublime, atom, terminal, browser
    #[arg(long, default_value = "vscode")]
    frame: String,

    /// Background kind: solid, gradient, image
    #[arg(long, default_value = "solid")]
    background: String,

    /// Solid background color (hex)
    #[arg(long, default_value = "#374151")]
    color: String,

    /// Gradient preset id (see the built-in catalog)
    #[arg(long, default_value = "ocean")]
    gradient: String,

    /// Gradient angle in degrees
    #[arg(long, default_value_t = 45)]
    angle: u16,

    /// Raw CSS gradient, overriding the preset entirely
    #[arg(long)]
    custom_gradient: Option<String>,

    /// Background pattern preset id (implies --background image)
    #[arg(long)]
    pattern: Option<String>,

    /// List the background pattern presets and exit
    #[arg(long)]
    list_patterns: bool,

    /// PNG file used as the background image layer
    #[arg(long)]
    image: Option<PathBuf>,

    /// Background image opacity in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    image_opacity: f32,

    /// Background image sizing: cover, contain, auto
    #[arg(long, default_value = "cover")]
    image_size: String,

    /// Second code file; renders a two-panel comparison
    #[arg(long)]
    compare: Option<PathBuf>,

    /// Comparison arrangement: row or column
    #[arg(long, default_value = "row")]
    compare_layout: String,

    /// Title for the left comparison panel
    #[arg(long)]
    left_title: Option<String>,

    /// Title for the right comparison panel
    #[arg(long)]
    right_title: Option<String>,

    /// Capture scale multiplier
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Settle delay before capture, in milliseconds
    #[arg(long, default_value_t = 50)]
    settle_ms: u64,
}

fn parse_frame(s: &str) -> anyhow::Result<FrameKind> {
    Ok(match s {
        "vscode" => FrameKind::Vscode,
        "jetbrains" => FrameKind::Jetbrains,
        "sublime" => FrameKind::Sublime,
        "atom" => FrameKind::Atom,
        "terminal" => FrameKind::Terminal,
        "browser" => FrameKind::Browser,
        other => anyhow::bail!("unknown frame kind: {}", other),
    })
}

fn parse_background(s: &str) -> anyhow::Result<BackgroundKind> {
    Ok(match s {
        "solid" => BackgroundKind::Solid,
        "gradient" => BackgroundKind::Gradient,
        "image" => BackgroundKind::Image,
        other => anyhow::bail!("unknown background kind: {}", other),
    })
}

fn parse_image_size(s: &str) -> anyhow::Result<ImageSize> {
    Ok(match s {
        "cover" => ImageSize::Cover,
        "contain" => ImageSize::Contain,
        "auto" => ImageSize::Auto,
        other => anyhow::bail!("unknown image size: {}", other),
    })
}

fn read_code(path: Option<&PathBuf>) -> anyhow::Result<Option<String>> {
    match path {
        Some(p) => {
            let code = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read {}", p.display()))?;
            Ok(Some(code))
        }
        None => {
            use std::io::IsTerminal;
            use std::io::Read;
            if std::io::stdin().is_terminal() {
                return Ok(None);
            }
            let mut code = String::new();
            std::io::stdin().read_to_string(&mut code)?;
            Ok(Some(code))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_patterns {
        for category in [
            PresetCategory::Geometric,
            PresetCategory::Organic,
            PresetCategory::Tech,
            PresetCategory::Abstract,
        ] {
            println!("{:?}:", category);
            for preset in presets_by_category(category) {
                println!("  {:<16} {}", preset.id, preset.name);
            }
        }
        return Ok(());
    }

    let mut store = SettingsStore::new();
    if let Some(code) = read_code(args.input.as_ref())? {
        store.set_code(code);
    }
    store.set_language(args.language.parse::<Language>()?);
    store.set_frame(parse_frame(&args.frame)?);
    store.set_show_line_numbers(!args.no_line_numbers);
    if let Some(title) = args.title.clone() {
        store.set_title(title);
    }
    if let Some(display_title) = args.display_title {
        store.set_display_title(display_title);
    }
    if let Some(watermark) = args.watermark {
        store.set_watermark(watermark);
        store.set_watermark_opacity(args.watermark_opacity);
    }

    store.set_background_kind(parse_background(&args.background)?);
    store.set_solid_color(args.color);
    store.set_gradient_preset(args.gradient);
    store.set_gradient_angle(args.angle);
    if let Some(css) = args.custom_gradient {
        store.set_custom_gradient(css);
    }
    if let Some(pattern_id) = &args.pattern {
        let preset = preset_by_id(pattern_id)
            .ok_or_else(|| anyhow::anyhow!("unknown background pattern: {}", pattern_id))?;
        store.set_background_kind(BackgroundKind::Image);
        store.set_image_data_url(preset.url);
        store.set_image_opacity(args.image_opacity);
    }
    if let Some(image_path) = &args.image {
        let bytes = std::fs::read(image_path)
            .with_context(|| format!("failed to read {}", image_path.display()))?;
        store.set_image_data_url(format!("data:image/png;base64,{}", BASE64.encode(bytes)));
        store.set_image_opacity(args.image_opacity);
        store.set_image_size(parse_image_size(&args.image_size)?);
    }

    let config = ExportConfig {
        scale: args.scale,
        settle_delay_ms: args.settle_ms,
        ..Default::default()
    };

    let preview = if let Some(compare_path) = &args.compare {
        let right_code = std::fs::read_to_string(compare_path)
            .with_context(|| format!("failed to read {}", compare_path.display()))?;
        store.set_comparison_layout(match args.compare_layout.as_str() {
            "row" => ComparisonLayout::Row,
            "column" => ComparisonLayout::Column,
            other => anyhow::bail!("unknown comparison layout: {}", other),
        });
        let left_code = store.display().code.clone();
        let language = store.display().language;

        let left = store.left_panel_mut();
        left.code = left_code;
        left.language = language;
        if let Some(title) = args.left_title {
            left.title = title;
        }
        let right = store.right_panel_mut();
        right.code = right_code;
        right.language = language;
        if let Some(title) = args.right_title {
            right.title = title;
        }

        build_comparison(store.comparison(), store.display(), store.background(), &config)
    } else {
        build_preview(store.display(), store.background(), &config)
    };

    let exporter = ExportPipeline::new(config);
    let artifact = match exporter.export_to_png(&preview, store.background()).await {
        Ok(artifact) => artifact,
        Err(e) => {
            // The original logged capture failures and produced no file;
            // the CLI keeps them observable via exit status.
            log::error!("Error generating image: {}", e);
            std::process::exit(1);
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&artifact.filename));
    std::fs::write(&output, &artifact.png_data)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!(
        "Wrote {} ({}x{}, {} bytes)",
        output.display(),
        artifact.width,
        artifact.height,
        artifact.png_data.len()
    );
    println!("{}", output.display());
    Ok(())
}
