use codeshot::{
    build_preview, BackgroundKind, Error, ExportConfig, ExportPipeline, RasterOptions, Rasterizer,
    Result, Screenshot, SettingsStore, StyleNode,
};

fn default_preview(store: &SettingsStore, config: &ExportConfig) -> StyleNode {
    build_preview(store.display(), store.background(), config)
}

fn fast_config() -> ExportConfig {
    ExportConfig {
        settle_delay_ms: 1,
        ..Default::default()
    }
}

/// Backend that always fails, for exercising the cleanup path.
struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize(&self, _node: &StyleNode, _opts: &RasterOptions) -> Result<Screenshot> {
        Err(Error::RenderError("injected failure".to_string()))
    }
}

#[tokio::test]
async fn export_produces_a_png_artifact() {
    let store = SettingsStore::new();
    let config = fast_config();
    let preview = default_preview(&store, &config);
    let exporter = ExportPipeline::new(config);

    let artifact = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("export should succeed");

    // PNG magic bytes and 2x dimensions.
    assert_eq!(&artifact.png_data[0..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    assert_eq!(artifact.width, preview.rect.width * 2);
    assert_eq!(artifact.height, preview.rect.height * 2);
    assert!(artifact.data_url.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn export_filename_matches_the_download_format() {
    let store = SettingsStore::new();
    let config = fast_config();
    let preview = default_preview(&store, &config);
    let exporter = ExportPipeline::new(config);

    let first = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("first export");
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("second export");

    fn stamp(name: &str) -> u128 {
        let digits = name
            .strip_prefix("code-")
            .and_then(|s| s.strip_suffix(".png"))
            .expect("filename shape code-<digits>.png");
        assert!(!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        digits.parse().expect("numeric timestamp")
    }

    assert!(stamp(&second.filename) > stamp(&first.filename));
}

#[tokio::test]
async fn successful_export_leaves_no_mounted_nodes() {
    let store = SettingsStore::new();
    let config = fast_config();
    let preview = default_preview(&store, &config);
    let exporter = ExportPipeline::new(config);

    let before = exporter.document().mounted_count();
    exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("export");
    assert_eq!(exporter.document().mounted_count(), before);
}

#[tokio::test]
async fn failed_export_also_leaves_no_mounted_nodes() {
    let store = SettingsStore::new();
    let config = fast_config();
    let preview = default_preview(&store, &config);
    let exporter = ExportPipeline::with_rasterizer(config, Box::new(FailingRasterizer));

    let before = exporter.document().mounted_count();
    let err = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect_err("injected failure must propagate");
    assert!(matches!(err, Error::RenderError(_)));
    assert_eq!(exporter.document().mounted_count(), before);
}

#[tokio::test]
async fn concurrent_exports_do_not_corrupt_each_other() {
    let store = SettingsStore::new();
    let config = ExportConfig {
        settle_delay_ms: 20,
        ..Default::default()
    };
    let preview = default_preview(&store, &config);
    let exporter = std::sync::Arc::new(ExportPipeline::new(config));

    let a = {
        let exporter = exporter.clone();
        let preview = preview.clone();
        let background = store.background().clone();
        tokio::spawn(async move { exporter.export_to_png(&preview, &background).await })
    };
    let b = {
        let exporter = exporter.clone();
        let preview = preview.clone();
        let background = store.background().clone();
        tokio::spawn(async move { exporter.export_to_png(&preview, &background).await })
    };

    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    assert_eq!(a.png_data, b.png_data);
    assert_eq!(exporter.document().mounted_count(), 0);
}

#[tokio::test]
async fn gradient_and_image_backgrounds_export() {
    let mut store = SettingsStore::new();
    store.set_background_kind(BackgroundKind::Gradient);
    store.set_gradient_preset("sunset");
    store.set_gradient_angle(90);
    let config = fast_config();
    let preview = default_preview(&store, &config);
    let exporter = ExportPipeline::new(config);
    let gradient = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("gradient export");
    assert!(!gradient.png_data.is_empty());

    // A 1x1 red PNG, as a browser upload would be stored.
    let tiny_png = codeshot::rendering::raster::encode_png(1, 1, &[255, 0, 0, 255]).unwrap();
    use base64::Engine as _;
    let data_url = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&tiny_png)
    );
    store.set_background_kind(BackgroundKind::Image);
    store.set_image_data_url(data_url);
    store.set_image_opacity(0.5);
    let image = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("image export");
    assert!(!image.png_data.is_empty());
    assert_eq!(exporter.document().mounted_count(), 0);
}
