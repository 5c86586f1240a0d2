use codeshot::{
    build_comparison, BackgroundKind, ComparisonLayout, ExportConfig, ExportPipeline,
    SettingsStore,
};

fn fast_config() -> ExportConfig {
    ExportConfig {
        settle_delay_ms: 1,
        ..Default::default()
    }
}

#[tokio::test]
async fn comparison_row_exports_one_wide_image() {
    let mut store = SettingsStore::new();
    store.set_background_kind(BackgroundKind::Gradient);
    let config = fast_config();
    let preview = build_comparison(
        store.comparison(),
        store.display(),
        store.background(),
        &config,
    );
    let exporter = ExportPipeline::new(config);
    let artifact = exporter
        .export_to_png(&preview, store.background())
        .await
        .expect("comparison export");

    assert_eq!(artifact.width, preview.rect.width * 2);
    assert!(preview.rect.width > preview.rect.height);
    assert_eq!(exporter.document().mounted_count(), 0);
}

#[tokio::test]
async fn comparison_column_is_taller_than_row() {
    let mut store = SettingsStore::new();
    let config = fast_config();
    let row = build_comparison(
        store.comparison(),
        store.display(),
        store.background(),
        &config,
    );
    store.set_comparison_layout(ComparisonLayout::Column);
    let column = build_comparison(
        store.comparison(),
        store.display(),
        store.background(),
        &config,
    );

    assert!(column.rect.height > row.rect.height);
    assert!(column.rect.width < row.rect.width);
}

#[tokio::test]
async fn comparison_panels_carry_their_own_titles() {
    let store = SettingsStore::new();
    let config = fast_config();
    let preview = build_comparison(
        store.comparison(),
        store.display(),
        store.background(),
        &config,
    );

    // Each frame's title bar ends with the panel title text node.
    let mut titles = Vec::new();
    for frame in preview.children.iter().filter(|c| c.tag == "div") {
        let bar = &frame.children[0];
        if let Some(text) = bar.children.last().and_then(|n| n.text.clone()) {
            titles.push(text);
        }
    }
    assert_eq!(titles, vec!["Erlang".to_string(), "Elixir".to_string()]);
}
