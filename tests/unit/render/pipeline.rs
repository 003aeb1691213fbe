use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::master::MasterConfig;

fn tmp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "spreadpress_{tag}_{}_{}",
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn small_config(dir: &Path) -> ResolvedConfig {
    let mut master = MasterConfig::default();
    master.technical.canvas_size = [800, 500];
    master.technical.spine_width = 100;
    master.assets.paths.generated = dir.join("assets");
    master.assets.paths.fonts = dir.join("fonts");
    std::fs::create_dir_all(dir.join("assets")).unwrap();
    master.resolve(dir).unwrap()
}

fn write_asset(dir: &Path, name: &str, w: u32, h: u32) {
    std::fs::create_dir_all(dir.join("assets")).unwrap();
    RgbaImage::from_pixel(w, h, Rgba([200, 30, 30, 255]))
        .save(dir.join("assets").join(name))
        .unwrap();
}

fn layout(right_x: i64, kind: &str) -> LayoutDocument {
    LayoutDocument::from_yaml_str(&format!(
        r#"
canvas: white
left_page:
  elements:
    - id: photo-left
      type: graphic_photo_instructional
      position: [120, 100]
      dimensions: [120, 80]
      asset: red.png
right_page:
  elements:
    - id: box-right
      type: {kind}
      position: [{right_x}, 200]
      dimensions: [120, 80]
      border: "4px solid #000000"
      asset: red.png
"#
    ))
    .unwrap()
}

fn no_artifacts() -> ComposeOptions {
    ComposeOptions {
        apply_artifacts: false,
        ..ComposeOptions::default()
    }
}

#[test]
fn successful_spread_ends_done_with_canvas_size() {
    let dir = tmp_dir("pipe_done");
    write_asset(&dir, "red.png", 120, 80);
    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    assert_eq!(orch.state(), SpreadState::Idle);

    let spread = orch
        .compose_with_rng(
            &layout(500, "container_featurebox"),
            ComposeOptions::default(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

    assert_eq!(orch.state(), SpreadState::Done);
    assert_eq!(spread.image.dimensions(), (800, 500));
    assert_eq!(spread.placements.len(), 2);
    assert_eq!(spread.placements[0].page, Page::Left);
    assert_eq!(spread.placements[1].size, (128, 88));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn intruding_element_is_moved_and_spine_pixels_untouched() {
    let dir = tmp_dir("pipe_spine");
    write_asset(&dir, "red.png", 120, 80);
    let cfg = small_config(&dir);
    let spine = cfg.spine;
    let mut orch = SpreadOrchestrator::new(cfg);

    // Starts at the spine center, so it is pushed right of the dead zone.
    let doc = layout(spine.center, "container_featurebox");
    let with = orch
        .compose_with_rng(&doc, no_artifacts(), &mut StdRng::seed_from_u64(5))
        .unwrap();
    let empty = LayoutDocument::from_yaml_str("canvas: white\n").unwrap();
    let without = orch
        .compose_with_rng(&empty, no_artifacts(), &mut StdRng::seed_from_u64(5))
        .unwrap();

    let placed = &with.placements[1];
    assert!(placed.placement.adjusted);
    assert_eq!(placed.declared.x, spine.center);
    assert_eq!(placed.placement.x, spine.end + 20);
    for y in 0..500 {
        for x in spine.start..spine.end {
            assert_eq!(
                with.image.get_pixel(x as u32, y),
                without.image.get_pixel(x as u32, y)
            );
        }
    }
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn seeded_composition_is_reproducible() {
    let dir = tmp_dir("pipe_seed");
    write_asset(&dir, "red.png", 60, 60);
    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    let doc = layout(500, "container_splat");
    let a = orch
        .compose_with_rng(&doc, ComposeOptions::default(), &mut StdRng::seed_from_u64(9))
        .unwrap();
    let b = orch
        .compose_with_rng(&doc, ComposeOptions::default(), &mut StdRng::seed_from_u64(9))
        .unwrap();
    assert_eq!(a.image, b.image);
    assert_eq!(a.placements, b.placements);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_asset_fails_the_spread_with_context() {
    let dir = tmp_dir("pipe_missing");
    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    let err = orch
        .compose_with_rng(
            &layout(500, "container_featurebox"),
            no_artifacts(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();

    assert_eq!(orch.state(), SpreadState::Failed);
    match &err {
        PressError::Stage { element_id, .. } => assert_eq!(element_id, "photo-left"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.root(), PressError::AssetNotFound { .. }));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unknown_kind_policy() {
    let dir = tmp_dir("pipe_unknown");
    write_asset(&dir, "red.png", 120, 80);
    let doc = layout(500, "sticker_holo");
    let mut orch = SpreadOrchestrator::new(small_config(&dir));

    let spread = orch
        .compose_with_rng(&doc, no_artifacts(), &mut StdRng::seed_from_u64(2))
        .unwrap();
    assert_eq!(spread.placements.len(), 2);

    let reject = ComposeOptions {
        unknown_kinds: UnknownKindPolicy::Reject,
        ..no_artifacts()
    };
    let err = orch
        .compose_with_rng(&doc, reject, &mut StdRng::seed_from_u64(2))
        .unwrap_err();
    assert!(matches!(err, PressError::LayoutMalformed(_)));
    assert_eq!(orch.state(), SpreadState::Failed);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn artifacts_change_pixels_not_size() {
    let dir = tmp_dir("pipe_artifacts");
    write_asset(&dir, "red.png", 120, 80);
    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    let doc = layout(500, "container_featurebox");
    let plain = orch
        .compose_with_rng(&doc, no_artifacts(), &mut StdRng::seed_from_u64(4))
        .unwrap();
    let printed = orch
        .compose_with_rng(&doc, ComposeOptions::default(), &mut StdRng::seed_from_u64(4))
        .unwrap();
    assert_eq!(plain.image.dimensions(), printed.image.dimensions());
    assert_ne!(plain.image, printed.image);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn failed_file_composition_writes_nothing() {
    let dir = tmp_dir("pipe_file");
    let layout_path = dir.join("spread.yaml");
    std::fs::write(
        &layout_path,
        "canvas: white\nleft_page:\n  elements:\n    - id: a\n      type: graphic_pixelart\n      position: [100, 100]\n      asset: gone.png\n",
    )
    .unwrap();
    let out = dir.join("out").join("spread.png");

    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    assert!(orch.compose_to_file(&layout_path, &out, no_artifacts()).is_err());
    assert!(!out.exists());
    assert_eq!(orch.state(), SpreadState::Failed);

    write_asset(&dir, "gone.png", 30, 30);
    orch.compose_to_file(&layout_path, &out, no_artifacts()).unwrap();
    assert!(out.is_file());
    assert_eq!(orch.state(), SpreadState::Done);
    let _ = std::fs::remove_dir_all(dir);
}

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

const TEXT_LAYOUT: &str = r#"
canvas: white
left_page:
  elements:
    - id: t1
      type: text_body
      position: [120, 120]
      dimensions: [200, 60]
      content: "one\ntwo"
      font: body
      size: 16
      leading: 18
"#;

#[test]
fn text_element_without_font_fails_in_text_stage() {
    let dir = tmp_dir("pipe_text_missing");
    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    let doc = LayoutDocument::from_yaml_str(TEXT_LAYOUT).unwrap();

    let err = orch
        .compose_with_rng(&doc, no_artifacts(), &mut StdRng::seed_from_u64(0))
        .unwrap_err();

    assert_eq!(orch.state(), SpreadState::Failed);
    match &err {
        PressError::Stage {
            element_id, stage, ..
        } => {
            assert_eq!(element_id, "t1");
            assert_eq!(*stage, "text rendering");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        err.root(),
        PressError::FontNotFound { element_id, .. } if element_id == "t1"
    ));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn text_element_is_sized_by_width_and_line_count() {
    let Some(font) = system_font() else {
        return;
    };
    let dir = tmp_dir("pipe_text");
    std::fs::create_dir_all(dir.join("fonts")).unwrap();
    std::fs::copy(&font, dir.join("fonts").join("body.ttf")).unwrap();
    let mut orch = SpreadOrchestrator::new(small_config(&dir));
    let doc = LayoutDocument::from_yaml_str(TEXT_LAYOUT).unwrap();

    let spread = orch
        .compose_with_rng(&doc, no_artifacts(), &mut StdRng::seed_from_u64(0))
        .unwrap();

    assert_eq!(orch.state(), SpreadState::Done);
    let placed = &spread.placements[0];
    assert_eq!(placed.id, "t1");
    // Two explicit lines at an 18px pitch.
    assert_eq!(placed.size, (200, 36));
    assert!(!placed.placement.adjusted);
    let _ = std::fs::remove_dir_all(dir);
}
