use super::*;

#[test]
fn empty_yaml_yields_defaults() {
    let cfg = MasterConfig::from_yaml_str("").unwrap();
    assert_eq!(cfg, MasterConfig::default());
    assert_eq!(cfg.technical.canvas_size, [3400, 2200]);
    assert_eq!(cfg.technical.spine_width, 462);
}

#[test]
fn partial_yaml_keeps_other_defaults() {
    let cfg = MasterConfig::from_yaml_str(
        r#"
technical:
  spine_width: 300
print_simulation:
  dot_gain: 0.9
"#,
    )
    .unwrap();
    assert_eq!(cfg.technical.spine_width, 300);
    assert_eq!(cfg.technical.canvas_size, [3400, 2200]);
    assert_eq!(cfg.print_simulation.dot_gain, 0.9);
    assert_eq!(cfg.print_simulation.vignette, 0.15);
    assert_eq!(cfg.typography.word_wrap_padding, 10);
}

#[test]
fn malformed_yaml_is_config_error() {
    let err = MasterConfig::from_yaml_str("technical: [unterminated").unwrap_err();
    assert!(matches!(err, PressError::Config(_)));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join(format!(
        "spreadpress_missing_config_{}.yaml",
        std::process::id()
    ));
    let cfg = MasterConfig::load(&path).unwrap();
    assert_eq!(cfg, MasterConfig::default());
}

#[test]
fn coil_color_accepts_hex_and_lists() {
    let cfg = MasterConfig::from_yaml_str(
        r#"
technical:
  binding:
    coil_color: [10, 20, 30]
"#,
    )
    .unwrap();
    assert_eq!(
        cfg.technical.binding.coil_color.to_rgba().unwrap(),
        [10, 20, 30, 255]
    );

    let c = ColorValue::Rgba([1, 2, 3, 4]);
    assert_eq!(c.to_rgba().unwrap(), [1, 2, 3, 4]);
    let c = ColorValue::Hex("#FF0000".to_string());
    assert_eq!(c.to_rgba().unwrap(), [255, 0, 0, 255]);
}

#[test]
fn resolve_derives_geometry_and_palette() {
    let resolved = MasterConfig::default().resolve(Path::new("/work")).unwrap();
    assert_eq!(resolved.spine.start, 1469);
    assert_eq!(resolved.spine.end, 1931);
    assert_eq!(
        resolved.palette.paper("aged_newsprint"),
        Some(Rgb8::new(248, 243, 229))
    );
    assert_eq!(
        resolved.palette.ink("nickelodeon_orange"),
        Some(Rgb8::new(245, 125, 13))
    );
    assert_eq!(resolved.asset_dir, Path::new("/work/assets/generated"));
    assert_eq!(resolved.font_dir, Path::new("/work/assets/fonts"));
    assert_eq!(resolved.magenta_shift, Vec2::new(1.0, 0.0));
}

#[test]
fn palette_overrides_merge_with_defaults() {
    let cfg = MasterConfig::from_yaml_str(
        r##"
aesthetic_rules:
  paper_colors:
    blueprint: "#1C3F7A"
"##,
    )
    .unwrap();
    let resolved = cfg.resolve(Path::new(".")).unwrap();
    assert_eq!(
        resolved.palette.paper("blueprint"),
        Some(Rgb8::new(0x1C, 0x3F, 0x7A))
    );
    assert!(resolved.palette.paper("kraft").is_some());
}

#[test]
fn resolve_rejects_bad_values() {
    let mut cfg = MasterConfig::default();
    cfg.print_simulation.dot_gain = 0.0;
    assert!(cfg.resolve(Path::new(".")).is_err());

    let mut cfg = MasterConfig::default();
    cfg.aesthetic_rules
        .paper_colors
        .insert("broken".to_string(), "#XYZ".to_string());
    assert!(matches!(
        cfg.resolve(Path::new(".")).unwrap_err(),
        PressError::Config(_)
    ));

    let mut cfg = MasterConfig::default();
    cfg.technical.spine_width = 5000;
    assert!(cfg.resolve(Path::new(".")).is_err());
}

#[test]
fn low_vignette_step_count_is_raised() {
    let mut cfg = MasterConfig::default();
    cfg.print_simulation.vignette_steps = 8;
    let resolved = cfg.resolve(Path::new(".")).unwrap();
    assert_eq!(
        resolved.master.print_simulation.vignette_steps,
        MIN_VIGNETTE_STEPS
    );
}

#[test]
fn accent_budget_follows_color_distribution() {
    let mut master = MasterConfig::default();
    master.aesthetic_rules.color_distribution.nickelodeon_accent = 0.4;
    let cfg = master.resolve(Path::new(".")).unwrap();
    let budget = cfg.accent_budget();
    assert!((budget.orange_max - 0.6).abs() < 1e-6);
    assert!((budget.acid_max - 0.10).abs() < 1e-6);
    assert_eq!(budget.orange, Rgb8::new(0xF5, 0x7D, 0x0D));
    assert_eq!(budget.acid, Rgb8::new(0x95, 0xC1, 0x20));
}
