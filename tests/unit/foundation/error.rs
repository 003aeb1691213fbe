use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PressError::config("x").to_string().contains("config error:"));
    assert!(
        PressError::layout("x")
            .to_string()
            .contains("malformed layout:")
    );
    assert!(
        PressError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PressError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PressError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn stage_context_names_element_and_stage() {
    let err = PressError::AssetNotFound {
        element_id: "L_photo_01".to_string(),
        path: PathBuf::from("assets/generated/missing.png"),
    }
    .at_stage("L_photo_01", "asset");

    let msg = err.to_string();
    assert!(msg.contains("L_photo_01"));
    assert!(msg.contains("asset"));
    assert!(msg.contains("missing.png"));
    assert!(matches!(err.root(), PressError::AssetNotFound { .. }));
}
