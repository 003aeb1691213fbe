use super::*;

#[test]
fn normalize_rel_path_cleans_separators() {
    assert_eq!(
        normalize_rel_path(r"photos\\./kid.png").unwrap(),
        "photos/kid.png"
    );
    assert_eq!(normalize_rel_path("a//b/./c.png").unwrap(), "a/b/c.png");
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../secret.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn decode_reports_the_path_on_failure() {
    let path = std::env::temp_dir()
        .join(format!("spreadpress_not_an_image_{}.png", std::process::id()));
    std::fs::write(&path, b"definitely not a png").unwrap();
    let err = decode_rgba_file(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(format!("{err:#}").contains("decode image"));
}

#[test]
fn decode_roundtrips_a_png_file() {
    let path = std::env::temp_dir().join(format!("spreadpress_decode_{}.png", std::process::id()));
    let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    img.save(&path).unwrap();
    let decoded = decode_rgba_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(decoded, img);
}
