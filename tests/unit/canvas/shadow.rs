use image::Rgb;

use super::*;

fn spine() -> SpineGeometry {
    SpineGeometry::new(400, 40).unwrap()
}

#[test]
fn mask_is_darkest_at_the_spine_and_fades_outward() {
    let s = spine();
    let mask = curvature_mask(400, 10, s, 0.3);
    let at = |x: i64| mask.get_pixel(x as u32, 5).0[0];

    assert_eq!(at(s.end), (0.3f64 * 255.0) as u8);
    assert_eq!(at(s.start - 1), at(s.end));
    assert!(at(s.end) > at(s.end + 10));
    assert!(at(s.end + 10) > at(s.end + 20));
    assert_eq!(at(s.end + 30), 0);
    assert_eq!(at(0), 0);
}

#[test]
fn dead_zone_itself_is_never_shaded() {
    let s = spine();
    let mask = curvature_mask(400, 3, s, 1.0);
    for x in s.start..s.end {
        assert_eq!(mask.get_pixel(x as u32, 1).0[0], 0, "column {x}");
    }
    assert_eq!(mask.get_pixel((s.start - 1) as u32, 1).0[0], 255);
}

#[test]
fn falloff_is_quadratic() {
    let s = spine();
    let mask = curvature_mask(400, 1, s, 1.0);
    // shadow width = 30, so halfway out the shade is a quarter of full strength.
    let half = mask.get_pixel((s.end + 15) as u32, 0).0[0];
    assert_eq!(half, (255.0f64 * 0.25) as u8);
}

#[test]
fn zero_opacity_leaves_canvas_untouched() {
    let mut canvas = RgbImage::from_pixel(400, 4, Rgb([200, 200, 200]));
    add_page_curvature_shadow(&mut canvas, spine(), 0.0).unwrap();
    assert!(canvas.pixels().all(|p| p.0 == [200, 200, 200]));
}

#[test]
fn shadow_darkens_gutter_only() {
    let s = spine();
    let mut canvas = RgbImage::from_pixel(400, 4, Rgb([200, 200, 200]));
    add_page_curvature_shadow(&mut canvas, s, 0.3).unwrap();

    assert!(canvas.get_pixel(s.end as u32, 0).0[0] < 200);
    assert!(canvas.get_pixel((s.start - 1) as u32, 0).0[0] < 200);
    assert_eq!(canvas.get_pixel(10, 0).0, [200, 200, 200]);
    assert_eq!(canvas.get_pixel(390, 0).0, [200, 200, 200]);
}
