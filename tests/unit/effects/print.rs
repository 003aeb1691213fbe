use image::Rgb;

use super::*;

fn settings() -> PrintSettings {
    PrintSettings {
        magenta_shift: Vec2::new(1.0, 0.0),
        yellow_shift: Vec2::new(0.0, -1.0),
        dot_gain: 0.95,
        vignette: 0.15,
        vignette_steps: 100,
    }
}

fn gradient(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x * 255 / w.max(1)) as u8, 128, (y * 255 / h.max(1)) as u8])
    })
}

#[test]
fn integer_misregistration_shifts_red_and_blue_only() {
    let img = gradient(16, 12);
    let out = misregister(&img, Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0));

    for y in 0..12 {
        for x in 0..16 {
            let p = out.get_pixel(x, y).0;
            assert_eq!(p[1], img.get_pixel(x, y).0[1]);
            let red = if x + 1 < 16 { img.get_pixel(x + 1, y).0[0] } else { 0 };
            assert_eq!(p[0], red);
            let blue = if y >= 1 { img.get_pixel(x, y - 1).0[2] } else { 0 };
            assert_eq!(p[2], blue);
        }
    }
}

#[test]
fn fractional_shift_interpolates() {
    let mut img = RgbImage::new(4, 1);
    img.put_pixel(1, 0, Rgb([200, 0, 0]));
    let out = misregister(&img, Vec2::new(0.5, 0.0), Vec2::ZERO);
    assert_eq!(out.get_pixel(0, 0).0[0], 100);
    assert_eq!(out.get_pixel(1, 0).0[0], 100);
    assert_eq!(out.get_pixel(2, 0).0[0], 0);
}

#[test]
fn dot_gain_scales_uniformly() {
    let mut img = RgbImage::from_pixel(2, 2, Rgb([200, 100, 0]));
    apply_dot_gain(&mut img, 0.95);
    assert_eq!(img.get_pixel(1, 1).0, [190, 95, 0]);

    let mut bright = RgbImage::from_pixel(1, 1, Rgb([250, 250, 250]));
    apply_dot_gain(&mut bright, 1.5);
    assert_eq!(bright.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn vignette_keeps_center_and_darkens_edges() {
    let mask = vignette_mask(400, 300, 0.15, 100);
    assert_eq!(mask.get_pixel(200, 150).0[0], 0);
    let corner = mask.get_pixel(0, 0).0[0];
    let edge_mid = mask.get_pixel(0, 150).0[0];
    assert!(corner > 0);
    assert!(corner >= edge_mid);
    assert!(corner <= (0.15f64 * 255.0).round() as u8);
}

#[test]
fn full_intensity_vignette_leaves_center_clear() {
    let mask = vignette_mask(340, 220, 1.0, 100);
    assert_eq!(mask.get_pixel(170, 110).0[0], 0);
    assert_eq!(mask.get_pixel(171, 110).0[0], 0);
    assert!(mask.get_pixel(0, 0).0[0] > 0);
}

#[test]
fn vignette_is_monotone_along_a_ray() {
    let mask = vignette_mask(500, 500, 0.5, 100);
    let mut prev = 0u8;
    for x in (0..=250).rev() {
        let v = mask.get_pixel(x, 250).0[0];
        assert!(v >= prev);
        prev = v;
    }
}

#[test]
fn disabled_passes_are_identity() {
    let img = gradient(20, 10);
    let none = PrintPasses {
        misregistration: false,
        dot_gain: false,
        vignette: false,
    };
    let out = PrintArtifactFilter::new(settings())
        .with_passes(none)
        .apply(img.clone())
        .unwrap();
    assert_eq!(out, img);
}

#[test]
fn filter_preserves_dimensions() {
    let out = PrintArtifactFilter::new(settings())
        .apply(gradient(33, 17))
        .unwrap();
    assert_eq!(out.dimensions(), (33, 17));
}

#[test]
fn pass_order_matters() {
    let img = gradient(64, 48);
    let s = settings();

    let mut forward = misregister(&img, s.magenta_shift, s.yellow_shift);
    apply_dot_gain(&mut forward, s.dot_gain);
    apply_vignette(&mut forward, 0.6, s.vignette_steps).unwrap();

    let mut reversed = img.clone();
    apply_vignette(&mut reversed, 0.6, s.vignette_steps).unwrap();
    apply_dot_gain(&mut reversed, s.dot_gain);
    let reversed = misregister(&reversed, s.magenta_shift, s.yellow_shift);

    assert_ne!(forward, reversed);
    let expected = PrintArtifactFilter::new(PrintSettings {
        vignette: 0.6,
        ..s
    })
    .apply(img)
    .unwrap();
    assert_eq!(expected, forward);
}
