use image::Rgb;

use super::*;

#[test]
fn filled_disk_covers_center_not_corners() {
    let mut canvas = RgbImage::from_pixel(21, 21, Rgb([255, 255, 255]));
    fill_ellipse(
        &mut canvas,
        Ellipse::from_bounds(0, 0, 20, 20),
        [0, 0, 0, 255],
    );
    assert_eq!(canvas.get_pixel(10, 10).0, [0, 0, 0]);
    assert_eq!(canvas.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(canvas.get_pixel(20, 20).0, [255, 255, 255]);
}

#[test]
fn arc_only_touches_its_sweep() {
    let mut canvas = RgbImage::from_pixel(41, 41, Rgb([255, 255, 255]));
    // 45..225 clockwise from 3 o'clock sweeps through 6 o'clock (bottom).
    stroke_arc(
        &mut canvas,
        Ellipse::from_bounds(0, 0, 40, 40),
        45.0,
        225.0,
        4.0,
        [0, 0, 0, 255],
    );
    assert_eq!(canvas.get_pixel(20, 38).0, [0, 0, 0]);
    assert_eq!(canvas.get_pixel(20, 2).0, [255, 255, 255]);
    // Ring interior stays untouched.
    assert_eq!(canvas.get_pixel(20, 20).0, [255, 255, 255]);
}

#[test]
fn wrapping_sweep_is_supported() {
    let mut canvas = RgbImage::from_pixel(41, 41, Rgb([255, 255, 255]));
    stroke_arc(
        &mut canvas,
        Ellipse::from_bounds(0, 0, 40, 40),
        315.0,
        45.0,
        4.0,
        [0, 0, 0, 255],
    );
    assert_eq!(canvas.get_pixel(38, 20).0, [0, 0, 0]);
    assert_eq!(canvas.get_pixel(2, 20).0, [255, 255, 255]);
}

#[test]
fn shapes_outside_canvas_are_ignored() {
    let mut canvas = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
    fill_ellipse(
        &mut canvas,
        Ellipse::from_bounds(100, 100, 120, 120),
        [0, 0, 0, 255],
    );
    assert!(canvas.pixels().all(|p| p.0 == [1, 2, 3]));
}
