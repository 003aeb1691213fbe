use image::{Rgb, Rgba};

use super::*;

fn spread_spine() -> SpineGeometry {
    SpineGeometry::new(3400, 462).unwrap()
}

fn at(x: i64, y: i64) -> Position {
    Position { x, y }
}

#[test]
fn default_spread_geometry() {
    let s = spread_spine();
    assert_eq!((s.start, s.center, s.end), (1469, 1700, 1931));
}

#[test]
fn element_starting_at_center_moves_right_of_spine() {
    let p = resolve_placement(spread_spine(), at(1700, 300), 400, 20);
    assert_eq!(
        p,
        Placement {
            x: 1931 + 20,
            y: 300,
            adjusted: true
        }
    );
}

#[test]
fn element_left_of_center_moves_left_of_spine() {
    let p = resolve_placement(spread_spine(), at(1300, 80), 400, 20);
    assert_eq!(p.x, 1469 - 400 - 20);
    assert_eq!(p.y, 80);
    assert!(p.adjusted);
}

#[test]
fn touching_the_spine_edge_is_not_intrusion() {
    let s = spread_spine();
    let left = resolve_placement(s, at(s.start - 400, 0), 400, 20);
    assert_eq!(left.x, s.start - 400);
    assert!(!left.adjusted);

    let right = resolve_placement(s, at(s.end, 0), 400, 20);
    assert_eq!(right.x, s.end);
    assert!(!right.adjusted);
}

#[test]
fn relocated_elements_never_overlap_the_dead_zone() {
    let s = spread_spine();
    for buffer in [0, 20, 75] {
        for width in [1u32, 50, 400, 900] {
            for x in (1000..2400).step_by(37) {
                let p = resolve_placement(s, at(x, 0), width, buffer);
                assert!(
                    !s.intrudes(p.x, p.x + i64::from(width)),
                    "x={x} width={width} buffer={buffer} -> {p:?}"
                );
                if p.adjusted {
                    if x < s.center {
                        assert!(p.x < x);
                    } else {
                        assert!(p.x > x);
                    }
                }
            }
        }
    }
}

#[test]
fn composite_pastes_at_the_relocated_position() {
    let spine = SpineGeometry::new(200, 40).unwrap();
    let mut canvas = RgbImage::from_pixel(200, 20, Rgb([255, 255, 255]));
    let bitmap = RgbaImage::from_pixel(10, 5, Rgba([0, 0, 0, 255]));

    let placed = SpineAwareCompositor::new(spine, 2).composite_element(
        &mut canvas,
        &bitmap,
        at(100, 3),
        "box",
    );

    assert_eq!(placed.x, spine.end + 2);
    assert_eq!(canvas.get_pixel(placed.x as u32, 3).0, [0, 0, 0]);
    assert_eq!(canvas.get_pixel(100, 3).0, [255, 255, 255]);
    assert!((spine.start..spine.end).all(|x| canvas.get_pixel(x as u32, 3).0 == [255, 255, 255]));
}
