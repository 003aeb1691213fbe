use image::RgbaImage;

use crate::foundation::math::clamp_u8;

/// Rotate counter-clockwise by `degrees`, growing the output to contain the rotated content.
///
/// Output pixels whose source position falls outside the bitmap stay fully transparent, so
/// newly exposed corners carry no kernel fringe. Sampling is bicubic (Catmull-Rom) over
/// premultiplied values so transparent neighbours do not bleed dark fringes into edges.
pub fn rotate_expand(src: &RgbaImage, degrees: f32) -> RgbaImage {
    if degrees == 0.0 || src.width() == 0 || src.height() == 0 {
        return src.clone();
    }

    let (sin, cos) = f64::from(degrees).to_radians().sin_cos();
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));

    let out_w = expanded_extent(w * cos.abs() + h * sin.abs());
    let out_h = expanded_extent(w * sin.abs() + h * cos.abs());

    let premul = premultiplied(src);
    let (scx, scy) = (w / 2.0, h / 2.0);
    let (ocx, ocy) = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);

    let mut out = RgbaImage::new(out_w, out_h);
    for (ox, oy, px) in out.enumerate_pixels_mut() {
        let dx = f64::from(ox) + 0.5 - ocx;
        let dy = f64::from(oy) + 0.5 - ocy;
        // Inverse of a visual counter-clockwise rotation in y-down space.
        let sx = dx * cos - dy * sin + scx - 0.5;
        let sy = dx * sin + dy * cos + scy - 0.5;
        if sx < -0.5 || sy < -0.5 || sx > w - 0.5 || sy > h - 0.5 {
            continue;
        }
        px.0 = unpremultiply(sample_bicubic(&premul, src.width(), src.height(), sx, sy));
    }
    out
}

fn expanded_extent(v: f64) -> u32 {
    // Trim float noise so right angles do not grow by a pixel.
    ((v - 1e-6).ceil().max(1.0)) as u32
}

fn premultiplied(src: &RgbaImage) -> Vec<[f32; 4]> {
    src.pixels()
        .map(|p| {
            let a = f32::from(p[3]) / 255.0;
            [
                f32::from(p[0]) * a,
                f32::from(p[1]) * a,
                f32::from(p[2]) * a,
                f32::from(p[3]),
            ]
        })
        .collect()
}

fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let a = px[3].clamp(0.0, 255.0);
    if a < 0.5 {
        return [0, 0, 0, 0];
    }
    let k = 255.0 / a;
    [
        clamp_u8(px[0] * k),
        clamp_u8(px[1] * k),
        clamp_u8(px[2] * k),
        clamp_u8(a),
    ]
}

fn catmull_rom(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

fn sample_bicubic(px: &[[f32; 4]], width: u32, height: u32, x: f64, y: f64) -> [f32; 4] {
    let (w, h) = (i64::from(width), i64::from(height));
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    if x0 < -2 || y0 < -2 || x0 > w + 1 || y0 > h + 1 {
        return [0.0; 4];
    }

    let mut acc = [0.0f64; 4];
    for j in -1..=2 {
        let sy = y0 + j;
        let wy = catmull_rom(y - sy as f64);
        if wy == 0.0 || sy < 0 || sy >= h {
            continue;
        }
        for i in -1..=2 {
            let sx = x0 + i;
            let wx = catmull_rom(x - sx as f64);
            if wx == 0.0 || sx < 0 || sx >= w {
                continue;
            }
            let p = px[(sy * w + sx) as usize];
            let k = wx * wy;
            for c in 0..4 {
                acc[c] += k * f64::from(p[c]);
            }
        }
    }

    let a = acc[3].clamp(0.0, 255.0) as f32;
    [
        (acc[0] as f32).clamp(0.0, a),
        (acc[1] as f32).clamp(0.0, a),
        (acc[2] as f32).clamp(0.0, a),
        a,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/transform/rotate.rs"]
mod tests;
