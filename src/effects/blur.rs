use crate::foundation::error::{PressError, PressResult};

/// Separable Gaussian blur over an interleaved 8-bit buffer with `channels` samples per pixel.
///
/// Edges are clamped. `radius == 0` returns the input unchanged.
pub fn gaussian_blur_u8(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    radius: u32,
    sigma: f32,
) -> PressResult<Vec<u8>> {
    if channels == 0 {
        return Err(PressError::render("blur needs at least one channel"));
    }
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| PressError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(PressError::render(
            "gaussian_blur_u8 expects src matching width*height*channels",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let plane = Plane {
        width: width as i32,
        height: height as i32,
        channels,
    };
    horizontal_pass(src, &mut tmp, plane, &kernel);
    vertical_pass(&tmp, &mut out, plane, &kernel);
    Ok(out)
}

#[derive(Clone, Copy)]
struct Plane {
    width: i32,
    height: i32,
    channels: usize,
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PressResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PressError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(PressError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Keep the kernel summing to exactly 1.0 in q16 so flat regions stay flat.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], p: Plane, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let mut acc = vec![0u64; p.channels];
    for y in 0..p.height {
        for x in 0..p.width {
            acc.iter_mut().for_each(|a| *a = 0);
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, p.width - 1);
                let idx = ((y * p.width + sx) as usize) * p.channels;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * p.width + x) as usize) * p.channels;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], p: Plane, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let mut acc = vec![0u64; p.channels];
    for y in 0..p.height {
        for x in 0..p.width {
            acc.iter_mut().for_each(|a| *a = 0);
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, p.height - 1);
                let idx = ((sy * p.width + x) as usize) * p.channels;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * p.width + x) as usize) * p.channels;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
