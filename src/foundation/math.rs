pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Blend `src` over `dst` with 8-bit coverage `a` (0 keeps `dst`, 255 takes `src`).
pub(crate) fn blend_u8(dst: u8, src: u8, a: u8) -> u8 {
    let a = u16::from(a);
    let inv = 255 - a;
    (mul_div255_u16(u16::from(src), a) + mul_div255_u16(u16::from(dst), inv)).min(255) as u8
}

/// Round and clamp a float sample into `0..=255`.
pub(crate) fn clamp_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Scale an 8-bit alpha by an opacity in `0..=1`.
pub(crate) fn scale_alpha(a: u8, opacity: f32) -> u8 {
    clamp_u8(f32::from(a) * opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
