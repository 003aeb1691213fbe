use sha2::{Digest as _, Sha256};

/// Size of the integer range the digest is reduced into before mapping onto degrees.
const JITTER_RANGE: u64 = 1 << 32;

/// Deterministic "chaos" rotation for an element.
///
/// Pure function of `id` and `max_magnitude`: the first eight bytes of the SHA-256 digest of the
/// id are reduced modulo 2^32 and mapped uniformly onto `[-max_magnitude, +max_magnitude]`. No
/// global RNG state, clock or call order is involved. Non-positive or non-finite magnitudes yield
/// `0.0`.
pub fn jitter(id: &str, max_magnitude: f32) -> f32 {
    if !max_magnitude.is_finite() || max_magnitude <= 0.0 {
        return 0.0;
    }

    let digest = Sha256::digest(id.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let bucket = u64::from_be_bytes(head) % JITTER_RANGE;

    let unit = bucket as f64 / (JITTER_RANGE - 1) as f64;
    let m = f64::from(max_magnitude);
    let angle = ((unit * 2.0 - 1.0) * m) as f32;
    angle.clamp(-max_magnitude, max_magnitude)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/jitter.rs"]
mod tests;
