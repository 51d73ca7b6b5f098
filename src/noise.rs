//! Integer hashing and smooth value noise
//!
//! Everything here is a pure function of its inputs so that jitter derived
//! from it is reproducible.

/// Avalanche a 32-bit value
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846C_A68B);
    x ^= x >> 16;
    x
}

/// Hash of a 2D integer coordinate and seed
#[inline]
pub fn hash_xy(x: i32, y: i32, seed: u32) -> u32 {
    hash_u32(
        (x as u32)
            .wrapping_mul(374_761_393)
            .wrapping_add((y as u32).wrapping_mul(668_265_263))
            .wrapping_add(seed.wrapping_mul(1_013_904_223)),
    )
}

/// Hash mapped to 0.0 - 1.0
#[inline]
pub fn unit(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Hash mapped to -1.0 - 1.0
#[inline]
pub fn signed_unit(h: u32) -> f32 {
    unit(h) * 2.0 - 1.0
}

/// Smoothly interpolated lattice noise in 0.0 - 1.0
pub fn value_noise(x: f32, y: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (xi, yi) = (x0 as i32, y0 as i32);

    let smooth = |t: f32| t * t * (3.0 - 2.0 * t);
    let sx = smooth(fx);
    let sy = smooth(fy);

    let v00 = unit(hash_xy(xi, yi, seed));
    let v10 = unit(hash_xy(xi + 1, yi, seed));
    let v01 = unit(hash_xy(xi, yi + 1, seed));
    let v11 = unit(hash_xy(xi + 1, yi + 1, seed));

    let top = v00 + (v10 - v00) * sx;
    let bottom = v01 + (v11 - v01) * sx;
    top + (bottom - top) * sy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_xy(3, -7, 11), hash_xy(3, -7, 11));
        assert_ne!(hash_xy(3, -7, 11), hash_xy(3, -7, 12));
    }

    #[test]
    fn test_unit_range() {
        for i in 0..1000 {
            let u = unit(hash_u32(i));
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_value_noise_range_and_continuity() {
        let mut prev = value_noise(0.0, 0.5, 1);
        for i in 1..200 {
            let v = value_noise(i as f32 * 0.01, 0.5, 1);
            assert!((0.0..=1.0).contains(&v));
            assert!((v - prev).abs() < 0.1);
            prev = v;
        }
    }
}
