//! Pigment-space (CMYK) mixing
//!
//! Interpolating in CMYK behaves subtractively: cyan and yellow meet in green
//! instead of the grey a straight RGB average gives.

use super::{lerp, Rgb};

/// CMYK color, every channel in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cmyk {
    pub c: f32,
    pub m: f32,
    pub y: f32,
    pub k: f32,
}

pub fn rgb_to_cmyk(color: Rgb) -> Cmyk {
    let r = (color.r / 255.0).clamp(0.0, 1.0);
    let g = (color.g / 255.0).clamp(0.0, 1.0);
    let b = (color.b / 255.0).clamp(0.0, 1.0);

    let k = 1.0 - r.max(g).max(b);
    // Pure black: avoid dividing by (1 - k) == 0
    if k >= 1.0 - f32::EPSILON {
        return Cmyk {
            c: 0.0,
            m: 0.0,
            y: 0.0,
            k: 1.0,
        };
    }

    let inv = 1.0 / (1.0 - k);
    Cmyk {
        c: (1.0 - r - k) * inv,
        m: (1.0 - g - k) * inv,
        y: (1.0 - b - k) * inv,
        k,
    }
}

pub fn cmyk_to_rgb(cmyk: Cmyk) -> Rgb {
    let k = 1.0 - cmyk.k.clamp(0.0, 1.0);
    Rgb::new(
        255.0 * (1.0 - cmyk.c.clamp(0.0, 1.0)) * k,
        255.0 * (1.0 - cmyk.m.clamp(0.0, 1.0)) * k,
        255.0 * (1.0 - cmyk.y.clamp(0.0, 1.0)) * k,
    )
}

/// Mix two colors as pigments: `t = 0` gives `c1`, `t = 1` gives `c2`
pub fn mix_pigments(c1: Rgb, c2: Rgb, t: f32) -> Rgb {
    let mut out = c1;
    mix_pigments_in_place(&mut out, c2, t);
    out
}

/// Allocation-free variant of [`mix_pigments`] for the stamping hot path
#[inline]
pub fn mix_pigments_in_place(target: &mut Rgb, other: Rgb, t: f32) {
    let t = t.clamp(0.0, 1.0);
    let a = rgb_to_cmyk(*target);
    let b = rgb_to_cmyk(other);

    *target = cmyk_to_rgb(Cmyk {
        c: lerp(a.c, b.c, t),
        m: lerp(a.m, b.m, t),
        y: lerp(a.y, b.y, t),
        k: lerp(a.k, b.k, t),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_rgb;

    #[test]
    fn test_black_is_pure_key() {
        let cmyk = rgb_to_cmyk(Rgb::BLACK);
        assert_eq!(cmyk.c, 0.0);
        assert_eq!(cmyk.m, 0.0);
        assert_eq!(cmyk.y, 0.0);
        assert_eq!(cmyk.k, 1.0);
        assert_eq!(cmyk_to_rgb(cmyk), Rgb::BLACK);
    }

    #[test]
    fn test_cmyk_round_trip() {
        for hex in ["#cc3333", "#00ffff", "#808080", "#12ab7f", "#ffffff"] {
            let c = hex_to_rgb(hex);
            let back = cmyk_to_rgb(rgb_to_cmyk(c));
            assert!((back.r - c.r).abs() < 0.01, "{hex}: {back:?}");
            assert!((back.g - c.g).abs() < 0.01, "{hex}: {back:?}");
            assert!((back.b - c.b).abs() < 0.01, "{hex}: {back:?}");
        }
    }

    #[test]
    fn test_cyan_plus_yellow_is_green_not_grey() {
        let cyan = hex_to_rgb("#00FFFF");
        let yellow = hex_to_rgb("#FFFF00");
        let mixed = mix_pigments(cyan, yellow, 0.5);

        assert!(mixed.g > mixed.r);
        assert!(mixed.g > mixed.b);

        let spread = mixed.r.max(mixed.g).max(mixed.b) - mixed.r.min(mixed.g).min(mixed.b);
        assert!(spread > 30.0, "pigment mix collapsed to grey: {mixed:?}");
    }

    #[test]
    fn test_mix_endpoints() {
        let a = hex_to_rgb("#cc3333");
        let b = hex_to_rgb("#3366cc");
        let at_zero = mix_pigments(a, b, 0.0);
        let at_one = mix_pigments(a, b, 1.0);
        assert!((at_zero.r - a.r).abs() < 0.01 && (at_zero.b - a.b).abs() < 0.01);
        assert!((at_one.r - b.r).abs() < 0.01 && (at_one.b - b.b).abs() < 0.01);
    }

    #[test]
    fn test_in_place_matches_pure() {
        let a = hex_to_rgb("#aa5500");
        let b = hex_to_rgb("#0055aa");
        let mut c = a;
        mix_pigments_in_place(&mut c, b, 0.1);
        assert_eq!(c, mix_pigments(a, b, 0.1));
    }
}
