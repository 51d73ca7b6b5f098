//! Blend modes and per-pixel compositing over straight-alpha RGBA8
//!
//! Formulas follow W3C Compositing and Blending Level 1: a separable blend function
//! `B(cb, cs)` mixed with the source by backdrop alpha, then source-over.

use serde::{Deserialize, Serialize};

/// Blend modes for compositing paint onto a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    /// Separable blend function on normalized channels
    #[inline]
    pub fn apply(self, cb: f32, cs: f32) -> f32 {
        match self {
            BlendMode::Normal => cs,
            BlendMode::Multiply => cb * cs,
            BlendMode::Screen => screen(cb, cs),
            BlendMode::Overlay => hard_light(cs, cb),
            BlendMode::Darken => cb.min(cs),
            BlendMode::Lighten => cb.max(cs),
            BlendMode::ColorDodge => {
                if cb <= 0.0 {
                    0.0
                } else if cs >= 1.0 {
                    1.0
                } else {
                    (cb / (1.0 - cs)).min(1.0)
                }
            }
            BlendMode::ColorBurn => {
                if cb >= 1.0 {
                    1.0
                } else if cs <= 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - cb) / cs).min(1.0)
                }
            }
            BlendMode::HardLight => hard_light(cb, cs),
            BlendMode::SoftLight => {
                if cs <= 0.5 {
                    cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
                } else {
                    let d = if cb <= 0.25 {
                        ((16.0 * cb - 12.0) * cb + 4.0) * cb
                    } else {
                        cb.sqrt()
                    };
                    cb + (2.0 * cs - 1.0) * (d - cb)
                }
            }
            BlendMode::Difference => (cb - cs).abs(),
            BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        }
    }
}

#[inline]
fn screen(cb: f32, cs: f32) -> f32 {
    cb + cs - cb * cs
}

#[inline]
fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        screen(cb, 2.0 * cs - 1.0)
    }
}

/// How a scratch buffer lands on its target layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    Blend(BlendMode),
    /// destination-out
    Erase,
}

/// Composite a straight-alpha source color onto one RGBA8 pixel.
///
/// `src` channels are normalized 0.0 - 1.0.
#[inline]
pub fn composite_pixel(dst: &mut [u8], src: [f32; 3], src_alpha: f32, mode: BlendMode) {
    let a_s = src_alpha.clamp(0.0, 1.0);
    if a_s <= 0.0 {
        return;
    }
    let a_b = dst[3] as f32 / 255.0;
    let a_o = a_s + a_b * (1.0 - a_s);
    if a_o <= 0.0 {
        return;
    }

    for ch in 0..3 {
        let cb = dst[ch] as f32 / 255.0;
        let cs = src[ch];
        let mixed = (1.0 - a_b) * cs + a_b * mode.apply(cb, cs);
        let co = (a_s * mixed + a_b * (1.0 - a_s) * cb) / a_o;
        dst[ch] = (co * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (a_o * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Composite an RGBA8 source pixel onto an RGBA8 destination pixel
#[inline]
pub fn composite_rgba(dst: &mut [u8], src: &[u8], mode: BlendMode) {
    if src[3] == 0 {
        return;
    }
    composite_pixel(
        dst,
        [
            src[0] as f32 / 255.0,
            src[1] as f32 / 255.0,
            src[2] as f32 / 255.0,
        ],
        src[3] as f32 / 255.0,
        mode,
    );
}

/// destination-out: remove `amount` (0.0 - 1.0) of the pixel's alpha
#[inline]
pub fn erase_pixel(dst: &mut [u8], amount: f32) {
    let keep = 1.0 - amount.clamp(0.0, 1.0);
    dst[3] = (dst[3] as f32 * keep).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_over_transparent_is_source() {
        let mut px = [0u8, 0, 0, 0];
        composite_pixel(&mut px, [1.0, 0.0, 0.0], 0.5, BlendMode::Normal);
        assert_eq!(px, [255, 0, 0, 128]);
    }

    #[test]
    fn test_normal_opaque_over_opaque_replaces() {
        let mut px = [0u8, 0, 255, 255];
        composite_pixel(&mut px, [1.0, 1.0, 0.0], 1.0, BlendMode::Normal);
        assert_eq!(px, [255, 255, 0, 255]);
    }

    #[test]
    fn test_multiply_darkens() {
        let mut px = [128u8, 128, 128, 255];
        composite_pixel(&mut px, [0.5, 0.5, 0.5], 1.0, BlendMode::Multiply);
        assert!(px[0] < 128);
    }

    #[test]
    fn test_screen_lightens() {
        let mut px = [128u8, 128, 128, 255];
        composite_pixel(&mut px, [0.5, 0.5, 0.5], 1.0, BlendMode::Screen);
        assert!(px[0] > 128);
    }

    #[test]
    fn test_blend_functions_stay_in_range() {
        let modes = [
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
            BlendMode::ColorDodge,
            BlendMode::ColorBurn,
            BlendMode::HardLight,
            BlendMode::SoftLight,
            BlendMode::Difference,
            BlendMode::Exclusion,
        ];
        for mode in modes {
            for i in 0..=10 {
                for j in 0..=10 {
                    let v = mode.apply(i as f32 / 10.0, j as f32 / 10.0);
                    assert!((0.0..=1.0 + 1e-6).contains(&v), "{mode:?} -> {v}");
                }
            }
        }
    }

    #[test]
    fn test_erase_pixel() {
        let mut px = [10u8, 10, 10, 200];
        erase_pixel(&mut px, 0.5);
        assert_eq!(px[3], 100);
        erase_pixel(&mut px, 1.0);
        assert_eq!(px[3], 0);
    }
}
