//! Pattern tiles and hash-seeded stamp jitter

use sha2::{Digest, Sha256};

use crate::color::{shift_hsl, Rgb};
use crate::noise::{hash_xy, signed_unit};
use crate::raster::{composite_pixel, BlendMode, Rect, Surface};
use crate::settings::PatternSettings;

/// Salts keep the jitter channels of one grid cell independent
const SALT_SCALE: u32 = 0x5CA1;
const SALT_ROTATION: u32 = 0x2074;
const SALT_HUE: u32 = 0x4E0E;
const SALT_SATURATION: u32 = 0x5A70;
const SALT_VALUE: u32 = 0x7A1E;

/// Captured RGBA tile used by the pattern tools
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    surface: Surface,
    content_hash: String,
}

impl Pattern {
    pub fn from_surface(surface: Surface) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(surface.width().to_le_bytes());
        hasher.update(surface.height().to_le_bytes());
        hasher.update(surface.data());
        let content_hash = hex::encode(hasher.finalize());
        Self {
            surface,
            content_hash,
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// SHA-256 of the dimensions and pixels, hex encoded
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Whether every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.surface.data().chunks_exact(4).all(|p| p[3] == 0)
    }
}

/// Per-instance variation of one stamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternJitter {
    /// Scale multiplier
    pub scale: f32,
    /// Radians
    pub rotation: f32,
    /// Degrees
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl PatternJitter {
    pub const NONE: PatternJitter = PatternJitter {
        scale: 1.0,
        rotation: 0.0,
        hue: 0.0,
        saturation: 0.0,
        value: 0.0,
    };

    /// Jitter for grid cell `(gx, gy)`; a pure function of the cell and seed
    pub fn for_cell(gx: i32, gy: i32, settings: &PatternSettings) -> PatternJitter {
        let h = |salt: u32| signed_unit(hash_xy(gx, gy, settings.seed ^ salt));
        PatternJitter {
            scale: (1.0 + h(SALT_SCALE) * settings.jitter_scale).max(0.05),
            rotation: (h(SALT_ROTATION) * settings.jitter_rotation).to_radians(),
            hue: h(SALT_HUE) * settings.jitter_hue,
            saturation: h(SALT_SATURATION) * settings.jitter_saturation,
            value: h(SALT_VALUE) * settings.jitter_value,
        }
    }

    fn recolors(&self) -> bool {
        self.hue != 0.0 || self.saturation != 0.0 || self.value != 0.0
    }
}

/// Stamp `pattern` centered at `(cx, cy)`.
///
/// `base_scale` and `base_rotation` come from the tool, `jitter` from the
/// grid cell. Pixels for which `clip` returns false are skipped. Returns the
/// region written.
#[allow(clippy::too_many_arguments)]
pub fn stamp_pattern(
    target: &mut Surface,
    pattern: &Pattern,
    cx: f32,
    cy: f32,
    base_scale: f32,
    base_rotation: f32,
    jitter: &PatternJitter,
    opacity: f32,
    clip: impl Fn(i32, i32) -> bool,
) -> Rect {
    let scale = (base_scale * jitter.scale).max(0.01);
    let rotation = base_rotation + jitter.rotation;
    let (w, h) = (pattern.width() as f32, pattern.height() as f32);
    let reach = 0.5 * w.hypot(h) * scale;
    let rect = Rect::from_corners(cx - reach, cy - reach, cx + reach, cy + reach)
        .clamped(target.width(), target.height());
    if rect.is_empty() {
        return Rect::empty();
    }

    let (sin, cos) = rotation.sin_cos();
    let opacity = opacity.clamp(0.0, 1.0);
    let recolor = jitter.recolors();
    let mut written = Rect::empty();

    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            if !clip(x, y) {
                continue;
            }
            let fx = x as f32 + 0.5 - cx;
            let fy = y as f32 + 0.5 - cy;
            // Inverse rotate and scale into tile space
            let u = (fx * cos + fy * sin) / scale + w * 0.5;
            let v = (-fx * sin + fy * cos) / scale + h * 0.5;
            if u < 0.0 || v < 0.0 || u >= w || v >= h {
                continue;
            }
            let Some(px) = pattern.surface.pixel(u as i32, v as i32) else {
                continue;
            };
            if px[3] == 0 {
                continue;
            }

            let mut color = Rgb::from_u8([px[0], px[1], px[2]]);
            if recolor {
                color = shift_hsl(color, jitter.hue, jitter.saturation, jitter.value);
            }
            let i = target.index(x as u32, y as u32);
            composite_pixel(
                &mut target.data_mut()[i..i + 4],
                [color.r / 255.0, color.g / 255.0, color.b / 255.0],
                px[3] as f32 / 255.0 * opacity,
                BlendMode::Normal,
            );
            written.expand(x as f32, y as f32, 0.0);
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Pattern {
        let mut s = Surface::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                if (x + y) % 2 == 0 {
                    s.set_pixel(x, y, [10, 200, 30, 255]);
                }
            }
        }
        Pattern::from_surface(s)
    }

    #[test]
    fn test_content_hash_tracks_pixels() {
        let a = checker();
        let b = checker();
        assert_eq!(a.content_hash(), b.content_hash());
        let c = Pattern::from_surface(Surface::new(4, 4));
        assert_ne!(a.content_hash(), c.content_hash());
        assert!(c.is_blank());
        assert!(!a.is_blank());
    }

    #[test]
    fn test_jitter_is_pure() {
        let settings = PatternSettings {
            jitter_scale: 0.5,
            jitter_rotation: 45.0,
            jitter_hue: 30.0,
            seed: 7,
            ..Default::default()
        };
        assert_eq!(
            PatternJitter::for_cell(3, -2, &settings),
            PatternJitter::for_cell(3, -2, &settings)
        );
        assert_ne!(
            PatternJitter::for_cell(3, -2, &settings),
            PatternJitter::for_cell(4, -2, &settings)
        );
    }

    #[test]
    fn test_zero_jitter_is_identity() {
        let j = PatternJitter::for_cell(9, 9, &PatternSettings::default());
        assert_eq!(j, PatternJitter::NONE);
    }

    #[test]
    fn test_unrotated_stamp_copies_tile() {
        let mut target = Surface::new(16, 16);
        let written = stamp_pattern(&mut target, &checker(), 8.0, 8.0, 1.0, 0.0, &PatternJitter::NONE, 1.0, |_, _| true);
        assert_eq!(written, Rect::new(6, 6, 10, 10));
        // Tile origin lands at (6, 6)
        assert_eq!(target.pixel(6, 6), Some([10, 200, 30, 255]));
        assert_eq!(target.pixel(7, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clip_rejects_pixels() {
        let mut target = Surface::new(16, 16);
        let written = stamp_pattern(&mut target, &checker(), 8.0, 8.0, 1.0, 0.0, &PatternJitter::NONE, 1.0, |x, _| x >= 8);
        assert!(written.left >= 8);
        assert_eq!(target.pixel(6, 6), Some([0, 0, 0, 0]));
    }
}
