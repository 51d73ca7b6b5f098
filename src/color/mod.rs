//! Color mathematics - numeric color records and conversions between spaces
//!
//! All functions here are pure. Channels of [`Rgb`] are kept as `f32` in the
//! 0-255 range so that repeated small mixes on the stamping path do not stall
//! on integer rounding.

mod hsx;
mod oklab;
mod pigment;

pub use hsx::{
    hsl_to_rgb, hsv_to_rgb, rgb_to_hsl, rgb_to_hsv, shift_hsl, shift_temperature, Hsl, Hsv,
};
pub use oklab::{
    mix_oklab, mix_oklab_in_place, oklab_to_rgb, oklch_to_rgb, rgb_to_oklab, rgb_to_oklch, Oklab,
    Oklch,
};
pub use pigment::{cmyk_to_rgb, mix_pigments, mix_pigments_in_place, rgb_to_cmyk, Cmyk};

use serde::{Deserialize, Serialize};

/// RGB color with channels in 0.0 - 255.0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32)
    }

    /// Round and clamp to 8-bit channels
    pub fn to_u8(self) -> [u8; 3] {
        [to_channel(self.r), to_channel(self.g), to_channel(self.b)]
    }

    /// Same color with every channel clamped into 0-255
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 255.0),
            self.g.clamp(0.0, 255.0),
            self.b.clamp(0.0, 255.0),
        )
    }

    /// Rec.601 luminance in 0.0 - 1.0
    pub fn luminance(self) -> f32 {
        (0.299 * self.r + 0.587 * self.g + 0.114 * self.b) / 255.0
    }
}

/// RGBA color, 8-bit straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb(rgb: Rgb, a: u8) -> Self {
        let [r, g, b] = rgb.to_u8();
        Self { r, g, b, a }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::from_u8([self.r, self.g, self.b])
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }
}

#[inline]
pub(crate) fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Parse `#rrggbb`, `rrggbb` or `#rgb`. Anything malformed yields black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let digits = hex.trim().trim_start_matches('#');

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Rgb::BLACK,
    };

    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Rgb::from_u8([r, g, b]),
        _ => Rgb::BLACK,
    }
}

/// Format as lowercase `#rrggbb`
pub fn rgb_to_hex(color: Rgb) -> String {
    let [r, g, b] = color.to_u8();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Color space wet paint is mixed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixSpace {
    /// Subtractive CMYK interpolation, darkens toward the pigment's key
    #[default]
    Pigment,
    /// Perceptual interpolation, keeps blends clean
    Oklab,
}

impl MixSpace {
    pub fn mix(self, c1: Rgb, c2: Rgb, t: f32) -> Rgb {
        let mut out = c1;
        self.mix_in_place(&mut out, c2, t);
        out
    }

    #[inline]
    pub fn mix_in_place(self, target: &mut Rgb, other: Rgb, t: f32) {
        match self {
            MixSpace::Pigment => mix_pigments_in_place(target, other, t),
            MixSpace::Oklab => mix_oklab_in_place(target, other, t),
        }
    }
}

/// Plain per-channel RGB interpolation (not pigment aware)
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    Rgb::new(lerp(a.r, b.r, t), lerp(a.g, b.g, t), lerp(a.b, b.b, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for &(r, g, b) in &[(0u8, 0u8, 0u8), (255, 255, 255), (204, 51, 51), (1, 128, 254)] {
            let c = Rgb::from_u8([r, g, b]);
            assert_eq!(hex_to_rgb(&rgb_to_hex(c)), c);
        }
    }

    #[test]
    fn test_hex_short_form() {
        assert_eq!(hex_to_rgb("#f00"), Rgb::new(255.0, 0.0, 0.0));
        assert_eq!(hex_to_rgb("CC3333"), Rgb::new(204.0, 51.0, 51.0));
    }

    #[test]
    fn test_malformed_hex_is_black() {
        assert_eq!(hex_to_rgb(""), Rgb::BLACK);
        assert_eq!(hex_to_rgb("#12345"), Rgb::BLACK);
        assert_eq!(hex_to_rgb("#zzzzzz"), Rgb::BLACK);
        assert_eq!(hex_to_rgb("#ÿÿÿ"), Rgb::BLACK);
    }

    #[test]
    fn test_lerp_rgb_clamps_t() {
        let a = Rgb::BLACK;
        let b = Rgb::WHITE;
        assert_eq!(lerp_rgb(a, b, 2.0), b);
        assert_eq!(lerp_rgb(a, b, -1.0), a);
    }

    #[test]
    fn test_mix_spaces_disagree_on_complements() {
        let blue = Rgb::new(0.0, 0.0, 255.0);
        let yellow = Rgb::new(255.0, 255.0, 0.0);
        let pigment = MixSpace::Pigment.mix(blue, yellow, 0.5);
        let oklab = MixSpace::Oklab.mix(blue, yellow, 0.5);
        assert_eq!(pigment, mix_pigments(blue, yellow, 0.5));
        assert_eq!(oklab, mix_oklab(blue, yellow, 0.5));
        assert_ne!(pigment, oklab);
    }
}
