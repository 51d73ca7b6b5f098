//! OKLAB / OKLCH perceptual color space

use super::{lerp, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// Cylindrical OKLAB; hue in degrees 0-360
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

#[inline]
fn srgb_to_linear(v: f32) -> f32 {
    let v = (v / 255.0).clamp(0.0, 1.0);
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    let s = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    s * 255.0
}

pub fn rgb_to_oklab(color: Rgb) -> Oklab {
    let r = srgb_to_linear(color.r);
    let g = srgb_to_linear(color.g);
    let b = srgb_to_linear(color.b);

    let l_ = 0.412_221_46 * r + 0.536_332_55 * g + 0.051_445_995 * b;
    let m_ = 0.211_903_5 * r + 0.680_699_5 * g + 0.107_396_96 * b;
    let s_ = 0.088_302_46 * r + 0.281_718_85 * g + 0.629_978_7 * b;

    let l_c = l_.cbrt();
    let m_c = m_.cbrt();
    let s_c = s_.cbrt();

    Oklab {
        l: 0.210_454_26 * l_c + 0.793_617_8 * m_c - 0.004_072_047 * s_c,
        a: 1.977_998_5 * l_c - 2.428_592_2 * m_c + 0.450_593_7 * s_c,
        b: 0.025_904_037 * l_c + 0.782_771_77 * m_c - 0.808_675_77 * s_c,
    }
}

/// Inverse transform; output channels are clamped to 0-255
pub fn oklab_to_rgb(lab: Oklab) -> Rgb {
    let l_ = lab.l + 0.396_337_78 * lab.a + 0.215_803_76 * lab.b;
    let m_ = lab.l - 0.105_561_346 * lab.a - 0.063_854_17 * lab.b;
    let s_ = lab.l - 0.089_484_18 * lab.a - 1.291_485_5 * lab.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    Rgb::new(
        linear_to_srgb(4.076_741_7 * l - 3.307_711_6 * m + 0.230_969_94 * s),
        linear_to_srgb(-1.268_438 * l + 2.609_757_4 * m - 0.341_319_38 * s),
        linear_to_srgb(-0.004_196_086_3 * l - 0.703_418_6 * m + 1.707_614_7 * s),
    )
}

pub fn rgb_to_oklch(color: Rgb) -> Oklch {
    let lab = rgb_to_oklab(color);
    let c = (lab.a * lab.a + lab.b * lab.b).sqrt();
    // Achromatic: atan2(0, 0) is meaningless
    let h = if c < 1e-6 {
        0.0
    } else {
        lab.b.atan2(lab.a).to_degrees().rem_euclid(360.0)
    };
    Oklch { l: lab.l, c, h }
}

pub fn oklch_to_rgb(lch: Oklch) -> Rgb {
    let h = lch.h.to_radians();
    oklab_to_rgb(Oklab {
        l: lch.l,
        a: lch.c * h.cos(),
        b: lch.c * h.sin(),
    })
}

/// Perceptual mix through OKLAB interpolation
pub fn mix_oklab(c1: Rgb, c2: Rgb, t: f32) -> Rgb {
    let mut out = c1;
    mix_oklab_in_place(&mut out, c2, t);
    out
}

#[inline]
pub fn mix_oklab_in_place(target: &mut Rgb, other: Rgb, t: f32) {
    let t = t.clamp(0.0, 1.0);
    let a = rgb_to_oklab(*target);
    let b = rgb_to_oklab(other);
    *target = oklab_to_rgb(Oklab {
        l: lerp(a.l, b.l, t),
        a: lerp(a.a, b.a, t),
        b: lerp(a.b, b.b, t),
    });
}
