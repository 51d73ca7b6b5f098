//! HSV / HSL cylinders and the small color shifts used for bristle variation

use super::Rgb;

/// Hue in degrees, saturation and value in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Hue in degrees, saturation and lightness in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

fn hue_of(r: f32, g: f32, b: f32, max: f32, delta: f32) -> f32 {
    if delta <= f32::EPSILON {
        return 0.0;
    }
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    (h * 60.0).rem_euclid(360.0)
}

fn from_hue_chroma(h: f32, c: f32, m: f32) -> Rgb {
    let h = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::new((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
}

pub fn rgb_to_hsv(color: Rgb) -> Hsv {
    let c = color.clamped();
    let (r, g, b) = (c.r / 255.0, c.g / 255.0, c.b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    Hsv {
        h: hue_of(r, g, b, max, delta),
        s: if max <= f32::EPSILON { 0.0 } else { delta / max },
        v: max,
    }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let v = hsv.v.clamp(0.0, 1.0);
    let c = v * hsv.s.clamp(0.0, 1.0);
    from_hue_chroma(hsv.h, c, v - c)
}

pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let c = color.clamped();
    let (r, g, b) = (c.r / 255.0, c.g / 255.0, c.b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    let s = if delta <= f32::EPSILON {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };

    Hsl {
        h: hue_of(r, g, b, max, delta),
        s: s.clamp(0.0, 1.0),
        l,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let l = hsl.l.clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * hsl.s.clamp(0.0, 1.0);
    from_hue_chroma(hsl.h, c, l - c / 2.0)
}

/// Rotate hue (wrapping) and nudge saturation/lightness (clamped)
pub fn shift_hsl(color: Rgb, hue_deg: f32, sat_delta: f32, light_delta: f32) -> Rgb {
    let hsl = rgb_to_hsl(color);
    hsl_to_rgb(Hsl {
        h: (hsl.h + hue_deg).rem_euclid(360.0),
        s: (hsl.s + sat_delta).clamp(0.0, 1.0),
        l: (hsl.l + light_delta).clamp(0.0, 1.0),
    })
}

/// Warm (positive) or cool (negative) bias, `amount` in -1.0 - 1.0
pub fn shift_temperature(color: Rgb, amount: f32) -> Rgb {
    let shift = amount.clamp(-1.0, 1.0) * 40.0;
    Rgb::new(color.r + shift, color.g + shift * 0.2, color.b - shift).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        let red = rgb_to_hsv(Rgb::new(255.0, 0.0, 0.0));
        assert_eq!(red.h, 0.0);
        assert_eq!(red.s, 1.0);
        assert_eq!(red.v, 1.0);

        let blue = rgb_to_hsv(Rgb::new(0.0, 0.0, 255.0));
        assert!((blue.h - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_hsv_round_trip() {
        let c = Rgb::new(30.0, 200.0, 120.0);
        let back = hsv_to_rgb(rgb_to_hsv(c));
        assert!((back.r - c.r).abs() < 0.5);
        assert!((back.g - c.g).abs() < 0.5);
        assert!((back.b - c.b).abs() < 0.5);
    }

    #[test]
    fn test_hsl_round_trip() {
        let c = Rgb::new(204.0, 51.0, 51.0);
        let back = hsl_to_rgb(rgb_to_hsl(c));
        assert!((back.r - c.r).abs() < 0.5);
        assert!((back.g - c.g).abs() < 0.5);
        assert!((back.b - c.b).abs() < 0.5);
    }

    #[test]
    fn test_shift_hsl_wraps_hue() {
        let red = Rgb::new(255.0, 0.0, 0.0);
        let shifted = shift_hsl(red, 480.0, 0.0, 0.0);
        // 480 wraps to 120: green
        assert!(shifted.g > 250.0 && shifted.r < 5.0);

        let back = shift_hsl(red, -360.0, 0.0, 0.0);
        assert!(back.r > 250.0);
    }

    #[test]
    fn test_shift_hsl_clamps() {
        let grey = Rgb::new(128.0, 128.0, 128.0);
        let white = shift_hsl(grey, 0.0, -5.0, 5.0);
        assert_eq!(white.to_u8(), [255, 255, 255]);
    }

    #[test]
    fn test_temperature_direction() {
        let grey = Rgb::new(128.0, 128.0, 128.0);
        let warm = shift_temperature(grey, 1.0);
        let cool = shift_temperature(grey, -1.0);
        assert!(warm.r > warm.b);
        assert!(cool.b > cool.r);
    }
}
