//! Reference sky palettes and elevation blending

use crate::color::{lerp_rgb, Rgb};

/// Palette for one time-of-day band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyKey {
    /// Top of the sky
    pub zenith: Rgb,
    pub upper: Rgb,
    pub middle: Rgb,
    /// Band just above the horizon where the sun glow sits
    pub glow: Rgb,
    pub horizon: Rgb,
    /// Land below the horizon
    pub ground: Rgb,
    /// Sun disc
    pub sun: Rgb,
}

impl SkyKey {
    /// The five gradient colors, top to bottom
    pub fn stops(&self) -> [Rgb; 5] {
        [self.zenith, self.upper, self.middle, self.glow, self.horizon]
    }

    pub fn blend(&self, other: &SkyKey, t: f32) -> SkyKey {
        SkyKey {
            zenith: lerp_rgb(self.zenith, other.zenith, t),
            upper: lerp_rgb(self.upper, other.upper, t),
            middle: lerp_rgb(self.middle, other.middle, t),
            glow: lerp_rgb(self.glow, other.glow, t),
            horizon: lerp_rgb(self.horizon, other.horizon, t),
            ground: lerp_rgb(self.ground, other.ground, t),
            sun: lerp_rgb(self.sun, other.sun, t),
        }
    }
}

const fn rgb(r: f32, g: f32, b: f32) -> Rgb {
    Rgb::new(r, g, b)
}

pub const DAY: SkyKey = SkyKey {
    zenith: rgb(40.0, 90.0, 190.0),
    upper: rgb(80.0, 140.0, 215.0),
    middle: rgb(130.0, 180.0, 230.0),
    glow: rgb(185.0, 215.0, 240.0),
    horizon: rgb(215.0, 230.0, 240.0),
    ground: rgb(90.0, 110.0, 90.0),
    sun: rgb(255.0, 252.0, 235.0),
};

pub const GOLDEN_HOUR: SkyKey = SkyKey {
    zenith: rgb(60.0, 95.0, 170.0),
    upper: rgb(110.0, 140.0, 195.0),
    middle: rgb(200.0, 175.0, 160.0),
    glow: rgb(245.0, 190.0, 120.0),
    horizon: rgb(255.0, 200.0, 120.0),
    ground: rgb(90.0, 80.0, 60.0),
    sun: rgb(255.0, 210.0, 140.0),
};

pub const SUNSET: SkyKey = SkyKey {
    zenith: rgb(45.0, 60.0, 120.0),
    upper: rgb(110.0, 90.0, 150.0),
    middle: rgb(210.0, 110.0, 110.0),
    glow: rgb(250.0, 140.0, 70.0),
    horizon: rgb(255.0, 120.0, 50.0),
    ground: rgb(60.0, 45.0, 40.0),
    sun: rgb(255.0, 140.0, 60.0),
};

pub const CIVIL_TWILIGHT: SkyKey = SkyKey {
    zenith: rgb(25.0, 35.0, 80.0),
    upper: rgb(60.0, 60.0, 115.0),
    middle: rgb(140.0, 85.0, 120.0),
    glow: rgb(210.0, 110.0, 95.0),
    horizon: rgb(230.0, 130.0, 90.0),
    ground: rgb(35.0, 30.0, 35.0),
    sun: rgb(240.0, 110.0, 70.0),
};

pub const NAUTICAL_TWILIGHT: SkyKey = SkyKey {
    zenith: rgb(12.0, 18.0, 45.0),
    upper: rgb(22.0, 30.0, 70.0),
    middle: rgb(45.0, 50.0, 95.0),
    glow: rgb(85.0, 70.0, 110.0),
    horizon: rgb(110.0, 85.0, 115.0),
    ground: rgb(18.0, 18.0, 25.0),
    sun: rgb(150.0, 80.0, 80.0),
};

pub const NIGHT: SkyKey = SkyKey {
    zenith: rgb(4.0, 6.0, 16.0),
    upper: rgb(8.0, 12.0, 28.0),
    middle: rgb(14.0, 20.0, 40.0),
    glow: rgb(20.0, 26.0, 48.0),
    horizon: rgb(26.0, 32.0, 55.0),
    ground: rgb(6.0, 6.0, 10.0),
    sun: rgb(60.0, 60.0, 80.0),
};

/// Elevation breakpoints, highest first. Night is fully reached at -0.35.
const BANDS: [(f32, SkyKey); 6] = [
    (0.2, DAY),
    (0.0, GOLDEN_HOUR),
    (-0.06, SUNSET),
    (-0.12, CIVIL_TWILIGHT),
    (-0.25, NAUTICAL_TWILIGHT),
    (-0.35, NIGHT),
];

/// Piecewise-linear palette for a sun elevation
pub fn key_for_elevation(elevation: f32) -> SkyKey {
    let e = if elevation.is_finite() { elevation } else { 0.0 };
    if e >= BANDS[0].0 {
        return BANDS[0].1;
    }
    for pair in BANDS.windows(2) {
        let (hi_e, hi_key) = pair[0];
        let (lo_e, lo_key) = pair[1];
        if e >= lo_e {
            let t = (e - lo_e) / (hi_e - lo_e);
            return lo_key.blend(&hi_key, t);
        }
    }
    NIGHT
}

/// 0.0 below the horizon band, rising to 1.0 for a high sun
pub fn sun_height_factor(elevation: f32) -> f32 {
    ((elevation + 0.1) / 0.3).clamp(0.0, 1.0)
}
