//! Atmospheric sky and water model
//!
//! [`calculate_sky_physics`] is a pure function of [`SkyInputs`]. The result
//! feeds a per-scanline [`SkyLut`] used for point sampling, and [`SkyCache`]
//! skips recomputation when a content hash of the inputs is unchanged.

mod keys;
mod lut;

pub use keys::{
    key_for_elevation, sun_height_factor, SkyKey, CIVIL_TWILIGHT, DAY, GOLDEN_HOUR,
    NAUTICAL_TWILIGHT, NIGHT, SUNSET,
};
pub use lut::SkyLut;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::color::{lerp_rgb, Rgb, Rgba};

/// Relative positions of the five gradient stops between zenith and horizon
const STOP_POSITIONS: [f32; 5] = [0.0, 0.35, 0.65, 0.88, 1.0];
/// Below this density the sky shifts toward a thin, deep-blue "vacuum" look
const VACUUM_DENSITY: f32 = 0.3;
const RAYLEIGH_BLUE: Rgb = Rgb::new(30.0, 70.0, 165.0);
const VACUUM_BLUE: Rgb = Rgb::new(8.0, 16.0, 55.0);
/// Deep water is darker than the ground it replaces
const WATER_DEPTH_SHADE: f32 = 0.8;

/// Physical inputs of the sky model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkyInputs {
    /// Sun elevation, roughly -1.0 (deep night) to 1.0 (overhead); 0.0 is the horizon
    pub elevation: f32,
    /// Sun position across the canvas, 0.0 - 1.0
    pub azimuth: f32,
    /// Atmospheric density, 0.0 - 1.0
    pub density: f32,
    /// 0.0 - 1.0
    pub humidity: f32,
    /// Softening of the gradient and glow, 0.0 - 1.0
    pub diffusion: f32,
    /// Horizon height as a fraction of canvas height from the top
    pub horizon: f32,
    /// Size multiplier for the sun disc and glow
    pub scale: f32,
}

impl Default for SkyInputs {
    fn default() -> Self {
        Self {
            elevation: 0.3,
            azimuth: 0.5,
            density: 0.5,
            humidity: 0.3,
            diffusion: 0.3,
            horizon: 0.7,
            scale: 1.0,
        }
    }
}

impl SkyInputs {
    /// Copy with every field finite and inside its range
    pub fn sanitized(&self) -> SkyInputs {
        let unit = |v: f32, fallback: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { fallback };
        let d = SkyInputs::default();
        SkyInputs {
            elevation: if self.elevation.is_finite() {
                self.elevation.clamp(-1.0, 1.0)
            } else {
                d.elevation
            },
            azimuth: unit(self.azimuth, d.azimuth),
            density: unit(self.density, d.density),
            humidity: unit(self.humidity, d.humidity),
            diffusion: unit(self.diffusion, d.diffusion),
            horizon: if self.horizon.is_finite() {
                self.horizon.clamp(0.05, 1.0)
            } else {
                d.horizon
            },
            scale: if self.scale.is_finite() {
                self.scale.clamp(0.1, 10.0)
            } else {
                d.scale
            },
        }
    }

    /// SHA-256 over the exact bit patterns of every input
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for v in [
            self.elevation,
            self.azimuth,
            self.density,
            self.humidity,
            self.diffusion,
            self.horizon,
            self.scale,
        ] {
            hasher.update(v.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// One color stop of the vertical gradient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position as a fraction of canvas height from the top
    pub offset: f32,
    pub color: Rgba,
}

/// Sun disc placement; coordinates are canvas fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunDisc {
    pub x: f32,
    pub y: f32,
    /// Radius as a fraction of canvas height
    pub radius: f32,
    pub color: Rgb,
    /// False once the disc is fully below the horizon
    pub visible: bool,
}

/// Radial glow around a low sun. Radii are fractions of canvas height;
/// the glow is at full color inside the core and fades out by the outer radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkyGlow {
    pub x: f32,
    pub y: f32,
    pub core_radius: f32,
    pub outer_radius: f32,
    pub color: Rgb,
    /// 0.0 - 1.0
    pub intensity: f32,
}

/// Water body below the horizon plus the glitter path of a low sun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterReflection {
    /// Water color at the bottom of the canvas
    pub base: Rgb,
    /// Water color just under the horizon
    pub mid: Rgb,
    /// Center of the glitter path, canvas fraction
    pub x: f32,
    /// Half width of the path at the horizon, canvas fraction
    pub width: f32,
    /// How far below the horizon the path reaches, canvas fraction
    pub height: f32,
    /// Glitter color
    pub color: Rgb,
    /// 0.0 - 1.0
    pub opacity: f32,
}

/// Everything the sky layer needs to draw itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyPhysics {
    pub stops: [GradientStop; 5],
    /// Horizon fraction the stops end at
    pub horizon: f32,
    pub ground: Rgb,
    pub sun: SunDisc,
    pub glow: Option<SkyGlow>,
    pub water: Option<WaterReflection>,
}

impl SkyPhysics {
    pub fn gradient_stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// Compute the sky for a set of inputs. Deterministic; out-of-range inputs
/// are clamped.
pub fn calculate_sky_physics(inputs: &SkyInputs) -> SkyPhysics {
    let inputs = inputs.sanitized();
    let e = inputs.elevation;
    let key = key_for_elevation(e);
    let sun_up = sun_height_factor(e);

    let mut colors = key.stops();
    let mean = colors.iter().fold(Rgb::BLACK, |acc, c| {
        Rgb::new(acc.r + c.r / 5.0, acc.g + c.g / 5.0, acc.b + c.b / 5.0)
    });

    for (i, color) in colors.iter_mut().enumerate() {
        // 1.0 at the zenith, 0.0 at the horizon
        let zenith_weight = 1.0 - STOP_POSITIONS[i];

        let rayleigh = inputs.density * (0.3 + 0.7 * sun_up) * 0.35 * zenith_weight;
        *color = lerp_rgb(*color, RAYLEIGH_BLUE, rayleigh);

        if inputs.density < VACUUM_DENSITY {
            let v = (VACUUM_DENSITY - inputs.density) / VACUUM_DENSITY;
            let gray = color.luminance() * 255.0;
            *color = lerp_rgb(*color, Rgb::new(gray, gray, gray), v * 0.6);
            *color = lerp_rgb(*color, VACUUM_BLUE, v * (0.3 + 0.5 * zenith_weight));
        }

        let haze = inputs.humidity * inputs.density;
        if haze > 0.0 {
            let l = key.horizon.luminance() * 255.0;
            let haze_color = lerp_rgb(key.horizon, Rgb::new(l, l, l), 0.5);
            *color = lerp_rgb(*color, haze_color, haze * 0.5 * (1.0 - 0.5 * zenith_weight));
        }

        *color = lerp_rgb(*color, mean, inputs.diffusion * 0.25);
    }

    let zenith = colors[0];
    let horizon_color = colors[4];
    let stops = std::array::from_fn(|i| GradientStop {
        offset: STOP_POSITIONS[i] * inputs.horizon,
        color: Rgba::from_rgb(colors[i], 255),
    });

    // Elevation 0.0 puts the disc center on the horizon; 0.6 near the top
    let sun_y = (inputs.horizon * (1.0 - e / 0.6)).clamp(-0.2, 1.2);
    let sun_radius = 0.03 * inputs.scale;
    let sun = SunDisc {
        x: inputs.azimuth,
        y: sun_y,
        radius: sun_radius,
        color: key.sun,
        visible: sun_y - sun_radius < inputs.horizon,
    };

    let glow = (e > -0.12).then(|| {
        let intensity = ((1.0 - e.abs() / 0.35) * (0.5 + 0.5 * inputs.humidity)).clamp(0.0, 1.0);
        SkyGlow {
            x: inputs.azimuth,
            y: sun_y.min(inputs.horizon),
            core_radius: (0.06 + 0.04 * inputs.diffusion) * inputs.scale,
            outer_radius: (0.25 + 0.25 * inputs.diffusion) * inputs.scale,
            color: lerp_rgb(key.glow, key.sun, 0.3),
            intensity,
        }
    });

    let water = (e > -0.06 && e < 0.25).then(|| {
        // Path is widest with the sun on the horizon
        let lowness = (1.0 - (e + 0.06) / 0.31).clamp(0.0, 1.0);
        let deep = lerp_rgb(key.ground, zenith, 0.25);
        WaterReflection {
            base: Rgb::new(deep.r * WATER_DEPTH_SHADE, deep.g * WATER_DEPTH_SHADE, deep.b * WATER_DEPTH_SHADE),
            mid: lerp_rgb(horizon_color, key.glow, 0.3),
            x: inputs.azimuth,
            width: 0.02 + 0.12 * lowness,
            height: (1.0 - inputs.horizon) * (0.3 + 0.7 * lowness),
            color: lerp_rgb(key.sun, key.glow, 0.4),
            opacity: (0.4 + 0.6 * lowness) * (1.0 - 0.5 * inputs.humidity),
        }
    });

    SkyPhysics {
        stops,
        horizon: inputs.horizon,
        ground: key.ground,
        sun,
        glow,
        water,
    }
}

/// Sky state keyed by a content hash of its inputs
#[derive(Debug, Clone, Default)]
pub struct SkyCache {
    hash: Option<String>,
    physics: Option<SkyPhysics>,
    lut: Option<SkyLut>,
}

impl SkyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute if `inputs`, `water` or `height` changed. Returns whether
    /// anything was recomputed.
    pub fn update(&mut self, inputs: &SkyInputs, water: bool, height: u32) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(inputs.content_hash().as_bytes());
        hasher.update([water as u8]);
        hasher.update(height.to_le_bytes());
        let hash = hex::encode(hasher.finalize());

        if self.hash.as_deref() == Some(hash.as_str()) {
            return false;
        }

        let physics = calculate_sky_physics(inputs);
        self.lut = Some(SkyLut::build(&physics, height, water));
        self.physics = Some(physics);
        tracing::debug!("Sky recomputed, hash {}", &hash[..12]);
        self.hash = Some(hash);
        true
    }

    /// Forget everything; the next `update` always recomputes
    pub fn invalidate(&mut self) {
        self.hash = None;
        self.physics = None;
        self.lut = None;
    }

    pub fn physics(&self) -> Option<&SkyPhysics> {
        self.physics.as_ref()
    }

    pub fn lut(&self) -> Option<&SkyLut> {
        self.lut.as_ref()
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }
}
