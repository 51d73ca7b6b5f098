//! Per-scanline sky colors for O(1) point sampling

use super::SkyPhysics;
use crate::color::{lerp_rgb, Rgb, Rgba};

/// Water darkens the mirrored sky by this factor
const WATER_SHADE: f32 = 0.75;
/// Share of the water body colors in the mirrored rows
const WATER_BODY_MIX: f32 = 0.4;

/// One RGBA entry per canvas row, built from the gradient stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyLut {
    height: u32,
    rows: Vec<u8>,
}

impl SkyLut {
    /// Build for a canvas `height` rows tall. Rows below the horizon show the
    /// ground, or the mirrored sky when `water` is set.
    pub fn build(physics: &SkyPhysics, height: u32, water: bool) -> Self {
        let height = height.max(1);
        let horizon = physics.horizon;
        let mut rows = Vec::with_capacity(height as usize * 4);

        for y in 0..height {
            let f = (y as f32 + 0.5) / height as f32;
            let color = if f <= horizon {
                gradient_at(physics, f)
            } else if water {
                let mirrored = (2.0 * horizon - f).max(0.0);
                let sky = gradient_at(physics, mirrored);
                let shaded = Rgb::new(sky.r * WATER_SHADE, sky.g * WATER_SHADE, sky.b * WATER_SHADE);
                match &physics.water {
                    Some(body) => {
                        let depth = ((f - horizon) / (1.0 - horizon).max(f32::EPSILON)).clamp(0.0, 1.0);
                        lerp_rgb(shaded, lerp_rgb(body.mid, body.base, depth), WATER_BODY_MIX)
                    }
                    None => lerp_rgb(shaded, physics.ground, 0.2),
                }
            } else {
                physics.ground
            };
            let [r, g, b] = color.to_u8();
            rows.extend_from_slice(&[r, g, b, 255]);
        }

        Self { height, rows }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of canvas row `y`; rows outside the canvas clamp to the edge
    pub fn sample(&self, y: i32) -> Rgba {
        let row = y.clamp(0, self.height as i32 - 1) as usize * 4;
        Rgba::from_array([
            self.rows[row],
            self.rows[row + 1],
            self.rows[row + 2],
            self.rows[row + 3],
        ])
    }

    /// Packed RGBA rows, top to bottom
    pub fn as_bytes(&self) -> &[u8] {
        &self.rows
    }
}

/// Piecewise-linear interpolation of the stops at canvas fraction `f`
fn gradient_at(physics: &SkyPhysics, f: f32) -> Rgb {
    let stops = physics.gradient_stops();
    let first = stops[0];
    if f <= first.offset {
        return first.color.rgb();
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if f <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return lerp_rgb(a.color.rgb(), b.color.rgb(), (f - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color.rgb()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::{calculate_sky_physics, SkyInputs};

    #[test]
    fn test_one_row_per_scanline() {
        let sky = calculate_sky_physics(&SkyInputs::default());
        let lut = SkyLut::build(&sky, 100, false);
        assert_eq!(lut.height(), 100);
        assert_eq!(lut.as_bytes().len(), 400);
    }

    #[test]
    fn test_top_row_matches_zenith_stop() {
        let sky = calculate_sky_physics(&SkyInputs::default());
        let lut = SkyLut::build(&sky, 1000, false);
        let top = lut.sample(0);
        let zenith = sky.stops[0].color;
        assert!((top.r as i32 - zenith.r as i32).abs() <= 2);
        assert!((top.b as i32 - zenith.b as i32).abs() <= 2);
    }

    #[test]
    fn test_ground_below_horizon() {
        let sky = calculate_sky_physics(&SkyInputs::default());
        let lut = SkyLut::build(&sky, 100, false);
        assert_eq!(lut.sample(99).rgb(), Rgb::from_u8(sky.ground.to_u8()));
    }

    #[test]
    fn test_water_mirrors_sky() {
        let sky = calculate_sky_physics(&SkyInputs::default());
        let dry = SkyLut::build(&sky, 100, false);
        let wet = SkyLut::build(&sky, 100, true);
        assert_eq!(dry.sample(10), wet.sample(10));
        assert_ne!(dry.sample(90), wet.sample(90));
    }

    #[test]
    fn test_water_body_darkens_with_depth() {
        let sky = calculate_sky_physics(&SkyInputs {
            elevation: 0.05,
            horizon: 0.5,
            ..Default::default()
        });
        let body = sky.water.unwrap_or_else(|| panic!("low sun should produce water"));
        let lut = SkyLut::build(&sky, 200, true);

        let mut no_body = sky.clone();
        no_body.water = None;
        let plain = SkyLut::build(&no_body, 200, true);
        assert_ne!(lut.sample(150), plain.sample(150));

        let near = lut.sample(102).rgb().luminance();
        let deep = lut.sample(199).rgb().luminance();
        assert!(body.base.luminance() < body.mid.luminance());
        assert!(deep < near);
    }

    #[test]
    fn test_sample_clamps() {
        let sky = calculate_sky_physics(&SkyInputs::default());
        let lut = SkyLut::build(&sky, 10, false);
        assert_eq!(lut.sample(-5), lut.sample(0));
        assert_eq!(lut.sample(500), lut.sample(9));
    }
}
