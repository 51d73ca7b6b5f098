//! Painting settings - the immutable snapshot passed into every operation
//!
//! Collaborators build a [`PaintSettings`] (directly or from JSON) and hand it
//! to the engine on each call. The engine never reads ambient state.

use serde::{Deserialize, Serialize};

use crate::brush::BrushType;
use crate::color::{MixSpace, Rgb};
use crate::core::errors::CoreError;
use crate::raster::BlendMode;
use crate::sky::SkyInputs;

/// Empirically tuned constants of the paint model.
///
/// These produce plausible gouache behavior; none of them is load-bearing for
/// correctness, so they are exposed rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tuning {
    /// Fraction of canvas color mixed into a loaded bristle per wet contact
    pub wet_pickup_mix: f32,
    /// Canvas alpha (0-255) above which wet paint is picked up
    pub wet_pickup_alpha: u8,
    /// Paint load gained when an empty bristle picks up canvas paint
    pub pickup_load_gain: f32,
    /// Paint load gained when a loaded bristle mixes with canvas paint
    pub mix_load_gain: f32,
    /// Paint load lost per pixel of travel in dry mode
    pub dry_depletion_per_px: f32,
    /// Paint load lost per pixel of travel in wet mode
    pub wet_depletion_per_px: f32,
    /// Extra depletion at full speed (multiplier is `1 + factor * speed`)
    pub speed_depletion_factor: f32,
    /// Paint load guaranteed at stroke start when auto-clean is off
    pub min_load_floor: f32,
    /// Amplitude of positional noise in the dryness test
    pub dryness_noise: f32,
    /// Interpolation step as a fraction of brush size
    pub step_fraction: f32,
    /// Samples closer than this to the previous one are dropped (px)
    pub min_sample_distance: f32,
    /// Heading only updates on moves longer than this (px)
    pub heading_jump: f32,
    /// Texture influence independent of pressure and dryness
    pub texture_base_influence: f32,
    /// Texture influence added as the brush dries out
    pub texture_dry_weight: f32,
    /// Texture influence added as pressure lightens
    pub texture_pressure_weight: f32,
    /// Canvas color mixed into a wet region fill
    pub fill_wet_mix: f32,
    /// Space bristle pickup and wet fills mix in
    pub wet_mix_space: MixSpace,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            wet_pickup_mix: 0.10,
            wet_pickup_alpha: 20,
            pickup_load_gain: 0.05,
            mix_load_gain: 0.005,
            dry_depletion_per_px: 0.0008,
            wet_depletion_per_px: 0.0003,
            speed_depletion_factor: 1.0,
            min_load_floor: 0.35,
            dryness_noise: 0.3,
            step_fraction: 0.1,
            min_sample_distance: 0.5,
            heading_jump: 4.0,
            texture_base_influence: 0.35,
            texture_dry_weight: 0.4,
            texture_pressure_weight: 0.25,
            fill_wet_mix: 0.3,
            wet_mix_space: MixSpace::Pigment,
        }
    }
}

impl Tuning {
    /// Worst-case paint load lost per pixel of travel
    pub fn max_depletion_per_px(&self, wet: bool) -> f32 {
        let base = if wet {
            self.wet_depletion_per_px
        } else {
            self.dry_depletion_per_px
        };
        base * (1.0 + self.speed_depletion_factor.max(0.0))
    }
}

/// Pattern stamping layout and per-instance jitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternSettings {
    /// Stamp scale relative to the pattern's pixel size
    pub scale: f32,
    /// Grid / line spacing as a multiple of the scaled tile size
    pub spacing: f32,
    pub jitter_scale: f32,
    /// Maximum rotation jitter in degrees
    pub jitter_rotation: f32,
    /// Maximum hue jitter in degrees
    pub jitter_hue: f32,
    pub jitter_saturation: f32,
    pub jitter_value: f32,
    /// Mixed into the grid hash so different seeds give different layouts
    pub seed: u32,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            spacing: 1.0,
            jitter_scale: 0.0,
            jitter_rotation: 0.0,
            jitter_hue: 0.0,
            jitter_saturation: 0.0,
            jitter_value: 0.0,
            seed: 0,
        }
    }
}

/// Sky reference layer toggles and physical inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkySettings {
    pub enabled: bool,
    pub water_enabled: bool,
    #[serde(flatten)]
    pub inputs: SkyInputs,
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            water_enabled: true,
            inputs: SkyInputs::default(),
        }
    }
}

/// Full settings snapshot for one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaintSettings {
    pub brush_type: BrushType,
    /// Brush diameter in pixels
    pub size: f32,
    /// 0.0 - 1.0
    pub opacity: f32,
    pub color: Rgb,
    /// Second color for gradient fills
    pub secondary_color: Rgb,
    /// Gradient fills pick per pixel at random instead of mixing smoothly
    pub gradient_dither: bool,
    pub blend_mode: BlendMode,
    pub eraser: bool,
    pub wet_mode: bool,
    /// Reload bristles with clean paint at every stroke start
    pub auto_clean: bool,
    pub texture_enabled: bool,
    /// 0.0 - 1.0
    pub texture_strength: f32,
    /// Per-bristle hue drift in degrees at full bias
    pub hue_variation: f32,
    /// Per-bristle warm/cool drift, 0.0 - 1.0
    pub temperature_variation: f32,
    /// Per-stipple lightness jitter, 0.0 - 1.0
    pub value_variation: f32,
    pub pattern: PatternSettings,
    /// Dots per 100 square pixels
    pub stipple_density: f32,
    /// Stipple dot radius in pixels
    pub stipple_size: f32,
    pub background: Rgb,
    pub sky: SkySettings,
    pub tuning: Tuning,
}

impl Default for PaintSettings {
    fn default() -> Self {
        Self {
            brush_type: BrushType::Round,
            size: 20.0,
            opacity: 1.0,
            color: Rgb::BLACK,
            secondary_color: Rgb::WHITE,
            gradient_dither: true,
            blend_mode: BlendMode::Normal,
            eraser: false,
            wet_mode: false,
            auto_clean: true,
            texture_enabled: false,
            texture_strength: 0.5,
            hue_variation: 0.0,
            temperature_variation: 0.0,
            value_variation: 0.0,
            pattern: PatternSettings::default(),
            stipple_density: 4.0,
            stipple_size: 1.5,
            background: Rgb::WHITE,
            sky: SkySettings::default(),
            tuning: Tuning::default(),
        }
    }
}

impl PaintSettings {
    /// Parse from the collaborator JSON schema; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Strict check for collaborators that want to reject bad input up front.
///
/// The engine itself clamps, so skipping this never causes a failure.
pub fn validate_settings(settings: &PaintSettings) -> Result<(), CoreError> {
    if !settings.size.is_finite() || settings.size <= 0.0 {
        return Err(CoreError::InvalidInput(
            "Brush size must be a positive finite number".to_string(),
        ));
    }
    let unit_fields = [
        ("opacity", settings.opacity),
        ("textureStrength", settings.texture_strength),
        ("temperatureVariation", settings.temperature_variation),
        ("valueVariation", settings.value_variation),
    ];
    for (name, value) in unit_fields {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(CoreError::InvalidInput(format!("{name} must be in [0, 1]")));
        }
    }
    for c in [settings.color, settings.secondary_color, settings.background] {
        for ch in [c.r, c.g, c.b] {
            if !ch.is_finite() || !(0.0..=255.0).contains(&ch) {
                return Err(CoreError::InvalidInput(
                    "Color channels must be in [0, 255]".to_string(),
                ));
            }
        }
    }
    if !settings.pattern.scale.is_finite() || settings.pattern.scale <= 0.0 {
        return Err(CoreError::InvalidInput(
            "Pattern scale must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(validate_settings(&PaintSettings::default()).is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = PaintSettings::from_json(
            r#"{ "brushType": "fan-splay", "size": 40, "wetMode": true, "tuning": { "wetPickupMix": 0.2, "wetMixSpace": "oklab" } }"#,
        )
        .unwrap();
        assert_eq!(settings.brush_type, BrushType::FanSplay);
        assert_eq!(settings.size, 40.0);
        assert!(settings.wet_mode);
        assert_eq!(settings.tuning.wet_pickup_mix, 0.2);
        assert_eq!(settings.tuning.wet_mix_space, MixSpace::Oklab);
        assert_eq!(settings.tuning.min_sample_distance, 0.5);
        assert_eq!(settings.opacity, 1.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(PaintSettings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let settings = PaintSettings {
            opacity: 1.5,
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());

        let settings = PaintSettings {
            size: f32::NAN,
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_sky_inputs_flatten() {
        let settings =
            PaintSettings::from_json(r#"{ "sky": { "enabled": true, "elevation": -0.05 } }"#).unwrap();
        assert!(settings.sky.enabled);
        assert_eq!(settings.sky.inputs.elevation, -0.05);
    }
}
