//! Brush engine module - bristle particles, stroke stamping and wet diffusion

mod bristle;
mod interpolation;
mod stroke;
mod wet;

pub use bristle::{BristleBrush, BristleParticle};
pub use interpolation::smooth_closed_path;
pub use stroke::{texture_influence, BatchOutcome, StrokeRenderer, StrokeState};
pub use wet::{diffuse_bristle, wet_fill_color, WetBuffer};

use serde::{Deserialize, Serialize};

/// Brush families; each has its own bristle layout and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BrushType {
    /// Disk of bristles
    #[default]
    Round,
    /// Evenly spaced row
    Flat,
    /// Thin rigid row that turns quickly with the heading
    Chisel,
    /// Coarse, loosely scattered bristles
    Hog,
    Fan,
    FanWide,
    /// Widest fan, sparse in the middle
    FanSplay,
    /// Dry stick with voids, stamps thin rectangles
    Pastel,
    /// Dry stick with voids, stamps small squares
    PastelGrain,
}

impl BrushType {
    pub fn is_pastel(self) -> bool {
        matches!(self, BrushType::Pastel | BrushType::PastelGrain)
    }

    /// Bristles per pixel of brush size (non-pastel types)
    pub fn particle_multiplier(self) -> f32 {
        match self {
            BrushType::Round => 1.5,
            BrushType::Flat | BrushType::Chisel => 2.0,
            BrushType::Hog => 1.2,
            BrushType::Fan => 2.0,
            BrushType::FanWide => 2.5,
            BrushType::FanSplay => 3.5,
            BrushType::Pastel | BrushType::PastelGrain => 0.0,
        }
    }

    /// Fraction of the heading error corrected per move
    pub fn rotation_speed(self) -> f32 {
        match self {
            BrushType::Chisel => 0.6,
            BrushType::Round | BrushType::Flat => 0.25,
            _ => 0.3,
        }
    }

    /// Exponent of the pressure-to-alpha curve
    pub fn pressure_exponent(self) -> f32 {
        match self {
            BrushType::FanWide | BrushType::FanSplay => 2.0,
            BrushType::Fan => 1.5,
            BrushType::Hog => 1.2,
            BrushType::Chisel => 1.0,
            BrushType::Pastel | BrushType::PastelGrain => 0.8,
            BrushType::Round | BrushType::Flat => 1.1,
        }
    }

    /// Cross-stroke spread multiplier at the given pressure
    pub fn spread(self, pressure: f32) -> f32 {
        let p = pressure.clamp(0.0, 1.0);
        match self {
            BrushType::Fan => 1.0 + 0.5 * p * p,
            BrushType::FanWide => 1.0 + 0.8 * p * p,
            BrushType::FanSplay => 1.0 + 1.2 * p * p,
            BrushType::Flat => 1.0 + 0.1 * p,
            BrushType::Round => 1.0 + 0.05 * p,
            BrushType::Hog => 1.0 + 0.15 * p,
            BrushType::Chisel | BrushType::Pastel | BrushType::PastelGrain => 1.0,
        }
    }

    /// Random positional scatter as a fraction of the brush radius
    pub fn chaos(self) -> f32 {
        match self {
            BrushType::Hog => 0.12,
            BrushType::FanSplay => 0.05,
            BrushType::Pastel | BrushType::PastelGrain => 0.15,
            _ => 0.0,
        }
    }

    /// Apply the type's pressure curve
    pub fn pressure_curve(self, pressure: f32) -> f32 {
        pressure.clamp(0.0, 1.0).powf(self.pressure_exponent())
    }
}
