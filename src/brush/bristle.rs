//! Bristle particle model
//!
//! A brush is a bag of bristles laid out in brush-local unit space:
//! `dx` runs across the stroke (the brush width), `dy` along it.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use super::BrushType;
use crate::color::Rgb;
use crate::settings::PaintSettings;

const PASTEL_PARTICLES: usize = 60;
const MIN_PARTICLES: usize = 6;
const MAX_PARTICLES: usize = 600;
/// Draws before a splayed bristle is forced to the outer band
const SPLAY_ATTEMPTS: usize = 32;

/// One bristle: geometry, drift biases and the pigment it carries
#[derive(Debug, Clone, PartialEq)]
pub struct BristleParticle {
    /// Offset across the stroke, unit space
    pub dx: f32,
    /// Offset along the stroke, unit space
    pub dy: f32,
    /// Relative mark length
    pub length: f32,
    /// Relative mark thickness
    pub thickness: f32,
    /// Warm/cool drift direction, -1.0 - 1.0
    pub temperature_bias: f32,
    /// Hue drift direction, -1.0 - 1.0
    pub hue_bias: f32,
    /// Edge softness, 0.0 - 1.0
    pub feather: f32,
    /// Dryness the bristle tolerates before it stops marking
    pub dry_sensitivity: f32,
    pub color: Rgb,
    pub has_paint: bool,
}

impl BristleParticle {
    fn new<R: Rng + ?Sized>(dx: f32, dy: f32, rng: &mut R) -> Self {
        Self {
            dx,
            dy,
            length: rng.gen_range(0.8..1.2),
            thickness: rng.gen_range(0.7..1.3),
            temperature_bias: rng.gen_range(-1.0..1.0),
            hue_bias: rng.gen_range(-1.0..1.0),
            feather: rng.gen_range(0.0..1.0),
            dry_sensitivity: rng.gen_range(0.2..1.0),
            color: Rgb::BLACK,
            has_paint: false,
        }
    }
}

/// Particle set for one brush type and size
#[derive(Debug, Clone)]
pub struct BristleBrush {
    brush_type: BrushType,
    size: f32,
    color: Rgb,
    bristles: Vec<BristleParticle>,
}

impl BristleBrush {
    /// Generate bristles. Wet brushes start empty; dry ones start loaded.
    pub fn generate<R: Rng + ?Sized>(
        brush_type: BrushType,
        size: f32,
        color: Rgb,
        wet: bool,
        rng: &mut R,
    ) -> Self {
        let size = if size.is_finite() { size.max(1.0) } else { 1.0 };
        let mut bristles = if brush_type.is_pastel() {
            pastel_layout(rng)
        } else {
            let count = ((size * brush_type.particle_multiplier()).round() as usize)
                .clamp(MIN_PARTICLES, MAX_PARTICLES);
            layout(brush_type, count, rng)
        };

        if brush_type.is_pastel() {
            bristles.shuffle(rng);
        } else {
            bristles.sort_by(|a, b| a.dy.total_cmp(&b.dy).then(a.dx.total_cmp(&b.dx)));
        }

        for b in &mut bristles {
            b.color = color;
            b.has_paint = !wet;
        }

        tracing::debug!(
            "Generated {} bristles for {:?} size {:.1}",
            bristles.len(),
            brush_type,
            size
        );

        Self {
            brush_type,
            size,
            color,
            bristles,
        }
    }

    /// Bring the brush in line with `settings`.
    ///
    /// Type or size changes regenerate the geometry. A color change alone
    /// recolors bristles in place, except in wet mode where bristles keep the
    /// pigment they carry. Returns `true` when the geometry was regenerated.
    pub fn sync<R: Rng + ?Sized>(&mut self, settings: &PaintSettings, rng: &mut R) -> bool {
        let size = settings.size.max(1.0);
        if settings.brush_type != self.brush_type || (size - self.size).abs() > f32::EPSILON {
            *self = Self::generate(settings.brush_type, size, settings.color, settings.wet_mode, rng);
            return true;
        }
        if settings.color != self.color {
            self.color = settings.color;
            if !settings.wet_mode {
                for b in &mut self.bristles {
                    b.color = settings.color;
                    b.has_paint = true;
                }
            }
        }
        false
    }

    /// Load every bristle with clean paint
    pub fn reload(&mut self, color: Rgb) {
        self.color = color;
        for b in &mut self.bristles {
            b.color = color;
            b.has_paint = true;
        }
    }

    pub fn brush_type(&self) -> BrushType {
        self.brush_type
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn bristles(&self) -> &[BristleParticle] {
        &self.bristles
    }

    pub fn bristles_mut(&mut self) -> &mut [BristleParticle] {
        &mut self.bristles
    }

    pub fn len(&self) -> usize {
        self.bristles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bristles.is_empty()
    }
}

fn layout<R: Rng + ?Sized>(brush_type: BrushType, count: usize, rng: &mut R) -> Vec<BristleParticle> {
    let mut out = Vec::with_capacity(count);
    let evenly = |i: usize| {
        if count <= 1 {
            0.0
        } else {
            -1.0 + 2.0 * i as f32 / (count - 1) as f32
        }
    };

    for i in 0..count {
        let (dx, dy) = match brush_type {
            BrushType::Round => {
                // Polar-uniform: sqrt keeps area density constant
                let r = rng.gen_range(0.0f32..1.0).sqrt();
                let theta = rng.gen_range(0.0..TAU);
                (r * theta.cos(), r * theta.sin())
            }
            BrushType::Flat => (evenly(i), rng.gen_range(-0.12..0.12)),
            BrushType::Chisel => (evenly(i), rng.gen_range(-0.04..0.04)),
            BrushType::Hog => (
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-0.6..0.6),
            ),
            BrushType::Fan => (rng.gen_range(-1.0..1.0), rng.gen_range(-0.25..0.25)),
            BrushType::FanWide => {
                let x: f32 = rng.gen_range(-1.0..1.0);
                // Push bristles toward the tips
                (x.signum() * x.abs().powf(0.8), rng.gen_range(-0.15..0.15))
            }
            BrushType::FanSplay => {
                let x = splay_offset(rng);
                (x.signum() * x.abs().powf(0.6), rng.gen_range(-0.1..0.1))
            }
            BrushType::Pastel | BrushType::PastelGrain => unreachable!("pastels use pastel_layout"),
        };

        let mut b = BristleParticle::new(dx, dy, rng);
        if brush_type == BrushType::Hog {
            b.length = rng.gen_range(0.5..1.3);
        }
        out.push(b);
    }
    out
}

/// Cross offset for a splayed fan; the middle is thinned out by rejecting
/// most draws that land there
fn splay_offset<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    for _ in 0..SPLAY_ATTEMPTS {
        let x: f32 = rng.gen_range(-1.0..1.0);
        if x.abs() >= 0.5 || !rng.gen_bool(0.7) {
            return x;
        }
    }
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    side * rng.gen_range(0.5..1.0)
}

/// Uniform disk samples that avoid a few random circular voids
fn pastel_layout<R: Rng + ?Sized>(rng: &mut R) -> Vec<BristleParticle> {
    let void_count = rng.gen_range(3..=5);
    let voids: Vec<(f32, f32, f32)> = (0..void_count)
        .map(|_| {
            let r = rng.gen_range(0.0f32..0.8).sqrt();
            let theta = rng.gen_range(0.0..TAU);
            (r * theta.cos(), r * theta.sin(), rng.gen_range(0.12..0.3))
        })
        .collect();

    let mut out = Vec::with_capacity(PASTEL_PARTICLES);
    let mut attempts = 0;
    while out.len() < PASTEL_PARTICLES && attempts < PASTEL_PARTICLES * 50 {
        attempts += 1;
        let x: f32 = rng.gen_range(-1.0..1.0);
        let y: f32 = rng.gen_range(-1.0..1.0);
        if x * x + y * y > 1.0 {
            continue;
        }
        let in_void = voids
            .iter()
            .any(|&(vx, vy, vr)| (x - vx).powi(2) + (y - vy).powi(2) < vr * vr);
        if in_void {
            continue;
        }
        out.push(BristleParticle::new(x, y, rng));
    }
    out
}
