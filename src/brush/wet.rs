//! Wet-into-wet pigment exchange between bristles and the painting

use super::BristleParticle;
use crate::color::Rgb;
use crate::raster::{flatten_into, Rect, Surface};
use crate::settings::Tuning;

/// Flattened copy of the visible layers over the current gesture bounds.
///
/// The surface is reused between captures and only grows.
#[derive(Debug, Clone)]
pub struct WetBuffer {
    rect: Rect,
    surface: Surface,
}

impl Default for WetBuffer {
    fn default() -> Self {
        Self {
            rect: Rect::empty(),
            surface: Surface::new(1, 1),
        }
    }
}

impl WetBuffer {
    /// Recapture `rect` (canvas space) from `layers`, bottom first
    pub fn capture(&mut self, layers: &[&Surface], rect: Rect) {
        self.rect = rect;
        if rect.is_empty() {
            return;
        }
        flatten_into(&mut self.surface, layers, rect);
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Canvas pixel at `(x, y)`, or `None` outside the captured region
    pub fn sample(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.rect.contains(x, y) {
            return None;
        }
        self.surface.pixel(x - self.rect.left, y - self.rect.top)
    }
}

/// Exchange pigment between one bristle and the canvas pixel under it.
///
/// An empty bristle picks the canvas color up outright; a loaded one mixes a
/// little of it in. Either raises the shared `paint_load`, capped at 1.0.
/// Returns whether any exchange happened.
pub fn diffuse_bristle(
    bristle: &mut BristleParticle,
    canvas: Option<[u8; 4]>,
    paint_load: &mut f32,
    tuning: &Tuning,
) -> bool {
    let Some(px) = canvas else {
        return false;
    };
    if px[3] <= tuning.wet_pickup_alpha {
        return false;
    }
    let canvas_color = Rgb::from_u8([px[0], px[1], px[2]]);

    if bristle.has_paint {
        tuning
            .wet_mix_space
            .mix_in_place(&mut bristle.color, canvas_color, tuning.wet_pickup_mix);
        *paint_load += tuning.mix_load_gain;
    } else {
        bristle.color = canvas_color;
        bristle.has_paint = true;
        *paint_load += tuning.pickup_load_gain;
    }
    *paint_load = paint_load.clamp(0.0, 1.0);
    true
}

/// Fill color after mixing with wet canvas paint underneath
pub fn wet_fill_color(fill: Rgb, canvas: Option<[u8; 4]>, tuning: &Tuning) -> Rgb {
    match canvas {
        Some(px) if px[3] > tuning.wet_pickup_alpha => {
            let alpha = px[3] as f32 / 255.0;
            tuning
                .wet_mix_space
                .mix(fill, Rgb::from_u8([px[0], px[1], px[2]]), tuning.fill_wet_mix * alpha)
        }
        _ => fill,
    }
}
