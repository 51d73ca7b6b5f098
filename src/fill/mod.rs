//! Region fill and pattern tools
//!
//! Everything here rasterizes into a scratch surface and returns the region it
//! wrote. Erosion, masking and compositing onto a layer happen afterwards in
//! the shared commit pipeline.

mod pattern;
mod polygon;

pub use pattern::{stamp_pattern, Pattern, PatternJitter};
pub use polygon::{point_in_polygon, Region};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{shift_hsl, Rgb};
use crate::raster::{composite_pixel, BlendMode, Rect, Surface};
use crate::settings::PatternSettings;

/// Upper bound on stipple dots per call
const MAX_STIPPLE_DOTS: usize = 250_000;
/// Upper bound on pattern stamps per call
const MAX_PATTERN_STAMPS: usize = 20_000;

/// User-drawn gradient direction for two-color fills
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientVector {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl GradientVector {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Projected position of `(x, y)` along the vector, 0.0 - 1.0
    pub fn t_at(&self, x: f32, y: f32) -> f32 {
        let dx = self.x1 - self.x0;
        let dy = self.y1 - self.y0;
        let len2 = dx * dx + dy * dy;
        if !len2.is_finite() || len2 < f32::EPSILON {
            return 0.0;
        }
        (((x - self.x0) * dx + (y - self.y0) * dy) / len2).clamp(0.0, 1.0)
    }
}

/// Fill every pixel of `region` with the color and alpha `shade` returns
pub fn fill_region(
    scratch: &mut Surface,
    region: &Region,
    mut shade: impl FnMut(i32, i32) -> Option<(Rgb, f32)>,
) -> Rect {
    let clip = scratch.bounds();
    let mut written = Rect::empty();
    region.for_each_pixel(clip, |x, y| {
        let Some((color, alpha)) = shade(x, y) else {
            return;
        };
        let i = scratch.index(x as u32, y as u32);
        composite_pixel(
            &mut scratch.data_mut()[i..i + 4],
            [color.r / 255.0, color.g / 255.0, color.b / 255.0],
            alpha,
            BlendMode::Normal,
        );
        written.expand(x as f32, y as f32, 0.0);
    });
    written
}

/// Stochastic two-color pick: `secondary` with probability `t`
pub fn dither_pick<R: Rng + ?Sized>(primary: Rgb, secondary: Rgb, t: f32, rng: &mut R) -> Rgb {
    if rng.gen::<f32>() < t {
        secondary
    } else {
        primary
    }
}

/// Scatter anti-aliased dots over `region`.
///
/// `density` is dots per 100 square pixels, `radius` the dot radius.
#[allow(clippy::too_many_arguments)]
pub fn stipple_region<R: Rng + ?Sized>(
    scratch: &mut Surface,
    region: &Region,
    color: Rgb,
    opacity: f32,
    density: f32,
    radius: f32,
    value_variation: f32,
    rng: &mut R,
) -> Rect {
    let bounds = region.bounds().clamped(scratch.width(), scratch.height());
    if bounds.is_empty() || !density.is_finite() || density <= 0.0 {
        return Rect::empty();
    }
    let radius = if radius.is_finite() { radius.clamp(0.5, 64.0) } else { 1.5 };
    let area = bounds.width() as f32 * bounds.height() as f32;
    let count = ((area * density / 100.0) as usize).min(MAX_STIPPLE_DOTS);
    let mut written = Rect::empty();

    for _ in 0..count {
        let x = rng.gen_range(bounds.left as f32..bounds.right as f32);
        let y = rng.gen_range(bounds.top as f32..bounds.bottom as f32);
        if !region.contains(x, y) {
            continue;
        }
        let dot_color = if value_variation > 0.0 {
            shift_hsl(color, 0.0, 0.0, rng.gen_range(-1.0..1.0) * value_variation * 0.25)
        } else {
            color
        };
        let dot = stamp_dot(scratch, region, x, y, radius, dot_color, opacity);
        written.union(&dot);
    }
    written
}

fn stamp_dot(scratch: &mut Surface, region: &Region, cx: f32, cy: f32, radius: f32, color: Rgb, opacity: f32) -> Rect {
    let rect = Rect::from_corners(cx - radius - 1.0, cy - radius - 1.0, cx + radius + 1.0, cy + radius + 1.0)
        .clamped(scratch.width(), scratch.height());
    let src = [color.r / 255.0, color.g / 255.0, color.b / 255.0];
    let mut written = Rect::empty();
    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let d = (px - cx).hypot(py - cy);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage <= 0.0 || !region.contains(px, py) {
                continue;
            }
            let i = scratch.index(x as u32, y as u32);
            composite_pixel(&mut scratch.data_mut()[i..i + 4], src, opacity * coverage, BlendMode::Normal);
            written.expand(x as f32, y as f32, 0.0);
        }
    }
    written
}

/// Tile `pattern` over `region` on a canvas-anchored grid.
///
/// Grid cells are indexed from the canvas origin, so redrawing the same
/// region with the same settings reproduces the same placement and jitter.
pub fn pattern_grid(
    scratch: &mut Surface,
    region: &Region,
    pattern: &Pattern,
    settings: &PatternSettings,
    opacity: f32,
) -> Rect {
    let bounds = region.bounds().clamped(scratch.width(), scratch.height());
    if bounds.is_empty() || pattern.is_blank() {
        return Rect::empty();
    }
    let scale = positive_or(settings.scale, 1.0);
    let spacing = positive_or(settings.spacing, 1.0).max(0.1);
    let cell_w = (pattern.width() as f32 * scale * spacing).max(1.0);
    let cell_h = (pattern.height() as f32 * scale * spacing).max(1.0);

    // Cells whose stamps can reach the bounds
    let margin_x = (pattern.width() as f32 * scale) / cell_w;
    let margin_y = (pattern.height() as f32 * scale) / cell_h;
    let gx0 = (bounds.left as f32 / cell_w - margin_x).floor() as i32;
    let gx1 = (bounds.right as f32 / cell_w + margin_x).ceil() as i32;
    let gy0 = (bounds.top as f32 / cell_h - margin_y).floor() as i32;
    let gy1 = (bounds.bottom as f32 / cell_h + margin_y).ceil() as i32;

    let mut written = Rect::empty();
    let mut stamps = 0;
    'grid: for gy in gy0..gy1 {
        for gx in gx0..gx1 {
            if stamps >= MAX_PATTERN_STAMPS {
                tracing::warn!("Pattern grid truncated at {} stamps", MAX_PATTERN_STAMPS);
                break 'grid;
            }
            stamps += 1;
            let jitter = PatternJitter::for_cell(gx, gy, settings);
            let cx = (gx as f32 + 0.5) * cell_w;
            let cy = (gy as f32 + 0.5) * cell_h;
            let rect = stamp_pattern(scratch, pattern, cx, cy, scale, 0.0, &jitter, opacity, |x, y| {
                region.contains(x as f32 + 0.5, y as f32 + 0.5)
            });
            written.union(&rect);
        }
    }
    written
}

/// Stamp `pattern` at even arc-length intervals along a polyline, each stamp
/// turned to follow the line
pub fn pattern_line(
    scratch: &mut Surface,
    points: &[(f32, f32)],
    pattern: &Pattern,
    settings: &PatternSettings,
    opacity: f32,
) -> Rect {
    if points.len() < 2 || pattern.is_blank() {
        return Rect::empty();
    }
    let scale = positive_or(settings.scale, 1.0);
    let spacing = positive_or(settings.spacing, 1.0).max(0.1);
    let interval = (pattern.width() as f32 * scale * spacing).max(1.0);

    let mut written = Rect::empty();
    let mut index = 0i32;
    // Distance still to travel before the next stamp
    let mut carry = 0.0f32;

    for seg in points.windows(2) {
        let (x0, y0) = seg[0];
        let (x1, y1) = seg[1];
        let len = (x1 - x0).hypot(y1 - y0);
        if !len.is_finite() || len <= 0.0 {
            continue;
        }
        let angle = (y1 - y0).atan2(x1 - x0);
        let mut d = carry;
        while d <= len {
            if index as usize >= MAX_PATTERN_STAMPS {
                return written;
            }
            let t = d / len;
            let jitter = PatternJitter::for_cell(index, 0, settings);
            let rect = stamp_pattern(
                scratch,
                pattern,
                x0 + (x1 - x0) * t,
                y0 + (y1 - y0) * t,
                scale,
                angle,
                &jitter,
                opacity,
                |_, _| true,
            );
            written.union(&rect);
            index += 1;
            d += interval;
        }
        carry = d - len;
    }
    written
}

fn positive_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}
