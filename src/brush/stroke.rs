//! Stroke renderer - turns pointer samples into bristle marks on a scratch surface
//!
//! Stroke lifecycle is `start` -> any number of `draw_batch` -> `end`. The
//! renderer only writes into the scratch surface it is handed; landing the
//! scratch on a layer (erosion, mask, composite) is the caller's job so the
//! same pipeline serves fills too.

use std::f32::consts::PI;

use rand::Rng;

use super::wet::{diffuse_bristle, WetBuffer};
use super::{BristleBrush, BrushType};
use crate::color::{shift_hsl, shift_temperature, Rgb};
use crate::input::InputSample;
use crate::noise::value_noise;
use crate::raster::{composite_pixel, BlendMode, Rect, Surface};
use crate::settings::PaintSettings;

/// Stamps below this alpha are skipped
const MIN_STAMP_ALPHA: f32 = 0.01;
/// Spatial frequency of the dryness noise (cycles per pixel)
const DRYNESS_NOISE_FREQ: f32 = 0.05;
/// Extra cross-stroke spread at full tilt
const TILT_SPREAD: f32 = 0.3;

/// Per-stroke tracking, present only while a stroke is active
#[derive(Debug, Clone)]
pub struct StrokeState {
    /// Last accepted sample
    pub last: InputSample,
    /// Smoothed heading in radians
    pub angle: f32,
    /// Whether the pointer has moved far enough to stamp yet
    pub moved: bool,
    /// Union of everything written during this stroke
    pub bounds: Rect,
}

/// What one `draw_batch` call produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOutcome {
    /// Scratch region written by this batch
    pub dirty: Rect,
    /// Mean pressure over the stamped positions
    pub pressure: f32,
    /// Number of interpolated stamp positions
    pub steps: usize,
}

impl Default for BatchOutcome {
    fn default() -> Self {
        Self {
            dirty: Rect::empty(),
            pressure: 0.0,
            steps: 0,
        }
    }
}

/// Bristle brush plus the paint reservoir and heading it carries across
/// batches. Paint load persists between strokes unless auto-clean refills it.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    brush: BristleBrush,
    state: Option<StrokeState>,
    paint_load: f32,
    noise_seed: u32,
}

impl StrokeRenderer {
    pub fn new<R: Rng + ?Sized>(settings: &PaintSettings, rng: &mut R) -> Self {
        Self {
            brush: BristleBrush::generate(
                settings.brush_type,
                settings.size,
                settings.color,
                settings.wet_mode,
                rng,
            ),
            state: None,
            paint_load: 1.0,
            noise_seed: rng.gen(),
        }
    }

    /// Idle -> Drawing
    pub fn start<R: Rng + ?Sized>(&mut self, sample: InputSample, settings: &PaintSettings, rng: &mut R) {
        self.brush.sync(settings, rng);
        if settings.auto_clean {
            self.brush.reload(settings.color);
            self.paint_load = 1.0;
        } else {
            self.paint_load = self.paint_load.max(settings.tuning.min_load_floor).min(1.0);
        }
        self.noise_seed = rng.gen();
        self.state = Some(StrokeState {
            last: sample,
            angle: 0.0,
            moved: false,
            bounds: Rect::empty(),
        });
        tracing::debug!(
            "Stroke start at ({:.1}, {:.1}) {:?} load {:.2}",
            sample.x,
            sample.y,
            settings.brush_type,
            self.paint_load
        );
    }

    /// Drawing -> Idle. Returns the stroke's bounds if a stroke was active.
    pub fn end(&mut self) -> Option<Rect> {
        let state = self.state.take()?;
        tracing::debug!("Stroke end, bounds {:?}, load {:.3}", state.bounds, self.paint_load);
        Some(state.bounds)
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn paint_load(&self) -> f32 {
        self.paint_load
    }

    pub fn brush(&self) -> &BristleBrush {
        &self.brush
    }

    pub fn state(&self) -> Option<&StrokeState> {
        self.state.as_ref()
    }

    /// Canvas region a batch may read for wet mixing: the gesture's points
    /// plus a margin proportional to brush size
    pub fn plan_batch(&self, samples: &[InputSample], settings: &PaintSettings) -> Rect {
        let Some(state) = &self.state else {
            return Rect::empty();
        };
        let reach = settings.size.max(1.0) * 1.5;
        let mut rect = Rect::empty();
        rect.expand(state.last.x, state.last.y, reach);
        for s in samples {
            rect.expand(s.x, s.y, reach);
        }
        rect
    }

    /// Stamp a batch of coalesced samples into `scratch`.
    ///
    /// `wet` is consulted only when `settings.wet_mode` is set. Does nothing
    /// when no stroke is active.
    pub fn draw_batch<R: Rng + ?Sized>(
        &mut self,
        samples: &[InputSample],
        settings: &PaintSettings,
        scratch: &mut Surface,
        wet: Option<&WetBuffer>,
        rng: &mut R,
    ) -> BatchOutcome {
        let Self {
            brush,
            state,
            paint_load,
            noise_seed,
        } = self;
        let Some(state) = state.as_mut() else {
            return BatchOutcome::default();
        };

        let tuning = &settings.tuning;
        let size = settings.size.max(1.0);
        let brush_type = brush.brush_type();
        let wet = if settings.wet_mode { wet } else { None };
        let depletes = settings.wet_mode || !brush_type.is_pastel();
        let rate = if settings.wet_mode {
            tuning.wet_depletion_per_px
        } else {
            tuning.dry_depletion_per_px
        };

        let mut outcome = BatchOutcome::default();
        let mut pressure_sum = 0.0;

        for sample in samples {
            let dist = state.last.distance_to(sample);
            if dist < tuning.min_sample_distance {
                continue;
            }
            let step = (size * tuning.step_fraction * (0.3 + 0.7 * sample.pressure)).max(1.0);
            if dist < step && state.moved {
                continue;
            }

            let dx = sample.x - state.last.x;
            let dy = sample.y - state.last.y;
            if dist > tuning.heading_jump {
                let target = dy.atan2(dx);
                if state.moved {
                    state.angle += wrap_angle(target - state.angle) * brush_type.rotation_speed();
                } else {
                    state.angle = target;
                }
            }

            let speed = (dist / (2.0 * size)).clamp(0.0, 1.0);

            // Only the part of the segment that can touch the surface is subdivided
            let reach = size * (1.5 + brush_type.chaos()) * (1.0 + TILT_SPREAD) + 2.0;
            let Some((t0, t1)) = clip_segment(&state.last, sample, scratch, reach) else {
                state.last = *sample;
                state.moved = true;
                continue;
            };
            let from = state.last.lerp(sample, t0);
            let to = state.last.lerp(sample, t1);
            let span = dist * (t1 - t0);
            let steps = (span / step).ceil().max(1.0) as usize;
            let step_len = span / steps as f32;
            let first = if state.moved && t0 <= 0.0 { 1 } else { 0 };

            for i in first..=steps {
                let pt = from.lerp(&to, i as f32 / steps as f32);
                if i > 0 && depletes {
                    let loss = step_len * rate * (1.0 + tuning.speed_depletion_factor * speed);
                    *paint_load = (*paint_load - loss).clamp(0.0, 1.0);
                }
                let ctx = StampContext {
                    settings,
                    size,
                    step: step_len.max(1.0),
                    angle: state.angle,
                    speed,
                    noise_seed: *noise_seed,
                };
                let dirty = stamp_bristles(brush, &ctx, &pt, paint_load, scratch, wet, rng);
                outcome.dirty.union(&dirty);
                outcome.steps += 1;
                pressure_sum += pt.pressure;
            }

            state.last = *sample;
            state.moved = true;
        }

        if outcome.steps > 0 {
            outcome.pressure = pressure_sum / outcome.steps as f32;
        }
        state.bounds.union(&outcome.dirty);
        outcome
    }
}

/// Per-position parameters shared by every bristle of one stamp
struct StampContext<'a> {
    settings: &'a PaintSettings,
    size: f32,
    step: f32,
    angle: f32,
    speed: f32,
    noise_seed: u32,
}

/// Stamp every bristle once at `pt`; returns the written region
fn stamp_bristles<R: Rng + ?Sized>(
    brush: &mut BristleBrush,
    ctx: &StampContext<'_>,
    pt: &InputSample,
    paint_load: &mut f32,
    scratch: &mut Surface,
    wet: Option<&WetBuffer>,
    rng: &mut R,
) -> Rect {
    let settings = ctx.settings;
    let tuning = &settings.tuning;
    let brush_type = brush.brush_type();
    let radius = ctx.size * 0.5;
    let (sin, cos) = ctx.angle.sin_cos();
    let spread = brush_type.spread(pt.pressure) * (1.0 + TILT_SPREAD * pt.tilt_magnitude());
    let chaos = brush_type.chaos() * radius;
    let pressure_term = brush_type.pressure_curve(pt.pressure);
    let mode = if settings.eraser {
        BlendMode::Normal
    } else {
        settings.blend_mode
    };
    let mark_len = ctx.step * 1.25;
    let mark_width = (ctx.size * 0.05).max(1.0);

    let mut dirty = Rect::empty();

    for (idx, bristle) in brush.bristles_mut().iter_mut().enumerate() {
        // dx runs across the heading, dy along it
        let across = bristle.dx * radius * spread;
        let along = bristle.dy * radius;
        let mut x = pt.x + along * cos - across * sin;
        let mut y = pt.y + along * sin + across * cos;
        if chaos > 0.0 {
            x += rng.gen_range(-chaos..chaos);
            y += rng.gen_range(-chaos..chaos);
        }

        let noise = value_noise(
            x * DRYNESS_NOISE_FREQ,
            y * DRYNESS_NOISE_FREQ,
            ctx.noise_seed ^ idx as u32,
        );
        let dryness = (1.0 - *paint_load) * (0.7 + 0.3 * ctx.speed) + (noise - 0.5) * tuning.dryness_noise;
        if dryness > bristle.dry_sensitivity {
            continue;
        }

        if let Some(wet) = wet {
            let canvas = wet.sample(x.floor() as i32, y.floor() as i32);
            diffuse_bristle(bristle, canvas, paint_load, tuning);
        }
        if !bristle.has_paint {
            continue;
        }

        let r2 = (bristle.dx * bristle.dx + bristle.dy * bristle.dy).min(1.0);
        let edge = (1.0 - 0.75 * r2) * (1.0 - 0.3 * bristle.feather);
        let alpha = (settings.opacity * *paint_load * edge * pressure_term).clamp(0.0, 1.0);
        if alpha < MIN_STAMP_ALPHA {
            continue;
        }

        let color = vary_color(bristle.color, bristle.hue_bias, bristle.temperature_bias, settings);
        let half_len = (mark_len * bristle.length).max(1.0) * 0.5;
        let half_width = mark_width * bristle.thickness * 0.5;

        let copies = if brush_type.is_pastel() { 2 } else { 1 };
        for copy in 0..copies {
            let (cx, cy, a) = if copy == 0 {
                (x, y, alpha)
            } else {
                let j = radius * 0.1 + 0.5;
                (x + rng.gen_range(-j..j), y + rng.gen_range(-j..j), alpha * 0.6)
            };
            let written = if brush_type == BrushType::PastelGrain {
                stamp_rect(scratch, cx, cy, half_width, half_width, 1.0, 0.0, color, a, mode)
            } else {
                stamp_rect(scratch, cx, cy, half_len, half_width, cos, sin, color, a, mode)
            };
            dirty.union(&written);
        }
    }
    dirty
}

/// Per-bristle hue and warm/cool drift
fn vary_color(color: Rgb, hue_bias: f32, temperature_bias: f32, settings: &PaintSettings) -> Rgb {
    let mut out = color;
    if settings.hue_variation != 0.0 {
        out = shift_hsl(out, hue_bias * settings.hue_variation, 0.0, 0.0);
    }
    if settings.temperature_variation != 0.0 {
        out = shift_temperature(out, temperature_bias * settings.temperature_variation);
    }
    out
}

/// Anti-aliased rotated rectangle centered on `(cx, cy)`.
///
/// `half_len` lies along `(cos, sin)`, `half_width` across it.
#[allow(clippy::too_many_arguments)]
fn stamp_rect(
    target: &mut Surface,
    cx: f32,
    cy: f32,
    half_len: f32,
    half_width: f32,
    cos: f32,
    sin: f32,
    color: Rgb,
    alpha: f32,
    mode: BlendMode,
) -> Rect {
    let ext_x = cos.abs() * half_len + sin.abs() * half_width + 1.0;
    let ext_y = sin.abs() * half_len + cos.abs() * half_width + 1.0;
    let rect = Rect::from_corners(cx - ext_x, cy - ext_y, cx + ext_x, cy + ext_y)
        .clamped(target.width(), target.height());
    if rect.is_empty() {
        return Rect::empty();
    }

    let src = [color.r / 255.0, color.g / 255.0, color.b / 255.0];
    let row_bytes = target.width() as usize * 4;
    let data = target.data_mut();
    for y in rect.top..rect.bottom {
        let fy = y as f32 + 0.5 - cy;
        for x in rect.left..rect.right {
            let fx = x as f32 + 0.5 - cx;
            let u = fx * cos + fy * sin;
            let v = -fx * sin + fy * cos;
            let coverage = (half_len + 0.5 - u.abs()).clamp(0.0, 1.0)
                * (half_width + 0.5 - v.abs()).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let i = y as usize * row_bytes + x as usize * 4;
            composite_pixel(&mut data[i..i + 4], src, alpha * coverage, mode);
        }
    }
    rect
}

/// Parameter range of the segment `a -> b` inside `surface` grown by
/// `margin` on every side (Liang-Barsky). `None` if it misses entirely.
fn clip_segment(a: &InputSample, b: &InputSample, surface: &Surface, margin: f32) -> Option<(f32, f32)> {
    let (min_x, min_y) = (-margin, -margin);
    let max_x = surface.width() as f32 + margin;
    let max_y = surface.height() as f32 + margin;
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-dx, a.x - min_x),
        (dx, max_x - a.x),
        (-dy, a.y - min_y),
        (dy, max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Wrap to (-PI, PI]
fn wrap_angle(a: f32) -> f32 {
    let wrapped = (a + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Strength of paper-texture erosion for a batch.
///
/// Grows as the brush dries out and as pressure lightens.
pub fn texture_influence(settings: &PaintSettings, paint_load: f32, pressure: f32) -> f32 {
    if !settings.texture_enabled {
        return 0.0;
    }
    let t = &settings.tuning;
    let curve = t.texture_base_influence
        + t.texture_dry_weight * (1.0 - paint_load.clamp(0.0, 1.0))
        + t.texture_pressure_weight * (1.0 - pressure.clamp(0.0, 1.0));
    (settings.texture_strength * curve).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings() -> PaintSettings {
        PaintSettings {
            size: 20.0,
            opacity: 1.0,
            color: Rgb::new(200.0, 40.0, 40.0),
            ..Default::default()
        }
    }

    fn line(from: f32, to: f32, y: f32, step: f32) -> Vec<InputSample> {
        let mut out = Vec::new();
        let mut x = from;
        while x <= to {
            out.push(InputSample::new(x, y, 1.0));
            x += step;
        }
        out
    }

    #[test]
    fn test_inactive_renderer_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = settings();
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        let mut scratch = Surface::new(64, 64);
        let out = renderer.draw_batch(&line(0.0, 60.0, 32.0, 5.0), &s, &mut scratch, None, &mut rng);
        assert!(out.dirty.is_empty());
        assert!(scratch.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_batch_writes_within_dirty_rect() {
        let mut rng = StdRng::seed_from_u64(2);
        let s = settings();
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        let mut scratch = Surface::new(128, 64);
        renderer.start(InputSample::new(10.0, 32.0, 1.0), &s, &mut rng);
        let out = renderer.draw_batch(&line(15.0, 110.0, 32.0, 5.0), &s, &mut scratch, None, &mut rng);
        assert!(!out.dirty.is_empty());
        assert!(out.steps > 0);

        for y in 0..64 {
            for x in 0..128 {
                let a = scratch.pixel(x, y).map(|p| p[3]).unwrap_or(0);
                if a > 0 {
                    assert!(out.dirty.contains(x, y), "({x}, {y}) outside dirty rect");
                }
            }
        }
        assert_eq!(renderer.end(), Some(out.dirty));
        assert!(!renderer.is_active());
    }

    #[test]
    fn test_dry_load_monotonic_and_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = settings();
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        let mut scratch = Surface::new(512, 64);
        renderer.start(InputSample::new(0.0, 32.0, 1.0), &s, &mut rng);

        let mut prev = renderer.paint_load();
        assert_eq!(prev, 1.0);
        for chunk in line(5.0, 500.0, 32.0, 5.0).chunks(4) {
            renderer.draw_batch(chunk, &s, &mut scratch, None, &mut rng);
            let load = renderer.paint_load();
            assert!(load <= prev);
            assert!((0.0..=1.0).contains(&load));
            prev = load;
        }
        assert!(prev < 1.0);
    }

    #[test]
    fn test_dry_pastel_never_depletes() {
        let mut rng = StdRng::seed_from_u64(4);
        let s = PaintSettings {
            brush_type: BrushType::Pastel,
            ..settings()
        };
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        let mut scratch = Surface::new(256, 64);
        renderer.start(InputSample::new(0.0, 32.0, 1.0), &s, &mut rng);
        renderer.draw_batch(&line(5.0, 250.0, 32.0, 5.0), &s, &mut scratch, None, &mut rng);
        assert_eq!(renderer.paint_load(), 1.0);
    }

    #[test]
    fn test_without_auto_clean_load_floor_applies() {
        let mut rng = StdRng::seed_from_u64(5);
        let s = PaintSettings {
            auto_clean: false,
            tuning: crate::settings::Tuning {
                dry_depletion_per_px: 0.01,
                ..Default::default()
            },
            ..settings()
        };
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        let mut scratch = Surface::new(512, 64);
        renderer.start(InputSample::new(0.0, 32.0, 1.0), &s, &mut rng);
        renderer.draw_batch(&line(5.0, 500.0, 32.0, 5.0), &s, &mut scratch, None, &mut rng);
        renderer.end();
        assert!(renderer.paint_load() < s.tuning.min_load_floor);

        renderer.start(InputSample::new(0.0, 32.0, 1.0), &s, &mut rng);
        assert_eq!(renderer.paint_load(), s.tuning.min_load_floor);
    }

    #[test]
    fn test_wet_pickup_raises_load() {
        let mut rng = StdRng::seed_from_u64(6);
        let s = PaintSettings {
            wet_mode: true,
            auto_clean: false,
            tuning: crate::settings::Tuning {
                wet_depletion_per_px: 0.002,
                ..Default::default()
            },
            ..settings()
        };
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        assert!(renderer.brush().bristles().iter().all(|b| !b.has_paint));

        let mut scratch = Surface::new(256, 64);
        renderer.start(InputSample::new(10.0, 32.0, 1.0), &s, &mut rng);

        // Empty brush over nothing: no marks, load only drains
        renderer.draw_batch(&line(15.0, 100.0, 32.0, 5.0), &s, &mut scratch, None, &mut rng);
        let drained = renderer.paint_load();
        assert!(drained < 1.0);
        assert!(scratch.data().iter().all(|&b| b == 0));

        let canvas = Surface::filled(256, 64, [20, 60, 200, 255]);
        let mut wet = WetBuffer::default();
        let samples = line(105.0, 200.0, 32.0, 5.0);
        wet.capture(&[&canvas], renderer.plan_batch(&samples, &s));
        renderer.draw_batch(&samples, &s, &mut scratch, Some(&wet), &mut rng);

        assert!(renderer.paint_load() > drained);
        assert!(renderer.brush().bristles().iter().any(|b| b.has_paint));
        assert!(scratch.data().chunks(4).any(|p| p[3] > 0));
    }

    #[test]
    fn test_texture_influence_curve() {
        let mut s = settings();
        assert_eq!(texture_influence(&s, 0.5, 0.5), 0.0);
        s.texture_enabled = true;
        s.texture_strength = 1.0;
        let fresh = texture_influence(&s, 1.0, 1.0);
        let dry = texture_influence(&s, 0.2, 1.0);
        let light = texture_influence(&s, 1.0, 0.2);
        assert!((fresh - s.tuning.texture_base_influence).abs() < 1e-6);
        assert!(dry > fresh);
        assert!(light > fresh);
        assert!(texture_influence(&s, 0.0, 0.0) <= 1.0);
    }

    #[test]
    fn test_far_sample_only_subdivides_visible_span() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = settings();
        let mut renderer = StrokeRenderer::new(&s, &mut rng);
        let mut scratch = Surface::new(64, 64);
        renderer.start(InputSample::new(10.0, 10.0, 1.0), &s, &mut rng);

        let far = InputSample::new(1.0e7, 10.0, 1.0);
        let out = renderer.draw_batch(&[far], &s, &mut scratch, None, &mut rng);
        assert!(out.steps > 0 && out.steps < 200, "{} steps", out.steps);
        assert!(!out.dirty.is_empty());
        assert_eq!(renderer.state().map(|st| st.last), Some(far));

        // Entirely off the surface: nothing stamped, the stroke carries on
        let further = InputSample::new(2.0e7, -5.0e6, 1.0);
        let out = renderer.draw_batch(&[further], &s, &mut scratch, None, &mut rng);
        assert_eq!(out.steps, 0);
        assert_eq!(renderer.state().map(|st| st.last), Some(further));
        let back = renderer.draw_batch(&[InputSample::new(30.0, 30.0, 1.0)], &s, &mut scratch, None, &mut rng);
        assert!(back.steps > 0 && back.steps < 200);
    }

    #[test]
    fn test_clip_segment() {
        let surface = Surface::new(100, 50);
        let a = InputSample::new(-100.0, 25.0, 1.0);
        let b = InputSample::new(200.0, 25.0, 1.0);
        let (t0, t1) = clip_segment(&a, &b, &surface, 0.0).unwrap_or((-1.0, -1.0));
        assert!((t0 - 100.0 / 300.0).abs() < 1e-5);
        assert!((t1 - 200.0 / 300.0).abs() < 1e-5);

        let inside = InputSample::new(10.0, 10.0, 1.0);
        assert_eq!(clip_segment(&inside, &inside, &surface, 0.0), Some((0.0, 1.0)));

        let above = InputSample::new(-10.0, -30.0, 1.0);
        let above_right = InputSample::new(300.0, -30.0, 1.0);
        assert_eq!(clip_segment(&above, &above_right, &surface, 5.0), None);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotated_rect_covers_center() {
        let mut surface = Surface::new(16, 16);
        let (sin, cos) = (PI / 4.0).sin_cos();
        let rect = stamp_rect(&mut surface, 8.0, 8.0, 4.0, 1.0, cos, sin, Rgb::BLACK, 1.0, BlendMode::Normal);
        assert!(rect.contains(8, 8));
        assert!(surface.pixel(7, 7).map(|p| p[3]).unwrap_or(0) > 200);
        assert_eq!(surface.pixel(0, 15).map(|p| p[3]), Some(0));
    }
}
