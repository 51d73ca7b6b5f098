//! Engine module - the operation surface collaborators drive
//!
//! `PaintEngine` owns the layers, the mask, the paper, the scratch and wet
//! buffers, the stroke renderer and the history stack. Every operation takes
//! an immutable `PaintSettings` snapshot and is total over its inputs: bad
//! coordinates, empty regions and boundary cases degrade to no-ops.

mod layer;

pub use layer::{Layer, LayerInfo};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::brush::{texture_influence, wet_fill_color, StrokeRenderer, WetBuffer};
use crate::color::{mix_pigments, Rgb};
use crate::core::errors::CoreError;
use crate::fill::{dither_pick, fill_region, pattern_grid, pattern_line, stipple_region, GradientVector, Pattern, Region};
use crate::history::{HistoryEntry, HistoryManager, DEFAULT_BUDGET_BYTES, DEFAULT_MAX_ENTRIES};
use crate::input::{InputQueue, InputSample};
use crate::raster::{commit_scratch, flatten_into, CommitParams, CompositeOp, Erosion, Rect, Surface};
use crate::settings::PaintSettings;
use crate::sky::{SkyCache, SkyLut, SkyPhysics};
use crate::texture::{self, PaperTexture};

/// Highlight color of masked pixels
pub const MASK_TINT: [u8; 3] = [90, 160, 255];
/// Edge length of the procedural paper tile
pub const PAPER_TILE: i32 = 256;

/// Engine-level configuration, fixed for the engine's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub history_budget_bytes: usize,
    pub history_max_entries: usize,
    /// Seeds every random draw the engine makes
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_budget_bytes: DEFAULT_BUDGET_BYTES,
            history_max_entries: DEFAULT_MAX_ENTRIES,
            seed: 0x6F75_6163,
        }
    }
}

pub struct PaintEngine {
    width: u32,
    height: u32,
    /// Bottom first, never empty
    layers: Vec<Layer>,
    active: u32,
    next_layer_id: u32,
    mask: Surface,
    paper: PaperTexture,
    scratch: Surface,
    wet: WetBuffer,
    renderer: StrokeRenderer,
    /// Samples waiting for the next frame tick
    queue: InputQueue,
    history: HistoryManager,
    /// Before-state of the stroke in progress
    pending: Option<HistoryEntry>,
    pattern: Option<Pattern>,
    sky: SkyCache,
    rng: StdRng,
}

impl PaintEngine {
    /// Create an engine with one empty layer and a procedural paper.
    /// Zero dimensions become 1.
    pub fn new(width: u32, height: u32, config: EngineConfig) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let paper = texture::generate_procedural(PAPER_TILE, PAPER_TILE, &mut rng);
        let renderer = StrokeRenderer::new(&PaintSettings::default(), &mut rng);

        tracing::info!("Paint engine created {}x{}", width, height);
        Self {
            width,
            height,
            layers: vec![Layer::new(1, "Layer 1", width, height)],
            active: 1,
            next_layer_id: 2,
            mask: Surface::new(width, height),
            paper,
            scratch: Surface::new(width, height),
            wet: WetBuffer::default(),
            renderer,
            queue: InputQueue::default(),
            history: HistoryManager::new(config.history_budget_bytes, config.history_max_entries),
            pending: None,
            pattern: None,
            sky: SkyCache::new(),
            rng,
        }
    }

    /// Adopt collaborator-provided rasters.
    ///
    /// The first layer fixes the canvas size; other layers and the mask are
    /// rescaled to match. No layers yields one empty layer. History is cleared.
    pub fn init(&mut self, layers: Vec<Surface>, mask: Surface, height_map: Option<Surface>) {
        self.abandon_stroke();
        let (width, height) = layers.first().map(Surface::dimensions).unwrap_or((self.width, self.height));
        self.width = width;
        self.height = height;

        self.layers = if layers.is_empty() {
            vec![Layer::new(1, "Layer 1", width, height)]
        } else {
            layers
                .into_iter()
                .enumerate()
                .map(|(i, s)| {
                    let id = i as u32 + 1;
                    Layer::with_surface(id, format!("Layer {id}"), s.rescaled(width, height))
                })
                .collect()
        };
        self.next_layer_id = self.layers.len() as u32 + 1;
        self.active = self.layers.len() as u32;
        self.mask = mask.rescaled(width, height);
        self.scratch.reshape(width, height);
        if let Some(map) = height_map {
            self.set_paper_texture(map);
        }
        self.history.clear();
        self.sky.invalidate();

        tracing::info!("Engine initialized {}x{} with {} layers", width, height, self.layers.len());
    }

    /// Resize the canvas, rescaling every raster. History is cleared because
    /// its snapshots no longer fit.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.abandon_stroke();
        for layer in &mut self.layers {
            let resized = layer.surface().rescaled(width, height);
            *layer.surface_mut() = resized;
        }
        self.mask = self.mask.rescaled(width, height);
        self.scratch.reshape(width, height);
        self.width = width;
        self.height = height;
        self.history.clear();
        self.sky.invalidate();

        tracing::info!("Canvas resized to {}x{}", width, height);
    }

    /// Replace the erosion height map; the visual tile is left alone
    pub fn set_paper_texture(&mut self, height_map: Surface) {
        tracing::debug!("Paper height map set {}x{}", height_map.width(), height_map.height());
        self.paper.height_map = height_map;
    }

    /// Decode a paper image and derive its height map
    pub fn load_paper_image(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
        self.paper = texture::from_bytes(bytes)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Strokes
    // ------------------------------------------------------------------

    /// Idle -> Drawing. An unfinished stroke is ended first.
    pub fn start_stroke(&mut self, sample: InputSample, settings: &PaintSettings) {
        if self.renderer.is_active() {
            self.end_stroke();
        }
        self.queue.reset();
        self.pending = Some(self.snapshot());
        self.renderer.start(sample, settings, &mut self.rng);
    }

    /// Buffer a pointer sample until the next [`flush_queue`](Self::flush_queue).
    /// Returns false when the sample was filtered as jitter.
    pub fn queue_sample(&mut self, sample: InputSample) -> bool {
        self.queue.push(sample)
    }

    /// Draw every queued sample as one batch
    pub fn flush_queue(&mut self, settings: &PaintSettings) -> Rect {
        let samples = self.queue.drain();
        self.draw_batch(&samples, settings)
    }

    /// Stamp one coalesced batch and land it on the active layer. Returns the
    /// canvas region that changed.
    pub fn draw_batch(&mut self, samples: &[InputSample], settings: &PaintSettings) -> Rect {
        if !self.renderer.is_active() || samples.is_empty() {
            return Rect::empty();
        }
        if settings.wet_mode {
            let rect = self
                .renderer
                .plan_batch(samples, settings)
                .clamped(self.width, self.height);
            self.capture_wet(rect);
        }
        let wet = settings.wet_mode.then_some(&self.wet);
        let outcome = self
            .renderer
            .draw_batch(samples, settings, &mut self.scratch, wet, &mut self.rng);

        let influence = texture_influence(settings, self.renderer.paint_load(), outcome.pressure);
        self.land_scratch(outcome.dirty, settings, influence);
        outcome.dirty.clamped(self.width, self.height)
    }

    /// Single-sample form of [`draw_batch`](Self::draw_batch)
    pub fn draw_stroke(&mut self, sample: InputSample, settings: &PaintSettings) -> Rect {
        self.draw_batch(&[sample], settings)
    }

    /// Drawing -> Idle. Commits the stroke's before-state if it painted
    /// anything.
    pub fn end_stroke(&mut self) {
        let bounds = self.renderer.end();
        let pending = self.pending.take();
        if let (Some(bounds), Some(entry)) = (bounds, pending) {
            if !bounds.is_empty() {
                self.history.commit(entry);
            }
        }
    }

    pub fn is_stroke_active(&self) -> bool {
        self.renderer.is_active()
    }

    pub fn paint_load(&self) -> f32 {
        self.renderer.paint_load()
    }

    // ------------------------------------------------------------------
    // Fills and patterns
    // ------------------------------------------------------------------

    /// Add a smoothed lasso to the mask
    pub fn draw_lasso(&mut self, points: &[(f32, f32)]) -> Rect {
        self.finish_stroke();
        let region = Region::lasso(points);
        let before = self.snapshot();
        let tint = [MASK_TINT[0], MASK_TINT[1], MASK_TINT[2], 255];
        let mut written = Rect::empty();
        let mask = &mut self.mask;
        region.for_each_pixel(mask.bounds(), |x, y| {
            mask.set_pixel(x, y, tint);
            written.expand(x as f32, y as f32, 0.0);
        });
        if !written.is_empty() {
            self.history.commit(before);
            tracing::debug!("Mask lasso {:?}", written);
        }
        written
    }

    /// Fill a freehand lasso with the primary color
    pub fn draw_lasso_fill(&mut self, points: &[(f32, f32)], settings: &PaintSettings) -> Rect {
        self.solid_fill(Region::lasso(points), settings)
    }

    /// Fill the rectangle spanned by two corners
    pub fn draw_rect_lasso_fill(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, settings: &PaintSettings) -> Rect {
        self.solid_fill(Region::rect(x0, y0, x1, y1), settings)
    }

    /// Two-color lasso fill along `gradient`, dithered or pigment-mixed
    pub fn draw_grad_blend_lasso(
        &mut self,
        points: &[(f32, f32)],
        gradient: GradientVector,
        settings: &PaintSettings,
    ) -> Rect {
        self.finish_stroke();
        let region = Region::lasso(points);
        let before = self.snapshot();
        self.prepare_wet(&region, settings);

        let opacity = settings.opacity.clamp(0.0, 1.0);
        let wet = settings.wet_mode.then_some(&self.wet);
        let rng = &mut self.rng;
        let written = fill_region(&mut self.scratch, &region, |x, y| {
            let t = gradient.t_at(x as f32 + 0.5, y as f32 + 0.5);
            let base = if settings.gradient_dither {
                dither_pick(settings.color, settings.secondary_color, t, &mut *rng)
            } else {
                mix_pigments(settings.color, settings.secondary_color, t)
            };
            Some((shade_wet(base, wet, x, y, settings), opacity))
        });
        self.commit_fill(before, written, settings, "gradient lasso")
    }

    /// Scatter stipple dots inside a lasso
    pub fn draw_stipple_lasso(&mut self, points: &[(f32, f32)], settings: &PaintSettings) -> Rect {
        self.finish_stroke();
        let region = Region::lasso(points);
        let before = self.snapshot();
        let written = stipple_region(
            &mut self.scratch,
            &region,
            settings.color,
            settings.opacity.clamp(0.0, 1.0),
            settings.stipple_density,
            settings.stipple_size,
            settings.value_variation,
            &mut self.rng,
        );
        self.commit_fill(before, written, settings, "stipple lasso")
    }

    /// Tile the current pattern inside a lasso. No-op without a pattern.
    pub fn draw_pattern_lasso(&mut self, points: &[(f32, f32)], settings: &PaintSettings) -> Rect {
        self.finish_stroke();
        let Some(pattern) = self.pattern.as_ref() else {
            tracing::debug!("Pattern lasso skipped, no pattern captured");
            return Rect::empty();
        };
        let region = Region::lasso(points);
        let before = self.snapshot();
        let written = pattern_grid(
            &mut self.scratch,
            &region,
            pattern,
            &settings.pattern,
            settings.opacity.clamp(0.0, 1.0),
        );
        self.commit_fill(before, written, settings, "pattern lasso")
    }

    /// Stamp the current pattern along a polyline. No-op without a pattern.
    pub fn draw_pattern_line(&mut self, points: &[(f32, f32)], settings: &PaintSettings) -> Rect {
        self.finish_stroke();
        let Some(pattern) = self.pattern.as_ref() else {
            tracing::debug!("Pattern line skipped, no pattern captured");
            return Rect::empty();
        };
        let before = self.snapshot();
        let written = pattern_line(
            &mut self.scratch,
            points,
            pattern,
            &settings.pattern,
            settings.opacity.clamp(0.0, 1.0),
        );
        self.commit_fill(before, written, settings, "pattern line")
    }

    /// Capture the visible composite inside `rect` as the current pattern.
    ///
    /// `None` when the rect misses the canvas or holds only transparent
    /// pixels.
    pub fn capture_pattern(&mut self, rect: Rect) -> Option<Pattern> {
        let r = rect.clamped(self.width, self.height);
        if r.is_empty() {
            return None;
        }
        let mut tile = Surface::new(1, 1);
        flatten_into(&mut tile, &self.visible_surfaces(), r);
        let pattern = Pattern::from_surface(tile);
        if pattern.is_blank() {
            return None;
        }
        tracing::debug!(
            "Captured pattern {}x{} hash {}",
            pattern.width(),
            pattern.height(),
            &pattern.content_hash()[..12]
        );
        self.pattern = Some(pattern.clone());
        Some(pattern)
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = Some(pattern);
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    // ------------------------------------------------------------------
    // Mask
    // ------------------------------------------------------------------

    pub fn clear_mask(&mut self) {
        self.finish_stroke();
        if self.mask.data().chunks_exact(4).all(|p| p[3] == 0) {
            return;
        }
        let before = self.snapshot();
        self.mask.clear();
        self.history.commit(before);
        tracing::debug!("Mask cleared");
    }

    /// Invert mask coverage and repaint it with the highlight tint
    pub fn invert_mask(&mut self) {
        self.finish_stroke();
        let before = self.snapshot();
        self.mask.invert_alpha(MASK_TINT);
        self.history.commit(before);
        tracing::debug!("Mask inverted");
    }

    pub fn mask(&self) -> &Surface {
        &self.mask
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    /// Add an empty layer on top and make it active
    pub fn add_layer(&mut self) -> u32 {
        self.finish_stroke();
        let id = self.next_layer_id;
        self.next_layer_id += 1;
        self.layers.push(Layer::new(id, format!("Layer {id}"), self.width, self.height));
        self.active = id;
        tracing::info!("Layer {} added, {} total", id, self.layers.len());
        id
    }

    /// Remove a layer. Refused when it is the last one or unknown.
    pub fn remove_layer(&mut self, id: u32) -> bool {
        if self.layers.len() <= 1 {
            tracing::debug!("Refusing to remove the last layer");
            return false;
        }
        let Some(index) = self.layers.iter().position(|l| l.id() == id) else {
            return false;
        };
        self.finish_stroke();
        self.layers.remove(index);
        self.history.forget_layer(id);
        if self.active == id {
            let top = index.min(self.layers.len() - 1);
            self.active = self.layers[top].id();
        }
        tracing::info!("Layer {} removed, {} left", id, self.layers.len());
        true
    }

    pub fn set_active_layer(&mut self, id: u32) -> bool {
        if self.layer(id).is_none() {
            return false;
        }
        self.finish_stroke();
        self.active = id;
        true
    }

    /// Flip visibility; returns the new state
    pub fn toggle_layer_visibility(&mut self, id: u32) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id() == id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    /// Flip whether the layer is excluded from the sky glow; returns the new state
    pub fn toggle_layer_glow(&mut self, id: u32) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id() == id)?;
        layer.ignore_atmosphere = !layer.ignore_atmosphere;
        Some(layer.ignore_atmosphere)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: u32) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn active_layer_id(&self) -> u32 {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active_index()]
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Restore the previous (layer, mask) snapshot. No-op at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.finish_stroke();
        let Some(entry) = self.history.undo() else {
            return false;
        };
        let restored = swap_entry(&mut self.layers, &mut self.mask, entry);
        tracing::debug!("Undo layer {} restored {}", entry.layer_id, restored);
        restored
    }

    /// Reapply the snapshot undone last. No-op at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.finish_stroke();
        let Some(entry) = self.history.redo() else {
            return false;
        };
        let restored = swap_entry(&mut self.layers, &mut self.mask, entry);
        tracing::debug!("Redo layer {} restored {}", entry.layer_id, restored);
        restored
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    // ------------------------------------------------------------------
    // Sampling
    // ------------------------------------------------------------------

    /// Color under `(x, y)`: the topmost opaque-enough visible layer pixel,
    /// then the sky when enabled, then the background. `None` off canvas.
    pub fn pick_color(&mut self, x: i32, y: i32, settings: &PaintSettings) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let hit = self
            .layers
            .iter()
            .rev()
            .filter(|l| l.visible)
            .find_map(|l| l.surface().pixel(x, y).filter(|p| p[3] > 0));
        if let Some(px) = hit {
            return Some(Rgb::from_u8([px[0], px[1], px[2]]));
        }
        if settings.sky.enabled {
            if let Some(lut) = self.sky_lut(settings) {
                return Some(lut.sample(y).rgb());
            }
        }
        Some(settings.background)
    }

    /// Recompute the sky if its inputs changed and return its physics
    pub fn sky_physics(&mut self, settings: &PaintSettings) -> Option<&SkyPhysics> {
        self.refresh_sky(settings);
        self.sky.physics()
    }

    /// Recompute the sky if its inputs changed and return its scanline table
    pub fn sky_lut(&mut self, settings: &PaintSettings) -> Option<&SkyLut> {
        self.refresh_sky(settings);
        self.sky.lut()
    }

    /// Flatten every visible layer into a new canvas-sized surface
    pub fn composite_visible(&self) -> Surface {
        let mut out = Surface::new(self.width, self.height);
        flatten_into(&mut out, &self.visible_surfaces(), Rect::new(0, 0, self.width as i32, self.height as i32));
        out
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn paper(&self) -> &PaperTexture {
        &self.paper
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn active_index(&self) -> usize {
        self.layers
            .iter()
            .position(|l| l.id() == self.active)
            .unwrap_or(self.layers.len() - 1)
    }

    fn snapshot(&self) -> HistoryEntry {
        let layer = &self.layers[self.active_index()];
        HistoryEntry::new(layer.id(), layer.surface().clone(), self.mask.clone())
    }

    fn visible_surfaces(&self) -> Vec<&Surface> {
        self.layers.iter().filter(|l| l.visible).map(Layer::surface).collect()
    }

    fn capture_wet(&mut self, rect: Rect) {
        let layers: Vec<&Surface> = self.layers.iter().filter(|l| l.visible).map(Layer::surface).collect();
        self.wet.capture(&layers, rect);
    }

    fn prepare_wet(&mut self, region: &Region, settings: &PaintSettings) {
        if settings.wet_mode {
            let rect = region.bounds().clamped(self.width, self.height);
            self.capture_wet(rect);
        }
    }

    fn refresh_sky(&mut self, settings: &PaintSettings) {
        self.sky
            .update(&settings.sky.inputs, settings.sky.water_enabled, self.height);
    }

    /// End an active stroke before a non-stroke edit so history stays ordered
    fn finish_stroke(&mut self) {
        if self.renderer.is_active() {
            self.end_stroke();
        }
    }

    /// End an active stroke without recording it
    fn abandon_stroke(&mut self) {
        self.renderer.end();
        self.queue.reset();
        self.pending = None;
    }

    fn solid_fill(&mut self, region: Region, settings: &PaintSettings) -> Rect {
        self.finish_stroke();
        let before = self.snapshot();
        self.prepare_wet(&region, settings);

        let opacity = settings.opacity.clamp(0.0, 1.0);
        let wet = settings.wet_mode.then_some(&self.wet);
        let written = fill_region(&mut self.scratch, &region, |x, y| {
            Some((shade_wet(settings.color, wet, x, y, settings), opacity))
        });
        self.commit_fill(before, written, settings, "fill")
    }

    fn commit_fill(&mut self, before: HistoryEntry, written: Rect, settings: &PaintSettings, label: &str) -> Rect {
        if written.is_empty() {
            return written;
        }
        let influence = texture_influence(settings, 1.0, 1.0);
        self.land_scratch(written, settings, influence);
        self.history.commit(before);
        tracing::debug!("Committed {} {:?}", label, written);
        written.clamped(self.width, self.height)
    }

    /// Erosion, mask, composite onto the active layer, clear
    fn land_scratch(&mut self, rect: Rect, settings: &PaintSettings, influence: f32) {
        if rect.is_empty() {
            return;
        }
        let index = self.active_index();
        let erosion = (influence > 0.0).then_some(Erosion {
            height_map: &self.paper.height_map,
            influence,
        });
        let params = CommitParams {
            erosion,
            mask: Some(&self.mask),
            op: composite_op(settings),
        };
        commit_scratch(&mut self.scratch, rect, self.layers[index].surface_mut(), params);
    }
}

fn composite_op(settings: &PaintSettings) -> CompositeOp {
    if settings.eraser {
        CompositeOp::Erase
    } else {
        CompositeOp::Blend(settings.blend_mode)
    }
}

fn shade_wet(base: Rgb, wet: Option<&WetBuffer>, x: i32, y: i32, settings: &PaintSettings) -> Rgb {
    match wet {
        Some(buffer) => wet_fill_color(base, buffer.sample(x, y), &settings.tuning),
        None => base,
    }
}

/// Exchange the live rasters with a history entry. Returns false when the
/// entry's layer no longer exists.
fn swap_entry(layers: &mut [Layer], mask: &mut Surface, entry: &mut HistoryEntry) -> bool {
    let Some(layer) = layers.iter_mut().find(|l| l.id() == entry.layer_id) else {
        return false;
    };
    if layer.surface().dimensions() != entry.layer.dimensions() {
        return false;
    }
    std::mem::swap(layer.surface_mut(), &mut entry.layer);
    std::mem::swap(mask, &mut entry.mask);
    true
}

impl std::fmt::Debug for PaintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintEngine")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layers", &self.layers.len())
            .field("active", &self.active)
            .field("history", &self.history.len())
            .finish()
    }
}
