//! Raster primitives - surfaces, rectangles, blend modes and the shared
//! scratch-buffer commit pipeline used by strokes, fills and patterns.
//!
//! Paint operations never draw straight onto a layer. They accumulate into a
//! scratch surface, and once per batch [`commit_scratch`]:
//! 1. erodes the scratch region by the paper height map,
//! 2. erases it where the mask is set,
//! 3. composites it onto the layer,
//! 4. clears the region for the next batch.

mod blend;
mod rect;
mod surface;

pub use blend::{composite_pixel, composite_rgba, erase_pixel, BlendMode, CompositeOp};
pub use rect::Rect;
pub use surface::Surface;

use rayon::prelude::*;

/// Paper-texture erosion applied to a scratch region
#[derive(Debug, Clone, Copy)]
pub struct Erosion<'a> {
    /// Height map; its alpha is the rejection strength, tiled over the canvas
    pub height_map: &'a Surface,
    /// Scale of the erasure, 0.0 - 1.0
    pub influence: f32,
}

/// Everything needed to land a scratch region on a layer
#[derive(Debug, Clone, Copy)]
pub struct CommitParams<'a> {
    pub erosion: Option<Erosion<'a>>,
    pub mask: Option<&'a Surface>,
    pub op: CompositeOp,
}

/// Rows of `rect` as `(y, row_slice)` pairs for row-parallel processing
fn rows_mut(surface: &mut Surface, rect: Rect) -> impl IndexedParallelIterator<Item = (usize, &mut [u8])> {
    let row_bytes = surface.width() as usize * 4;
    let (top, bottom) = (rect.top.max(0) as usize, rect.bottom.max(0) as usize);
    surface
        .data_mut()
        .par_chunks_mut(row_bytes)
        .enumerate()
        .skip(top)
        .take(bottom.saturating_sub(top))
}

/// Erase scratch alpha proportionally to the tiled height map
pub fn apply_erosion(scratch: &mut Surface, rect: Rect, erosion: Erosion<'_>) {
    let r = rect.clamped(scratch.width(), scratch.height());
    if r.is_empty() || erosion.influence <= 0.0 {
        return;
    }
    let influence = erosion.influence.min(1.0);
    let map = erosion.height_map;

    rows_mut(scratch, r).for_each(|(y, row)| {
        for x in r.left..r.right {
            let i = x as usize * 4;
            if row[i + 3] == 0 {
                continue;
            }
            let rejection = map.alpha_wrapped(x, y as i32) as f32 / 255.0;
            erase_pixel(&mut row[i..i + 4], rejection * influence);
        }
    });
}

/// Hard erase of the scratch wherever the mask has alpha
pub fn apply_mask(scratch: &mut Surface, rect: Rect, mask: &Surface) {
    let r = rect
        .clamped(scratch.width(), scratch.height())
        .clamped(mask.width(), mask.height());
    if r.is_empty() {
        return;
    }
    let mask_row_bytes = mask.width() as usize * 4;
    let mask_data = mask.data();

    rows_mut(scratch, r).for_each(|(y, row)| {
        let mask_row = &mask_data[y * mask_row_bytes..(y + 1) * mask_row_bytes];
        for x in r.left..r.right {
            let i = x as usize * 4;
            let m = mask_row[i + 3];
            if m > 0 && row[i + 3] > 0 {
                erase_pixel(&mut row[i..i + 4], m as f32 / 255.0);
            }
        }
    });
}

/// Composite a scratch region onto a target surface of the same size
pub fn composite_region(scratch: &Surface, rect: Rect, target: &mut Surface, op: CompositeOp) {
    let r = rect
        .clamped(scratch.width(), scratch.height())
        .clamped(target.width(), target.height());
    if r.is_empty() {
        return;
    }
    let src_row_bytes = scratch.width() as usize * 4;
    let src_data = scratch.data();

    rows_mut(target, r).for_each(|(y, row)| {
        let src_row = &src_data[y * src_row_bytes..(y + 1) * src_row_bytes];
        for x in r.left..r.right {
            let i = x as usize * 4;
            let src = &src_row[i..i + 4];
            if src[3] == 0 {
                continue;
            }
            match op {
                CompositeOp::Blend(mode) => composite_rgba(&mut row[i..i + 4], src, mode),
                CompositeOp::Erase => erase_pixel(&mut row[i..i + 4], src[3] as f32 / 255.0),
            }
        }
    });
}

/// Run the full erosion -> mask -> composite -> clear pipeline on `rect`
pub fn commit_scratch(scratch: &mut Surface, rect: Rect, target: &mut Surface, params: CommitParams<'_>) {
    let r = rect.clamped(scratch.width(), scratch.height());
    if r.is_empty() {
        return;
    }
    if let Some(erosion) = params.erosion {
        apply_erosion(scratch, r, erosion);
    }
    if let Some(mask) = params.mask {
        apply_mask(scratch, r, mask);
    }
    composite_region(scratch, r, target, params.op);
    scratch.clear_rect(r);
}

/// Source-over flatten of `layers` (bottom first) into `dst`.
///
/// `dst` covers the canvas rectangle `rect`; its previous contents are
/// replaced.
pub fn flatten_into(dst: &mut Surface, layers: &[&Surface], rect: Rect) {
    dst.reshape(rect.width(), rect.height());
    if rect.is_empty() {
        return;
    }
    let dst_row_bytes = dst.width() as usize * 4;

    dst.data_mut()
        .par_chunks_mut(dst_row_bytes)
        .enumerate()
        .for_each(|(row, out)| {
            let y = rect.top + row as i32;
            for layer in layers {
                if y < 0 || y >= layer.height() as i32 {
                    continue;
                }
                let layer_row_bytes = layer.width() as usize * 4;
                let layer_row = &layer.data()[y as usize * layer_row_bytes..(y as usize + 1) * layer_row_bytes];
                for col in 0..rect.width() as i32 {
                    let x = rect.left + col;
                    if x < 0 || x >= layer.width() as i32 {
                        continue;
                    }
                    let src = &layer_row[x as usize * 4..x as usize * 4 + 4];
                    let o = col as usize * 4;
                    composite_rgba(&mut out[o..o + 4], src, BlendMode::Normal);
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_scratch(w: u32, h: u32) -> Surface {
        Surface::filled(w, h, [200, 50, 50, 255])
    }

    #[test]
    fn test_commit_clears_scratch_region() {
        let mut scratch = opaque_scratch(8, 8);
        let mut layer = Surface::new(8, 8);
        let rect = Rect::new(0, 0, 4, 4);
        commit_scratch(
            &mut scratch,
            rect,
            &mut layer,
            CommitParams {
                erosion: None,
                mask: None,
                op: CompositeOp::Blend(BlendMode::Normal),
            },
        );
        assert_eq!(layer.pixel(1, 1), Some([200, 50, 50, 255]));
        assert_eq!(layer.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(scratch.pixel(1, 1), Some([0, 0, 0, 0]));
        // Outside the committed region the scratch is untouched
        assert_eq!(scratch.pixel(5, 5), Some([200, 50, 50, 255]));
    }

    #[test]
    fn test_mask_blocks_paint() {
        let mut scratch = opaque_scratch(4, 4);
        let mut layer = Surface::new(4, 4);
        let mut mask = Surface::new(4, 4);
        mask.set_pixel(1, 1, [0, 0, 0, 255]);
        commit_scratch(
            &mut scratch,
            Rect::new(0, 0, 4, 4),
            &mut layer,
            CommitParams {
                erosion: None,
                mask: Some(&mask),
                op: CompositeOp::Blend(BlendMode::Normal),
            },
        );
        assert_eq!(layer.pixel(1, 1).map(|p| p[3]), Some(0));
        assert_eq!(layer.pixel(2, 2).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_erosion_removes_paint_in_valleys() {
        let mut scratch = opaque_scratch(4, 1);
        let mut map = Surface::new(2, 1);
        map.set_pixel(0, 0, [0, 0, 0, 255]);
        map.set_pixel(1, 0, [0, 0, 0, 0]);
        apply_erosion(
            &mut scratch,
            Rect::new(0, 0, 4, 1),
            Erosion {
                height_map: &map,
                influence: 1.0,
            },
        );
        // Map tiles every 2 px
        assert_eq!(scratch.pixel(0, 0).map(|p| p[3]), Some(0));
        assert_eq!(scratch.pixel(1, 0).map(|p| p[3]), Some(255));
        assert_eq!(scratch.pixel(2, 0).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_erase_op() {
        let mut scratch = opaque_scratch(2, 2);
        let mut layer = Surface::filled(2, 2, [0, 0, 255, 255]);
        commit_scratch(
            &mut scratch,
            Rect::new(0, 0, 2, 2),
            &mut layer,
            CommitParams {
                erosion: None,
                mask: None,
                op: CompositeOp::Erase,
            },
        );
        assert_eq!(layer.pixel(0, 0).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_flatten_top_layer_wins() {
        let bottom = Surface::filled(4, 4, [0, 0, 255, 255]);
        let mut top = Surface::new(4, 4);
        top.set_pixel(2, 2, [255, 0, 0, 255]);
        let mut dst = Surface::new(1, 1);
        flatten_into(&mut dst, &[&bottom, &top], Rect::new(1, 1, 4, 4));
        assert_eq!(dst.dimensions(), (3, 3));
        assert_eq!(dst.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(dst.pixel(0, 0), Some([0, 0, 255, 255]));
    }
}
