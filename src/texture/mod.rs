//! Paper texture - visual grain tile and the derived rejection height map
//!
//! The height map stores, in its alpha channel, how strongly paint is rejected
//! at each point of the paper: valleys and pores are high, peaks are low. The
//! stroke pipeline uses it as an erasure mask.

use rand::Rng;
use rayon::prelude::*;

use crate::core::errors::CoreError;
use crate::raster::Surface;

/// Below this rejection the grain is considered too faint to matter
const REJECTION_FLOOR: f32 = 0.02;
/// Gain applied after the cubic curve
const REJECTION_GAIN: f32 = 64.0;

/// Visual tile plus height map, always the same dimensions
#[derive(Debug, Clone)]
pub struct PaperTexture {
    pub visual: Surface,
    pub height_map: Surface,
}

impl PaperTexture {
    /// Build from a visual tile (procedural or user supplied)
    pub fn from_visual(visual: Surface) -> Self {
        let height_map = derive_height_map(&visual);
        Self { visual, height_map }
    }
}

/// Map luminance (0.0 - 1.0) to rejection strength (0.0 - 1.0)
pub fn rejection_from_luminance(luminance: f32) -> f32 {
    let rejection = 1.0 - luminance.clamp(0.0, 1.0);
    if rejection < REJECTION_FLOOR {
        return 0.0;
    }
    // Cubic curve isolates deep pores from shallow grain
    (rejection * rejection * rejection * REJECTION_GAIN).clamp(0.0, 1.0)
}

/// Derive the black height map whose alpha is the rejection strength
pub fn derive_height_map(visual: &Surface) -> Surface {
    let (w, h) = visual.dimensions();
    let mut map = Surface::new(w, h);
    let src = visual.data();

    map.data_mut()
        .par_chunks_mut(4)
        .zip(src.par_chunks(4))
        .for_each(|(dst, px)| {
            let l = (0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32) / 255.0;
            dst[0] = 0;
            dst[1] = 0;
            dst[2] = 0;
            dst[3] = (rejection_from_luminance(l) * 255.0).round() as u8;
        });

    map
}

/// Decode a user-supplied paper image
pub fn from_bytes(bytes: &[u8]) -> Result<PaperTexture, CoreError> {
    let image = image::load_from_memory(bytes)?;
    let visual = Surface::from_image(image.to_rgba8());
    tracing::info!(
        "Loaded paper texture {}x{}",
        visual.width(),
        visual.height()
    );
    Ok(PaperTexture::from_visual(visual))
}

/// Load a paper image from disk
pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<PaperTexture, CoreError> {
    let bytes = std::fs::read(path)?;
    from_bytes(&bytes)
}

/// Generate a procedural paper tile.
///
/// Non-positive dimensions produce a 1x1 texture.
pub fn generate_procedural<R: Rng + ?Sized>(width: i32, height: i32, rng: &mut R) -> PaperTexture {
    let w = width.max(1) as usize;
    let h = height.max(1) as usize;
    let mut gray = vec![248.0f32; w * h];

    paint_clumps(&mut gray, w, h, rng);
    paint_speckle(&mut gray, rng);
    paint_fibers(&mut gray, w, h, rng);
    let gray = box_blur(&gray, w, h);

    let mut visual = Surface::new(w as u32, h as u32);
    for (px, v) in visual.data_mut().chunks_exact_mut(4).zip(&gray) {
        let g = v.round().clamp(0.0, 255.0) as u8;
        px.copy_from_slice(&[g, g, g, 255]);
    }

    tracing::debug!("Generated procedural paper {}x{}", w, h);
    PaperTexture::from_visual(visual)
}

/// Coarse irregular clumps: random squashed ellipses, semi-transparent
fn paint_clumps<R: Rng + ?Sized>(gray: &mut [f32], w: usize, h: usize, rng: &mut R) {
    let count = (w * h / 300).max(1);
    for _ in 0..count {
        let cx = rng.gen_range(0.0..w as f32);
        let cy = rng.gen_range(0.0..h as f32);
        let rx = rng.gen_range(1.5..6.0f32);
        let ry = rx * rng.gen_range(0.3..1.0f32);
        let angle = rng.gen_range(0.0..std::f32::consts::PI);
        let shade = rng.gen_range(150.0..255.0f32);
        let alpha = rng.gen_range(0.08..0.3f32);
        let (sin, cos) = angle.sin_cos();
        let reach = rx.ceil() as i32 + 1;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                // Clumps wrap so the tile stays seamless
                let xi = x.rem_euclid(w as i32) as usize;
                let yi = y.rem_euclid(h as i32) as usize;
                let fx = x as f32 + 0.5 - cx;
                let fy = y as f32 + 0.5 - cy;
                let u = (fx * cos + fy * sin) / rx;
                let v = (-fx * sin + fy * cos) / ry;
                if u * u + v * v <= 1.0 {
                    let p = &mut gray[yi * w + xi];
                    *p += (shade - *p) * alpha;
                }
            }
        }
    }
}

/// Fine pixel-level darkening, about 3% of pixels
fn paint_speckle<R: Rng + ?Sized>(gray: &mut [f32], rng: &mut R) {
    for p in gray.iter_mut() {
        if rng.gen_bool(0.03) {
            *p *= rng.gen_range(0.6..0.9f32);
        }
    }
}

/// Long directional fibers composited with multiply
fn paint_fibers<R: Rng + ?Sized>(gray: &mut [f32], w: usize, h: usize, rng: &mut R) {
    let count = ((w + h) / 24).max(1);
    let base_angle = rng.gen_range(0.0..std::f32::consts::PI);
    for _ in 0..count {
        let angle = base_angle + rng.gen_range(-0.3..0.3f32);
        let length = rng.gen_range(0.3..1.0f32) * w.max(h) as f32;
        let mut x = rng.gen_range(0.0..w as f32);
        let mut y = rng.gen_range(0.0..h as f32);
        let tone = rng.gen_range(0.85..0.97f32);
        let (sin, cos) = angle.sin_cos();

        let mut travelled = 0.0;
        while travelled < length {
            let xi = (x as i32).rem_euclid(w as i32) as usize;
            let yi = (y as i32).rem_euclid(h as i32) as usize;
            gray[yi * w + xi] *= tone;
            x += cos;
            y += sin;
            travelled += 1.0;
        }
    }
}

/// 3x3 wrapping box blur merging clumps into continuous hills and valleys
fn box_blur(gray: &[f32], w: usize, h: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; gray.len()];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, o) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let sx = (x as i32 + dx).rem_euclid(w as i32) as usize;
                    let sy = (y as i32 + dy).rem_euclid(h as i32) as usize;
                    sum += gray[sy * w + sx];
                }
            }
            *o = sum / 9.0;
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejection_curve() {
        // White paper: no rejection
        assert_eq!(rejection_from_luminance(1.0), 0.0);
        // Faint grain suppressed
        assert_eq!(rejection_from_luminance(0.99), 0.0);
        // Deep pore saturates
        assert_eq!(rejection_from_luminance(0.0), 1.0);
        // Monotonic in darkness
        let a = rejection_from_luminance(0.9);
        let b = rejection_from_luminance(0.85);
        assert!(b > a);
    }

    #[test]
    fn test_height_map_is_black_with_alpha() {
        let mut visual = Surface::filled(2, 1, [255, 255, 255, 255]);
        visual.set_pixel(1, 0, [0, 0, 0, 255]);
        let map = derive_height_map(&visual);
        assert_eq!(map.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(map.pixel(1, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_procedural_dimensions() {
        let mut rng = StdRng::seed_from_u64(7);
        let tex = generate_procedural(64, 32, &mut rng);
        assert_eq!(tex.visual.dimensions(), (64, 32));
        assert_eq!(tex.height_map.dimensions(), (64, 32));
    }

    #[test]
    fn test_non_positive_dimensions_degrade() {
        let mut rng = StdRng::seed_from_u64(7);
        let tex = generate_procedural(0, -5, &mut rng);
        assert_eq!(tex.visual.dimensions(), (1, 1));
        assert_eq!(tex.height_map.dimensions(), (1, 1));
    }

    #[test]
    fn test_procedural_has_some_pores() {
        let mut rng = StdRng::seed_from_u64(42);
        let tex = generate_procedural(128, 128, &mut rng);
        let alphas: Vec<u8> = tex.height_map.data().chunks(4).map(|p| p[3]).collect();
        assert!(alphas.iter().any(|&a| a > 0));
        assert!(alphas.iter().any(|&a| a == 0));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(from_bytes(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_from_path_loads_png() {
        let path = std::env::temp_dir().join(format!("gouache_paper_{}.png", std::process::id()));
        let mut img = image::RgbaImage::from_pixel(8, 4, image::Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 2, image::Rgba([0, 0, 0, 255]));
        img.save(&path).unwrap();

        let loaded = from_path(&path);
        let _ = std::fs::remove_file(&path);
        let tex = loaded.unwrap();
        assert_eq!(tex.visual.dimensions(), (8, 4));
        assert_eq!(tex.height_map.pixel(3, 2), Some([0, 0, 0, 255]));
        assert_eq!(tex.height_map.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("gouache_paper_does_not_exist.png");
        assert!(matches!(from_path(path), Err(CoreError::Io(_))));
    }
}
