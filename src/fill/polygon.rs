//! Fill regions and even-odd scanline rasterization

use crate::brush::smooth_closed_path;
use crate::raster::Rect;

/// Spacing of the smoothed lasso outline in pixels
const LASSO_SPACING: f32 = 2.0;

/// Closed area a fill operates on
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Closed polygon, even-odd rule
    Polygon(Vec<(f32, f32)>),
    /// Axis-aligned rectangle
    Rect(Rect),
}

impl Region {
    /// Freehand lasso, smoothed with a closed Catmull-Rom spline
    pub fn lasso(points: &[(f32, f32)]) -> Region {
        let finite: Vec<(f32, f32)> = points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        Region::Polygon(smooth_closed_path(&finite, LASSO_SPACING))
    }

    /// Rectangle spanning two drag corners
    pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Region {
        Region::Rect(Rect::from_corners(x0, y0, x1, y1))
    }

    /// Pixel bounds; empty for degenerate polygons
    pub fn bounds(&self) -> Rect {
        match self {
            Region::Rect(r) => *r,
            Region::Polygon(points) if points.len() >= 3 => {
                let mut r = Rect::empty();
                for &(x, y) in points {
                    r.expand(x, y, 0.0);
                }
                r
            }
            Region::Polygon(_) => Rect::empty(),
        }
    }

    /// Whether the point lies inside (even-odd for polygons)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self {
            Region::Rect(r) => {
                x >= r.left as f32 && x < r.right as f32 && y >= r.top as f32 && y < r.bottom as f32
            }
            Region::Polygon(points) => point_in_polygon(points, x, y),
        }
    }

    /// Visit every pixel whose center is inside the region, restricted to `clip`
    pub fn for_each_pixel(&self, clip: Rect, mut f: impl FnMut(i32, i32)) {
        match self {
            Region::Rect(r) => {
                let r = Rect::new(
                    r.left.max(clip.left),
                    r.top.max(clip.top),
                    r.right.min(clip.right),
                    r.bottom.min(clip.bottom),
                );
                for y in r.top..r.bottom {
                    for x in r.left..r.right {
                        f(x, y);
                    }
                }
            }
            Region::Polygon(points) => scan_polygon(points, clip, f),
        }
    }
}

/// Even-odd point test
pub fn point_in_polygon(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) {
            let cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Scanline fill sampling pixel centers
fn scan_polygon(points: &[(f32, f32)], clip: Rect, mut f: impl FnMut(i32, i32)) {
    let bounds = Region::Polygon(points.to_vec()).bounds();
    let top = bounds.top.max(clip.top);
    let bottom = bounds.bottom.min(clip.bottom);
    let mut crossings: Vec<f32> = Vec::with_capacity(16);

    for y in top..bottom {
        let cy = y as f32 + 0.5;
        crossings.clear();
        let mut j = points.len() - 1;
        for i in 0..points.len() {
            let (xi, yi) = points[i];
            let (xj, yj) = points[j];
            if (yi > cy) != (yj > cy) {
                crossings.push(xi + (cy - yi) * (xj - xi) / (yj - yi));
            }
            j = i;
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Pixel centers strictly inside [span0, span1)
            let start = ((span[0] - 0.5).ceil() as i32).max(clip.left);
            let end = ((span[1] - 0.5).ceil() as i32).min(clip.right);
            for x in start..end {
                f(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<(f32, f32)> {
        vec![(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)]
    }

    #[test]
    fn test_square_pixel_count() {
        let mut count = 0;
        Region::Polygon(square()).for_each_pixel(Rect::new(0, 0, 16, 16), |_, _| count += 1);
        assert_eq!(count, 36);
    }

    #[test]
    fn test_clip_limits_pixels() {
        let mut pixels = Vec::new();
        Region::Polygon(square()).for_each_pixel(Rect::new(0, 0, 4, 4), |x, y| pixels.push((x, y)));
        assert_eq!(pixels.len(), 4);
        assert!(pixels.iter().all(|&(x, y)| x < 4 && y < 4));
    }

    #[test]
    fn test_triangle_matches_point_test() {
        let tri = vec![(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)];
        let region = Region::Polygon(tri.clone());
        region.for_each_pixel(Rect::new(0, 0, 32, 32), |x, y| {
            assert!(point_in_polygon(&tri, x as f32 + 0.5, y as f32 + 0.5));
        });
        assert!(region.contains(2.0, 2.0));
        assert!(!region.contains(15.0, 15.0));
    }

    #[test]
    fn test_rect_region() {
        let region = Region::rect(10.0, 10.0, 4.0, 6.0);
        assert_eq!(region.bounds(), Rect::new(4, 6, 10, 10));
        let mut count = 0;
        region.for_each_pixel(Rect::new(0, 0, 100, 100), |_, _| count += 1);
        assert_eq!(count, 24);
        assert!(region.contains(5.0, 7.0));
    }

    #[test]
    fn test_degenerate_lasso_is_empty() {
        let region = Region::lasso(&[(1.0, 1.0), (5.0, 5.0)]);
        assert!(region.bounds().is_empty());
        let mut count = 0;
        region.for_each_pixel(Rect::new(0, 0, 10, 10), |_, _| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_lasso_is_smoothed() {
        let region = Region::lasso(&square());
        match region {
            Region::Polygon(points) => assert!(points.len() > 4),
            Region::Rect(_) => panic!("lasso must be a polygon"),
        }
    }
}
