//! Catmull-Rom smoothing for lasso outlines

/// Smooth a closed outline; the spline wraps around from the last vertex
/// back to the first. Fewer than 3 vertices are returned unchanged.
pub fn smooth_closed_path(points: &[(f32, f32)], spacing: f32) -> Vec<(f32, f32)> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let spacing = spacing.max(0.1);
    let mut result = Vec::with_capacity(n * 4);

    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];

        let len = (p2.0 - p1.0).hypot(p2.1 - p1.1);
        let steps = ((len / spacing).ceil() as usize).clamp(1, 64);
        for step in 0..steps {
            let w = basis(step as f32 / steps as f32);
            result.push((
                w[0] * p0.0 + w[1] * p1.0 + w[2] * p2.0 + w[3] * p3.0,
                w[0] * p0.1 + w[1] * p1.1 + w[2] * p2.1 + w[3] * p3.1,
            ));
        }
    }
    result
}

/// Catmull-Rom basis weights at `t`
fn basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}
