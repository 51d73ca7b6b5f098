//! Input module - pointer samples and the per-frame coalescing queue

mod queue;

pub use queue::InputQueue;

use serde::{Deserialize, Serialize};

/// One pointer sample in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSample {
    /// X coordinate in canvas space
    pub x: f32,
    /// Y coordinate in canvas space
    pub y: f32,
    /// Pressure value (0.0 - 1.0)
    #[serde(default = "default_pressure")]
    pub pressure: f32,
    /// Tilt X angle in degrees (-90 to 90)
    #[serde(default)]
    pub tilt_x: f32,
    /// Tilt Y angle in degrees (-90 to 90)
    #[serde(default)]
    pub tilt_y: f32,
}

fn default_pressure() -> f32 {
    1.0
}

impl InputSample {
    /// Create a new sample without tilt
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self::with_tilt(x, y, pressure, 0.0, 0.0)
    }

    /// Create with full parameters; out-of-range values are clamped
    pub fn with_tilt(x: f32, y: f32, pressure: f32, tilt_x: f32, tilt_y: f32) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            x: finite(x),
            y: finite(y),
            pressure: finite(pressure).clamp(0.0, 1.0),
            tilt_x: finite(tilt_x).clamp(-90.0, 90.0),
            tilt_y: finite(tilt_y).clamp(-90.0, 90.0),
        }
    }

    pub fn distance_to(&self, other: &InputSample) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Tilt magnitude normalized to 0.0 - 1.0
    pub fn tilt_magnitude(&self) -> f32 {
        (self.tilt_x.hypot(self.tilt_y) / 90.0).min(1.0)
    }

    /// Linear interpolation of position, pressure and tilt
    pub fn lerp(&self, other: &InputSample, t: f32) -> InputSample {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        InputSample {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            pressure: mix(self.pressure, other.pressure),
            tilt_x: mix(self.tilt_x, other.tilt_x),
            tilt_y: mix(self.tilt_y, other.tilt_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_creation() {
        let s = InputSample::new(100.0, 200.0, 0.5);
        assert_eq!(s.x, 100.0);
        assert_eq!(s.y, 200.0);
        assert_eq!(s.pressure, 0.5);
    }

    #[test]
    fn test_pressure_clamping() {
        assert_eq!(InputSample::new(0.0, 0.0, 1.5).pressure, 1.0);
        assert_eq!(InputSample::new(0.0, 0.0, -0.5).pressure, 0.0);
        assert_eq!(InputSample::new(0.0, 0.0, f32::NAN).pressure, 0.0);
    }

    #[test]
    fn test_tilt_clamping() {
        let s = InputSample::with_tilt(0.0, 0.0, 0.5, 120.0, -100.0);
        assert_eq!(s.tilt_x, 90.0);
        assert_eq!(s.tilt_y, -90.0);
        assert_eq!(s.tilt_magnitude(), 1.0);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = InputSample::new(0.0, 0.0, 0.0);
        let b = InputSample::new(10.0, 20.0, 1.0);
        let m = a.lerp(&b, 0.5);
        assert_eq!((m.x, m.y, m.pressure), (5.0, 10.0, 0.5));
    }

    #[test]
    fn test_json_defaults() {
        let s: InputSample = serde_json::from_str(r#"{ "x": 1, "y": 2 }"#).unwrap();
        assert_eq!(s.pressure, 1.0);
        assert_eq!(s.tilt_x, 0.0);
    }
}
