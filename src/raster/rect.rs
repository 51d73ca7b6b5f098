//! Integer rectangles for write-bounds tracking

use serde::{Deserialize, Serialize};

/// Half-open pixel rectangle `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Default for Rect {
    fn default() -> Self {
        Self::empty()
    }
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rect spanning two arbitrary corners
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            left: x0.min(x1).floor() as i32,
            top: y0.min(y1).floor() as i32,
            right: x0.max(x1).ceil() as i32,
            bottom: y0.max(y1).ceil() as i32,
        }
    }

    /// An inverted rect that any `expand`/`union` replaces
    pub fn empty() -> Self {
        Self {
            left: i32::MAX,
            top: i32::MAX,
            right: i32::MIN,
            bottom: i32::MIN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }

    /// Grow to include a disc of `radius` around `(x, y)`
    pub fn expand(&mut self, x: f32, y: f32, radius: f32) {
        let r = radius.max(0.0).ceil() as i32;
        let (x, y) = (x.floor() as i32, y.floor() as i32);
        self.left = self.left.min(x.saturating_sub(r));
        self.top = self.top.min(y.saturating_sub(r));
        self.right = self.right.max(x.saturating_add(r).saturating_add(1));
        self.bottom = self.bottom.max(y.saturating_add(r).saturating_add(1));
    }

    pub fn union(&mut self, other: &Rect) {
        if other.is_empty() {
            return;
        }
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.max(other.bottom);
    }

    /// Grow every edge outward by `margin`
    pub fn inflate(&self, margin: i32) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.left.saturating_sub(margin),
            self.top.saturating_sub(margin),
            self.right.saturating_add(margin),
            self.bottom.saturating_add(margin),
        )
    }

    pub fn clamp_to(&mut self, width: u32, height: u32) {
        self.left = self.left.max(0);
        self.top = self.top.max(0);
        self.right = self.right.min(width as i32);
        self.bottom = self.bottom.min(height as i32);
    }

    pub fn clamped(&self, width: u32, height: u32) -> Rect {
        let mut r = *self;
        r.clamp_to(width, height);
        r
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}
