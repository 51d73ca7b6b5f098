//! RGBA8 raster surface (straight alpha)

use image::{imageops::FilterType, RgbaImage};

use super::Rect;

/// Owned RGBA8 pixel buffer.
///
/// A surface is never smaller than 1x1: zero dimensions degrade to a single
/// transparent pixel so callers never have to handle an empty raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Create a surface filled with one color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut s = Self::new(width, height);
        s.fill(rgba);
        s
    }

    /// Wrap raw RGBA bytes; `None` when the length does not match
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (w, h) = image.dimensions();
        Self::from_raw(w, h, image.into_raw()).unwrap_or_else(|| Self::new(1, 1))
    }

    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Size of the pixel storage in bytes
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.index(x as u32, y as u32);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.index(x as u32, y as u32);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Alpha with coordinates wrapped, for tiling textures
    #[inline]
    pub fn alpha_wrapped(&self, x: i32, y: i32) -> u8 {
        let wx = x.rem_euclid(self.width as i32) as u32;
        let wy = y.rem_euclid(self.height as i32) as u32;
        self.data[self.index(wx, wy) + 3]
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Zero the pixels inside `rect`
    pub fn clear_rect(&mut self, rect: Rect) {
        let r = rect.clamped(self.width, self.height);
        if r.is_empty() {
            return;
        }
        for y in r.top..r.bottom {
            let start = self.index(r.left as u32, y as u32);
            let end = self.index(r.right as u32 - 1, y as u32) + 4;
            self.data[start..end].fill(0);
        }
    }

    /// Reshape in place, keeping the allocation when it is large enough.
    /// Contents are zeroed.
    pub fn reshape(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        let len = self.width as usize * self.height as usize * 4;
        self.data.clear();
        self.data.resize(len, 0);
    }

    /// Copy of the pixels inside `rect` (clamped); `None` when nothing remains
    pub fn crop(&self, rect: Rect) -> Option<Surface> {
        let r = rect.clamped(self.width, self.height);
        if r.is_empty() {
            return None;
        }
        let mut out = Surface::new(r.width(), r.height());
        let row_bytes = r.width() as usize * 4;
        for (row, y) in (r.top..r.bottom).enumerate() {
            let src = self.index(r.left as u32, y as u32);
            let dst = row * row_bytes;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        Some(out)
    }

    /// Rescaled copy. Content is resampled, never discarded.
    pub fn rescaled(&self, width: u32, height: u32) -> Surface {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == self.dimensions() {
            return self.clone();
        }
        match self.to_image() {
            Some(img) => {
                Surface::from_image(image::imageops::resize(&img, width, height, FilterType::Triangle))
            }
            None => Surface::new(width, height),
        }
    }

    /// Invert the alpha channel and paint every pixel with `tint`
    pub fn invert_alpha(&mut self, tint: [u8; 3]) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = tint[0];
            px[1] = tint[1];
            px[2] = tint[2];
            px[3] = 255 - px[3];
        }
    }
}
