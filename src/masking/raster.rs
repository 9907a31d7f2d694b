//! In-memory RGB raster and the region operations masking needs.

use super::font;
use super::MaskingError;
use crate::detection::BoundingBox;

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

/// Integer pixel rectangle, half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn width(&self) -> u32 { self.x1.saturating_sub(self.x0) }
    pub fn height(&self) -> u32 { self.y1.saturating_sub(self.y0) }
    pub fn is_empty(&self) -> bool { self.width() == 0 || self.height() == 0 }

    /// Scale `bbox` by `scale` and clamp it to a `width` x `height` canvas.
    pub fn from_bbox(bbox: &BoundingBox, scale: f32, width: u32, height: u32) -> Self {
        let clamp = |v: f32, max: u32| -> u32 {
            if v.is_nan() || v <= 0.0 { 0 } else { (v as u32).min(max) }
        };
        Self {
            x0: clamp((bbox.x * scale).floor(), width),
            y0: clamp((bbox.y * scale).floor(), height),
            x1: clamp((bbox.right() * scale).ceil(), width),
            y1: clamp((bbox.bottom() * scale).ceil(), height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        Self { width, height, pixels: vec![fill; width as usize * height as usize] }
    }

    /// Build from packed RGB bytes, row-major.
    pub fn from_rgb(width: u32, height: u32, bytes: &[u8]) -> Result<Self, MaskingError> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(MaskingError::Document(format!(
                "raster {}x{} needs {} bytes, got {}",
                width, height, expected, bytes.len()
            )));
        }
        let pixels = bytes.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
        Ok(Self { width, height, pixels })
    }

    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height { return None; }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height { return; }
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn clip(&self, rect: PixelRect) -> PixelRect {
        PixelRect {
            x0: rect.x0.min(self.width),
            y0: rect.y0.min(self.height),
            x1: rect.x1.min(self.width),
            y1: rect.y1.min(self.height),
        }
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        let r = self.clip(rect);
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                let i = self.index(x, y);
                self.pixels[i] = color;
            }
        }
    }

    /// Separable Gaussian blur of `rect`. Samples outside the region are
    /// clamped to its edge so surrounding pixels never bleed in.
    pub fn gaussian_blur(&mut self, rect: PixelRect, sigma: f64) {
        let r = self.clip(rect);
        if r.is_empty() || sigma.is_nan() || sigma <= 0.0 { return; }

        let kernel = gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as i64;
        let (w, h) = (r.width() as usize, r.height() as usize);

        let mut region: Vec<[f64; 3]> = Vec::with_capacity(w * h);
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                let p = self.pixels[self.index(x, y)];
                region.push([p[0] as f64, p[1] as f64, p[2] as f64]);
            }
        }

        let pass = |src: &[[f64; 3]], horizontal: bool| -> Vec<[f64; 3]> {
            let mut dst = vec![[0.0; 3]; w * h];
            for y in 0..h {
                for x in 0..w {
                    let mut acc = [0.0; 3];
                    for (k, weight) in kernel.iter().enumerate() {
                        let offset = k as i64 - radius;
                        let (sx, sy) = if horizontal {
                            ((x as i64 + offset).clamp(0, w as i64 - 1) as usize, y)
                        } else {
                            (x, (y as i64 + offset).clamp(0, h as i64 - 1) as usize)
                        };
                        let s = src[sy * w + sx];
                        for c in 0..3 {
                            acc[c] += s[c] * weight;
                        }
                    }
                    dst[y * w + x] = acc;
                }
            }
            dst
        };
        let blurred = pass(&pass(&region, true), false);

        for (i, v) in blurred.iter().enumerate() {
            let (x, y) = (r.x0 + (i % w) as u32, r.y0 + (i / w) as u32);
            let idx = self.index(x, y);
            self.pixels[idx] = [to_u8(v[0]), to_u8(v[1]), to_u8(v[2])];
        }
    }

    /// Replace each `block` x `block` cell of `rect` with its mean colour.
    pub fn pixelate(&mut self, rect: PixelRect, block: u32) {
        let r = self.clip(rect);
        if r.is_empty() { return; }
        let block = block.max(1);

        let mut by = r.y0;
        while by < r.y1 {
            let ey = (by + block).min(r.y1);
            let mut bx = r.x0;
            while bx < r.x1 {
                let ex = (bx + block).min(r.x1);
                let mut sum = [0u64; 3];
                for y in by..ey {
                    for x in bx..ex {
                        let p = self.pixels[self.index(x, y)];
                        for c in 0..3 {
                            sum[c] += p[c] as u64;
                        }
                    }
                }
                let n = ((ex - bx) * (ey - by)) as u64;
                let mean = [(sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8];
                self.fill_rect(PixelRect { x0: bx, y0: by, x1: ex, y1: ey }, mean);
                bx = ex;
            }
            by = ey;
        }
    }

    /// Draw `text` with the built-in 5x7 font, each font pixel `scale`
    /// raster pixels wide. Glyphs past the right edge are clipped.
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, scale: u32, color: Rgb) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let rows = font::glyph(ch);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if bits & (1 << (font::GLYPH_WIDTH - 1 - col)) == 0 { continue; }
                    let px = cx + col * scale;
                    let py = y + row as u32 * scale;
                    self.fill_rect(PixelRect { x0: px, y0: py, x1: px + scale, y1: py + scale }, color);
                }
            }
            cx += font::ADVANCE * scale;
            if cx >= self.width { break; }
        }
    }
}

/// Width in raster pixels of `chars` glyphs at `scale`.
pub fn text_width(chars: usize, scale: u32) -> u32 {
    (chars as u32 * font::ADVANCE * scale.max(1)).saturating_sub(scale.max(1))
}

pub fn text_height(scale: u32) -> u32 {
    font::GLYPH_HEIGHT * scale.max(1)
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil().max(1.0) as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "raster_tests.rs"]
mod tests;
