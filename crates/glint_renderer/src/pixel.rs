//! Progressive pixel buffer.
//!
//! Every pixel keeps the running sum of all colors sampled through it and
//! how many samples that is. Each pixel sits behind its own lock, so workers
//! only contend when they land on the same pixel, and a reader never sees a
//! sum without its matching count.
//!
//! Readers take one pixel lock at a time. A snapshot of the whole buffer is
//! therefore not a single instant: pixels updated while the snapshot is in
//! progress may or may not be included. Display code samples the buffer once
//! per frame, so this costs at most one frame of staleness.

use std::sync::{Mutex, MutexGuard};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rayon::prelude::*;

use crate::Color;

/// Accumulated estimate for one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelEntity {
    /// Mean of all samples so far
    pub color: Color,
    pub accumulation: Vec3,
    pub count: u32,
}

impl PixelEntity {
    /// Fold a new sample into the running mean.
    pub fn accumulate(&mut self, sample: Color) {
        self.accumulation += sample.to_vec3();
        self.count += 1;
        self.color = Color::from_vec3(self.accumulation / self.count as f32);
    }
}

/// Packed RGBA float for display upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// Width x height grid of accumulating pixels, stored row-major.
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Mutex<PixelEntity>>,
}

impl PixelBuffer {
    /// Create a buffer with every pixel black and unsampled.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: (0..len).map(|_| Mutex::new(PixelEntity::default())).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// A panicking worker cannot leave a pixel half-written, since the
    /// update itself never panics, so a poisoned lock is still consistent.
    fn lock(cell: &Mutex<PixelEntity>) -> MutexGuard<'_, PixelEntity> {
        cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fold a sample into pixel `(x, y)`. Out-of-range coordinates are ignored.
    pub fn accumulate(&self, x: u32, y: u32, sample: Color) {
        if let Some(i) = self.index(x, y) {
            Self::lock(&self.pixels[i]).accumulate(sample);
        }
    }

    /// Copy of pixel `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PixelEntity> {
        self.index(x, y).map(|i| *Self::lock(&self.pixels[i]))
    }

    /// One-line readout of a pixel, for hover displays.
    pub fn describe_pixel(&self, x: u32, y: u32) -> Option<String> {
        self.pixel(x, y).map(|p| {
            format!(
                "({x}, {y}) rgb({:.3}, {:.3}, {:.3}) after {} samples",
                p.color.r, p.color.g, p.color.b, p.count
            )
        })
    }

    /// Current mean color of every pixel, row-major.
    pub fn snapshot(&self) -> Vec<Color> {
        self.pixels.par_iter().map(|cell| Self::lock(cell).color).collect()
    }

    /// Current colors packed for texture upload.
    pub fn to_rgba_f32(&self) -> Vec<Rgba> {
        self.pixels
            .par_iter()
            .map(|cell| Rgba::from(Self::lock(cell).color))
            .collect()
    }

    /// Current colors as 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .par_iter()
            .flat_map_iter(|cell| color_to_rgba(Self::lock(cell).color))
            .collect()
    }

    /// Total samples folded into the buffer.
    pub fn total_samples(&self) -> u64 {
        self.pixels
            .par_iter()
            .map(|cell| Self::lock(cell).count as u64)
            .sum()
    }
}

/// Convert a color to 8-bit RGBA, clamping to [0, 1].
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * c.clamp(0.0, 1.0)).round() as u8;
    [to_byte(color.r), to_byte(color.g), to_byte(color.b), to_byte(color.a)]
}
