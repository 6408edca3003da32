//! RGBA framebuffer.
//!
//! Row-major 32-bit pixels, `(A<<24)|(R<<16)|(G<<8)|B`, straight alpha.
//! Stride equals width. All drawing engines own one of these and blend
//! into it; compositing promotes to premultiplied only locally.

use log::debug;

use crate::error::Error;

// ============================================================================
// Framebuffer
// ============================================================================

#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl Framebuffer {
    /// Allocate a framebuffer. Fails fast on zero dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        debug!("framebuffer {}x{} allocated", width, height);
        Ok(Self {
            width,
            height,
            data: vec![0; width * height],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: u32) {
        self.data.fill(color);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, p: u32) {
        self.data[y * self.width + x] = p;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Write the framebuffer as an RGBA PNG.
    #[cfg(feature = "png")]
    pub fn write_png<P: AsRef<std::path::Path>>(&self, path: P) -> image::ImageResult<()> {
        let mut img = image::RgbaImage::new(self.width as u32, self.height as u32);
        for (i, px) in self.data.iter().enumerate() {
            let x = (i % self.width) as u32;
            let y = (i / self.width) as u32;
            img.put_pixel(
                x,
                y,
                image::Rgba([
                    (px >> 16) as u8,
                    (px >> 8) as u8,
                    *px as u8,
                    (px >> 24) as u8,
                ]),
            );
        }
        img.save(path)
    }
}

// ============================================================================
// Tests
// ============================================================================
