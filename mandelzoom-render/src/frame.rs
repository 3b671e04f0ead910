use mandelzoom_core::PlaneWindow;

/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a new raster filled with opaque black.
    #[cfg(test)]
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }
}

/// One rendered image of the set and the view that produced it.
///
/// Frames are never modified after rasterization; the frame store hands
/// them out behind `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub raster: Raster,
    pub magnification: f64,
    pub window: PlaneWindow,
    pub max_iterations: u32,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }
}
