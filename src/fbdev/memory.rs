// src/fbdev/memory.rs

use super::{blit_into, Area, Geometry, PresentationSurface, SurfaceError};
use crate::color::Pixel;

/// Vector-backed surface with the same layout rules as a mapped device.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    geometry: Geometry,
    pixels: Vec<Pixel>,
    blits: usize,
}

impl MemorySurface {
    pub fn new(geometry: Geometry) -> Self {
        Self::filled(geometry, 0)
    }

    /// Surface with every pixel, including stride padding, set to `fill`.
    pub fn filled(geometry: Geometry, fill: Pixel) -> Self {
        let len = geometry.stride_px as usize * geometry.yres as usize;
        Self {
            geometry,
            pixels: vec![fill; len],
            blits: 0,
        }
    }

    /// Raw pixel memory, `stride_px` pixels per row.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[y as usize * self.geometry.stride_px as usize + x as usize]
    }

    /// Number of successful `blit_region` calls so far.
    pub fn blit_count(&self) -> usize {
        self.blits
    }
}

impl PresentationSurface for MemorySurface {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn blit_region(&mut self, area: Area, src: &[Pixel]) -> Result<(), SurfaceError> {
        self.geometry.check_region(area, src.len())?;
        blit_into(
            &mut self.pixels,
            self.geometry.stride_px as usize,
            area,
            src,
        );
        self.blits += 1;
        Ok(())
    }
}
