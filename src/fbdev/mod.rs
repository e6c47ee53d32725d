// src/fbdev/mod.rs

//! Presentation surface: a Linux framebuffer device mapped into memory, plus
//! the rectangular blit that copies rendered pixels into it.
//!
//! `FramebufferSurface` is the live device. `MemorySurface` implements the
//! same `PresentationSurface` trait over a plain vector and backs the tests.

pub mod error;
pub mod memory;
pub mod screeninfo;
pub mod surface;

#[cfg(test)]
mod tests;

pub use error::SurfaceError;
pub use memory::MemorySurface;
pub use screeninfo::{FbBitfield, FbFixScreenInfo, FbVarScreenInfo};
pub use surface::FramebufferSurface;

use crate::color::Pixel;

/// The only supported pixel depth.
pub const BITS_PER_PIXEL: u32 = 32;
/// Size of one pixel in device memory.
pub const BYTES_PER_PIXEL: usize = 4;

/// A rectangle in surface pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Area {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered by the rectangle.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }
}

/// Display geometry as discovered from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    /// Distance between the starts of two consecutive rows, in pixels.
    pub stride_px: u32,
}

impl Geometry {
    /// A geometry whose rows are packed back to back.
    pub fn packed(xres: u32, yres: u32) -> Self {
        Self {
            xres,
            yres,
            xres_virtual: xres,
            yres_virtual: yres,
            stride_px: xres,
        }
    }

    /// Validates variable screen info and derives the geometry.
    ///
    /// `line_length` is the row pitch in bytes from the fixed screen info, if
    /// it could be queried. It is only honoured when it holds at least one
    /// full visible row.
    pub fn from_screen_info(
        info: &FbVarScreenInfo,
        line_length: Option<u32>,
    ) -> Result<Self, SurfaceError> {
        if info.bits_per_pixel != BITS_PER_PIXEL {
            return Err(SurfaceError::UnsupportedFormat {
                bits_per_pixel: info.bits_per_pixel,
            });
        }
        let stride_px = line_length
            .map(|bytes| bytes / BYTES_PER_PIXEL as u32)
            .filter(|&px| px >= info.xres)
            .unwrap_or(info.xres);
        Ok(Self {
            xres: info.xres,
            yres: info.yres,
            xres_virtual: info.xres_virtual,
            yres_virtual: info.yres_virtual,
            stride_px,
        })
    }

    /// Bytes of device memory covering the visible rows.
    pub fn screen_size_bytes(&self) -> usize {
        self.stride_px as usize * self.yres as usize * BYTES_PER_PIXEL
    }

    /// The whole visible surface as an `Area`.
    pub fn bounds(&self) -> Area {
        Area::new(0, 0, self.xres, self.yres)
    }

    /// Rejects regions that fall outside the visible surface or whose source
    /// holds too few pixels.
    pub fn check_region(&self, area: Area, src_len: usize) -> Result<(), SurfaceError> {
        if area.right() > self.xres as u64 || area.bottom() > self.yres as u64 {
            return Err(SurfaceError::RegionOutOfBounds {
                area,
                width: self.xres,
                height: self.yres,
            });
        }
        let needed = area.pixel_count();
        if src_len < needed {
            return Err(SurfaceError::SourceTooShort {
                needed,
                actual: src_len,
            });
        }
        Ok(())
    }
}

/// A display target the toolkit flushes rendered regions into.
pub trait PresentationSurface {
    fn geometry(&self) -> Geometry;

    /// Copies `area.height` rows of `area.width` pixels from `src` into the
    /// surface at `(area.x, area.y)`. Source rows are `area.width` apart,
    /// destination rows are one stride apart.
    fn blit_region(&mut self, area: Area, src: &[Pixel]) -> Result<(), SurfaceError>;
}

/// Row copy shared by every surface. The region must already be checked
/// against the geometry `dest` was laid out with.
pub(crate) fn blit_into(dest: &mut [Pixel], stride_px: usize, area: Area, src: &[Pixel]) {
    if area.is_empty() {
        return;
    }
    let width = area.width as usize;
    let mut dest_start = area.y as usize * stride_px + area.x as usize;
    for src_row in src.chunks_exact(width).take(area.height as usize) {
        dest[dest_start..dest_start + width].copy_from_slice(src_row);
        dest_start += stride_px;
    }
}
