// src/fbdev/surface.rs

use super::screeninfo::{self, FbVarScreenInfo};
use super::{blit_into, Area, Geometry, PresentationSurface, SurfaceError, BYTES_PER_PIXEL};
use crate::color::Pixel;
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};
use std::ffi::c_void;
use std::fs::{File, OpenOptions};
use std::num::NonZeroUsize;
use std::path::Path;
use std::ptr::NonNull;

/// A framebuffer device mapped read/write into the process.
///
/// The mapping is released and the device closed on drop.
#[derive(Debug)]
pub struct FramebufferSurface {
    // Kept open for the lifetime of the mapping.
    _file: File,
    mapping: NonNull<c_void>,
    len_bytes: usize,
    geometry: Geometry,
}

impl FramebufferSurface {
    /// Opens the device at `path`, validates its mode and maps its memory.
    pub fn open(path: &Path) -> Result<Self, SurfaceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| SurfaceError::DeviceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

        let var_info =
            screeninfo::query_variable(&file).map_err(|source| SurfaceError::QueryFailed {
                path: path.to_path_buf(),
                source,
            })?;
        log_var_info(&var_info);

        let line_length = match screeninfo::query_fixed(&file) {
            Ok(fix_info) => {
                info!(
                    "FramebufferSurface: driver '{}', line_length {} bytes, smem_len {}",
                    fix_info.id(),
                    fix_info.line_length,
                    fix_info.smem_len
                );
                Some(fix_info.line_length)
            }
            Err(e) => {
                warn!(
                    "FramebufferSurface: fixed screen info unavailable ({}), assuming packed rows",
                    e
                );
                None
            }
        };

        let geometry = Geometry::from_screen_info(&var_info, line_length)?;
        Self::map(file, geometry)
    }

    /// Maps `geometry.screen_size_bytes()` of `file` shared and read/write.
    ///
    /// `open` uses this after querying the device; any file at least that
    /// large can be mapped the same way.
    pub fn map(file: File, geometry: Geometry) -> Result<Self, SurfaceError> {
        let len_bytes = geometry.screen_size_bytes();
        let length = NonZeroUsize::new(len_bytes).ok_or(SurfaceError::MapFailed {
            len: 0,
            source: Errno::EINVAL,
        })?;

        // SAFETY: a fresh shared mapping of an open file; no existing memory is aliased.
        let mapping = unsafe {
            mmap(
                None,
                length,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &file,
                0,
            )
        }
        .map_err(|source| SurfaceError::MapFailed {
            len: len_bytes,
            source,
        })?;

        info!(
            "FramebufferSurface: mapped {} bytes ({}x{}, stride {} px)",
            len_bytes, geometry.xres, geometry.yres, geometry.stride_px
        );
        Ok(Self {
            _file: file,
            mapping,
            len_bytes,
            geometry,
        })
    }

    /// Mapped device memory, `stride_px` pixels per row.
    pub fn pixels(&self) -> &[Pixel] {
        // SAFETY: the mapping is page aligned, `len_bytes` long and lives as long as `self`.
        unsafe {
            std::slice::from_raw_parts(
                self.mapping.as_ptr() as *const Pixel,
                self.len_bytes / BYTES_PER_PIXEL,
            )
        }
    }

    fn pixels_mut(&mut self) -> &mut [Pixel] {
        // SAFETY: as in `pixels`; `&mut self` guarantees exclusive access.
        unsafe {
            std::slice::from_raw_parts_mut(
                self.mapping.as_ptr() as *mut Pixel,
                self.len_bytes / BYTES_PER_PIXEL,
            )
        }
    }
}

fn log_var_info(info: &FbVarScreenInfo) {
    info!("FramebufferSurface: xres {}", info.xres);
    info!("FramebufferSurface: yres {}", info.yres);
    info!("FramebufferSurface: bpp {}", info.bits_per_pixel);
    debug!(
        "FramebufferSurface: virtual {}x{}, red {:?}, green {:?}, blue {:?}, transp {:?}",
        info.xres_virtual, info.yres_virtual, info.red, info.green, info.blue, info.transp
    );
}

impl PresentationSurface for FramebufferSurface {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn blit_region(&mut self, area: Area, src: &[Pixel]) -> Result<(), SurfaceError> {
        self.geometry.check_region(area, src.len())?;
        let stride_px = self.geometry.stride_px as usize;
        blit_into(self.pixels_mut(), stride_px, area, src);
        Ok(())
    }
}

impl Drop for FramebufferSurface {
    fn drop(&mut self) {
        // SAFETY: `mapping` came from `mmap` with this length and is unmapped only here.
        match unsafe { munmap(self.mapping, self.len_bytes) } {
            Ok(()) => debug!("FramebufferSurface: unmapped {} bytes", self.len_bytes),
            Err(e) => warn!("FramebufferSurface: munmap failed: {}", e),
        }
    }
}

// The mapping is owned exclusively by this value.
unsafe impl Send for FramebufferSurface {}
