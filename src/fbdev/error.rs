// src/fbdev/error.rs

use super::Area;
use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the presentation surface.
///
/// The first four variants are initialization failures and are fatal to the
/// program; the last two are rejected blit requests.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The device node could not be opened read/write.
    #[error("framebuffer device {} unavailable: {source}", .path.display())]
    DeviceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The screen geometry ioctl failed.
    #[error("failed to query screen info of {}: {source}", .path.display())]
    QueryFailed {
        path: PathBuf,
        #[source]
        source: Errno,
    },

    /// The device is not in a packed 32 bits-per-pixel mode.
    #[error("unsupported pixel format: {bits_per_pixel} bits per pixel (need 32)")]
    UnsupportedFormat { bits_per_pixel: u32 },

    /// The device memory could not be mapped.
    #[error("failed to map {len} bytes of framebuffer memory: {source}")]
    MapFailed {
        len: usize,
        #[source]
        source: Errno,
    },

    /// The blit rectangle does not fit inside the surface.
    #[error("region {area:?} exceeds {width}x{height} surface")]
    RegionOutOfBounds { area: Area, width: u32, height: u32 },

    /// The source buffer holds fewer pixels than the region needs.
    #[error("source buffer holds {actual} pixels, region needs {needed}")]
    SourceTooShort { needed: usize, actual: usize },
}
