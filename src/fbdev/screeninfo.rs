// src/fbdev/screeninfo.rs

//! `repr(C)` mirrors of the kernel's `fb_var_screeninfo` / `fb_fix_screeninfo`
//! and the ioctls that fill them.

use std::fs::File;
use std::os::unix::io::AsRawFd;

const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOGET_FSCREENINFO: u32 = 0x4602;

nix::ioctl_read_bad!(fbioget_vscreeninfo, FBIOGET_VSCREENINFO, FbVarScreenInfo);
nix::ioctl_read_bad!(fbioget_fscreeninfo, FBIOGET_FSCREENINFO, FbFixScreenInfo);

/// Position of one color channel inside a pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

/// Variable screen information (`struct fb_var_screeninfo`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbVarScreenInfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

/// Fixed screen information (`struct fb_fix_screeninfo`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbFixScreenInfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FbFixScreenInfo {
    /// Driver identification string, e.g. `"simple"` or `"EFI VGA"`.
    pub fn id(&self) -> String {
        let end = self.id.iter().position(|&b| b == 0).unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }
}

/// Reads the variable screen information of an open framebuffer device.
pub fn query_variable(file: &File) -> nix::Result<FbVarScreenInfo> {
    let mut info = FbVarScreenInfo::default();
    // SAFETY: `info` is a properly sized, writable `fb_var_screeninfo`.
    unsafe { fbioget_vscreeninfo(file.as_raw_fd(), &mut info) }?;
    Ok(info)
}

/// Reads the fixed screen information of an open framebuffer device.
pub fn query_fixed(file: &File) -> nix::Result<FbFixScreenInfo> {
    let mut info = FbFixScreenInfo::default();
    // SAFETY: `info` is a properly sized, writable `fb_fix_screeninfo`.
    unsafe { fbioget_fscreeninfo(file.as_raw_fd(), &mut info) }?;
    Ok(info)
}
