// src/color.rs

//! Defines color-related enums (`NamedColor`, `Color`) and their packing into
//! 32-bit framebuffer pixels.
//!
//! Pixels are opaque `u32` values in ARGB8888 order (`0xAARRGGBB`), which on a
//! little-endian machine is the B, G, R, A byte layout used by 32bpp fbdev
//! modes. Channel offsets reported by the device are logged but not used to
//! reorder channels.

use serde::{Deserialize, Serialize};

/// A single 32-bit pixel as stored in the off-screen buffer and device memory.
pub type Pixel = u32;

const ALPHA_SHIFT: u32 = 24;
const RED_SHIFT: u32 = 16;
const GREEN_SHIFT: u32 = 8;

/// Palette of the named colors the demo scene uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    White,
    Gray,
    LightGray,
    Red,
    Green,
    Blue,
    BrightPurple,
}

impl NamedColor {
    /// Returns the `Color::Rgb` representation of this named color.
    pub fn to_rgb_color(self) -> Color {
        match self {
            NamedColor::Black => Color::Rgb(0, 0, 0),
            NamedColor::White => Color::Rgb(255, 255, 255),
            NamedColor::Gray => Color::Rgb(128, 128, 128),
            NamedColor::LightGray => Color::Rgb(211, 211, 211),
            NamedColor::Red => Color::Rgb(255, 0, 0),
            NamedColor::Green => Color::Rgb(0, 255, 0),
            NamedColor::Blue => Color::Rgb(0, 0, 255),
            NamedColor::BrightPurple => Color::Rgb(191, 64, 191),
        }
    }
}

/// A color value as accepted by toolkit property setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// A named palette color.
    Named(NamedColor),
    /// An RGB true color, with each component from 0 to 255.
    Rgb(u8, u8, u8),
}

impl Default for Color {
    fn default() -> Self {
        Color::Named(NamedColor::White)
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Color::Named(named)
    }
}

impl Color {
    /// Resolves the color to its `(r, g, b)` components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Named(named) => named.to_rgb_color().rgb(),
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }

    /// Packs the color into an opaque ARGB8888 pixel.
    pub fn to_pixel(self) -> Pixel {
        let (r, g, b) = self.rgb();
        pack_pixel(r, g, b)
    }
}

/// Packs components into an opaque ARGB8888 pixel.
pub fn pack_pixel(r: u8, g: u8, b: u8) -> Pixel {
    (0xFF << ALPHA_SHIFT) | ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | b as u32
}

/// Splits a pixel back into its `(r, g, b)` components, ignoring alpha.
pub fn unpack_pixel(pixel: Pixel) -> (u8, u8, u8) {
    (
        (pixel >> RED_SHIFT) as u8,
        (pixel >> GREEN_SHIFT) as u8,
        pixel as u8,
    )
}

/// Blends `src` over `dst` with the given coverage alpha (0 transparent, 255 opaque).
pub fn blend(dst: Pixel, src: Pixel, alpha: u8) -> Pixel {
    match alpha {
        0 => dst,
        255 => src,
        a => {
            let a = a as u32;
            let inv = 255 - a;
            let (dr, dg, db) = unpack_pixel(dst);
            let (sr, sg, sb) = unpack_pixel(src);
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
            pack_pixel(mix(sr, dr), mix(sg, dg), mix(sb, db))
        }
    }
}
