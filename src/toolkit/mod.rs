// src/toolkit/mod.rs

//! The graphics toolkit contract the demo drives.
//!
//! A toolkit owns the scene objects and the registered display. Once per frame
//! the caller invokes `handle_tasks`, during which the toolkit redraws changed
//! regions into the off-screen `PanelBuffer` and flushes them through
//! `PresentationSurface::blit_region`.
//!
//! `FlatToolkit` is the implementation shipped with the crate.

pub mod flat;


pub use flat::FlatToolkit;

use crate::color::{Color, Pixel};
use crate::fbdev::{Geometry, PresentationSurface};
use anyhow::Result;

/// Handle to an object created by a toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Container,
    MessageBox,
    Button,
    Rect,
}

/// A bitmap font known to the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Font {
    pub name: &'static str,
    pub size_px: u16,
}

impl Font {
    pub const SONG_23: Font = Font {
        name: "song",
        size_px: 23,
    };
}

/// A single style attribute of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Color(Color),
    BorderColor(Color),
    BorderWidth(u16),
    Alpha(u8),
    Radius(u16),
    Font(Font),
    Text(String),
    MsgboxTitle(String),
    MsgboxText(String),
    MsgboxApplyText(String),
    MsgboxCloseText(String),
}

/// Receives human-readable log lines from the toolkit.
pub type LogSink = Box<dyn Fn(&str) + Send>;

/// Off-screen staging buffer holding a few full display rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelBuffer {
    pixels: Vec<Pixel>,
    row_width: u32,
    rows: u32,
}

impl PanelBuffer {
    /// Allocates `rows` rows of `geometry.xres` pixels (at least one row).
    pub fn for_geometry(geometry: &Geometry, rows: u32) -> Self {
        let rows = rows.max(1);
        Self {
            pixels: vec![0; geometry.xres as usize * rows as usize],
            row_width: geometry.xres,
            rows,
        }
    }

    /// Capacity in pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn row_width(&self) -> u32 {
        self.row_width
    }

    /// Number of full display rows the buffer holds.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn as_slice(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }
}

/// Everything a toolkit needs to drive a display.
#[derive(Debug)]
pub struct DisplayDevice<S> {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub framebuffer: PanelBuffer,
    pub surface: S,
}

impl<S: PresentationSurface> DisplayDevice<S> {
    /// Describes `surface` with an off-screen buffer of `buffer_rows` rows.
    pub fn new(surface: S, buffer_rows: u32) -> Self {
        let geometry = surface.geometry();
        Self {
            xres: geometry.xres,
            yres: geometry.yres,
            // The demo never pans, so the visible size doubles as the virtual one.
            xres_virtual: geometry.xres,
            yres_virtual: geometry.yres,
            framebuffer: PanelBuffer::for_geometry(&geometry, buffer_rows),
            surface,
        }
    }
}

/// Object-based 2D toolkit API.
pub trait Toolkit {
    type Surface: PresentationSurface;

    /// Installs the sink the toolkit writes its log lines to.
    fn register_log(&mut self, sink: LogSink);

    /// Hands the display over to the toolkit.
    fn register_display(&mut self, device: DisplayDevice<Self::Surface>);

    /// One-time initialization; requires a registered display.
    fn init(&mut self) -> Result<()>;

    fn create(&mut self, kind: ObjectKind, parent: Option<ObjectId>) -> ObjectId;

    fn set_pos(&mut self, obj: ObjectId, x: i32, y: i32);

    fn set_size(&mut self, obj: ObjectId, width: u32, height: u32);

    fn set_style(&mut self, obj: ObjectId, style: Style);

    /// Processes pending work: redraws and flushes every changed region.
    fn handle_tasks(&mut self) -> Result<()>;

    /// The registered display surface, if any.
    fn surface(&self) -> Option<&Self::Surface>;

    fn set_color(&mut self, obj: ObjectId, color: Color) {
        self.set_style(obj, Style::Color(color));
    }

    fn set_border_color(&mut self, obj: ObjectId, color: Color) {
        self.set_style(obj, Style::BorderColor(color));
    }

    fn set_border_width(&mut self, obj: ObjectId, width: u16) {
        self.set_style(obj, Style::BorderWidth(width));
    }

    fn set_alpha(&mut self, obj: ObjectId, alpha: u8) {
        self.set_style(obj, Style::Alpha(alpha));
    }

    fn set_radius(&mut self, obj: ObjectId, radius: u16) {
        self.set_style(obj, Style::Radius(radius));
    }

    fn set_font(&mut self, obj: ObjectId, font: Font) {
        self.set_style(obj, Style::Font(font));
    }
}
