// src/toolkit/flat.rs

//! Flat software toolkit.
//!
//! Objects are drawn as solid rectangles with a border, alpha-blended in
//! creation order over a background color. Corner radius, fonts and text are
//! recorded but not rasterized. Changes are tracked as dirty rectangles which
//! `handle_tasks` redraws band by band through the off-screen buffer.

use super::{DisplayDevice, Font, LogSink, ObjectId, ObjectKind, Style, Toolkit};
use crate::color::{blend, Color, NamedColor, Pixel};
use crate::fbdev::{Area, PresentationSurface};
use anyhow::{bail, Context, Result};
use log::{debug, trace, warn};

/// Half-open rectangle in signed screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Rect {
    fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + width as i64,
            y1: y + height as i64,
        }
    }

    fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// True when the rectangles overlap or share an edge.
    fn touches(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Only valid for non-empty rectangles inside the screen.
    fn to_area(self) -> Area {
        Area::new(
            self.x0 as u32,
            self.y0 as u32,
            (self.x1 - self.x0) as u32,
            (self.y1 - self.y0) as u32,
        )
    }
}

impl From<Area> for Rect {
    fn from(area: Area) -> Self {
        Rect::new(area.x as i64, area.y as i64, area.width, area.height)
    }
}

#[derive(Debug, Clone)]
struct Object {
    kind: ObjectKind,
    parent: Option<ObjectId>,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Color,
    border_color: Color,
    border_width: u16,
    alpha: u8,
    radius: u16,
    font: Option<Font>,
    text: Option<String>,
    title: Option<String>,
    body: Option<String>,
    apply_text: Option<String>,
    close_text: Option<String>,
}

impl Object {
    fn new(kind: ObjectKind, parent: Option<ObjectId>) -> Self {
        let (color, border_color, border_width) = match kind {
            ObjectKind::Container | ObjectKind::Rect => (NamedColor::White, NamedColor::Black, 0),
            ObjectKind::MessageBox => (NamedColor::White, NamedColor::LightGray, 1),
            ObjectKind::Button => (NamedColor::LightGray, NamedColor::Black, 1),
        };
        Self {
            kind,
            parent,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            color: color.into(),
            border_color: border_color.into(),
            border_width,
            alpha: 255,
            radius: 0,
            font: None,
            text: None,
            title: None,
            body: None,
            apply_text: None,
            close_text: None,
        }
    }

    fn apply(&mut self, style: Style) {
        match style {
            Style::Color(color) => self.color = color,
            Style::BorderColor(color) => self.border_color = color,
            Style::BorderWidth(width) => self.border_width = width,
            Style::Alpha(alpha) => self.alpha = alpha,
            Style::Radius(radius) => self.radius = radius,
            Style::Font(font) => self.font = Some(font),
            Style::Text(text) => self.text = Some(text),
            Style::MsgboxTitle(text) => self.title = Some(text),
            Style::MsgboxText(text) => self.body = Some(text),
            Style::MsgboxApplyText(text) => self.apply_text = Some(text),
            Style::MsgboxCloseText(text) => self.close_text = Some(text),
        }
    }
}

/// Screen rectangle of `objects[idx]`, positions being relative to the parent.
fn absolute_rect(objects: &[Object], idx: usize) -> Rect {
    let obj = &objects[idx];
    let (mut x, mut y) = (obj.x as i64, obj.y as i64);
    let mut parent = obj.parent;
    while let Some(ObjectId(p)) = parent {
        x += objects[p].x as i64;
        y += objects[p].y as i64;
        parent = objects[p].parent;
    }
    Rect::new(x, y, obj.width, obj.height)
}

/// Software toolkit rendering flat rectangles into a `PresentationSurface`.
pub struct FlatToolkit<S> {
    objects: Vec<Object>,
    display: Option<DisplayDevice<S>>,
    log_sink: Option<LogSink>,
    background: Pixel,
    dirty: Vec<Rect>,
    initialized: bool,
}

impl<S: PresentationSurface> FlatToolkit<S> {
    pub fn new(background: Color) -> Self {
        Self {
            objects: Vec::new(),
            display: None,
            log_sink: None,
            background: background.to_pixel(),
            dirty: Vec::new(),
            initialized: false,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn kind(&self, obj: ObjectId) -> Option<ObjectKind> {
        self.objects.get(obj.0).map(|o| o.kind)
    }

    /// Position relative to the parent, as last set.
    pub fn position(&self, obj: ObjectId) -> Option<(i32, i32)> {
        self.objects.get(obj.0).map(|o| (o.x, o.y))
    }

    pub fn text(&self, obj: ObjectId) -> Option<&str> {
        self.objects.get(obj.0).and_then(|o| o.text.as_deref())
    }

    pub fn title(&self, obj: ObjectId) -> Option<&str> {
        self.objects.get(obj.0).and_then(|o| o.title.as_deref())
    }

    pub fn radius(&self, obj: ObjectId) -> Option<u16> {
        self.objects.get(obj.0).map(|o| o.radius)
    }

    pub fn font(&self, obj: ObjectId) -> Option<Font> {
        self.objects.get(obj.0).and_then(|o| o.font)
    }

    /// Body text of a message box.
    pub fn message(&self, obj: ObjectId) -> Option<&str> {
        self.objects.get(obj.0).and_then(|o| o.body.as_deref())
    }

    /// Apply and close button labels of a message box.
    pub fn button_labels(&self, obj: ObjectId) -> Option<(Option<&str>, Option<&str>)> {
        self.objects
            .get(obj.0)
            .map(|o| (o.apply_text.as_deref(), o.close_text.as_deref()))
    }

    /// Number of disjoint regions waiting to be redrawn.
    pub fn pending_regions(&self) -> usize {
        self.dirty.len()
    }

    fn log(&self, message: &str) {
        if let Some(sink) = &self.log_sink {
            sink(message);
        }
    }

    fn invalidate(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut merged = rect;
        while let Some(i) = self.dirty.iter().position(|d| d.touches(&merged)) {
            merged = merged.union(&self.dirty.swap_remove(i));
        }
        self.dirty.push(merged);
    }

    /// Indices of `idx` and every object nested under it.
    fn subtree(&self, idx: usize) -> Vec<usize> {
        // Parents are always created before their children.
        let mut members = vec![idx];
        for (i, obj) in self.objects.iter().enumerate().skip(idx + 1) {
            if let Some(ObjectId(p)) = obj.parent {
                if members.contains(&p) {
                    members.push(i);
                }
            }
        }
        members
    }

    fn update(&mut self, obj: ObjectId, change: impl FnOnce(&mut Object)) {
        if obj.0 >= self.objects.len() {
            warn!("FlatToolkit: ignoring update of unknown object {:?}", obj);
            return;
        }
        let members = self.subtree(obj.0);
        let before: Vec<Rect> = members
            .iter()
            .map(|&i| absolute_rect(&self.objects, i))
            .collect();
        change(&mut self.objects[obj.0]);
        for (n, &i) in members.iter().enumerate() {
            let after = absolute_rect(&self.objects, i);
            self.invalidate(before[n]);
            self.invalidate(after);
        }
    }

    fn render_area(&mut self, area: Area) -> Result<()> {
        let background = self.background;
        let objects = &self.objects;
        let display = self
            .display
            .as_mut()
            .context("FlatToolkit: no display registered")?;
        let DisplayDevice {
            framebuffer,
            surface,
            ..
        } = display;

        let rects: Vec<Rect> = (0..objects.len())
            .map(|i| absolute_rect(objects, i))
            .collect();
        let width = area.width as usize;
        let band_rows = (framebuffer.len() / width).min(framebuffer.rows() as usize) as u32;
        if band_rows == 0 {
            bail!(
                "FlatToolkit: {} px off-screen buffer cannot hold one {} px row",
                framebuffer.len(),
                width
            );
        }
        let end = area.y + area.height;
        let mut y = area.y;

        while y < end {
            let rows = band_rows.min(end - y);
            let band = Area::new(area.x, y, area.width, rows);
            let band_rect = Rect::from(band);
            let buf = &mut framebuffer.as_mut_slice()[..band.pixel_count()];
            buf.fill(background);

            for (obj, rect) in objects.iter().zip(&rects) {
                if obj.alpha == 0 {
                    continue;
                }
                let clip = rect.intersect(&band_rect);
                if clip.is_empty() {
                    continue;
                }
                let fill = obj.color.to_pixel();
                let border = obj.border_color.to_pixel();
                let bw = obj.border_width as i64;
                for py in clip.y0..clip.y1 {
                    let row_start = (py - band_rect.y0) as usize * width;
                    let edge_row = py < rect.y0 + bw || py >= rect.y1 - bw;
                    for px in clip.x0..clip.x1 {
                        let on_border = edge_row || px < rect.x0 + bw || px >= rect.x1 - bw;
                        let src = if on_border { border } else { fill };
                        let i = row_start + (px - band_rect.x0) as usize;
                        buf[i] = blend(buf[i], src, obj.alpha);
                    }
                }
            }

            surface
                .blit_region(band, buf)
                .with_context(|| format!("FlatToolkit: failed to flush {:?}", band))?;
            trace!("FlatToolkit: flushed {:?}", band);
            y += rows;
        }
        Ok(())
    }
}

impl<S: PresentationSurface> Toolkit for FlatToolkit<S> {
    type Surface = S;

    fn register_log(&mut self, sink: LogSink) {
        self.log_sink = Some(sink);
    }

    fn register_display(&mut self, device: DisplayDevice<S>) {
        let message = format!(
            "display registered: {}x{} (virtual {}x{}), {} px off-screen buffer",
            device.xres,
            device.yres,
            device.xres_virtual,
            device.yres_virtual,
            device.framebuffer.len()
        );
        let bounds = Rect::new(0, 0, device.xres, device.yres);
        self.display = Some(device);
        self.log(&message);
        if self.initialized {
            self.invalidate(bounds);
        }
    }

    fn init(&mut self) -> Result<()> {
        let Some(display) = &self.display else {
            bail!("FlatToolkit: init called before a display was registered");
        };
        let bounds = Rect::new(0, 0, display.xres, display.yres);
        self.initialized = true;
        self.invalidate(bounds);
        self.log("flat toolkit initialized");
        Ok(())
    }

    fn create(&mut self, kind: ObjectKind, parent: Option<ObjectId>) -> ObjectId {
        let parent = parent.filter(|p| {
            let known = p.0 < self.objects.len();
            if !known {
                warn!("FlatToolkit: unknown parent {:?}, creating {:?} at top level", p, kind);
            }
            known
        });
        let id = ObjectId(self.objects.len());
        self.objects.push(Object::new(kind, parent));
        debug!("FlatToolkit: created {:?} as {:?}", kind, id);
        id
    }

    fn set_pos(&mut self, obj: ObjectId, x: i32, y: i32) {
        if self.position(obj) == Some((x, y)) {
            return;
        }
        self.update(obj, |o| {
            o.x = x;
            o.y = y;
        });
    }

    fn set_size(&mut self, obj: ObjectId, width: u32, height: u32) {
        self.update(obj, |o| {
            o.width = width;
            o.height = height;
        });
    }

    fn set_style(&mut self, obj: ObjectId, style: Style) {
        self.update(obj, |o| o.apply(style));
    }

    fn handle_tasks(&mut self) -> Result<()> {
        if !self.initialized {
            bail!("FlatToolkit: handle_tasks called before init");
        }
        let display = self
            .display
            .as_ref()
            .context("FlatToolkit: no display registered")?;
        let screen = Rect::new(0, 0, display.xres, display.yres);

        let mut areas = std::mem::take(&mut self.dirty)
            .into_iter()
            .map(|r| r.intersect(&screen))
            .filter(|r| !r.is_empty())
            .map(Rect::to_area)
            .collect::<Vec<Area>>()
            .into_iter();
        while let Some(area) = areas.next() {
            if let Err(err) = self.render_area(area) {
                // keep the failed area and everything after it for the next pass
                self.invalidate(Rect::from(area));
                for rest in areas {
                    self.invalidate(Rect::from(rest));
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn surface(&self) -> Option<&S> {
        self.display.as_ref().map(|d| &d.surface)
    }
}
