// src/scene.rs

//! The demo scene: a message box, a button and two translucent rectangles
//! that the animation driver bounces across the screen.

use crate::color::NamedColor;
use crate::toolkit::{Font, ObjectId, ObjectKind, Style, Toolkit};
use log::debug;

/// Handles of the objects making up the demo scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    pub msgbox: ObjectId,
    pub button: ObjectId,
    pub leader: ObjectId,
    pub follower: ObjectId,
}

impl Scene {
    /// Creates every object of the scene on `toolkit`.
    pub fn build<T: Toolkit>(toolkit: &mut T) -> Self {
        let msgbox = toolkit.create(ObjectKind::MessageBox, None);
        toolkit.set_pos(msgbox, 20, 20);
        toolkit.set_size(msgbox, 600, 400);
        toolkit.set_font(msgbox, Font::SONG_23);
        toolkit.set_style(msgbox, Style::MsgboxTitle("Message Box".to_string()));
        toolkit.set_style(
            msgbox,
            Style::MsgboxText(
                "SGL (Small Graphics Library) is a lightweight and fast graphics library"
                    .to_string(),
            ),
        );
        toolkit.set_style(msgbox, Style::MsgboxApplyText("OK".to_string()));
        toolkit.set_style(msgbox, Style::MsgboxCloseText("NO".to_string()));
        toolkit.set_border_width(msgbox, 2);
        toolkit.set_border_color(msgbox, NamedColor::LightGray.into());
        toolkit.set_alpha(msgbox, 255);

        let button = toolkit.create(ObjectKind::Button, None);
        toolkit.set_pos(button, 620, 80);
        toolkit.set_size(button, 200, 100);
        toolkit.set_radius(button, 50);
        toolkit.set_border_width(button, 2);
        toolkit.set_border_color(button, NamedColor::Black.into());
        toolkit.set_font(button, Font::SONG_23);
        toolkit.set_style(button, Style::Text("click me".to_string()));

        let leader = Self::bouncing_rect(toolkit, NamedColor::Gray);
        let follower = Self::bouncing_rect(toolkit, NamedColor::BrightPurple);

        debug!(
            "Scene: msgbox {:?}, button {:?}, rects {:?}/{:?}",
            msgbox, button, leader, follower
        );
        Self {
            msgbox,
            button,
            leader,
            follower,
        }
    }

    /// The pair of objects the animation moves.
    pub fn tracked(&self) -> (ObjectId, ObjectId) {
        (self.leader, self.follower)
    }

    fn bouncing_rect<T: Toolkit>(toolkit: &mut T, fill: NamedColor) -> ObjectId {
        let rect = toolkit.create(ObjectKind::Rect, None);
        toolkit.set_pos(rect, 20, 20);
        toolkit.set_size(rect, 50, 100);
        toolkit.set_color(rect, fill.into());
        toolkit.set_border_color(rect, NamedColor::Green.into());
        toolkit.set_border_width(rect, 3);
        toolkit.set_radius(rect, 10);
        toolkit.set_alpha(rect, 150);
        rect
    }
}
