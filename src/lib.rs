// src/lib.rs

//! Linux framebuffer demo: maps `/dev/fb0`, hands it to a small object
//! toolkit and bounces two translucent rectangles across the screen while
//! reporting the frame rate once per second.

pub mod animation;
pub mod color;
pub mod config;
pub mod fbdev;
pub mod scene;
pub mod shutdown;
pub mod toolkit;
