// tests/mapped_pipeline.rs

//! End-to-end: scene -> toolkit -> blit -> shared mapping, with a regular
//! file standing in for the framebuffer device.

use fbdemo::animation::{AnimationDriver, FrameCounter};
use fbdemo::color::{Color, NamedColor, Pixel};
use fbdemo::config::AnimationConfig;
use fbdemo::fbdev::{FramebufferSurface, Geometry, BYTES_PER_PIXEL};
use fbdemo::scene::Scene;
use fbdemo::toolkit::{DisplayDevice, FlatToolkit, Toolkit};
use std::io::{Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use test_log::test;

fn read_pixels(file: &mut std::fs::File) -> Vec<Pixel> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_end(&mut bytes).unwrap();
    bytes
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|b| Pixel::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[test]
fn demo_scene_renders_into_mapped_memory() {
    let geometry = Geometry::packed(800, 480);
    let mut backing = tempfile::tempfile().unwrap();
    backing
        .set_len(geometry.screen_size_bytes() as u64)
        .unwrap();
    assert_eq!(geometry.screen_size_bytes(), 1_536_000);

    let surface = FramebufferSurface::map(backing.try_clone().unwrap(), geometry).unwrap();
    let mut toolkit = FlatToolkit::new(Color::Named(NamedColor::White));
    toolkit.register_display(DisplayDevice::new(surface, 4));
    toolkit.init().unwrap();
    let scene = Scene::build(&mut toolkit);

    let counter = Arc::new(FrameCounter::new());
    let mut driver = AnimationDriver::new(
        toolkit,
        scene.tracked(),
        &AnimationConfig::default(),
        geometry.yres,
        Arc::clone(&counter),
    );
    for _ in 0..5 {
        driver.step().unwrap();
    }
    assert_eq!(counter.total(), 5);
    drop(driver);

    let pixels = read_pixels(&mut backing);
    assert_eq!(pixels.len(), 800 * 480);
    let at = |x: usize, y: usize| pixels[y * 800 + x];

    let white = Color::Named(NamedColor::White).to_pixel();
    let light_gray = Color::Named(NamedColor::LightGray).to_pixel();
    assert_eq!(at(799, 479), white);
    assert_eq!(at(300, 20), light_gray);
    // button spans past the right edge and is clipped there
    assert_eq!(at(799, 80), Color::Named(NamedColor::Black).to_pixel());
}

#[test]
fn run_honours_external_stop_flag() {
    let geometry = Geometry::packed(64, 32);
    let backing = tempfile::tempfile().unwrap();
    backing
        .set_len(geometry.screen_size_bytes() as u64)
        .unwrap();
    let surface = FramebufferSurface::map(backing, geometry).unwrap();

    let mut toolkit = FlatToolkit::new(Color::Named(NamedColor::Black));
    toolkit.register_display(DisplayDevice::new(surface, 2));
    toolkit.init().unwrap();
    let scene = Scene::build(&mut toolkit);

    let stop = Arc::new(AtomicBool::new(false));
    let stopper = {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            stop.store(true, Ordering::Relaxed);
        })
    };
    let counter = Arc::new(FrameCounter::new());
    let mut driver = AnimationDriver::new(
        toolkit,
        scene.tracked(),
        &AnimationConfig::default(),
        geometry.yres,
        Arc::clone(&counter),
    );
    let frames = driver.run(&stop).unwrap();
    stopper.join().unwrap();

    assert!(frames > 0);
    assert_eq!(frames, counter.total());
    assert!(driver.position() <= geometry.yres);
}
