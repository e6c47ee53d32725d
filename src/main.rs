// src/main.rs

use fbdemo::{
    animation::{AnimationDriver, FrameCounter, FrameRateReporter},
    config::CONFIG,
    fbdev::{FramebufferSurface, PresentationSurface},
    scene::Scene,
    shutdown,
    toolkit::{DisplayDevice, FlatToolkit, Toolkit},
};

use anyhow::Context;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

/// Main entry point for the `fbdemo` application.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting fbdemo...");
    let config = &*CONFIG;

    let stop = shutdown::install_handlers().context("Failed to install signal handlers")?;

    // --- Presentation surface ---
    let surface = FramebufferSurface::open(&config.device.path).with_context(|| {
        format!(
            "Failed to initialize framebuffer {}",
            config.device.path.display()
        )
    })?;
    let geometry = surface.geometry();
    info!(
        "Framebuffer ready: {}x{}, {} bytes mapped",
        geometry.xres,
        geometry.yres,
        geometry.screen_size_bytes()
    );

    // --- Toolkit ---
    let mut toolkit = FlatToolkit::new(config.appearance.background);
    toolkit.register_log(Box::new(|line: &str| {
        log::info!(target: "toolkit", "{}", line)
    }));
    toolkit.register_display(DisplayDevice::new(surface, config.device.buffer_rows));
    toolkit.init().context("Failed to initialize toolkit")?;

    let scene = Scene::build(&mut toolkit);

    // --- Render loop ---
    let counter = Arc::new(FrameCounter::new());
    let reporter = FrameRateReporter::spawn(
        Arc::clone(&counter),
        Duration::from_millis(config.reporter.interval_ms.max(1)),
    )?;
    let mut driver = AnimationDriver::new(
        toolkit,
        scene.tracked(),
        &config.animation,
        geometry.yres,
        counter,
    );

    let outcome = driver.run(stop);

    // --- Cleanup ---
    // Reporter first so its last line precedes teardown; the driver drop
    // unmaps and closes the device.
    drop(reporter);
    drop(driver);

    match outcome {
        Ok(frames) => {
            info!("fbdemo exited after {} frames", frames);
            Ok(())
        }
        Err(e) => {
            error!("Render loop failed: {:#}", e);
            Err(e)
        }
    }
}
