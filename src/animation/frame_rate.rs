// src/animation/frame_rate.rs

//! Frame counting and the periodic frame-rate report.
//!
//! The render loop bumps a `FrameCounter`; a `FrameRateReporter` thread wakes
//! once per interval and reports how many frames were counted since its
//! previous wake-up.

use anyhow::{Context, Result};
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Monotonic count of rendered frames, shared between the loop and the reporter.
#[derive(Debug, Default)]
pub struct FrameCounter {
    frames: AtomicU64,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) {
        // Single writer, readers only take snapshots.
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

/// Remembers the last sampled total and yields the delta since then.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameSampler {
    last: u64,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, counter: &FrameCounter) -> u64 {
        let now = counter.total();
        let delta = now.wrapping_sub(self.last);
        self.last = now;
        delta
    }
}

/// Background thread reporting frames per interval.
///
/// Dropping the reporter stops and joins the thread.
pub struct FrameRateReporter {
    shutdown_tx: Option<Sender<()>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl FrameRateReporter {
    /// Spawns a reporter that logs `render: {n}fps` every `interval`.
    pub fn spawn(counter: Arc<FrameCounter>, interval: Duration) -> Result<Self> {
        Self::spawn_with_sink(counter, interval, |frames| info!("render: {}fps", frames))
    }

    /// Spawns a reporter handing each per-interval delta to `sink`.
    pub fn spawn_with_sink<F>(counter: Arc<FrameCounter>, interval: Duration, mut sink: F) -> Result<Self>
    where
        F: FnMut(u64) + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let mut sampler = FrameSampler::new();
        sampler.sample(&counter);
        let thread_handle = thread::Builder::new()
            .name("frame-rate".to_string())
            .spawn(move || {
                debug!("FrameRateReporter: Started (interval {:?})", interval);
                loop {
                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => sink(sampler.sample(&counter)),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("FrameRateReporter: Thread exiting");
            })
            .context("Failed to spawn frame-rate reporter thread")?;

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            thread_handle: Some(thread_handle),
        })
    }
}

impl Drop for FrameRateReporter {
    fn drop(&mut self) {
        // Disconnecting the channel wakes the thread immediately.
        self.shutdown_tx.take();
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                error!("FrameRateReporter thread panicked: {:?}", e);
            }
        }
    }
}
