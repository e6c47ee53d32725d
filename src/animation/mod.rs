// src/animation/mod.rs

//! The render loop: process toolkit work, count the frame, move the two
//! tracked objects one step along the diagonal.

pub mod frame_rate;
pub mod oscillator;


pub use frame_rate::{FrameCounter, FrameRateReporter, FrameSampler};
pub use oscillator::{Direction, Oscillator};

use crate::config::AnimationConfig;
use crate::toolkit::{ObjectId, Toolkit};
use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Drives a toolkit frame by frame while bouncing two objects diagonally.
pub struct AnimationDriver<T> {
    toolkit: T,
    leader: ObjectId,
    follower: ObjectId,
    follower_offset: i32,
    oscillator: Oscillator,
    counter: Arc<FrameCounter>,
}

impl<T: Toolkit> AnimationDriver<T> {
    /// `bound` is the largest coordinate the leader reaches, normally the
    /// vertical resolution.
    pub fn new(
        toolkit: T,
        (leader, follower): (ObjectId, ObjectId),
        settings: &AnimationConfig,
        bound: u32,
        counter: Arc<FrameCounter>,
    ) -> Self {
        debug!(
            "AnimationDriver: step {}, bound {}, follower offset {}",
            settings.step, bound, settings.follower_offset
        );
        Self {
            toolkit,
            leader,
            follower,
            follower_offset: settings.follower_offset,
            oscillator: Oscillator::new(settings.step, bound),
            counter,
        }
    }

    /// Runs one frame.
    pub fn step(&mut self) -> Result<()> {
        self.toolkit
            .handle_tasks()
            .context("Toolkit failed to process pending work")?;
        self.counter.tick();

        let x = self.oscillator.position() as i32;
        self.toolkit.set_pos(self.leader, x, x);
        let f = x.saturating_add(self.follower_offset);
        self.toolkit.set_pos(self.follower, f, f);

        self.oscillator.advance();
        Ok(())
    }

    /// Runs frames until `stop` is raised and returns how many ran.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<u64> {
        info!("AnimationDriver: entering render loop");
        let mut frames = 0u64;
        while !stop.load(Ordering::Relaxed) {
            self.step()?;
            frames += 1;
        }
        info!("AnimationDriver: stop requested after {} frames", frames);
        Ok(frames)
    }

    /// Leader coordinate used by the next frame.
    pub fn position(&self) -> u32 {
        self.oscillator.position()
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }
}
