//! Frame scheduling with cooperative cancellation.
//!
//! A [`FrameScheduler`] repeatedly invokes a frame callback until the
//! callback breaks or the [`CancelToken`] is cancelled. The token is checked
//! before every frame; a frame that has started always finishes.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the schedule stop before its next frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Timing information handed to each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based frame number within this run.
    pub index: u64,
    /// Time since the run started.
    pub elapsed: Duration,
}

/// Drives a frame callback once per display refresh (or its stand-in).
pub trait FrameScheduler {
    /// Calls `frame` repeatedly until it returns `Break`, the token is
    /// cancelled, or the scheduler runs out of frames. Returns the number of
    /// frames invoked.
    fn run(
        &mut self,
        token: &CancelToken,
        frame: &mut dyn FnMut(FrameTick) -> ControlFlow<()>,
    ) -> u64;
}

/// Runs a fixed number of frames back to back with synthetic timestamps.
#[derive(Debug, Clone, Copy)]
pub struct ManualScheduler {
    frames: u64,
    period: Duration,
}

impl ManualScheduler {
    /// `frames` frames, each stamped `period` apart.
    pub fn new(frames: u64, period: Duration) -> Self {
        Self { frames, period }
    }

    /// `frames` frames at a nominal 60 Hz.
    pub fn frames(frames: u64) -> Self {
        Self::new(frames, Duration::from_micros(16_667))
    }
}

impl FrameScheduler for ManualScheduler {
    fn run(
        &mut self,
        token: &CancelToken,
        frame: &mut dyn FnMut(FrameTick) -> ControlFlow<()>,
    ) -> u64 {
        let mut ran = 0;
        for index in 0..self.frames {
            if token.is_cancelled() {
                break;
            }
            ran += 1;
            let tick = FrameTick {
                index,
                elapsed: self.period.saturating_mul(index.min(u32::MAX as u64) as u32),
            };
            if frame(tick).is_break() {
                break;
            }
        }
        ran
    }
}

/// Real-time scheduler: sleeps on the current thread between frames to hold
/// a fixed period. Late frames are not made up.
#[derive(Debug, Clone, Copy)]
pub struct IntervalScheduler {
    period: Duration,
    limit: Option<u64>,
}

impl IntervalScheduler {
    /// Period derived from a frame rate; `fps` of 0 is treated as 1.
    pub fn from_fps(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            limit: None,
        }
    }

    /// Stops after `frames` frames even if never cancelled.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameScheduler for IntervalScheduler {
    fn run(
        &mut self,
        token: &CancelToken,
        frame: &mut dyn FnMut(FrameTick) -> ControlFlow<()>,
    ) -> u64 {
        let start = Instant::now();
        let mut next = start;
        let mut index = 0;
        loop {
            if token.is_cancelled() || self.limit.is_some_and(|limit| index >= limit) {
                break;
            }
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            }
            let tick = FrameTick {
                index,
                elapsed: start.elapsed(),
            };
            index += 1;
            if frame(tick).is_break() {
                break;
            }
            next = (next + self.period).max(Instant::now());
        }
        index
    }
}
