//! Frame scheduling for the layout run loop
//!
//! The engine never owns a timer. A host driver (animation frame callback,
//! tokio interval, test loop) calls [`ForceLayout::frame`] with the current
//! time, and [`FrameThrottle`] decides whether enough time has passed to do
//! work. Early calls return without ticking, nothing blocks.
//!
//! [`ForceLayout::frame`]: super::ForceLayout::frame

use std::time::{Duration, Instant};

/// Cooperative frame-rate gate
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameThrottle {
    /// Throttle to `frame_rate` ticks per second. Non-positive rates disable throttling.
    pub fn new(frame_rate: f64) -> Self {
        let interval = if frame_rate > 0.0 && frame_rate.is_finite() {
            Duration::from_secs_f64(1.0 / frame_rate)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true and records `now` if a frame is due
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last frame so the next call is always due
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Why the run loop stopped scheduling ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Total velocity fell below the settle threshold
    Settled,
    /// The iteration cap was reached
    IterationLimit,
    /// There are no nodes to simulate
    Empty,
}

/// Result of one host frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The engine is idle, nothing to do until it is resumed
    Idle,
    /// Called before the frame interval elapsed, no work done
    Skipped,
    /// One tick ran and the loop keeps going
    Ticked,
    /// One tick ran and the loop stopped
    Stopped(StopReason),
}

impl FrameOutcome {
    /// Whether the host should keep calling `frame`
    pub fn keep_scheduling(&self) -> bool {
        matches!(self, FrameOutcome::Skipped | FrameOutcome::Ticked)
    }
}
