//! Position behaviours for drag and fling style widgets.
//!
//! Unlike a [`crate::KeyFrameAnimation`], an `EasedPosition` is driven by the
//! caller's frame delta rather than a clock, and produces a bare position.
//! It can pick up from wherever a drag left off: `released_with_velocity`
//! restarts the run from that position, and the first loop eases from there
//! to the end.

use log::debug;

use crate::curve::AnimationCurve;

/// Eases a position over a fixed duration with optional looping.
#[derive(Debug, Clone, Default)]
pub struct EasedPosition {
    /// 0 plays once, `n > 0` repeats `n` more times, negative loops forever.
    pub loops: i32,
    /// Length of one run in seconds. Zero ends immediately.
    pub duration_secs: f64,
    /// Reverse direction at every loop boundary.
    pub ping_pong: bool,
    /// Curve applied to progress; `None` is linear.
    pub curve: Option<AnimationCurve>,
    time: f64,
    offset: f64,
    current_loop: i32,
    reversed: bool,
}

impl EasedPosition {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            ..Self::default()
        }
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn with_loops(mut self, loops: i32) -> Self {
        self.loops = loops;
        self
    }

    pub fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.ping_pong = ping_pong;
        self
    }

    /// Restart from `position` after the user lets go.
    ///
    /// The velocity is accepted for interface parity with other behaviours
    /// and does not influence the eased path.
    pub fn released_with_velocity(&mut self, position: f64, _velocity: f64) {
        self.time = 0.0;
        self.offset = position;
        self.current_loop = 0;
        self.reversed = false;
    }

    /// Advance by `delta_secs` and return the new position.
    ///
    /// With a zero duration `position` is returned unchanged and the next
    /// `is_stopped` call ends the run.
    pub fn next_position(&mut self, position: f64, delta_secs: f64) -> f64 {
        if self.duration_secs <= 0.0 {
            return position;
        }
        self.time += delta_secs;

        let linear = (self.time / self.duration_secs).clamp(0.0, 1.0);
        let proportion = if self.reversed { 1.0 - linear } else { linear };

        let Some(curve) = &self.curve else {
            return proportion;
        };
        if self.offset == 1.0 {
            return curve.perform(1.0);
        }
        curve.perform(proportion) * (1.0 - self.offset) + self.offset
    }

    /// Whether the run is over. Crossing a loop boundary resets the elapsed
    /// time and release offset, and flips direction in ping-pong mode.
    pub fn is_stopped(&mut self, _position: f64) -> bool {
        if self.time < self.duration_secs {
            return false;
        }
        self.time = 0.0;
        self.offset = 0.0;

        if self.loops == 0 {
            return true;
        }
        if self.ping_pong {
            self.reversed = !self.reversed;
        }
        if self.loops > 0 {
            if self.current_loop >= self.loops {
                self.current_loop = 0;
                return true;
            }
            self.current_loop += 1;
            debug!("eased position entered loop {}", self.current_loop);
        }
        false
    }

    /// Loops completed in the current run.
    pub fn current_loop(&self) -> i32 {
        self.current_loop
    }

    /// Whether the current loop runs from 1.0 back to 0.0.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }
}
