//! Time and tick plumbing.
//!
//! The engine never reads the system time or schedules callbacks on its own.
//! A `Clock` answers "what time is it" and a `TickSource` is told when the
//! host should start or stop calling `tick()`, and at what cadence.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// Millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Must not go backwards.
    fn now_ms(&self) -> i64;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Shared handle suitable for injecting into animations.
    pub fn shared() -> Rc<dyn Clock> {
        Rc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: i64) -> Self {
        Self { now: Cell::new(now_ms) }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Periodic callback source driving an animation's `tick()`.
pub trait TickSource {
    /// Begin (or restart) ticking every `interval_ms`.
    fn start(&mut self, interval_ms: u32);
    fn stop(&mut self);
    fn is_active(&self) -> bool;
    /// Requested cadence; meaningful while active.
    fn interval_ms(&self) -> u32;
}

/// Tick source that records requests for a host loop to honour.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualTicker {
    active: bool,
    interval_ms: u32,
    starts: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `start` has been requested.
    pub fn starts(&self) -> u32 {
        self.starts
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self, interval_ms: u32) {
        self.active = true;
        self.interval_ms = interval_ms;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

impl<T: TickSource + ?Sized> TickSource for Rc<RefCell<T>> {
    fn start(&mut self, interval_ms: u32) {
        self.borrow_mut().start(interval_ms);
    }

    fn stop(&mut self) {
        self.borrow_mut().stop();
    }

    fn is_active(&self) -> bool {
        self.borrow().is_active()
    }

    fn interval_ms(&self) -> u32 {
        self.borrow().interval_ms()
    }
}
