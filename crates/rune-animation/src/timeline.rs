//! Shared animation state machine.
//!
//! `Timeline` owns everything a running animation needs that is not about
//! values: cadence, duration, loop bookkeeping, direction, lifecycle state,
//! the injected clock and tick source, and the listener list. Keyframe
//! animations and groups each embed one and supply their own advance
//! strategy through [`crate::Animatable`].
//!
//! ```text
//! Stopped --start--> Running --pause--> Paused --resume--> Running --stop--> Stopped
//! ```

use log::{debug, trace};
use std::rc::Rc;

use crate::clock::{Clock, ManualTicker, SystemClock, TickSource};
use crate::events::{AnimationEvent, AnimationEventKind, Listeners};
use crate::types::{AnimationId, AnimationState, Direction};
use crate::value::TypedValue;

/// Default tick cadence, roughly 60 Hz.
pub const DEFAULT_SPEED_MS: u32 = 16;

/// Outcome of polling a timeline on a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Not running; nothing to do.
    Idle,
    /// Inside the current loop, at this direction-oriented progress.
    Progress(f64),
    /// The current loop's duration has elapsed.
    Boundary,
}

pub struct Timeline {
    id: AnimationId,
    speed_ms: u32,
    duration_ms: u32,
    loops: i32,
    current_loop: i32,
    direction: Direction,
    ping_pong: bool,
    state: AnimationState,
    origin_ms: i64,
    paused_at_ms: Option<i64>,
    last_tick_ms: i64,
    drives_ticker: bool,
    clock: Rc<dyn Clock>,
    ticker: Box<dyn TickSource>,
    listeners: Listeners,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("speed_ms", &self.speed_ms)
            .field("duration_ms", &self.duration_ms)
            .field("loops", &self.loops)
            .field("current_loop", &self.current_loop)
            .field("direction", &self.direction)
            .field("ping_pong", &self.ping_pong)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Timeline {
    /// A stopped timeline on the system clock with a `ManualTicker`.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::shared())
    }

    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            id: AnimationId::new(),
            speed_ms: DEFAULT_SPEED_MS,
            duration_ms: 0,
            loops: 0,
            current_loop: 0,
            direction: Direction::Forward,
            ping_pong: false,
            state: AnimationState::Stopped,
            origin_ms: 0,
            paused_at_ms: None,
            last_tick_ms: 0,
            drives_ticker: false,
            clock,
            ticker: Box::new(ManualTicker::new()),
            listeners: Listeners::new(),
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn set_clock(&mut self, clock: Rc<dyn Clock>) {
        self.clock = clock;
    }

    pub fn ticker(&self) -> &dyn TickSource {
        self.ticker.as_ref()
    }

    /// Replace the tick source, carrying over an active cadence.
    pub fn set_ticker(&mut self, mut ticker: Box<dyn TickSource>) {
        if self.ticker.is_active() {
            self.ticker.stop();
            ticker.start(self.speed_ms);
        }
        self.ticker = ticker;
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }

    // Lifecycle

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// True while running or paused.
    pub fn is_running(&self) -> bool {
        self.state != AnimationState::Stopped
    }

    pub fn is_paused(&self) -> bool {
        self.state == AnimationState::Paused
    }

    /// Begin a run from the start of the first loop.
    ///
    /// Restarting a running timeline resets its origin and fires `Started`
    /// again. With `engage_ticker` false the caller drives `tick()` itself,
    /// as a group does for its children.
    pub fn start(&mut self, engage_ticker: bool, value: Option<TypedValue>) {
        let now = self.clock.now_ms();
        self.origin_ms = now;
        self.last_tick_ms = now;
        self.paused_at_ms = None;
        self.current_loop = 0;
        self.drives_ticker = engage_ticker;
        if engage_ticker && !self.ticker.is_active() {
            self.ticker.start(self.speed_ms);
        }

        debug!(
            "animation {:?} started: duration {}ms, loops {}, {:?}",
            self.id, self.duration_ms, self.loops, self.direction
        );
        self.set_state(AnimationState::Running, value.clone());
        self.emit(AnimationEventKind::Started, value);
    }

    /// Returns false when not running.
    pub fn pause(&mut self, value: Option<TypedValue>) -> bool {
        if self.state != AnimationState::Running {
            return false;
        }
        self.ticker.stop();
        self.paused_at_ms = Some(self.clock.now_ms());

        debug!("animation {:?} paused", self.id);
        self.set_state(AnimationState::Paused, value.clone());
        self.emit(AnimationEventKind::Paused, value);
        true
    }

    /// Returns false when not paused. Elapsed progress is preserved.
    pub fn resume(&mut self, value: Option<TypedValue>) -> bool {
        if self.state != AnimationState::Paused {
            return false;
        }
        let now = self.clock.now_ms();
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.origin_ms += now - paused_at;
        }
        if self.drives_ticker {
            self.ticker.start(self.speed_ms);
        }

        debug!("animation {:?} resumed", self.id);
        self.set_state(AnimationState::Running, value.clone());
        self.emit(AnimationEventKind::Resumed, value);
        true
    }

    /// Returns false when already stopped.
    pub fn stop(&mut self, value: Option<TypedValue>) -> bool {
        if self.state == AnimationState::Stopped {
            return false;
        }
        self.ticker.stop();
        self.current_loop = 0;
        self.paused_at_ms = None;

        debug!("animation {:?} stopped", self.id);
        self.set_state(AnimationState::Stopped, value.clone());
        self.emit(AnimationEventKind::Ended, value);
        true
    }

    fn set_state(&mut self, state: AnimationState, value: Option<TypedValue>) {
        if self.state != state {
            self.state = state;
            self.emit(AnimationEventKind::StateChanged, value);
        }
    }

    // Ticking

    /// Read the clock and locate the current tick within the run.
    pub fn poll(&mut self) -> Step {
        if self.state != AnimationState::Running {
            return Step::Idle;
        }
        let now = self.clock.now_ms();
        self.last_tick_ms = now;

        let elapsed = (now - self.origin_ms).max(0);
        let duration = i64::from(self.duration_ms);
        if duration == 0 || elapsed > duration {
            return Step::Boundary;
        }

        let progress = self.direction.orient(elapsed as f64 / duration as f64);
        trace!("animation {:?} at {:.4} ({}ms)", self.id, progress, elapsed);
        Step::Progress(progress)
    }

    /// Whether another loop follows the current one.
    pub fn has_loops_remaining(&self) -> bool {
        self.loops < 0 || self.current_loop < self.loops
    }

    /// Cross a loop boundary: reset the origin, flip direction in ping-pong
    /// mode, and count the loop. Returns the progress the new loop starts at.
    pub fn next_loop(&mut self, value: Option<TypedValue>) -> f64 {
        self.origin_ms = self.last_tick_ms;
        if self.ping_pong {
            self.set_direction(self.direction.reversed(), value.clone());
        }
        self.current_loop += 1;

        debug!("animation {:?} entered loop {}", self.id, self.current_loop);
        self.emit(AnimationEventKind::LoopChanged, value);
        self.direction.start_edge()
    }

    /// Time of the most recent poll, or of the last start.
    pub fn last_tick_ms(&self) -> i64 {
        self.last_tick_ms
    }

    /// Milliseconds into the current loop.
    pub fn elapsed_ms(&self) -> i64 {
        let now = self.paused_at_ms.unwrap_or_else(|| self.clock.now_ms());
        (now - self.origin_ms).max(0)
    }

    // Configuration

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Set the tick cadence. An active tick source restarts at the new rate.
    ///
    /// # Panics
    /// Panics if `speed_ms` is zero.
    pub fn set_speed(&mut self, speed_ms: u32) {
        assert!(speed_ms > 0, "speed must be > 0 ms");
        self.speed_ms = speed_ms;
        if self.ticker.is_active() {
            self.ticker.start(speed_ms);
        }
    }

    /// Ticks per second, `1000 / speed_ms`.
    pub fn speed_hz(&self) -> u32 {
        1000 / self.speed_ms
    }

    /// Set the cadence in ticks per second.
    ///
    /// # Panics
    /// Panics if `hz` is zero.
    pub fn set_speed_hz(&mut self, hz: u32) {
        assert!(hz > 0, "speed must be > 0 Hz");
        self.set_speed((1000 / hz).max(1));
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// # Panics
    /// Panics if `duration_ms` is zero.
    pub fn set_duration(&mut self, duration_ms: u32) {
        assert!(duration_ms > 0, "duration must be > 0 ms");
        self.duration_ms = duration_ms;
    }

    /// Take on a child's duration and loop count, zero duration allowed.
    pub(crate) fn adopt(&mut self, duration_ms: u32, loops: i32) {
        self.duration_ms = duration_ms;
        self.loops = loops;
    }

    pub fn loops(&self) -> i32 {
        self.loops
    }

    /// 0 plays once, `n > 0` repeats `n` more times, negative loops forever.
    pub fn set_loops(&mut self, loops: i32) {
        self.loops = loops;
    }

    pub fn is_endless(&self) -> bool {
        self.loops < 0
    }

    /// Zero-based index of the loop being played.
    pub fn current_loop(&self) -> i32 {
        self.current_loop
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Fires `DirectionChanged` when the direction actually changes.
    pub fn set_direction(&mut self, direction: Direction, value: Option<TypedValue>) {
        if self.direction != direction {
            self.direction = direction;
            self.emit(AnimationEventKind::DirectionChanged, value);
        }
    }

    pub fn ping_pong(&self) -> bool {
        self.ping_pong
    }

    /// Reverse direction at every loop boundary.
    pub fn set_ping_pong(&mut self, ping_pong: bool) {
        self.ping_pong = ping_pong;
    }

    // Events

    pub fn event(&self, kind: AnimationEventKind, value: Option<TypedValue>) -> AnimationEvent {
        AnimationEvent {
            animation_id: self.id,
            kind,
            state: self.state,
            direction: self.direction,
            current_loop: self.current_loop,
            value,
        }
    }

    /// Broadcast an event to every listener.
    pub fn emit(&self, kind: AnimationEventKind, value: Option<TypedValue>) {
        if !self.listeners.is_empty() {
            self.listeners.notify(&self.event(kind, value));
        }
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        if self.ticker.is_active() {
            self.ticker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::EventQueue;
    use std::cell::RefCell;

    struct Fixture {
        clock: Rc<ManualClock>,
        ticker: Rc<RefCell<ManualTicker>>,
        queue: Rc<RefCell<EventQueue>>,
        timeline: Timeline,
    }

    fn fixture() -> Fixture {
        let clock = Rc::new(ManualClock::new());
        let ticker = Rc::new(RefCell::new(ManualTicker::new()));
        let queue = Rc::new(RefCell::new(EventQueue::new()));

        let mut timeline = Timeline::with_clock(clock.clone());
        timeline.set_ticker(Box::new(Rc::clone(&ticker)));
        timeline.listeners_mut().add(EventQueue::listener(&queue));
        Fixture {
            clock,
            ticker,
            queue,
            timeline,
        }
    }

    #[test]
    fn test_defaults() {
        let timeline = Timeline::new();
        assert_eq!(timeline.state(), AnimationState::Stopped);
        assert_eq!(timeline.speed_ms(), DEFAULT_SPEED_MS);
        assert_eq!(timeline.duration_ms(), 0);
        assert_eq!(timeline.loops(), 0);
        assert_eq!(timeline.direction(), Direction::Forward);
        assert!(!timeline.ping_pong());
        assert!(!timeline.is_running());
    }

    #[test]
    fn test_start_engages_ticker() {
        let mut f = fixture();
        f.timeline.start(true, None);

        assert_eq!(f.timeline.state(), AnimationState::Running);
        assert!(f.ticker.borrow().is_active());
        assert_eq!(f.ticker.borrow().interval_ms(), DEFAULT_SPEED_MS);
        assert_eq!(
            f.queue.borrow().kinds(),
            vec![AnimationEventKind::StateChanged, AnimationEventKind::Started]
        );
    }

    #[test]
    fn test_driven_start_leaves_ticker_alone() {
        let mut f = fixture();
        f.timeline.start(false, None);
        assert!(f.timeline.is_running());
        assert!(!f.ticker.borrow().is_active());
    }

    #[test]
    fn test_poll_progress() {
        let mut f = fixture();
        f.timeline.set_duration(200);
        f.timeline.start(true, None);

        f.clock.set(50);
        assert_eq!(f.timeline.poll(), Step::Progress(0.25));
        assert_eq!(f.timeline.last_tick_ms(), 50);

        f.timeline.set_direction(Direction::Backward, None);
        assert_eq!(f.timeline.poll(), Step::Progress(0.75));

        f.clock.set(201);
        assert_eq!(f.timeline.poll(), Step::Boundary);
    }

    #[test]
    fn test_poll_when_stopped_is_idle() {
        let mut f = fixture();
        f.timeline.set_duration(100);
        assert_eq!(f.timeline.poll(), Step::Idle);
    }

    #[test]
    fn test_zero_duration_is_immediately_at_boundary() {
        let mut f = fixture();
        f.timeline.start(true, None);
        assert_eq!(f.timeline.poll(), Step::Boundary);
        assert!(!f.timeline.has_loops_remaining());
    }

    #[test]
    fn test_next_loop_with_ping_pong() {
        let mut f = fixture();
        f.timeline.set_duration(100);
        f.timeline.set_loops(1);
        f.timeline.set_ping_pong(true);
        f.timeline.start(true, None);
        f.queue.borrow_mut().clear();

        f.clock.set(120);
        assert_eq!(f.timeline.poll(), Step::Boundary);
        assert!(f.timeline.has_loops_remaining());

        let edge = f.timeline.next_loop(None);
        assert_eq!(edge, 1.0);
        assert_eq!(f.timeline.direction(), Direction::Backward);
        assert_eq!(f.timeline.current_loop(), 1);
        assert!(!f.timeline.has_loops_remaining());
        assert_eq!(
            f.queue.borrow().kinds(),
            vec![AnimationEventKind::DirectionChanged, AnimationEventKind::LoopChanged]
        );

        // The new loop is measured from the boundary tick.
        f.clock.set(145);
        assert_eq!(f.timeline.poll(), Step::Progress(0.75));
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut f = fixture();
        f.timeline.set_duration(100);
        f.timeline.start(true, None);
        f.queue.borrow_mut().clear();

        assert!(!f.timeline.resume(None));
        assert!(f.timeline.pause(None));
        assert!(!f.timeline.pause(None));
        assert!(f.timeline.is_paused());
        assert!(f.timeline.is_running());
        assert!(!f.ticker.borrow().is_active());

        assert!(f.timeline.resume(None));
        assert!(!f.timeline.resume(None));
        assert!(f.ticker.borrow().is_active());

        let queue = f.queue.borrow();
        assert_eq!(queue.count(AnimationEventKind::Paused), 1);
        assert_eq!(queue.count(AnimationEventKind::Resumed), 1);
        assert_eq!(queue.count(AnimationEventKind::StateChanged), 2);
    }

    #[test]
    fn test_resume_preserves_elapsed() {
        let mut f = fixture();
        f.timeline.set_duration(100);
        f.timeline.start(true, None);

        f.clock.set(40);
        f.timeline.pause(None);
        assert_eq!(f.timeline.elapsed_ms(), 40);

        f.clock.set(1040);
        f.timeline.resume(None);
        f.clock.set(1050);
        assert_eq!(f.timeline.poll(), Step::Progress(0.5));
    }

    #[test]
    fn test_stop_resets_loop_and_is_idempotent() {
        let mut f = fixture();
        f.timeline.set_duration(100);
        f.timeline.set_loops(3);
        f.timeline.start(true, None);
        f.clock.set(150);
        f.timeline.poll();
        f.timeline.next_loop(None);
        assert_eq!(f.timeline.current_loop(), 1);

        assert!(f.timeline.stop(None));
        assert!(!f.timeline.stop(None));
        assert_eq!(f.timeline.current_loop(), 0);
        assert_eq!(f.timeline.state(), AnimationState::Stopped);
        assert!(!f.ticker.borrow().is_active());
        assert_eq!(f.queue.borrow().count(AnimationEventKind::Ended), 1);
    }

    #[test]
    fn test_speed_change_restarts_active_ticker() {
        let mut f = fixture();
        f.timeline.set_speed(20);
        assert_eq!(f.ticker.borrow().starts(), 0);

        f.timeline.start(true, None);
        assert_eq!(f.ticker.borrow().interval_ms(), 20);

        f.timeline.set_speed_hz(50);
        assert_eq!(f.timeline.speed_ms(), 20);
        assert_eq!(f.timeline.speed_hz(), 50);

        f.timeline.set_speed_hz(100);
        assert_eq!(f.ticker.borrow().interval_ms(), 10);
        assert_eq!(f.ticker.borrow().starts(), 3);
    }

    #[test]
    fn test_speed_hz_floor() {
        let mut timeline = Timeline::new();
        timeline.set_speed_hz(5000);
        assert_eq!(timeline.speed_ms(), 1);
    }

    #[test]
    fn test_set_direction_fires_only_on_change() {
        let mut f = fixture();
        f.timeline.set_direction(Direction::Forward, None);
        f.timeline.set_direction(Direction::Backward, None);
        assert_eq!(f.queue.borrow().count(AnimationEventKind::DirectionChanged), 1);
    }

    #[test]
    #[should_panic(expected = "duration must be > 0 ms")]
    fn test_zero_duration_panics() {
        Timeline::new().set_duration(0);
    }

    #[test]
    #[should_panic(expected = "speed must be > 0 ms")]
    fn test_zero_speed_panics() {
        Timeline::new().set_speed(0);
    }

    #[test]
    fn test_drop_stops_ticker() {
        let ticker = Rc::new(RefCell::new(ManualTicker::new()));
        {
            let mut timeline = Timeline::new();
            timeline.set_ticker(Box::new(Rc::clone(&ticker)));
            timeline.start(true, None);
            assert!(ticker.borrow().is_active());
        }
        assert!(!ticker.borrow().is_active());
    }
}
