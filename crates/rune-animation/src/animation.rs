//! The animation contract.
//!
//! Anything with a [`Timeline`] and an advance strategy is an [`Animatable`]:
//! the trait supplies the lifecycle operations and per-tick algorithm once,
//! and implementors only say how a progress value turns into state.

use crate::events::{AnimationEventKind, Listener, ListenerId};
use crate::timeline::{Step, Timeline};
use crate::types::{AnimationId, AnimationState, Direction};
use crate::value::TypedValue;

/// A value-producing animation driven by a shared state machine.
///
/// Listeners run synchronously inside the call that fired them and must not
/// re-enter the animation that is notifying them.
pub trait Animatable {
    fn timeline(&self) -> &Timeline;

    fn timeline_mut(&mut self) -> &mut Timeline;

    /// Move to the direction-oriented `progress` in [0, 1].
    fn advance(&mut self, progress: f64);

    /// Return to the starting edge of the current direction.
    fn rewind(&mut self);

    /// Most recently computed value, for animations that produce one.
    fn current_value(&self) -> Option<TypedValue> {
        None
    }

    /// Advance to `progress` and fire `Advanced`.
    fn update(&mut self, progress: f64) {
        self.advance(progress);
        let value = self.current_value();
        self.timeline().emit(AnimationEventKind::Advanced, value);
    }

    /// Rewind and run, engaging the tick source.
    fn start(&mut self) {
        self.rewind();
        let value = self.current_value();
        self.timeline_mut().start(true, value);
    }

    /// Rewind and run with the caller driving `tick()` directly.
    fn start_driven(&mut self) {
        self.rewind();
        let value = self.current_value();
        self.timeline_mut().start(false, value);
    }

    fn pause(&mut self) {
        let value = self.current_value();
        self.timeline_mut().pause(value);
    }

    fn resume(&mut self) {
        let value = self.current_value();
        self.timeline_mut().resume(value);
    }

    fn stop(&mut self) {
        let value = self.current_value();
        self.timeline_mut().stop(value);
    }

    /// Periodic callback from the tick source.
    fn tick(&mut self) {
        drive(self);
    }

    /// Subscribe to this animation's events.
    fn add_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId::new();
        self.insert_listener(id, listener);
        id
    }

    /// Subscribe under an existing id. Re-inserting an id is a no-op.
    fn insert_listener(&mut self, id: ListenerId, listener: Listener) {
        self.timeline_mut().listeners_mut().insert(id, listener);
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.timeline_mut().listeners_mut().remove(id)
    }

    fn id(&self) -> AnimationId {
        self.timeline().id()
    }

    fn state(&self) -> AnimationState {
        self.timeline().state()
    }

    /// True while running or paused.
    fn is_running(&self) -> bool {
        self.timeline().is_running()
    }

    fn is_paused(&self) -> bool {
        self.timeline().is_paused()
    }

    fn current_loop(&self) -> i32 {
        self.timeline().current_loop()
    }

    fn last_tick_ms(&self) -> i64 {
        self.timeline().last_tick_ms()
    }

    fn duration_ms(&self) -> u32 {
        self.timeline().duration_ms()
    }

    fn set_duration(&mut self, duration_ms: u32) {
        self.timeline_mut().set_duration(duration_ms);
    }

    fn loops(&self) -> i32 {
        self.timeline().loops()
    }

    fn set_loops(&mut self, loops: i32) {
        self.timeline_mut().set_loops(loops);
    }

    fn set_speed(&mut self, speed_ms: u32) {
        self.timeline_mut().set_speed(speed_ms);
    }

    fn direction(&self) -> Direction {
        self.timeline().direction()
    }

    fn set_direction(&mut self, direction: Direction) {
        let value = self.current_value();
        self.timeline_mut().set_direction(direction, value);
    }

    fn set_ping_pong(&mut self, ping_pong: bool) {
        self.timeline_mut().set_ping_pong(ping_pong);
    }
}

/// Run one tick of the per-tick algorithm against `animation`.
///
/// Inside a loop the animation advances to the current progress. At a loop
/// boundary it either starts the next loop from its starting edge or, with no
/// loops left, settles on the final edge and stops.
pub fn drive<A: Animatable + ?Sized>(animation: &mut A) {
    match animation.timeline_mut().poll() {
        Step::Idle => {}
        Step::Progress(progress) => animation.update(progress),
        Step::Boundary => {
            if animation.timeline().has_loops_remaining() {
                let value = animation.current_value();
                let edge = animation.timeline_mut().next_loop(value);
                animation.rewind();
                animation.update(edge);
            } else {
                let edge = animation.timeline().direction().end_edge();
                animation.update(edge);
                animation.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::EventQueue;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every progress it is advanced to.
    struct Probe {
        timeline: Timeline,
        seen: Vec<f64>,
        rewinds: usize,
    }

    impl Probe {
        fn new(clock: Rc<ManualClock>, duration_ms: u32) -> Self {
            let mut timeline = Timeline::with_clock(clock);
            timeline.set_duration(duration_ms);
            Self {
                timeline,
                seen: Vec::new(),
                rewinds: 0,
            }
        }
    }

    impl Animatable for Probe {
        fn timeline(&self) -> &Timeline {
            &self.timeline
        }

        fn timeline_mut(&mut self) -> &mut Timeline {
            &mut self.timeline
        }

        fn advance(&mut self, progress: f64) {
            self.seen.push(progress);
        }

        fn rewind(&mut self) {
            self.rewinds += 1;
        }
    }

    #[test]
    fn test_tick_advances_with_clock() {
        let clock = Rc::new(ManualClock::new());
        let mut probe = Probe::new(clock.clone(), 100);
        probe.start();

        clock.set(25);
        probe.tick();
        clock.set(50);
        probe.tick();
        assert_eq!(probe.seen, vec![0.25, 0.5]);
    }

    #[test]
    fn test_tick_while_stopped_does_nothing() {
        let clock = Rc::new(ManualClock::new());
        let mut probe = Probe::new(clock.clone(), 100);
        clock.set(50);
        probe.tick();
        assert!(probe.seen.is_empty());
    }

    #[test]
    fn test_run_once_finishes_on_end_edge() {
        let clock = Rc::new(ManualClock::new());
        let queue = Rc::new(RefCell::new(EventQueue::new()));
        let mut probe = Probe::new(clock.clone(), 100);
        probe.add_listener(EventQueue::listener(&queue));
        probe.start();

        clock.set(130);
        probe.tick();
        assert_eq!(probe.seen, vec![1.0]);
        assert_eq!(probe.state(), AnimationState::Stopped);

        let queue = queue.borrow();
        assert_eq!(queue.count(AnimationEventKind::Ended), 1);
        assert_eq!(queue.count(AnimationEventKind::LoopChanged), 0);
    }

    #[test]
    fn test_loop_rewinds_and_restarts_at_edge() {
        let clock = Rc::new(ManualClock::new());
        let mut probe = Probe::new(clock.clone(), 100);
        probe.set_loops(1);
        probe.start();
        assert_eq!(probe.rewinds, 1);

        clock.set(110);
        probe.tick();
        assert_eq!(probe.rewinds, 2);
        assert_eq!(probe.seen, vec![0.0]);
        assert_eq!(probe.current_loop(), 1);
        assert!(probe.is_running());
    }

    #[test]
    fn test_backward_run_finishes_at_zero() {
        let clock = Rc::new(ManualClock::new());
        let mut probe = Probe::new(clock.clone(), 100);
        probe.set_direction(Direction::Backward);
        probe.start();

        clock.set(40);
        probe.tick();
        clock.set(101);
        probe.tick();
        assert_eq!(probe.seen, vec![0.6, 0.0]);
        assert!(!probe.is_running());
    }

    #[test]
    fn test_listener_removal() {
        let clock = Rc::new(ManualClock::new());
        let queue = Rc::new(RefCell::new(EventQueue::new()));
        let mut probe = Probe::new(clock, 100);

        let id = probe.add_listener(EventQueue::listener(&queue));
        assert!(probe.remove_listener(id));
        assert!(!probe.remove_listener(id));

        probe.start();
        assert!(queue.borrow().is_empty());
    }
}
