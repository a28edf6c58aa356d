use std::cell::RefCell;
use std::rc::Rc;

use rune_animation::{
    Animatable, AnimationCurve, AnimationEventKind, AnimationState, CurveFunction, CurveWeight,
    Direction, EventQueue, KeyFrameAnimation, KeyFrames, ManualClock, ManualTicker, TickSource,
    TypedValue,
};

struct Harness {
    clock: Rc<ManualClock>,
    ticker: Rc<RefCell<ManualTicker>>,
    events: Rc<RefCell<EventQueue>>,
    animation: KeyFrameAnimation,
}

fn harness(start: i32, end: i32, duration_ms: u32) -> Harness {
    let clock = Rc::new(ManualClock::new());
    let ticker = Rc::new(RefCell::new(ManualTicker::new()));
    let events = Rc::new(RefCell::new(EventQueue::new()));

    let mut animation = KeyFrameAnimation::new(start, end)
        .with_clock(clock.clone())
        .with_ticker(Box::new(Rc::clone(&ticker)))
        .with_duration(duration_ms);
    animation.add_listener(EventQueue::listener(&events));

    Harness {
        clock,
        ticker,
        events,
        animation,
    }
}

impl Harness {
    fn tick_at(&mut self, now_ms: i64) {
        self.clock.set(now_ms);
        self.animation.tick();
    }

    fn count(&self, kind: AnimationEventKind) -> usize {
        self.events.borrow().count(kind)
    }
}

#[test]
fn key_frame_lookup_follows_direction_of_travel() {
    let mut frames = KeyFrames::new(TypedValue::Float(0.0), TypedValue::Float(1.0));
    frames.set(0.3, TypedValue::Float(0.3));
    frames.set(0.7, TypedValue::Float(0.7));

    assert_eq!(frames.next_key_frame(0.5, Direction::Forward).position, 0.7);
    assert_eq!(frames.next_key_frame(0.5, Direction::Backward).position, 0.3);

    let end = frames.next_key_frame(0.9, Direction::Forward);
    assert_eq!(end.position, 1.0);
    assert_eq!(end.value, TypedValue::Float(1.0));
}

#[test]
fn two_loops_fire_two_loop_events_and_keep_running() {
    let mut h = harness(0, 100, 100);
    h.animation.set_loops(2);
    h.animation.start();

    h.tick_at(150);
    h.tick_at(300);
    h.tick_at(360);

    assert_eq!(h.count(AnimationEventKind::LoopChanged), 2);
    assert_eq!(h.animation.current_loop(), 2);
    assert_eq!(h.animation.state(), AnimationState::Running);
    assert_eq!(h.animation.value(), &TypedValue::Int(60));

    // The third loop is the last one.
    h.tick_at(500);
    assert_eq!(h.animation.state(), AnimationState::Stopped);
    assert_eq!(h.animation.value(), &TypedValue::Int(100));
    assert_eq!(h.count(AnimationEventKind::Ended), 1);
    assert_eq!(h.animation.current_loop(), 0);
}

#[test]
fn endless_animation_keeps_looping() {
    let mut h = harness(0, 100, 100);
    h.animation.set_loops(-1);
    assert!(h.animation.timeline().is_endless());
    h.animation.start();

    let mut last_loop = 0;
    for now in (60..=3000).step_by(60) {
        h.tick_at(now);
        assert!(h.animation.current_loop() >= last_loop);
        last_loop = h.animation.current_loop();
    }

    // One boundary every second tick.
    assert_eq!(h.animation.state(), AnimationState::Running);
    assert_eq!(h.animation.current_loop(), 25);
    assert_eq!(h.count(AnimationEventKind::LoopChanged), 25);
    assert_eq!(h.count(AnimationEventKind::Ended), 0);

    h.animation.stop();
    assert_eq!(h.animation.current_loop(), 0);
}

#[test]
fn ping_pong_flips_once_per_boundary() {
    let mut h = harness(0, 100, 100);
    h.animation.set_loops(3);
    h.animation.set_ping_pong(true);
    h.animation.start();

    for now in (10..=100).step_by(10) {
        h.tick_at(now);
    }
    assert_eq!(h.count(AnimationEventKind::DirectionChanged), 0);

    h.tick_at(110);
    assert_eq!(h.count(AnimationEventKind::DirectionChanged), 1);
    assert_eq!(h.animation.direction(), Direction::Backward);
    assert_eq!(h.animation.value(), &TypedValue::Int(100));

    for now in (120..=210).step_by(10) {
        h.tick_at(now);
    }
    assert_eq!(h.count(AnimationEventKind::DirectionChanged), 1);
    assert_eq!(h.animation.value(), &TypedValue::Int(0));

    h.tick_at(215);
    assert_eq!(h.count(AnimationEventKind::DirectionChanged), 2);
    assert_eq!(h.animation.direction(), Direction::Forward);
    assert_eq!(h.count(AnimationEventKind::LoopChanged), 2);
}

#[test]
fn backward_run_ends_on_start_value() {
    let mut h = harness(0, 100, 100);
    h.animation.set_direction(Direction::Backward);
    h.animation.start();
    assert_eq!(h.animation.value(), &TypedValue::Int(100));

    h.tick_at(25);
    assert_eq!(h.animation.value(), &TypedValue::Int(75));

    h.tick_at(120);
    assert_eq!(h.animation.value(), &TypedValue::Int(0));
    assert!(!h.animation.is_running());
}

#[test]
fn pause_and_resume_are_idempotent() {
    let mut h = harness(0, 100, 100);
    h.animation.start();
    h.events.borrow_mut().clear();

    h.animation.pause();
    h.animation.pause();
    assert_eq!(h.count(AnimationEventKind::Paused), 1);
    assert_eq!(h.count(AnimationEventKind::StateChanged), 1);
    assert!(!h.ticker.borrow().is_active());

    // Ticks that arrive while paused are ignored.
    h.tick_at(40);
    assert_eq!(h.count(AnimationEventKind::Advanced), 0);

    h.animation.resume();
    h.animation.resume();
    assert_eq!(h.count(AnimationEventKind::Resumed), 1);
    assert_eq!(h.count(AnimationEventKind::StateChanged), 2);
    assert!(h.ticker.borrow().is_active());
}

#[test]
fn resume_preserves_progress() {
    let mut h = harness(0, 100, 100);
    h.animation.start();

    h.tick_at(30);
    h.animation.pause();
    h.clock.set(5_000);
    h.animation.resume();

    h.tick_at(5_020);
    assert_eq!(h.animation.value(), &TypedValue::Int(50));
}

#[test]
fn linear_and_quadratic_midpoints() {
    let mut h = harness(0, 100, 1000);
    h.animation.start();
    h.tick_at(500);
    assert_eq!(h.animation.value(), &TypedValue::Int(50));

    let mut h = harness(0, 100, 1000);
    h.animation
        .set_curve(AnimationCurve::new(CurveFunction::Quadratic, CurveWeight::In));
    h.animation.start();
    h.tick_at(500);
    assert_eq!(h.animation.value(), &TypedValue::Int(25));
}

#[test]
fn advanced_fires_once_per_tick() {
    let mut h = harness(0, 100, 100);
    h.animation.start();
    for now in [10, 20, 30, 30] {
        h.tick_at(now);
    }
    assert_eq!(h.count(AnimationEventKind::Advanced), 4);

    let events = h.events.borrow();
    let last = events
        .events_for(h.animation.id())
        .into_iter()
        .rev()
        .find(|e| e.kind == AnimationEventKind::Advanced)
        .cloned();
    assert_eq!(last.and_then(|e| e.value), Some(TypedValue::Int(30)));
}

#[test]
fn restart_resets_origin_and_loop() {
    let mut h = harness(0, 100, 100);
    h.animation.set_loops(1);
    h.animation.start();
    h.tick_at(150);
    assert_eq!(h.animation.current_loop(), 1);

    h.animation.start();
    assert_eq!(h.animation.current_loop(), 0);
    assert_eq!(h.animation.value(), &TypedValue::Int(0));
    assert_eq!(h.count(AnimationEventKind::Started), 2);

    h.tick_at(200);
    assert_eq!(h.animation.value(), &TypedValue::Int(50));
}

#[test]
fn speed_change_restarts_ticker_without_losing_progress() {
    let mut h = harness(0, 100, 100);
    h.animation.start();
    h.tick_at(40);

    h.animation.set_speed(33);
    assert_eq!(h.ticker.borrow().interval_ms(), 33);
    assert_eq!(h.ticker.borrow().starts(), 2);

    h.tick_at(60);
    assert_eq!(h.animation.value(), &TypedValue::Int(60));
}

#[test]
fn stop_is_final_and_silent_when_repeated() {
    let mut h = harness(0, 100, 100);
    h.animation.start();
    h.animation.stop();
    h.animation.stop();
    assert_eq!(h.count(AnimationEventKind::Ended), 1);

    h.tick_at(50);
    assert_eq!(h.animation.value(), &TypedValue::Int(0));
}
