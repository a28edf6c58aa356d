//! Animation groups.
//!
//! An `AnimationGroup` composes child animations under the same
//! [`Animatable`] contract as a single animation. Children are held weakly:
//! the group never owns them, and a child dropped by its owner is skipped
//! with a warning.
//!
//! - **Sequential**: one child runs at a time. The group adopts the active
//!   child's duration and loop count, forwards each tick to it, and moves on
//!   when it stops.
//! - **Parallel**: every child follows the group's progress. The group's
//!   duration is the longest child's, so shorter children hold their final
//!   value once their own share of the run is complete.
//!
//! Listeners registered on a group are also registered on every current and
//! later-added child.

use log::{debug, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::animation::{Animatable, drive};
use crate::clock::{Clock, TickSource};
use crate::events::{AnimationEventKind, Listener, ListenerId};
use crate::timeline::{Step, Timeline};
use crate::types::{Direction, GroupMode};
use crate::value::TypedValue;

/// Shared handle to a child animation.
pub type SharedAnimation = Rc<RefCell<dyn Animatable>>;

pub struct AnimationGroup {
    timeline: Timeline,
    mode: GroupMode,
    children: Vec<Weak<RefCell<dyn Animatable>>>,
    current_index: Option<usize>,
}

impl std::fmt::Debug for AnimationGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationGroup")
            .field("timeline", &self.timeline)
            .field("mode", &self.mode)
            .field("children", &self.children.len())
            .field("current_index", &self.current_index)
            .finish()
    }
}

impl Default for AnimationGroup {
    fn default() -> Self {
        Self::new(GroupMode::default())
    }
}

fn thin<T: ?Sized>(ptr: *const T) -> *const () {
    ptr.cast()
}

impl AnimationGroup {
    pub fn new(mode: GroupMode) -> Self {
        Self {
            timeline: Timeline::new(),
            mode,
            children: Vec::new(),
            current_index: None,
        }
    }

    pub fn sequential() -> Self {
        Self::new(GroupMode::Sequential)
    }

    pub fn parallel() -> Self {
        Self::new(GroupMode::Parallel)
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.timeline.set_clock(clock);
        self
    }

    pub fn with_ticker(mut self, ticker: Box<dyn TickSource>) -> Self {
        self.timeline.set_ticker(ticker);
        self
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    /// Takes effect on the next `start`.
    pub fn set_mode(&mut self, mode: GroupMode) {
        self.mode = mode;
    }

    // Membership

    pub fn add_animation<A: Animatable + 'static>(&mut self, animation: &Rc<RefCell<A>>) {
        let index = self.children.len();
        self.insert_animation(index, animation);
    }

    /// # Panics
    /// Panics if `index > len()`.
    pub fn insert_animation<A: Animatable + 'static>(
        &mut self,
        index: usize,
        animation: &Rc<RefCell<A>>,
    ) {
        assert!(index <= self.children.len(), "insert index {index} out of bounds");
        let shared: SharedAnimation = animation.clone();

        {
            let mut child = shared.borrow_mut();
            for (id, listener) in self.timeline.listeners().iter() {
                child.insert_listener(id, Rc::clone(listener));
            }
        }

        self.children.insert(index, Rc::downgrade(&shared));
        if let Some(current) = self.current_index.filter(|current| index <= *current) {
            self.current_index = Some(current + 1);
        }
    }

    pub fn index_of<A: Animatable + ?Sized>(&self, animation: &Rc<RefCell<A>>) -> Option<usize> {
        let target = thin(Rc::as_ptr(animation));
        self.children
            .iter()
            .position(|child| thin(child.as_ptr()) == target)
    }

    /// Returns whether the animation was a member.
    pub fn remove_animation<A: Animatable + ?Sized>(&mut self, animation: &Rc<RefCell<A>>) -> bool {
        match self.index_of(animation) {
            Some(index) => {
                self.remove_animation_at(index);
                true
            }
            None => false,
        }
    }

    /// Remove the child at `index`, returning it if it is still alive.
    ///
    /// Removing the running child of a sequential group stops it and moves
    /// on to the next one.
    pub fn remove_animation_at(&mut self, index: usize) -> Option<SharedAnimation> {
        if index >= self.children.len() {
            return None;
        }
        let removed = self.children.remove(index).upgrade();
        if let Some(child) = &removed {
            let mut child = child.borrow_mut();
            for (id, _) in self.timeline.listeners().iter() {
                child.remove_listener(id);
            }
        }

        match self.current_index {
            Some(current) if current == index => {
                if let Some(child) = &removed {
                    child.borrow_mut().stop();
                }
                self.current_index = None;
                if self.is_running() {
                    let next = match self.timeline.direction() {
                        Direction::Forward => Some(index),
                        Direction::Backward => index.checked_sub(1),
                    };
                    self.activate_from(next);
                }
            }
            Some(current) if current > index => self.current_index = Some(current - 1),
            _ => {}
        }
        removed
    }

    /// The child at `index`, if it is still alive.
    pub fn animation(&self, index: usize) -> Option<SharedAnimation> {
        self.children.get(index).and_then(Weak::upgrade)
    }

    /// Remove every child, stopping a running sequential child first.
    pub fn clear(&mut self) {
        if let Some(child) = self.active_child() {
            child.borrow_mut().stop();
        }
        self.current_index = None;
        self.children.clear();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the running child in sequential mode.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    fn live_children(&self) -> Vec<SharedAnimation> {
        self.children.iter().filter_map(Weak::upgrade).collect()
    }

    fn active_child(&self) -> Option<SharedAnimation> {
        self.current_index.and_then(|index| self.animation(index))
    }

    // Sequential scheduling

    fn first_index(&self) -> Option<usize> {
        if self.children.is_empty() {
            return None;
        }
        match self.timeline.direction() {
            Direction::Forward => Some(0),
            Direction::Backward => Some(self.children.len() - 1),
        }
    }

    fn step_index(&self, index: usize) -> Option<usize> {
        match self.timeline.direction() {
            Direction::Forward => (index + 1 < self.children.len()).then_some(index + 1),
            Direction::Backward => index.checked_sub(1),
        }
    }

    /// Start the first live child at or after `index` in the direction of
    /// travel, or stop the group when none is left.
    fn activate_from(&mut self, mut index: Option<usize>) {
        while let Some(i) = index.filter(|i| *i < self.children.len()) {
            if let Some(child) = self.children[i].upgrade() {
                let (duration_ms, loops) = {
                    let mut child = child.borrow_mut();
                    child.start_driven();
                    (child.duration_ms(), child.loops())
                };
                self.current_index = Some(i);
                self.timeline.adopt(duration_ms, loops);
                debug!(
                    "animation group {:?} activated child {} ({}ms, {} loops)",
                    self.timeline.id(),
                    i,
                    duration_ms,
                    loops
                );
                return;
            }
            warn!(
                "animation group {:?} skipping dropped child at index {}",
                self.timeline.id(),
                i
            );
            index = self.step_index(i);
        }
        self.current_index = None;
        self.stop();
    }

    fn tick_sequential(&mut self) {
        if self.timeline.poll() == Step::Idle {
            return;
        }
        let Some(child) = self.active_child() else {
            let next = self.current_index.and_then(|i| self.step_index(i));
            if self.current_index.is_some() {
                warn!(
                    "animation group {:?} lost its active child",
                    self.timeline.id()
                );
            }
            self.activate_from(next);
            return;
        };

        let (finished, value) = {
            let mut child = child.borrow_mut();
            child.tick();
            (!child.is_running(), child.current_value())
        };
        self.timeline.emit(AnimationEventKind::Advanced, value);

        if finished {
            let next = self.current_index.and_then(|i| self.step_index(i));
            self.activate_from(next);
        }
    }

    // Parallel scheduling

    fn begin(&mut self, engage_ticker: bool) {
        match self.mode {
            GroupMode::Sequential => {
                self.current_index = None;
                self.timeline.start(engage_ticker, None);
                let first = self.first_index();
                self.activate_from(first);
            }
            GroupMode::Parallel => {
                let duration_ms = self.longest_child_ms();
                let loops = self.timeline.loops();
                self.timeline.adopt(duration_ms, loops);
                for child in self.live_children() {
                    child.borrow_mut().start_driven();
                }
                self.timeline.start(engage_ticker, None);
            }
        }
    }

    fn longest_child_ms(&self) -> u32 {
        self.live_children()
            .iter()
            .map(|child| child.borrow().duration_ms())
            .max()
            .unwrap_or(0)
    }
}

impl Animatable for AnimationGroup {
    fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Sequential groups hand `progress` to the running child; parallel
    /// groups scale it into each child's share of the run.
    ///
    /// A backward parallel group plays every child from its end value, and
    /// shorter children reach their start value first and hold it.
    fn advance(&mut self, progress: f64) {
        match self.mode {
            GroupMode::Sequential => {
                if let Some(child) = self.active_child() {
                    child.borrow_mut().update(progress);
                }
            }
            GroupMode::Parallel => {
                let span = f64::from(self.timeline.duration_ms());
                let forward = self.timeline.direction().is_forward();
                let elapsed = if forward {
                    progress * span
                } else {
                    (1.0 - progress) * span
                };
                for child in self.live_children() {
                    let mut child = child.borrow_mut();
                    let own = f64::from(child.duration_ms());
                    let share = if own == 0.0 {
                        1.0
                    } else {
                        (elapsed / own).clamp(0.0, 1.0)
                    };
                    let position = if forward { share } else { 1.0 - share };
                    let oriented = child.direction().orient(position);
                    child.update(oriented);
                }
            }
        }
    }

    fn rewind(&mut self) {
        if self.mode == GroupMode::Parallel {
            for child in self.live_children() {
                child.borrow_mut().rewind();
            }
        }
    }

    fn current_value(&self) -> Option<TypedValue> {
        match self.mode {
            GroupMode::Sequential => self
                .active_child()
                .and_then(|child| child.borrow().current_value()),
            GroupMode::Parallel => None,
        }
    }

    fn start(&mut self) {
        self.begin(true);
    }

    fn start_driven(&mut self) {
        self.begin(false);
    }

    fn pause(&mut self) {
        if !self.timeline.is_paused() && self.is_running() {
            for child in self.live_children() {
                child.borrow_mut().pause();
            }
        }
        self.timeline.pause(None);
    }

    fn resume(&mut self) {
        if self.timeline.is_paused() {
            for child in self.live_children() {
                child.borrow_mut().resume();
            }
        }
        self.timeline.resume(None);
    }

    fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        for child in self.live_children() {
            child.borrow_mut().stop();
        }
        self.current_index = None;
        self.timeline.stop(None);
    }

    fn tick(&mut self) {
        match self.mode {
            GroupMode::Sequential => self.tick_sequential(),
            GroupMode::Parallel => drive(self),
        }
    }

    fn insert_listener(&mut self, id: ListenerId, listener: Listener) {
        for child in self.live_children() {
            child.borrow_mut().insert_listener(id, Rc::clone(&listener));
        }
        self.timeline.listeners_mut().insert(id, listener);
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        for child in self.live_children() {
            child.borrow_mut().remove_listener(id);
        }
        self.timeline.listeners_mut().remove(id)
    }
}
