//! Animation events for lifecycle callbacks.
//!
//! Every animation owns a `Listeners` list. Lifecycle transitions broadcast an
//! `AnimationEvent` to each subscriber in registration order. An `EventQueue`
//! can be subscribed to record events for later polling.
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use rune_animation::{Animatable, AnimationEventKind, EventQueue, KeyFrameAnimation};
//!
//! let queue = Rc::new(RefCell::new(EventQueue::new()));
//! let mut animation = KeyFrameAnimation::new(0, 100);
//! animation.add_listener(EventQueue::listener(&queue));
//!
//! animation.start();
//! assert_eq!(queue.borrow().count(AnimationEventKind::Started), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{AnimationId, AnimationState, Direction};
use crate::value::TypedValue;

/// What happened to an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationEventKind {
    Started,
    /// The animation stopped, either explicitly or after its last loop.
    Ended,
    Paused,
    Resumed,
    /// A tick produced a new value.
    Advanced,
    StateChanged,
    LoopChanged,
    DirectionChanged,
}

/// Snapshot of an animation taken when an event fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    /// The animation that fired the event.
    pub animation_id: AnimationId,
    pub kind: AnimationEventKind,
    pub state: AnimationState,
    pub direction: Direction,
    pub current_loop: i32,
    /// Current value, for animations that produce one.
    pub value: Option<TypedValue>,
}

impl AnimationEvent {
    pub fn is_started(&self) -> bool {
        self.kind == AnimationEventKind::Started
    }

    pub fn is_ended(&self) -> bool {
        self.kind == AnimationEventKind::Ended
    }

    pub fn is_advanced(&self) -> bool {
        self.kind == AnimationEventKind::Advanced
    }
}

/// Event subscriber.
pub type Listener = Rc<dyn Fn(&AnimationEvent)>;

/// Handle returned when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl ListenerId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered subscriber list.
#[derive(Default, Clone)]
pub struct Listeners {
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under a fresh id.
    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId::new();
        self.insert(id, listener);
        id
    }

    /// Register `listener` under `id`. Re-inserting an existing id is a no-op.
    pub fn insert(&mut self, id: ListenerId, listener: Listener) {
        if !self.contains(id) {
            self.entries.push((id, listener));
        }
    }

    /// Returns whether a listener was removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    /// Registered listeners in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ListenerId, &Listener)> {
        self.entries.iter().map(|(id, listener)| (*id, listener))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `event` to every listener.
    pub fn notify(&self, event: &AnimationEvent) {
        // Snapshot so a listener may register or remove others mid-broadcast.
        let snapshot: Vec<Listener> = self.entries.iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in snapshot {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

/// Queue for collecting animation events between host frames.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<AnimationEvent>,
}

impl EventQueue {
    /// Create a new empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that appends every event to `queue`.
    pub fn listener(queue: &Rc<RefCell<EventQueue>>) -> Listener {
        let queue = Rc::clone(queue);
        Rc::new(move |event: &AnimationEvent| queue.borrow_mut().push(event.clone()))
    }

    /// Push an event onto the queue.
    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push_back(event);
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Pop the next event from the queue.
    pub fn pop(&mut self) -> Option<AnimationEvent> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, returning an iterator.
    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain(..)
    }

    /// Peek at the next event without removing it.
    pub fn peek(&self) -> Option<&AnimationEvent> {
        self.events.front()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of pending events of `kind`.
    pub fn count(&self, kind: AnimationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Pending events fired by animation `id`.
    pub fn events_for(&self, id: AnimationId) -> Vec<&AnimationEvent> {
        self.events.iter().filter(|e| e.animation_id == id).collect()
    }

    /// Kinds of all pending events, oldest first.
    pub fn kinds(&self) -> Vec<AnimationEventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }
}
