//! Rune animation engine
//!
//! This crate computes animated values over time: it combines keyframe
//! lookup, a pluggable easing curve, and loop/direction/ping-pong semantics,
//! and notifies observers of every lifecycle transition. It is meant to be
//! embedded in a host event loop that owns the timer.
//!
//! # Architecture
//!
//! ```text
//! host tick ──> Animatable::tick
//!                 ├── Timeline      (state machine, clock, loops, listeners)
//!                 └── advance(p)
//!                       ├── KeyFrameAnimation  (KeyFrames ─> AnimationCurve ─> Interpolate)
//!                       └── AnimationGroup     (sequential / parallel fan-out)
//! ```
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use rune_animation::{Animatable, KeyFrameAnimation, ManualClock, TypedValue};
//!
//! let clock = Rc::new(ManualClock::new());
//! let mut slide = KeyFrameAnimation::new(0, 100)
//!     .with_clock(clock.clone())
//!     .with_duration(1000);
//!
//! slide.start();
//! clock.set(500);
//! slide.tick();
//! assert_eq!(slide.value(), &TypedValue::Int(50));
//! ```

pub mod animation;
pub mod behaviour;
pub mod clock;
pub mod curve;
pub mod easing;
pub mod error;
pub mod events;
pub mod group;
pub mod interpolate;
pub mod keyframe_animation;
pub mod keyframes;
pub mod timeline;
pub mod types;
pub mod value;

pub use animation::{Animatable, drive};
pub use behaviour::EasedPosition;
pub use clock::{Clock, ManualClock, ManualTicker, SystemClock, TickSource};
pub use curve::{AnimationCurve, CubicBezier, CurveFunction, CustomCurve};
pub use easing::CurveWeight;
pub use error::{AnimationError, Result};
pub use events::{AnimationEvent, AnimationEventKind, EventQueue, Listener, ListenerId, Listeners};
pub use group::{AnimationGroup, SharedAnimation};
pub use interpolate::Interpolate;
pub use keyframe_animation::KeyFrameAnimation;
pub use keyframes::{KeyFrame, KeyFrames};
pub use timeline::{DEFAULT_SPEED_MS, Step, Timeline};
pub use types::{AnimationId, AnimationState, Direction, GroupMode};
pub use value::{TypedValue, ValueTag};
