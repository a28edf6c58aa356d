//! Keyframe animation.
//!
//! `KeyFrameAnimation` interpolates a single `TypedValue` through a
//! [`KeyFrames`] store, shaping each segment with an [`AnimationCurve`].
//!
//! # Example
//!
//! ```
//! use rune_animation::{Animatable, CurveFunction, CurveWeight, KeyFrameAnimation, TypedValue};
//!
//! let mut fade = KeyFrameAnimation::new(0, 100).with_duration(1000);
//! fade.curve_mut().set_function(CurveFunction::Quadratic);
//! fade.curve_mut().set_weight(CurveWeight::In);
//!
//! fade.update(0.5);
//! assert_eq!(fade.value(), &TypedValue::Int(25));
//! ```

use std::rc::Rc;

use crate::animation::Animatable;
use crate::clock::{Clock, TickSource};
use crate::curve::AnimationCurve;
use crate::error::Result;
use crate::interpolate::Interpolate;
use crate::keyframes::{KeyFrame, KeyFrames};
use crate::timeline::Timeline;
use crate::types::Direction;
use crate::value::TypedValue;

#[derive(Debug)]
pub struct KeyFrameAnimation {
    timeline: Timeline,
    key_frames: KeyFrames,
    curve: AnimationCurve,
    segment_start: KeyFrame,
    segment_end: KeyFrame,
    value: TypedValue,
}

impl KeyFrameAnimation {
    /// Animate from `start` to `end`.
    ///
    /// # Panics
    /// Panics if the two values carry different tags.
    pub fn new(start: impl Into<TypedValue>, end: impl Into<TypedValue>) -> Self {
        Self::from_key_frames(KeyFrames::new(start.into(), end.into()))
    }

    pub fn try_new(start: impl Into<TypedValue>, end: impl Into<TypedValue>) -> Result<Self> {
        Ok(Self::from_key_frames(KeyFrames::try_new(start.into(), end.into())?))
    }

    /// A single-value animation: start and end both hold `value`.
    pub fn with_value(value: impl Into<TypedValue>) -> Self {
        Self::from_key_frames(KeyFrames::constant(value.into()))
    }

    pub fn from_key_frames(key_frames: KeyFrames) -> Self {
        let start = key_frames.start().clone();
        let end = key_frames.end().clone();
        Self {
            timeline: Timeline::new(),
            value: start.value.clone(),
            segment_start: start,
            segment_end: end,
            key_frames,
            curve: AnimationCurve::default(),
        }
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.timeline.set_clock(clock);
        self
    }

    pub fn with_ticker(mut self, ticker: Box<dyn TickSource>) -> Self {
        self.timeline.set_ticker(ticker);
        self
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.timeline.set_duration(duration_ms);
        self
    }

    pub fn with_loops(mut self, loops: i32) -> Self {
        self.timeline.set_loops(loops);
        self
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }

    /// The most recently computed value.
    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn key_frames(&self) -> &KeyFrames {
        &self.key_frames
    }

    /// Insert or replace the keyframe at `position`.
    ///
    /// # Panics
    /// Panics if `position` is outside [0, 1] or `value` has the wrong tag.
    pub fn set_key_value(&mut self, position: f64, value: impl Into<TypedValue>) {
        self.key_frames.set(position, value.into());
    }

    pub fn try_set_key_value(&mut self, position: f64, value: impl Into<TypedValue>) -> Result<()> {
        self.key_frames.try_set(position, value.into())
    }

    pub fn key_value(&self, position: f64) -> Option<&TypedValue> {
        self.key_frames.get(position)
    }

    /// Remove an interior keyframe. Terminals stay.
    pub fn remove_key_value(&mut self, position: f64) -> Option<TypedValue> {
        self.key_frames.remove(position)
    }

    pub fn start_value(&self) -> &TypedValue {
        &self.key_frames.start().value
    }

    /// # Panics
    /// Panics if `value` has the wrong tag.
    pub fn set_start_value(&mut self, value: impl Into<TypedValue>) {
        self.set_key_value(0.0, value);
    }

    pub fn try_set_start_value(&mut self, value: impl Into<TypedValue>) -> Result<()> {
        self.try_set_key_value(0.0, value)
    }

    pub fn end_value(&self) -> &TypedValue {
        &self.key_frames.end().value
    }

    /// # Panics
    /// Panics if `value` has the wrong tag.
    pub fn set_end_value(&mut self, value: impl Into<TypedValue>) {
        self.set_key_value(1.0, value);
    }

    pub fn try_set_end_value(&mut self, value: impl Into<TypedValue>) -> Result<()> {
        self.try_set_key_value(1.0, value)
    }

    pub fn curve(&self) -> &AnimationCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut AnimationCurve {
        &mut self.curve
    }

    pub fn set_curve(&mut self, curve: AnimationCurve) {
        self.curve = curve;
    }

    /// Bounding keyframes of the segment being interpolated.
    pub fn segment(&self) -> (&KeyFrame, &KeyFrame) {
        (&self.segment_start, &self.segment_end)
    }

    fn resolve_segment(&mut self, progress: f64, direction: Direction) {
        let next = self.key_frames.next_key_frame(progress, direction);
        let behind = self.key_frames.key_frame_behind(progress, direction);
        if *next != self.segment_end || *behind != self.segment_start {
            self.segment_end = next.clone();
            self.segment_start = behind.clone();
        }
    }
}

impl Animatable for KeyFrameAnimation {
    fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    fn advance(&mut self, progress: f64) {
        let direction = self.timeline.direction();
        self.resolve_segment(progress, direction);

        let from = self.segment_start.position;
        let to = self.segment_end.position;
        let local = if to == from {
            1.0
        } else {
            ((progress - from) / (to - from)).clamp(0.0, 1.0)
        };

        let start = &self.segment_start.value;
        let end = &self.segment_end.value;
        self.value = if start.is_numeric() {
            start.interpolate(end, self.curve.perform(local))
        } else if local >= 1.0 {
            end.clone()
        } else {
            start.clone()
        };
    }

    fn rewind(&mut self) {
        let direction = self.timeline.direction();
        let first = self.key_frames.first(direction).clone();
        self.segment_end = self.key_frames.next_key_frame(first.position, direction).clone();
        self.value = first.value.clone();
        self.segment_start = first;
    }

    fn current_value(&self) -> Option<TypedValue> {
        Some(self.value.clone())
    }
}
