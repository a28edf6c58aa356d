//! Keyframe store.
//!
//! This module provides:
//! - `KeyFrame`: a value anchored at a position in the [0, 1] progress domain
//! - `KeyFrames`: the ordered, unique-by-position collection an animation
//!   interpolates through
//!
//! The store always holds the two terminal keyframes at 0.0 and 1.0, so a
//! lookup in either direction of travel has a defined answer even when no
//! intermediate keyframes exist.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::types::Direction;
use crate::value::{TypedValue, ValueTag};

/// A value anchored at a progress position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    /// Position in [0, 1].
    pub position: f64,
    pub value: TypedValue,
}

impl KeyFrame {
    pub fn new(position: f64, value: TypedValue) -> Self {
        Self { position, value }
    }
}

/// Ordered keyframes, unique by position, bracketed by terminals at 0.0 and 1.0.
///
/// Serializes as a plain list of keyframes. Deserializing checks the list the
/// same way `try_new` and `try_set` would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyFrame>", into = "Vec<KeyFrame>")]
pub struct KeyFrames {
    frames: Vec<KeyFrame>,
}

impl KeyFrames {
    /// Create a store spanning `start` to `end`.
    ///
    /// # Panics
    /// Panics if the two values carry different tags.
    pub fn new(start: TypedValue, end: TypedValue) -> Self {
        match Self::try_new(start, end) {
            Ok(frames) => frames,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(start: TypedValue, end: TypedValue) -> Result<Self> {
        check_tag(start.tag(), &end)?;
        Ok(Self {
            frames: vec![KeyFrame::new(0.0, start), KeyFrame::new(1.0, end)],
        })
    }

    /// A store whose start and end hold the same value.
    pub fn constant(value: TypedValue) -> Self {
        Self {
            frames: vec![KeyFrame::new(0.0, value.clone()), KeyFrame::new(1.0, value)],
        }
    }

    /// Tag every value in the store carries.
    pub fn tag(&self) -> ValueTag {
        self.start().value.tag()
    }

    /// Insert or replace the keyframe at `position`.
    ///
    /// # Panics
    /// Panics if `position` is outside [0, 1] or `value` has the wrong tag.
    pub fn set(&mut self, position: f64, value: TypedValue) {
        if let Err(err) = self.try_set(position, value) {
            panic!("{err}");
        }
    }

    pub fn try_set(&mut self, position: f64, value: TypedValue) -> Result<()> {
        if !(0.0..=1.0).contains(&position) {
            return Err(AnimationError::PositionOutOfRange(position));
        }
        check_tag(self.tag(), &value)?;

        match self.find(position) {
            Ok(index) => self.frames[index].value = value,
            Err(index) => self.frames.insert(index, KeyFrame::new(normalize(position), value)),
        }
        Ok(())
    }

    /// Value at exactly `position`, if a keyframe sits there.
    pub fn get(&self, position: f64) -> Option<&TypedValue> {
        self.find(position).ok().map(|index| &self.frames[index].value)
    }

    /// Remove the interior keyframe at `position`.
    ///
    /// Terminal keyframes are never removed; `None` is returned for them and
    /// for positions with no keyframe.
    pub fn remove(&mut self, position: f64) -> Option<TypedValue> {
        let index = self.find(position).ok()?;
        if index == 0 || index == self.frames.len() - 1 {
            return None;
        }
        Some(self.frames.remove(index).value)
    }

    pub fn start(&self) -> &KeyFrame {
        &self.frames[0]
    }

    pub fn end(&self) -> &KeyFrame {
        &self.frames[self.frames.len() - 1]
    }

    /// Terminal keyframe a run in `direction` begins at.
    pub fn first(&self, direction: Direction) -> &KeyFrame {
        match direction {
            Direction::Forward => self.start(),
            Direction::Backward => self.end(),
        }
    }

    /// Terminal keyframe a run in `direction` ends at.
    pub fn last(&self, direction: Direction) -> &KeyFrame {
        self.first(direction.reversed())
    }

    /// First keyframe strictly past `progress` in the direction of travel.
    ///
    /// Falls back to the directional terminal when nothing lies ahead.
    pub fn next_key_frame(&self, progress: f64, direction: Direction) -> &KeyFrame {
        let found = match direction {
            Direction::Forward => self.frames.iter().find(|kf| kf.position > progress),
            Direction::Backward => self.frames.iter().rev().find(|kf| kf.position < progress),
        };
        found.unwrap_or_else(|| self.last(direction))
    }

    /// Nearest keyframe at or behind `progress` in the direction of travel.
    pub fn key_frame_behind(&self, progress: f64, direction: Direction) -> &KeyFrame {
        let found = match direction {
            Direction::Forward => self.frames.iter().rev().find(|kf| kf.position <= progress),
            Direction::Backward => self.frames.iter().find(|kf| kf.position >= progress),
        };
        found.unwrap_or_else(|| self.first(direction))
    }

    /// Number of keyframes, terminals included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: the terminals are permanent.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Keyframes in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyFrame> {
        self.frames.iter()
    }

    fn find(&self, position: f64) -> std::result::Result<usize, usize> {
        let position = normalize(position);
        self.frames
            .binary_search_by(|kf| kf.position.total_cmp(&position))
    }
}

impl Default for KeyFrames {
    fn default() -> Self {
        Self::constant(TypedValue::default())
    }
}

impl TryFrom<Vec<KeyFrame>> for KeyFrames {
    type Error = AnimationError;

    fn try_from(frames: Vec<KeyFrame>) -> Result<Self> {
        let terminal = |position: f64| {
            frames
                .iter()
                .find(|kf| normalize(kf.position) == position)
                .map(|kf| kf.value.clone())
                .ok_or(AnimationError::MissingTerminal(position))
        };
        let mut store = Self::try_new(terminal(0.0)?, terminal(1.0)?)?;
        for kf in frames {
            store.try_set(kf.position, kf.value)?;
        }
        Ok(store)
    }
}

impl From<KeyFrames> for Vec<KeyFrame> {
    fn from(key_frames: KeyFrames) -> Self {
        key_frames.frames
    }
}

/// Fold -0.0 into 0.0 so positions compare by value.
fn normalize(position: f64) -> f64 {
    position + 0.0
}

fn check_tag(expected: ValueTag, value: &TypedValue) -> Result<()> {
    if value.tag() == expected {
        Ok(())
    } else {
        Err(AnimationError::TagMismatch {
            expected,
            found: value.tag(),
        })
    }
}
