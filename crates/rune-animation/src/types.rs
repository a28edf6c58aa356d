//! Core animation types.
//!
//! This module defines the identifiers and enums shared across the engine:
//! - `AnimationId`: unique identifier for an animation instance
//! - `AnimationState`: lifecycle state of an animation
//! - `Direction`: which end of the progress range a loop starts from
//! - `GroupMode`: how an `AnimationGroup` schedules its children

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AnimationError;

/// Unique identifier for an animation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of an animation.
///
/// `Stopped` is both the initial state and the state a finished run returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    #[default]
    Stopped,
    Paused,
    Running,
}

/// Direction of travel through the progress range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Progress runs 0.0 to 1.0.
    #[default]
    Forward,
    /// Progress runs 1.0 to 0.0.
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Progress at which a loop in this direction begins.
    pub fn start_edge(self) -> f64 {
        match self {
            Self::Forward => 0.0,
            Self::Backward => 1.0,
        }
    }

    /// Progress at which a loop in this direction ends.
    pub fn end_edge(self) -> f64 {
        self.reversed().start_edge()
    }

    /// Map linear progress in [0, 1] onto this direction.
    pub fn orient(self, progress: f64) -> f64 {
        match self {
            Self::Forward => progress,
            Self::Backward => 1.0 - progress,
        }
    }
}

impl FromStr for Direction {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "forwards" | "normal" => Ok(Self::Forward),
            "backward" | "backwards" | "reverse" => Ok(Self::Backward),
            _ => Err(AnimationError::UnknownDirection(s.to_string())),
        }
    }
}

/// Scheduling mode of an `AnimationGroup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    /// One child at a time, chained on completion.
    #[default]
    Sequential,
    /// All children advance together.
    Parallel,
}
