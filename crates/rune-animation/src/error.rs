//! Error types for the animation engine.

use thiserror::Error;

use crate::value::ValueTag;

/// Result type for fallible animation operations.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Errors reported by the `try_` family of operations.
///
/// The asserting counterparts (`set_key_value`, `set_start_value`, ...) panic
/// with the same message: malformed input there is a caller bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Keyframe position outside the progress domain.
    #[error("keyframe position {0} is outside 0.0..=1.0")]
    PositionOutOfRange(f64),

    /// Keyframe value carries a different tag than the established start value.
    #[error("keyframe value is {found:?} but the animation animates {expected:?} values")]
    TagMismatch {
        /// Tag established by the existing keyframes.
        expected: ValueTag,
        /// Tag of the rejected value.
        found: ValueTag,
    },

    /// A keyframe list lacks the terminal at 0.0 or 1.0.
    #[error("keyframes have no terminal at {0}")]
    MissingTerminal(f64),

    /// Curve function name did not parse.
    #[error("unknown curve function `{0}`")]
    UnknownCurveFunction(String),

    /// Curve weight name did not parse.
    #[error("unknown curve weight `{0}`")]
    UnknownCurveWeight(String),

    /// Direction name did not parse.
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
}
