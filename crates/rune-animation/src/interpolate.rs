//! Interpolation for animated values.
//!
//! This module provides the `Interpolate` trait and its implementations for the
//! numeric primitives and `TypedValue`. Integer results are rounded to the
//! nearest representable value so an integer animation stays integral.

use crate::value::TypedValue;

/// Trait for types that can be interpolated between two values.
///
/// When `t = 0.0` the result is `self`, when `t = 1.0` it is `to`. Values of
/// `t` outside `[0, 1]` extrapolate, which overshooting curves rely on.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for i32 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        let delta = f64::from(*to) - f64::from(*self);
        (f64::from(*self) + delta * t).round() as i32
    }
}

impl Interpolate for i64 {
    /// The base value stays integral; only the scaled delta goes through
    /// `f64`, so endpoints beyond 2^53 are exact at `t = 0.0` and `t = 1.0`.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t == 1.0 {
            return *to;
        }
        let delta = i128::from(*to) - i128::from(*self);
        let step = (delta as f64 * t).round() as i128;
        (i128::from(*self) + step).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

impl Interpolate for TypedValue {
    /// Interpolate between two typed values.
    ///
    /// Both values must carry the same tag; on a mismatch `self` is returned
    /// unchanged. Opaque values switch to `to` only once `t` reaches 1.0.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Int(from), Self::Int(to)) => Self::Int(from.interpolate(to, t)),
            (Self::Int64(from), Self::Int64(to)) => Self::Int64(from.interpolate(to, t)),
            (Self::Float(from), Self::Float(to)) => Self::Float(from.interpolate(to, t)),
            (Self::Opaque(_), Self::Opaque(_)) => {
                if t >= 1.0 {
                    to.clone()
                } else {
                    self.clone()
                }
            }
            // Type mismatch - return self unchanged
            _ => self.clone(),
        }
    }
}
