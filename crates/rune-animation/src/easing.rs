//! Easing functions for animation timing.
//!
//! This module implements the classic easing families as pure functions of
//! progress `t` in `[0, 1]`:
//! - Polynomial: quadratic, cubic, quartic, quintic
//! - Sinusoidal, exponential, circular
//! - Elastic (amplitude, period), back (overshoot), bounce (amplitude)
//!
//! Each family provides a canonical `in_*` and `out_*` shape, where
//! `out(t) == 1 - in(1 - t)`. The `InOut` and `OutIn` weights are composed
//! from those two halves by [`in_out`] and [`out_in`]. Every function returns
//! exactly 0.0 at `t == 0.0` and exactly 1.0 at `t == 1.0`; back and elastic
//! leave `[0, 1]` at interior points.
//!
//! # Usage
//!
//! ```
//! use rune_animation::easing::{self, CurveWeight};
//!
//! let eased = easing::weighted(CurveWeight::InOut, 0.25, easing::in_cubic, easing::out_cubic);
//! assert!(eased < 0.25);
//! ```

use std::f64::consts::{FRAC_PI_2, PI};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Overshoot of the back family that yields a 10% overshoot.
pub const DEFAULT_OVERSHOOT: f64 = 1.70158;

/// Scale applied to the back overshoot when both halves are eased.
pub const IN_OUT_OVERSHOOT_SCALE: f64 = 1.525;

/// Determines how an easing family is weighted across the progress range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveWeight {
    /// Accelerate from zero.
    #[default]
    In,
    /// Decelerate to zero.
    Out,
    /// Accelerate for the first half, decelerate for the second.
    InOut,
    /// Decelerate for the first half, accelerate for the second.
    OutIn,
}

impl FromStr for CurveWeight {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "in_out" | "inout" => Ok(Self::InOut),
            "out_in" | "outin" => Ok(Self::OutIn),
            _ => Err(AnimationError::UnknownCurveWeight(s.to_string())),
        }
    }
}

/// Compose an `InOut` curve: `f_in` over the first half, `f_out` over the second.
#[inline]
pub fn in_out(t: f64, f_in: impl Fn(f64) -> f64, f_out: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        f_in(2.0 * t) / 2.0
    } else {
        f_out(2.0 * t - 1.0) / 2.0 + 0.5
    }
}

/// Compose an `OutIn` curve: `f_out` over the first half, `f_in` over the second.
#[inline]
pub fn out_in(t: f64, f_in: impl Fn(f64) -> f64, f_out: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        f_out(2.0 * t) / 2.0
    } else {
        f_in(2.0 * t - 1.0) / 2.0 + 0.5
    }
}

/// Apply `weight` to a family given its canonical in and out shapes.
pub fn weighted(
    weight: CurveWeight,
    t: f64,
    f_in: impl Fn(f64) -> f64,
    f_out: impl Fn(f64) -> f64,
) -> f64 {
    match weight {
        CurveWeight::In => f_in(t),
        CurveWeight::Out => f_out(t),
        CurveWeight::InOut => in_out(t, f_in, f_out),
        CurveWeight::OutIn => out_in(t, f_in, f_out),
    }
}

/// No easing.
#[inline]
pub fn linear(t: f64) -> f64 {
    t
}

// Polynomial families

#[inline]
pub fn in_quad(t: f64) -> f64 {
    t * t
}

#[inline]
pub fn out_quad(t: f64) -> f64 {
    -t * (t - 2.0)
}

#[inline]
pub fn in_cubic(t: f64) -> f64 {
    t * t * t
}

#[inline]
pub fn out_cubic(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t + 1.0
}

#[inline]
pub fn in_quart(t: f64) -> f64 {
    t * t * t * t
}

#[inline]
pub fn out_quart(t: f64) -> f64 {
    let t = t - 1.0;
    1.0 - t * t * t * t
}

#[inline]
pub fn in_quint(t: f64) -> f64 {
    t * t * t * t * t
}

#[inline]
pub fn out_quint(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t * t * t + 1.0
}

// Sinusoidal

pub fn in_sine(t: f64) -> f64 {
    if t == 1.0 {
        return 1.0;
    }
    1.0 - (t * FRAC_PI_2).cos()
}

pub fn out_sine(t: f64) -> f64 {
    if t == 1.0 {
        return 1.0;
    }
    (t * FRAC_PI_2).sin()
}

// Exponential. The endpoints are special-cased: 2^(10(t-1)) never reaches 0.

pub fn in_expo(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    2.0_f64.powf(10.0 * (t - 1.0))
}

pub fn out_expo(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    1.0 - 2.0_f64.powf(-10.0 * t)
}

// Circular

pub fn in_circ(t: f64) -> f64 {
    1.0 - (1.0 - t * t).max(0.0).sqrt()
}

pub fn out_circ(t: f64) -> f64 {
    let t = t - 1.0;
    (1.0 - t * t).max(0.0).sqrt()
}

// Elastic

/// Effective amplitude and phase shift of an elastic curve.
///
/// Amplitudes below 1.0 are raised to 1.0 so the curve still reaches its
/// endpoints.
fn elastic_shape(amplitude: f64, period: f64) -> (f64, f64) {
    if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / (2.0 * PI) * (1.0 / amplitude).asin())
    }
}

/// Exponentially growing sinusoid.
pub fn in_elastic(t: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let (a, s) = elastic_shape(amplitude, period);
    let t = t - 1.0;
    -(a * 2.0_f64.powf(10.0 * t) * ((t - s) * (2.0 * PI) / period).sin())
}

/// Exponentially decaying sinusoid.
pub fn out_elastic(t: f64, amplitude: f64, period: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let (a, s) = elastic_shape(amplitude, period);
    1.0 - a * 2.0_f64.powf(-10.0 * t) * ((t + s) * (2.0 * PI) / period).sin()
}

// Back

/// Overshooting cubic `(s + 1) t^3 - s t^2`.
pub fn in_back(t: f64, overshoot: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    t * t * ((overshoot + 1.0) * t - overshoot)
}

pub fn out_back(t: f64, overshoot: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let t = t - 1.0;
    t * t * ((overshoot + 1.0) * t + overshoot) + 1.0
}

// Bounce

/// Decaying parabolic bounces toward 1.0.
pub fn out_bounce(t: f64, amplitude: f64) -> f64 {
    if t == 1.0 {
        return 1.0;
    }
    if t < 4.0 / 11.0 {
        7.5625 * t * t
    } else if t < 8.0 / 11.0 {
        let t = t - 6.0 / 11.0;
        1.0 - amplitude * (1.0 - (7.5625 * t * t + 0.75))
    } else if t < 10.0 / 11.0 {
        let t = t - 9.0 / 11.0;
        1.0 - amplitude * (1.0 - (7.5625 * t * t + 0.9375))
    } else {
        let t = t - 21.0 / 22.0;
        1.0 - amplitude * (1.0 - (7.5625 * t * t + 0.984375))
    }
}

pub fn in_bounce(t: f64, amplitude: f64) -> f64 {
    1.0 - out_bounce(1.0 - t, amplitude)
}
