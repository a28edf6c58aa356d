//! Curve evaluation.
//!
//! `AnimationCurve` holds a curve description (family, weight, amplitude, overshoot,
//! period and clip flag) and dispatches progress values to the matching
//! function in [`crate::easing`]. Caller-defined curves plug in through the
//! [`CustomCurve`] strategy; [`CubicBezier`] is the stock implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::easing::{self, CurveWeight, DEFAULT_OVERSHOOT, IN_OUT_OVERSHOOT_SCALE};
use crate::error::AnimationError;

/// Easing family selected by an `AnimationCurve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveFunction {
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    Sine,
    Exponential,
    Circular,
    Elastic,
    Back,
    Bounce,
    /// Evaluated by the curve's `CustomCurve` strategy.
    Custom,
}

impl FromStr for CurveFunction {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "quadratic" | "quad" => Ok(Self::Quadratic),
            "cubic" => Ok(Self::Cubic),
            "quartic" | "quart" => Ok(Self::Quartic),
            "quintic" | "quint" => Ok(Self::Quintic),
            "sine" | "sinusoidal" => Ok(Self::Sine),
            "exponential" | "expo" => Ok(Self::Exponential),
            "circular" | "circ" => Ok(Self::Circular),
            "elastic" => Ok(Self::Elastic),
            "back" => Ok(Self::Back),
            "bounce" => Ok(Self::Bounce),
            "custom" => Ok(Self::Custom),
            _ => Err(AnimationError::UnknownCurveFunction(s.to_string())),
        }
    }
}

/// A caller-defined curve.
///
/// Receives `(progress, amplitude, overshoot, weight)` and returns the eased
/// ratio. Any `Fn` with that signature is a `CustomCurve`.
pub trait CustomCurve: Send + Sync {
    fn evaluate(&self, progress: f64, amplitude: f64, overshoot: f64, weight: CurveWeight) -> f64;
}

impl<F> CustomCurve for F
where
    F: Fn(f64, f64, f64, CurveWeight) -> f64 + Send + Sync,
{
    fn evaluate(&self, progress: f64, amplitude: f64, overshoot: f64, weight: CurveWeight) -> f64 {
        self(progress, amplitude, overshoot, weight)
    }
}

/// Cubic bezier timing curve through (0, 0), (x1, y1), (x2, y2), (1, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// # Panics
    /// Panics if x1 or x2 is outside [0, 1]; x must stay monotonic.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self { x1, y1, x2, y2 }
    }

    /// Degree-elevate a quadratic bezier with a single control point.
    pub fn quadratic(x1: f64, y1: f64) -> Self {
        Self::new(
            2.0 / 3.0 * x1,
            2.0 / 3.0 * y1,
            1.0 / 3.0 + 2.0 / 3.0 * x1,
            1.0 / 3.0 + 2.0 / 3.0 * y1,
        )
    }

    /// The y coordinate at the point whose x coordinate is `progress`.
    pub fn solve(&self, progress: f64) -> f64 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        let t = self.solve_x(progress);
        bezier_axis(self.y1, self.y2, t)
    }

    /// Newton-Raphson search for the curve parameter at `target_x`.
    fn solve_x(&self, target_x: f64) -> f64 {
        let mut t = target_x;
        for _ in 0..8 {
            let x = bezier_axis(self.x1, self.x2, t) - target_x;
            if x.abs() < 1e-6 {
                break;
            }
            let dx = bezier_axis_derivative(self.x1, self.x2, t);
            if dx.abs() < 1e-6 {
                break;
            }
            t = (t - x / dx).clamp(0.0, 1.0);
        }
        t
    }
}

impl CustomCurve for CubicBezier {
    fn evaluate(
        &self,
        progress: f64,
        _amplitude: f64,
        _overshoot: f64,
        _weight: CurveWeight,
    ) -> f64 {
        self.solve(progress)
    }
}

/// One axis of a bezier with endpoints 0 and 1.
fn bezier_axis(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_axis_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// A configurable timing curve.
///
/// Changes take effect on the next call to [`perform`](Self::perform).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationCurve {
    function: CurveFunction,
    weight: CurveWeight,
    amplitude: f64,
    overshoot: f64,
    period: f64,
    clip: bool,
    #[serde(skip)]
    custom: Option<Arc<dyn CustomCurve>>,
}

impl Default for AnimationCurve {
    fn default() -> Self {
        Self {
            function: CurveFunction::Linear,
            weight: CurveWeight::In,
            amplitude: 1.0,
            overshoot: DEFAULT_OVERSHOOT,
            period: 1.0,
            clip: false,
            custom: None,
        }
    }
}

impl fmt::Debug for AnimationCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationCurve")
            .field("function", &self.function)
            .field("weight", &self.weight)
            .field("amplitude", &self.amplitude)
            .field("overshoot", &self.overshoot)
            .field("period", &self.period)
            .field("clip", &self.clip)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl AnimationCurve {
    /// A curve of the given family and weight with default parameters.
    pub fn new(function: CurveFunction, weight: CurveWeight) -> Self {
        Self {
            function,
            weight,
            ..Self::default()
        }
    }

    pub fn linear() -> Self {
        Self::default()
    }

    /// A curve evaluated by `curve`.
    pub fn custom(curve: impl CustomCurve + 'static) -> Self {
        let mut this = Self::default();
        this.set_custom(curve);
        this
    }

    /// Remap `progress` through the curve.
    ///
    /// # Panics
    /// Panics if `progress` is outside [0, 1].
    pub fn perform(&self, progress: f64) -> f64 {
        assert!(
            (0.0..=1.0).contains(&progress),
            "curve progress {progress} is outside 0.0..=1.0"
        );
        let value = self.evaluate(progress);
        if self.clip {
            value.clamp(0.0, 1.0)
        } else {
            value
        }
    }

    fn evaluate(&self, t: f64) -> f64 {
        let weight = self.weight;
        match self.function {
            CurveFunction::Linear => easing::linear(t),
            CurveFunction::Quadratic => {
                easing::weighted(weight, t, easing::in_quad, easing::out_quad)
            }
            CurveFunction::Cubic => {
                easing::weighted(weight, t, easing::in_cubic, easing::out_cubic)
            }
            CurveFunction::Quartic => {
                easing::weighted(weight, t, easing::in_quart, easing::out_quart)
            }
            CurveFunction::Quintic => {
                easing::weighted(weight, t, easing::in_quint, easing::out_quint)
            }
            CurveFunction::Sine => easing::weighted(weight, t, easing::in_sine, easing::out_sine),
            CurveFunction::Exponential => {
                easing::weighted(weight, t, easing::in_expo, easing::out_expo)
            }
            CurveFunction::Circular => {
                easing::weighted(weight, t, easing::in_circ, easing::out_circ)
            }
            CurveFunction::Elastic => {
                let (a, p) = (self.amplitude, self.period);
                easing::weighted(
                    weight,
                    t,
                    |t| easing::in_elastic(t, a, p),
                    |t| easing::out_elastic(t, a, p),
                )
            }
            CurveFunction::Back => {
                let s = match weight {
                    CurveWeight::In | CurveWeight::Out => self.overshoot,
                    CurveWeight::InOut | CurveWeight::OutIn => {
                        self.overshoot * IN_OUT_OVERSHOOT_SCALE
                    }
                };
                easing::weighted(
                    weight,
                    t,
                    |t| easing::in_back(t, s),
                    |t| easing::out_back(t, s),
                )
            }
            CurveFunction::Bounce => {
                let a = self.amplitude;
                easing::weighted(
                    weight,
                    t,
                    |t| easing::in_bounce(t, a),
                    |t| easing::out_bounce(t, a),
                )
            }
            CurveFunction::Custom => match &self.custom {
                Some(curve) => curve.evaluate(t, self.amplitude, self.overshoot, weight),
                None => easing::linear(t),
            },
        }
    }

    pub fn function(&self) -> CurveFunction {
        self.function
    }

    /// Select a family. Selecting `Custom` without a strategy evaluates linearly.
    pub fn set_function(&mut self, function: CurveFunction) {
        self.function = function;
    }

    pub fn weight(&self) -> CurveWeight {
        self.weight
    }

    pub fn set_weight(&mut self, weight: CurveWeight) {
        self.weight = weight;
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Amplitude of the elastic and bounce families.
    ///
    /// # Panics
    /// Panics if `amplitude` is negative.
    pub fn set_amplitude(&mut self, amplitude: f64) {
        assert!(amplitude >= 0.0, "amplitude must be >= 0, got {amplitude}");
        self.amplitude = amplitude;
    }

    pub fn overshoot(&self) -> f64 {
        self.overshoot
    }

    /// Overshoot of the back family.
    pub fn set_overshoot(&mut self, overshoot: f64) {
        self.overshoot = overshoot;
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Oscillation period of the elastic family.
    ///
    /// # Panics
    /// Panics if `period` is not positive.
    pub fn set_period(&mut self, period: f64) {
        assert!(period > 0.0, "period must be > 0, got {period}");
        self.period = period;
    }

    pub fn clip(&self) -> bool {
        self.clip
    }

    /// Clamp results into [0, 1].
    pub fn set_clip(&mut self, clip: bool) {
        self.clip = clip;
    }

    /// Install a caller-defined curve and select the `Custom` family.
    pub fn set_custom(&mut self, curve: impl CustomCurve + 'static) {
        self.custom = Some(Arc::new(curve));
        self.function = CurveFunction::Custom;
    }

    /// Use a cubic bezier through the two control points.
    pub fn set_bezier(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.set_custom(CubicBezier::new(x1, y1, x2, y2));
    }

    /// Use a quadratic bezier through one control point.
    pub fn set_bezier_quadratic(&mut self, x1: f64, y1: f64) {
        self.set_custom(CubicBezier::quadratic(x1, y1));
    }
}

static_assertions::assert_impl_all!(AnimationCurve: Send, Sync);
static_assertions::assert_impl_all!(CubicBezier: Send, Sync);
