//! Animated value types.
//!
//! This module defines the closed set of values an animation can drive:
//! - `TypedValue`: tagged union over the numeric and discrete value kinds
//! - `ValueTag`: the bare discriminant, used to enforce that all keyframes of
//!   one animation agree on what they animate

use serde::{Deserialize, Serialize};

/// Discriminant of a `TypedValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTag {
    Int,
    Int64,
    Float,
    Opaque,
}

impl ValueTag {
    /// Whether values with this tag blend arithmetically.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Opaque)
    }
}

/// A value anchored at a keyframe or produced by an animation.
///
/// Numeric variants interpolate with `v1 + (v2 - v1) * t`. `Opaque` values
/// never blend; an animation snaps between its endpoint values instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    /// 32-bit integer (pixel offsets, alpha bytes, ...).
    Int(i32),
    /// 64-bit integer.
    Int64(i64),
    /// Floating point value.
    Float(f64),
    /// Discrete payload that is switched, not blended.
    Opaque(Vec<u8>),
}

impl Default for TypedValue {
    fn default() -> Self {
        Self::Float(0.0)
    }
}

impl TypedValue {
    /// Create an opaque value from raw bytes or a string.
    pub fn opaque(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Opaque(bytes.into())
    }

    /// The tag of this value.
    pub fn tag(&self) -> ValueTag {
        match self {
            Self::Int(_) => ValueTag::Int,
            Self::Int64(_) => ValueTag::Int64,
            Self::Float(_) => ValueTag::Float,
            Self::Opaque(_) => ValueTag::Opaque,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub fn is_int64(&self) -> bool {
        matches!(self, Self::Int64(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }

    /// Whether this value blends arithmetically.
    pub fn is_numeric(&self) -> bool {
        self.tag().is_numeric()
    }

    /// Whether `other` may follow this value in the same animation.
    pub fn has_same_tag_as(&self, other: &TypedValue) -> bool {
        self.tag() == other.tag()
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(f64::from(*v)),
            Self::Int64(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(*v)),
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Opaque(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        Self::Opaque(v.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Opaque(v)
    }
}

static_assertions::assert_impl_all!(TypedValue: Send, Sync);
