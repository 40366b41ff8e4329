//! Scalar primitives: emotion/relation clamping and the scoring transforms.
//!
//! Every write path into the emotion and relation tensors ends with a clamp
//! from this module. The four [`ScoreTransform`] variants are the closed set
//! of nonlinear reshapings an archetype can apply to a raw relation value
//! before it contributes to a priority score.

use serde::{Deserialize, Serialize};

/// Lower/upper bound for any emotion axis value.
pub const EMOTION_BOUND: f32 = 3.0;

/// Lower/upper bound for any relation channel value.
pub const RELATION_BOUND: f32 = 10.0;

/// Clamps an emotion axis value to `[-3, 3]`.
#[must_use]
pub fn clamp_emotion(x: f32) -> f32 {
    x.max(-EMOTION_BOUND).min(EMOTION_BOUND)
}

/// Clamps a relation channel value to `[-10, 10]`.
#[must_use]
pub fn clamp_relation(x: f32) -> f32 {
    x.max(-RELATION_BOUND).min(RELATION_BOUND)
}

/// Moves `x` toward zero by `step`, never overshooting past zero.
///
/// Used both by the decay stages (§4.4) and by the `influence_emotions`
/// emotion commit (§4.6), which calls this with a fixed `step` of `0.05`.
#[must_use]
pub fn nudge_toward_zero(x: f32, step: f32) -> f32 {
    if x > 0.0 {
        (x - step).max(0.0)
    } else if x < 0.0 {
        (x + step).min(0.0)
    } else {
        0.0
    }
}

/// A scoring-transform tag, one of the closed set an archetype selects from.
///
/// Modeled as a tagged variant rather than a dispatched-on-string function:
/// the tag is fixed at archetype configuration time and never changes
/// thereafter (see the design notes on archetype transform selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTransform {
    /// Identity: `v`.
    Linear,
    /// Signed log compression: `sign(v) * ln(|v| + 1)`.
    Log,
    /// Exponential growth: `exp(v / 5)`.
    Exp,
    /// Logistic reshaping into `(0, 10)`: `10 / (1 + exp(-v))`.
    Sigmoid,
    /// Bounded oscillation: `5 * sin(v)`.
    Periodic,
}

impl ScoreTransform {
    /// Applies this transform to a raw relation value.
    #[must_use]
    pub fn apply(self, v: f32) -> f32 {
        match self {
            ScoreTransform::Linear => v,
            ScoreTransform::Log => v.signum() * (v.abs() + 1.0).ln(),
            ScoreTransform::Exp => (v / 5.0).exp(),
            ScoreTransform::Sigmoid => 10.0 / (1.0 + (-v).exp()),
            ScoreTransform::Periodic => 5.0 * v.sin(),
        }
    }
}

impl std::fmt::Display for ScoreTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScoreTransform::Linear => "linear",
            ScoreTransform::Log => "log",
            ScoreTransform::Exp => "exp",
            ScoreTransform::Sigmoid => "sigmoid",
            ScoreTransform::Periodic => "periodic",
        };
        write!(f, "{name}")
    }
}
