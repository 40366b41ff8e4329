//! Archetype configuration: the per-archetype behavioural parameter bundle.

use serde::{Deserialize, Serialize};

use crate::state::NUM_AXES;
use crate::transform::ScoreTransform;

/// A named bundle of behavioural parameters assigned to individual agents.
///
/// Archetypes are configured once (via [`crate::Engine::set_archetype_config`]
/// or loaded from a [`crate::config::Config`]) and never mutated by the
/// daily-cycle pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    /// Base refusal scaling factor, expected in `[0, 1]`.
    pub refusal_chance: f32,
    /// Per-day relation decay step, expected `>= 0`.
    pub decay_rate: f32,
    /// Softmax temperature for target choice, expected `> 0`.
    pub temperature: f32,
    /// Per-day emotion decay step, expected `>= 0`.
    pub emotion_decay: f32,
    /// Reaction-to-relations sensitivity, one coefficient per emotion axis.
    pub emotion_coefficients: [f32; NUM_AXES],
    /// Scoring transform applied to the affinity channel.
    pub scoring_affinity: ScoreTransform,
    /// Scoring transform applied to the utility channel.
    pub scoring_utility: ScoreTransform,
    /// Scoring transform applied to the trust channel.
    pub scoring_trust: ScoreTransform,
    /// Scoring transform applied to the responsiveness channel.
    pub scoring_responsiveness: ScoreTransform,
}

impl ArchetypeConfig {
    /// An archetype with every parameter zeroed and linear transforms.
    ///
    /// Useful as a baseline for tests and for agents that should neither
    /// decay nor react (archetype index 0 in several test scenarios).
    #[must_use]
    pub fn inert() -> Self {
        ArchetypeConfig {
            refusal_chance: 0.0,
            decay_rate: 0.0,
            temperature: 1.0,
            emotion_decay: 0.0,
            emotion_coefficients: [0.0; NUM_AXES],
            scoring_affinity: ScoreTransform::Linear,
            scoring_utility: ScoreTransform::Linear,
            scoring_trust: ScoreTransform::Linear,
            scoring_responsiveness: ScoreTransform::Linear,
        }
    }

    /// Looks up the transform tag for a given relation channel index
    /// (0=utility, 1=affinity, 2=trust, 3=responsiveness).
    #[must_use]
    pub(crate) fn transform_for_channel(&self, channel: usize) -> ScoreTransform {
        match channel {
            0 => self.scoring_utility,
            1 => self.scoring_affinity,
            2 => self.scoring_trust,
            3 => self.scoring_responsiveness,
            other => panic!("relation channel index out of range: {other}"),
        }
    }
}

impl Default for ArchetypeConfig {
    fn default() -> Self {
        Self::inert()
    }
}
