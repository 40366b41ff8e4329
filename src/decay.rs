//! Relation and emotion decay stages (§4.4, part of §4.5).
//!
//! Both stages write only the row(s) owned by their agent index, so they
//! parallelise over agents with no cross-row coordination.

use rayon::prelude::*;

use crate::state::{CHANNEL_RESPONSIVENESS, NUM_AXES, NUM_CHANNELS};
use crate::EngineState;

/// Moves `step` toward zero, clamping so the result never crosses zero.
fn shrink_toward_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        0.0
    }
}

/// Applies per-day relation decay (§4.4).
///
/// For each agent `i`, `step = decay_rate(i) * sensitivity(i)`. Channels
/// 0-2 (utility, affinity, trust) shrink at half `step` from above zero and
/// full `step` from below; channel 3 (responsiveness) shrinks at `1.5 *
/// step` from above and grows at `step` from below. No clamp to `+-10` is
/// required: decay is monotone toward zero and never diverges.
pub fn apply_relation_decay(state: &mut EngineState) {
    let n = state.num_agents();
    let steps: Vec<f32> = (0..n)
        .map(|i| state.archetype_config_for(i).decay_rate * state.sensitivity(i))
        .collect();

    state
        .relations
        .par_chunks_mut(n * NUM_CHANNELS)
        .enumerate()
        .for_each(|(i, row)| {
            let step = steps[i];
            if step == 0.0 {
                return;
            }
            for j in 0..n {
                if j == i {
                    continue;
                }
                let base = j * NUM_CHANNELS;
                for k in 0..3 {
                    let v = row[base + k];
                    row[base + k] = if v > 0.0 {
                        shrink_toward_zero(v, step * 0.5)
                    } else {
                        shrink_toward_zero(v, step)
                    };
                }
                let r = row[base + CHANNEL_RESPONSIVENESS];
                row[base + CHANNEL_RESPONSIVENESS] = if r > 0.0 {
                    shrink_toward_zero(r, step * 1.5)
                } else {
                    shrink_toward_zero(r, step)
                };
            }
        });
}

/// Applies per-day emotion decay (§4.5).
///
/// For each agent `i`, `step = emotion_decay(i) * sensitivity(i)`; every
/// axis moves toward zero by `step`, floored/ceiled at zero.
pub fn apply_emotion_decay(state: &mut EngineState) {
    let n = state.num_agents();
    let steps: Vec<f32> = (0..n)
        .map(|i| state.archetype_config_for(i).emotion_decay * state.sensitivity(i))
        .collect();

    state
        .emotions
        .par_chunks_mut(NUM_AXES)
        .enumerate()
        .for_each(|(i, row)| {
            let step = steps[i];
            if step == 0.0 {
                return;
            }
            for v in row.iter_mut() {
                *v = shrink_toward_zero(*v, step);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeConfig;

    fn configured_state(n: usize, decay_rate: f32, emotion_decay: f32) -> EngineState {
        let mut state = EngineState::new(n);
        state.ensure_archetype_slot(0);
        state.archetype_configs[0] = ArchetypeConfig {
            decay_rate,
            emotion_decay,
            ..ArchetypeConfig::inert()
        };
        state
    }

    #[test]
    fn relation_decay_shrinks_positive_utility_affinity_trust_at_half_step() {
        let mut state = configured_state(2, 1.0, 0.0);
        let base = state.relation_base(0, 1);
        state.relations[base] = 1.0; // utility
        apply_relation_decay(&mut state);
        assert!((state.relation_channel(0, 1, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn relation_decay_shrinks_negative_utility_affinity_trust_at_full_step() {
        let mut state = configured_state(2, 1.0, 0.0);
        let base = state.relation_base(0, 1);
        state.relations[base + 1] = -1.0; // affinity
        apply_relation_decay(&mut state);
        assert!((state.relation_channel(0, 1, 1) - (-0.0)).abs() < 1e-6);
    }

    #[test]
    fn relation_decay_does_not_overshoot_zero() {
        let mut state = configured_state(2, 5.0, 0.0);
        let base = state.relation_base(0, 1);
        state.relations[base] = 0.3;
        apply_relation_decay(&mut state);
        assert_eq!(state.relation_channel(0, 1, 0), 0.0);
    }

    #[test]
    fn responsiveness_decays_faster_from_above_than_below() {
        let mut pos = configured_state(2, 1.0, 0.0);
        let base = pos.relation_base(0, 1);
        pos.relations[base + CHANNEL_RESPONSIVENESS] = 2.0;
        apply_relation_decay(&mut pos);
        assert!((pos.relation_channel(0, 1, CHANNEL_RESPONSIVENESS) - 0.5).abs() < 1e-6);

        let mut neg = configured_state(2, 1.0, 0.0);
        let base = neg.relation_base(0, 1);
        neg.relations[base + CHANNEL_RESPONSIVENESS] = -2.0;
        apply_relation_decay(&mut neg);
        assert!((neg.relation_channel(0, 1, CHANNEL_RESPONSIVENESS) - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn relation_decay_never_touches_diagonal() {
        let mut state = configured_state(3, 2.0, 0.0);
        let diag = state.relation_base(1, 1);
        state.relations[diag] = 7.0;
        apply_relation_decay(&mut state);
        assert_eq!(state.relations[diag], 7.0);
    }

    #[test]
    fn zero_decay_rate_is_a_no_op() {
        let mut state = configured_state(2, 0.0, 0.0);
        let base = state.relation_base(0, 1);
        state.relations[base] = 4.0;
        apply_relation_decay(&mut state);
        assert_eq!(state.relation_channel(0, 1, 0), 4.0);
    }

    #[test]
    fn decay_monotonicity_converges_to_zero() {
        let mut state = configured_state(2, 0.5, 0.0);
        let base = state.relation_base(0, 1);
        state.relations[base + 1] = 8.0;

        let mut prev = 8.0;
        for _ in 0..200 {
            apply_relation_decay(&mut state);
            let cur = state.relation_channel(0, 1, 1);
            assert!(cur <= prev);
            prev = cur;
        }
        assert!(prev.abs() < 1e-3);
    }

    #[test]
    fn emotion_decay_shrinks_all_axes_toward_zero() {
        let mut state = configured_state(1, 0.0, 0.4);
        state.emotions[0] = 1.0;
        state.emotions[3] = -1.0;
        apply_emotion_decay(&mut state);
        assert!((state.emotion(0, 0) - 0.6).abs() < 1e-6);
        assert!((state.emotion(0, 3) - (-0.6)).abs() < 1e-6);
    }

    #[test]
    fn emotion_decay_does_not_overshoot_zero() {
        let mut state = configured_state(1, 0.0, 5.0);
        state.emotions[0] = 0.2;
        apply_emotion_decay(&mut state);
        assert_eq!(state.emotion(0, 0), 0.0);
    }

    #[test]
    fn clamp_idempotence_reapplying_zero_decay_keeps_values_in_bounds() {
        let mut state = configured_state(2, 0.0, 0.0);
        let base = state.relation_base(0, 1);
        state.relations[base] = 10.0;
        apply_relation_decay(&mut state);
        apply_relation_decay(&mut state);
        assert!(state.relation_channel(0, 1, 0) <= 10.0);
        assert!(state.relation_channel(0, 1, 0) >= -10.0);
    }
}
