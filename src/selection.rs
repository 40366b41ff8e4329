//! Target selection (§4.7-§4.9): candidate pooling, priority scoring,
//! softmax sampling, and the refusal test.

use rand::Rng;

use crate::classify::{classify, TargetClass};
use crate::state::{CHANNEL_AFFINITY, CHANNEL_RESPONSIVENESS, CHANNEL_TRUST, CHANNEL_UTILITY};
use crate::EngineState;

/// Chooses an interaction target for initiator `i` (§4.7).
///
/// Builds the mandatory/optional candidate pools from `i`'s perspective,
/// picks the effective pool (mandatory if non-empty, else optional), and
/// samples one index by softmax over [`calculate_priority_score`] using
/// `rng`. Returns `None` if both pools are empty.
pub fn choose_target<R: Rng + ?Sized>(
    state: &EngineState,
    rng: &mut R,
    i: usize,
) -> Option<usize> {
    let n = state.num_agents();
    let mut mandatory = Vec::new();
    let mut optional = Vec::new();

    for j in 0..n {
        if j == i {
            continue;
        }
        let (u, a, t, r) = state.relation(i, j);
        match classify(u, a, t, r) {
            TargetClass::Avoid => {}
            TargetClass::Mandatory => mandatory.push(j),
            TargetClass::Optional => optional.push(j),
        }
    }

    let pool = if !mandatory.is_empty() {
        mandatory
    } else {
        optional
    };

    if pool.is_empty() {
        return None;
    }
    if pool.len() == 1 {
        return Some(pool[0]);
    }

    let temperature = state.archetype_config_for(i).temperature.max(0.01);
    let scores: Vec<f32> = pool.iter().map(|&j| calculate_priority_score(state, i, j)).collect();
    let max_score = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    let weights: Vec<f32> = scores
        .iter()
        .map(|&s| ((s - max_score) / temperature).exp())
        .collect();
    let total: f32 = weights.iter().sum();

    let draw = rng.gen_range(0.0..total);
    let mut acc = 0.0f32;
    for (idx, &w) in weights.iter().enumerate() {
        acc += w;
        if draw < acc {
            return Some(pool[idx]);
        }
    }
    pool.last().copied()
}

/// Computes the priority score of target `j` from initiator `i` (§4.8).
#[must_use]
pub fn calculate_priority_score(state: &EngineState, i: usize, j: usize) -> f32 {
    let (u, a, t, r) = state.relation(i, j);
    let config = state.archetype_config_for(i);

    let t_a = config.transform_for_channel(CHANNEL_AFFINITY).apply(a);
    let t_u = config.transform_for_channel(CHANNEL_UTILITY).apply(u);
    let t_t = config.transform_for_channel(CHANNEL_TRUST).apply(t);
    let t_r = config.transform_for_channel(CHANNEL_RESPONSIVENESS).apply(r);

    let mu = if r < 0.0 { 1.5 } else { 1.0 };
    t_a + t_u + 1.5 * t_t + mu * t_r
}

/// Tests whether target `j` refuses an interaction initiated by `i` (§4.9).
pub fn should_refuse<R: Rng + ?Sized>(state: &EngineState, rng: &mut R, i: usize, j: usize) -> bool {
    const T_REFUSE: f32 = 2.0;
    let r_prime = state.relation_channel(j, i, CHANNEL_RESPONSIVENESS);
    let p0 = 1.0 / (1.0 + (r_prime / T_REFUSE).exp());
    let f = state.archetype_config_for(j).refusal_chance / 0.3;
    let p = (p0 * f).min(0.95);
    let draw: f32 = rng.gen_range(0.0..1.0);
    draw < p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn choose_target_returns_none_when_every_candidate_is_avoided() {
        let mut state = EngineState::new(3);
        for j in [1, 2] {
            let base = state.relation_base(0, j);
            state.relations[base + CHANNEL_RESPONSIVENESS] = -6.0;
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_target(&state, &mut rng, 0), None);
    }

    #[test]
    fn choose_target_prefers_mandatory_pool_over_optional() {
        let mut state = EngineState::new(3);
        let base1 = state.relation_base(0, 1);
        state.relations[base1] = 5.0;
        state.relations[base1 + 1] = 5.0;
        state.relations[base1 + 2] = 5.0;
        // agent 2 only optional (affinity just nonnegative)
        let base2 = state.relation_base(0, 2);
        state.relations[base2 + 1] = 0.0;
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(choose_target(&state, &mut rng, 0), Some(1));
    }

    #[test]
    fn choose_target_single_candidate_returned_directly() {
        let mut state = EngineState::new(2);
        let base = state.relation_base(0, 1);
        state.relations[base + 1] = 1.0;
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(choose_target(&state, &mut rng, 0), Some(1));
    }

    #[test]
    fn softmax_tie_is_roughly_uniform_over_many_draws() {
        let mut state = EngineState::new(3);
        for j in [1, 2] {
            let base = state.relation_base(0, j);
            state.relations[base] = 5.0;
            state.relations[base + 1] = 5.0;
            state.relations[base + 2] = 5.0;
        }
        let mut rng = StdRng::seed_from_u64(42);
        let mut count1 = 0;
        let trials = 10_000;
        for _ in 0..trials {
            if choose_target(&state, &mut rng, 0) == Some(1) {
                count1 += 1;
            }
        }
        let fraction = count1 as f32 / trials as f32;
        assert!((fraction - 0.5).abs() < 0.02, "fraction={fraction}");
    }

    #[test]
    fn priority_score_boosts_negative_responsiveness() {
        let mut state = EngineState::new(2);
        let base = state.relation_base(0, 1);
        state.relations[base + CHANNEL_RESPONSIVENESS] = -2.0;
        let neg_score = calculate_priority_score(&state, 0, 1);

        let mut pos_state = EngineState::new(2);
        let base2 = pos_state.relation_base(0, 1);
        pos_state.relations[base2 + CHANNEL_RESPONSIVENESS] = 2.0;
        let pos_score = calculate_priority_score(&pos_state, 0, 1);

        // Same magnitude of responsiveness but the negative case is scaled
        // by mu=1.5 instead of 1.0, so it contributes a larger magnitude.
        assert!(neg_score.abs() > pos_score.abs());
    }

    #[test]
    fn priority_score_uses_archetype_transforms() {
        let mut state = EngineState::new(2);
        state.ensure_archetype_slot(0);
        state.archetype_configs[0] = ArchetypeConfig {
            scoring_utility: crate::transform::ScoreTransform::Exp,
            ..ArchetypeConfig::inert()
        };
        let base = state.relation_base(0, 1);
        state.relations[base + CHANNEL_UTILITY] = 0.0;
        let score = calculate_priority_score(&state, 0, 1);
        // exp(0/5) = 1.0 contributes from utility; everything else is 0.
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn refusal_saturates_near_ninety_five_percent() {
        let mut state = EngineState::new(2);
        state.ensure_archetype_slot(0);
        state.archetype_configs[0] = ArchetypeConfig {
            refusal_chance: 0.3,
            ..ArchetypeConfig::inert()
        };
        let base = state.relation_base(1, 0);
        state.relations[base + CHANNEL_RESPONSIVENESS] = -10.0;

        let mut rng = StdRng::seed_from_u64(7);
        let trials = 10_000;
        let mut refusals = 0;
        for _ in 0..trials {
            if should_refuse(&state, &mut rng, 0, 1) {
                refusals += 1;
            }
        }
        let rate = refusals as f32 / trials as f32;
        assert!((rate - 0.95).abs() < 0.01, "rate={rate}");
    }

    #[test]
    fn refusal_chance_zero_never_refuses() {
        let state = EngineState::new(2);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(!should_refuse(&state, &mut rng, 0, 1));
        }
    }
}
