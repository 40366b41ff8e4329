//! Group emotional influence (§4.6): the two-phase N² update.
//!
//! The read phase is parallel over source agent `i` and accumulates into a
//! deferred per-source contribution (emotion deltas plus which targets get
//! a responsiveness bump). Neither the emotion tensor nor the relation
//! tensor is mutated until the sequential commit phase runs, which is what
//! keeps results identical regardless of how many threads the read phase
//! used: every contribution is private to its owning `i`, so the
//! per-source buffers can be reduced in any order.

use rayon::prelude::*;

use crate::classify::classify;
use crate::state::{CHANNEL_AFFINITY, CHANNEL_RESPONSIVENESS, CHANNEL_TRUST, CHANNEL_UTILITY};
use crate::state::{NUM_AXES, NUM_CHANNELS};
use crate::transform::{clamp_emotion, clamp_relation, nudge_toward_zero};
use crate::EngineState;

/// A source agent's deferred contribution from the read phase.
struct Contribution {
    /// `(target, axis, delta)` triples to fold into the emotion buffer.
    emotion_deltas: Vec<(usize, usize, f32)>,
    /// Targets that receive the fixed `+0.05` responsiveness bump in both
    /// directions with this source.
    responsiveness_bumps: Vec<usize>,
}

/// Runs the group emotional influence stage (§4.6) for one day.
///
/// For each source agent `i`, finds its dominant emotion axis and scans
/// every non-avoiding target `j` (classified from `j`'s perspective toward
/// `i`), nudging `j`'s emotions toward `i`'s profile and deferring `j`'s
/// relation update back toward `i`. All deltas from the read phase are
/// committed sequentially afterward.
pub fn influence_emotions(state: &mut EngineState) {
    let n = state.num_agents();
    if n < 2 {
        return;
    }

    let contributions: Vec<Contribution> = (0..n)
        .into_par_iter()
        .map(|i| read_phase_for_source(state, i, n))
        .collect();

    commit(state, n, contributions);
}

fn read_phase_for_source(state: &EngineState, i: usize, n: usize) -> Contribution {
    let mut contribution = Contribution {
        emotion_deltas: Vec::new(),
        responsiveness_bumps: Vec::new(),
    };

    let mut emotions_i = [0.0f32; NUM_AXES];
    for (a, slot) in emotions_i.iter_mut().enumerate() {
        *slot = state.emotion(i, a);
    }

    let mut primary_axis = None;
    let mut max_val = 0.0f32;
    let mut total = 0.0f32;
    for (a, &val) in emotions_i.iter().enumerate() {
        let abs_val = val.abs();
        total += abs_val;
        if abs_val > max_val.abs() {
            max_val = val;
            primary_axis = Some(a);
        }
    }

    let primary_axis = match primary_axis {
        Some(a) if max_val != 0.0 && total != 0.0 => a,
        _ => return contribution,
    };

    let w_primary = max_val.abs() / total;
    let w_other = (1.0 - w_primary) / (NUM_AXES as f32 - 1.0);

    for j in 0..n {
        if j == i {
            continue;
        }

        let (u_ji, a_ji, t_ji, r_ji) = state.relation(j, i);
        if classify(u_ji, a_ji, t_ji, r_ji).is_avoid() {
            continue;
        }

        let (u_ij, a_ij, t_ij, _r_ij) = state.relation(i, j);
        let effect = (a_ij + t_ij + u_ij) / 3.0;
        let common = effect.abs() * state.sensitivity(j) * 0.01;

        for a in 0..NUM_AXES {
            let weight = if a == primary_axis { w_primary } else { w_other };
            let delta = emotions_i[a] * common * weight;
            contribution.emotion_deltas.push((j, a, delta));
        }

        contribution.responsiveness_bumps.push(j);
    }

    contribution
}

fn commit(state: &mut EngineState, n: usize, contributions: Vec<Contribution>) {
    let mut emotion_delta = vec![0.0f32; n * NUM_AXES];
    let mut relation_delta = vec![0.0f32; n * n * NUM_CHANNELS];
    let mut responsiveness_pairs: Vec<(usize, usize)> = Vec::new();

    for (i, contribution) in contributions.into_iter().enumerate() {
        for (j, a, delta) in contribution.emotion_deltas {
            emotion_delta[j * NUM_AXES + a] += delta;

            for channel in [CHANNEL_UTILITY, CHANNEL_AFFINITY, CHANNEL_TRUST] {
                let w = state.emission_weight(i, a, channel);
                if w != 0.0 {
                    let idx = (j * n + i) * NUM_CHANNELS + channel;
                    relation_delta[idx] += delta * w * state.sensitivity(j);
                }
            }
        }
        for j in contribution.responsiveness_bumps {
            responsiveness_pairs.push((i, j));
        }
    }

    for (idx, delta) in relation_delta.iter().enumerate() {
        if *delta != 0.0 {
            state.relations[idx] = clamp_relation(state.relations[idx] + delta);
        }
    }

    for (i, j) in responsiveness_pairs {
        let idx_ij = state.relation_base(i, j) + CHANNEL_RESPONSIVENESS;
        let idx_ji = state.relation_base(j, i) + CHANNEL_RESPONSIVENESS;
        state.relations[idx_ij] = clamp_relation(state.relations[idx_ij] + 0.05);
        state.relations[idx_ji] = clamp_relation(state.relations[idx_ji] + 0.05);
    }

    for k in 0..state.emotions.len() {
        let combined = state.emotions[k] + emotion_delta[k];
        state.emotions[k] = clamp_emotion(nudge_toward_zero(combined, 0.05));
    }
}
