//! Reaction stages (§4.5): relations shaping emotions, and emotions shaping
//! relations. Each stage writes only rows owned by its agent index.

use rayon::prelude::*;

use crate::state::{CHANNEL_AFFINITY, CHANNEL_TRUST, CHANNEL_UTILITY, NUM_AXES, NUM_CHANNELS};
use crate::transform::clamp_emotion;
use crate::EngineState;

/// Reacts each agent's emotion to the mean of its outgoing relations (§4.5).
///
/// For agent `i`, `effect` is the mean over `j != i` of
/// `(utility + affinity + trust) / 3`. Each axis gains
/// `effect * emotion_coefficients[a] * 0.05 * sensitivity(i)`, then clamps.
pub fn react_to_relations(state: &mut EngineState) {
    let n = state.num_agents();
    if n < 2 {
        return;
    }

    let coefficients: Vec<([f32; NUM_AXES], f32)> = (0..n)
        .map(|i| {
            (
                state.archetype_config_for(i).emotion_coefficients,
                state.sensitivity(i),
            )
        })
        .collect();

    let relations = &state.relations;
    let effects: Vec<f32> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut sum_u = 0.0f32;
            let mut sum_a = 0.0f32;
            let mut sum_t = 0.0f32;
            for j in 0..n {
                if j == i {
                    continue;
                }
                let base = (i * n + j) * NUM_CHANNELS;
                sum_u += relations[base + CHANNEL_UTILITY];
                sum_a += relations[base + CHANNEL_AFFINITY];
                sum_t += relations[base + CHANNEL_TRUST];
            }
            let count = (n - 1) as f32;
            (sum_u / count + sum_a / count + sum_t / count) / 3.0
        })
        .collect();

    state
        .emotions
        .par_chunks_mut(NUM_AXES)
        .enumerate()
        .for_each(|(i, row)| {
            let (coeffs, sensitivity) = coefficients[i];
            let effect = effects[i];
            for a in 0..NUM_AXES {
                row[a] = clamp_emotion(row[a] + effect * coeffs[a] * 0.05 * sensitivity);
            }
        });
}

/// Reacts each agent's outgoing relations to its own emotions (§4.5).
///
/// Only axes 0 (joy/sadness), 1 (fear/calm), 2 (anger/humility), 3
/// (disgust/acceptance), and 6 (openness/alienation) drive relation
/// channels; axes 4 and 5 have no effect (preserved verbatim, see design
/// notes). Axis magnitudes below `0.1` are ignored.
pub fn react_to_emotions(state: &mut EngineState) {
    let n = state.num_agents();
    if n < 2 {
        return;
    }
    const K: f32 = 0.3;

    let emotions_sensitivity: Vec<([f32; NUM_AXES], f32)> = (0..n)
        .map(|i| {
            let mut row = [0.0f32; NUM_AXES];
            row.copy_from_slice(&state.emotions[i * NUM_AXES..(i + 1) * NUM_AXES]);
            (row, state.sensitivity(i))
        })
        .collect();

    state
        .relations
        .par_chunks_mut(n * NUM_CHANNELS)
        .enumerate()
        .for_each(|(i, row)| {
            let (emotions, sensitivity) = emotions_sensitivity[i];
            for j in 0..n {
                if j == i {
                    continue;
                }
                let base = j * NUM_CHANNELS;

                let v0 = emotions[0];
                if v0.abs() >= 0.1 {
                    row[base + CHANNEL_AFFINITY] += v0 * K * sensitivity;
                }

                let v1 = emotions[1];
                if v1.abs() >= 0.1 {
                    row[base + CHANNEL_TRUST] += v1 * K * sensitivity;
                }

                let v2 = emotions[2];
                if v2.abs() >= 0.1 {
                    let f = if v2 < 0.0 { 2.0 } else { 1.0 };
                    row[base + CHANNEL_TRUST] += v2 * K * f * sensitivity;
                }

                let v3 = emotions[3];
                if v3.abs() >= 0.1 {
                    row[base + CHANNEL_AFFINITY] += v3 * K * sensitivity;
                    row[base + CHANNEL_UTILITY] += v3 * K * sensitivity;
                }

                let v6 = emotions[6];
                if v6.abs() >= 0.1 {
                    row[base + CHANNEL_AFFINITY] += v6 * K * sensitivity;
                    row[base + CHANNEL_TRUST] += v6 * K * sensitivity;
                }
            }
        });

    state
        .relations
        .par_chunks_mut(n * NUM_CHANNELS)
        .enumerate()
        .for_each(|(i, row)| {
            for j in 0..n {
                if j == i {
                    continue;
                }
                let base = j * NUM_CHANNELS;
                for k in 0..NUM_CHANNELS {
                    row[base + k] = crate::transform::clamp_relation(row[base + k]);
                }
            }
        });
}
