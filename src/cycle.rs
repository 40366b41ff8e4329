//! Daily-cycle orchestrator (§4.11): the fixed-order composition of every
//! stage, plus the interaction rounds.

use rand::Rng;

use crate::decay::{apply_emotion_decay, apply_relation_decay};
use crate::interaction::{process_interaction, process_refusal, InteractionKind, InteractionRecord};
use crate::influence::influence_emotions;
use crate::reaction::{react_to_emotions, react_to_relations};
use crate::selection::{choose_target, should_refuse};
use crate::EngineState;

/// Runs one simulated day: decay, reaction, influence, then
/// `n_iters` rounds of target selection and interaction per agent.
///
/// Clears `last_day_interactions` before the first stage runs and appends
/// to it as interaction rounds execute. Stage order is fixed: relation
/// decay, reaction-to-relations, emotion decay, reaction-to-emotions,
/// group influence, then the interaction rounds.
pub fn perform_daily_cycle<R: Rng + ?Sized>(
    state: &mut EngineState,
    rng: &mut R,
    n_iters: usize,
    interactions: &mut Vec<InteractionRecord>,
) {
    interactions.clear();

    apply_relation_decay(state);
    react_to_relations(state);
    apply_emotion_decay(state);
    react_to_emotions(state);
    influence_emotions(state);

    let n = state.num_agents();
    for _ in 0..n_iters {
        for i in 0..n {
            match choose_target(state, rng, i) {
                Some(t) => {
                    if should_refuse(state, rng, i, t) {
                        process_refusal(state, i, t);
                        interactions.push(InteractionRecord {
                            from: i,
                            to: t,
                            kind: InteractionKind::Refusal,
                        });
                    } else {
                        let success = rng.gen_range(0..100) < 50;
                        process_interaction(state, i, t, success);
                        interactions.push(InteractionRecord {
                            from: i,
                            to: t,
                            kind: if success {
                                InteractionKind::Success
                            } else {
                                InteractionKind::Fail
                            },
                        });
                    }
                }
                None => {
                    for j in 0..n {
                        if j == i {
                            continue;
                        }
                        process_refusal(state, i, j);
                        interactions.push(InteractionRecord {
                            from: i,
                            to: j,
                            kind: InteractionKind::Refusal,
                        });
                    }
                }
            }
        }
    }
}
