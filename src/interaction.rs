//! Interaction outcomes (§4.10) and the per-day interaction log.

use serde::{Deserialize, Serialize};

use crate::state::{CHANNEL_AFFINITY, CHANNEL_RESPONSIVENESS, CHANNEL_TRUST, CHANNEL_UTILITY};
use crate::transform::clamp_relation;
use crate::EngineState;

/// Outcome of a recorded interaction round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// The target declined the interaction.
    Refusal,
    /// The interaction was attempted and succeeded.
    Success,
    /// The interaction was attempted and failed.
    Fail,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InteractionKind::Refusal => "refusal",
            InteractionKind::Success => "success",
            InteractionKind::Fail => "fail",
        };
        write!(f, "{name}")
    }
}

/// A single recorded interaction for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Initiating agent index.
    pub from: usize,
    /// Target agent index.
    pub to: usize,
    /// Outcome of the interaction.
    pub kind: InteractionKind,
}

/// The ordered sequence of interactions recorded during the current day.
///
/// Cleared at the start of [`crate::Engine::perform_daily_cycle`] and
/// readable by the host thereafter via [`crate::Engine::last_day_interactions`].
pub type InteractionLog = Vec<InteractionRecord>;

/// Applies the outcome of an attempted interaction `from -> to` (§4.10).
///
/// `success = true` applies the success deltas to both directed relations;
/// `success = false` applies the failure deltas. All writes are clamped to
/// the relation bounds.
pub fn process_interaction(state: &mut EngineState, from: usize, to: usize, success: bool) {
    let s_from = state.sensitivity(from);
    let s_to = state.sensitivity(to);

    if success {
        apply_success(state, from, to, s_from);
        apply_success(state, to, from, s_to);
    } else {
        apply_failure(state, from, to, s_from);
        apply_failure(state, to, from, s_to);
    }
}

fn apply_success(state: &mut EngineState, from: usize, to: usize, sensitivity: f32) {
    let base = state.relation_base(from, to);
    state.relations[base + CHANNEL_UTILITY] =
        clamp_relation(state.relations[base + CHANNEL_UTILITY] + 2.0 * sensitivity);
    state.relations[base + CHANNEL_AFFINITY] =
        clamp_relation(state.relations[base + CHANNEL_AFFINITY] + 2.0 * sensitivity);
    state.relations[base + CHANNEL_TRUST] =
        clamp_relation(state.relations[base + CHANNEL_TRUST] + 1.0 * sensitivity);
    state.relations[base + CHANNEL_RESPONSIVENESS] =
        clamp_relation(state.relations[base + CHANNEL_RESPONSIVENESS] + 1.0 * sensitivity);
}

fn apply_failure(state: &mut EngineState, from: usize, to: usize, sensitivity: f32) {
    let base = state.relation_base(from, to);
    state.relations[base + CHANNEL_UTILITY] =
        clamp_relation(state.relations[base + CHANNEL_UTILITY] - 0.5 * sensitivity);
    state.relations[base + CHANNEL_AFFINITY] =
        clamp_relation(state.relations[base + CHANNEL_AFFINITY] - 0.5 * sensitivity);
    state.relations[base + CHANNEL_TRUST] =
        clamp_relation(state.relations[base + CHANNEL_TRUST] - 2.0 * sensitivity);
    state.relations[base + CHANNEL_RESPONSIVENESS] =
        clamp_relation(state.relations[base + CHANNEL_RESPONSIVENESS] + 0.5 * sensitivity);
}

/// Applies the outcome of a refused interaction `from -> to` (§4.10).
///
/// The initiator and the refusing target are penalised asymmetrically: the
/// initiator loses ground on utility, affinity and responsiveness toward
/// the target; the target loses ground on affinity and responsiveness
/// toward the initiator.
pub fn process_refusal(state: &mut EngineState, from: usize, to: usize) {
    let s_from = state.sensitivity(from);
    let s_to = state.sensitivity(to);

    let base_from = state.relation_base(from, to);
    state.relations[base_from + CHANNEL_UTILITY] =
        clamp_relation(state.relations[base_from + CHANNEL_UTILITY] - 0.5 * s_from);
    state.relations[base_from + CHANNEL_AFFINITY] =
        clamp_relation(state.relations[base_from + CHANNEL_AFFINITY] - 1.5 * s_from);
    state.relations[base_from + CHANNEL_RESPONSIVENESS] =
        clamp_relation(state.relations[base_from + CHANNEL_RESPONSIVENESS] - 2.0 * s_from);

    let base_to = state.relation_base(to, from);
    state.relations[base_to + CHANNEL_AFFINITY] =
        clamp_relation(state.relations[base_to + CHANNEL_AFFINITY] - 0.5 * s_to);
    state.relations[base_to + CHANNEL_RESPONSIVENESS] =
        clamp_relation(state.relations[base_to + CHANNEL_RESPONSIVENESS] - 1.0 * s_to);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_symmetry_with_equal_sensitivities() {
        let mut state = EngineState::new(2);
        state.sensitivities[0] = 1.3;
        state.sensitivities[1] = 1.3;
        process_interaction(&mut state, 0, 1, true);

        let r01 = state.relation(0, 1);
        let r10 = state.relation(1, 0);
        assert_eq!(r01, r10);
    }

    #[test]
    fn success_deltas_match_spec() {
        let mut state = EngineState::new(2);
        process_interaction(&mut state, 0, 1, true);
        let (u, a, t, r) = state.relation(0, 1);
        assert!((u - 2.0).abs() < 1e-6);
        assert!((a - 2.0).abs() < 1e-6);
        assert!((t - 1.0).abs() < 1e-6);
        assert!((r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn failure_deltas_match_spec() {
        let mut state = EngineState::new(2);
        process_interaction(&mut state, 0, 1, false);
        let (u, a, t, r) = state.relation(0, 1);
        assert!((u - (-0.5)).abs() < 1e-6);
        assert!((a - (-0.5)).abs() < 1e-6);
        assert!((t - (-2.0)).abs() < 1e-6);
        assert!((r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn refusal_deltas_match_spec_for_both_directions() {
        let mut state = EngineState::new(2);
        process_refusal(&mut state, 0, 1);

        let (u0, a0, t0, r0) = state.relation(0, 1);
        assert!((u0 - (-0.5)).abs() < 1e-6);
        assert!((a0 - (-1.5)).abs() < 1e-6);
        assert_eq!(t0, 0.0);
        assert!((r0 - (-2.0)).abs() < 1e-6);

        let (u1, a1, t1, r1) = state.relation(1, 0);
        assert_eq!(u1, 0.0);
        assert!((a1 - (-0.5)).abs() < 1e-6);
        assert_eq!(t1, 0.0);
        assert!((r1 - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn clamping_prevents_overflow_past_bounds() {
        let mut state = EngineState::new(2);
        let base = state.relation_base(0, 1);
        state.relations[base + CHANNEL_UTILITY] = 9.5;
        process_interaction(&mut state, 0, 1, true);
        assert!(state.relation_channel(0, 1, CHANNEL_UTILITY) <= 10.0);
    }

    #[test]
    fn clamping_prevents_underflow_past_bounds() {
        let mut state = EngineState::new(2);
        let base = state.relation_base(0, 1);
        state.relations[base + CHANNEL_TRUST] = -9.5;
        process_interaction(&mut state, 0, 1, false);
        assert!(state.relation_channel(0, 1, CHANNEL_TRUST) >= -10.0);
    }

    #[test]
    fn diagonal_untouched_by_interaction_outcomes() {
        let mut state = EngineState::new(2);
        process_interaction(&mut state, 0, 1, true);
        process_refusal(&mut state, 0, 1);
        assert_eq!(state.relation(0, 0), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(state.relation(1, 1), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn interaction_kind_display() {
        assert_eq!(InteractionKind::Refusal.to_string(), "refusal");
        assert_eq!(InteractionKind::Success.to_string(), "success");
        assert_eq!(InteractionKind::Fail.to_string(), "fail");
    }

    #[test]
    fn interaction_record_serde_round_trip() {
        let rec = InteractionRecord {
            from: 0,
            to: 1,
            kind: InteractionKind::Success,
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: InteractionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
