//! Flat numeric tensors backing the simulation state.
//!
//! The relation tensor is a dense `N x N x 4` array stored as a single
//! contiguous buffer with explicit indexing `(i*N + j)*4 + k`, favouring
//! cache locality and straightforward row-parallel iteration over a graph
//! of per-agent allocations.

use crate::archetype::ArchetypeConfig;

/// Number of emotion axes per agent.
pub const NUM_AXES: usize = 7;

/// Number of relation channels per directed pair (utility, affinity, trust,
/// responsiveness).
pub const NUM_CHANNELS: usize = 4;

/// Relation channel index: utility.
pub const CHANNEL_UTILITY: usize = 0;
/// Relation channel index: affinity.
pub const CHANNEL_AFFINITY: usize = 1;
/// Relation channel index: trust.
pub const CHANNEL_TRUST: usize = 2;
/// Relation channel index: responsiveness.
pub const CHANNEL_RESPONSIVENESS: usize = 3;

/// Canonical names of the seven emotion axes, in tensor order.
pub const EMOTION_AXIS_NAMES: [&str; NUM_AXES] = [
    "joy_sadness",
    "fear_calm",
    "anger_humility",
    "disgust_acceptance",
    "surprise_habit",
    "shame_confidence",
    "openness_alienation",
];

/// Canonical names of the four relation channels, in tensor order.
pub const RELATION_CHANNEL_NAMES: [&str; NUM_CHANNELS] =
    ["utility", "affinity", "trust", "responsiveness"];

/// The dense numeric state shared by every daily-cycle stage.
///
/// All tensors are flattened row-major: the emotion tensor as `N x A`, the
/// relation tensor as `N x N x 4`, and the emission-weight tensor as
/// `N x A x 4`. Nothing here clamps on write; clamping is the caller's
/// responsibility on update paths (see [`crate::transform`]).
#[derive(Debug, Clone)]
pub struct EngineState {
    pub(crate) num_agents: usize,
    pub(crate) emotions: Vec<f32>,
    pub(crate) relations: Vec<f32>,
    pub(crate) sensitivities: Vec<f32>,
    pub(crate) emission_weights: Vec<f32>,
    pub(crate) agent_archetypes: Vec<usize>,
    pub(crate) archetype_configs: Vec<ArchetypeConfig>,
}

impl EngineState {
    /// Creates a zero-initialised state for `n` agents.
    ///
    /// Sensitivities default to `1.0`; every agent defaults to archetype
    /// index `0`, which itself defaults to [`ArchetypeConfig::inert`] once
    /// materialised by [`EngineState::ensure_archetype`].
    #[must_use]
    pub fn new(n: usize) -> Self {
        EngineState {
            num_agents: n,
            emotions: vec![0.0; n * NUM_AXES],
            relations: vec![0.0; n * n * NUM_CHANNELS],
            sensitivities: vec![1.0; n],
            emission_weights: vec![0.0; n * NUM_AXES * NUM_CHANNELS],
            agent_archetypes: vec![0; n],
            archetype_configs: Vec::new(),
        }
    }

    /// Number of agents this state was constructed for.
    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.num_agents
    }

    #[inline]
    pub(crate) fn emotion_index(&self, agent: usize, axis: usize) -> usize {
        agent * NUM_AXES + axis
    }

    #[inline]
    pub(crate) fn relation_base(&self, from: usize, to: usize) -> usize {
        (from * self.num_agents + to) * NUM_CHANNELS
    }

    #[inline]
    pub(crate) fn emission_base(&self, agent: usize, axis: usize) -> usize {
        (agent * NUM_AXES + axis) * NUM_CHANNELS
    }

    /// Reads the emotion value for `agent` on `axis`.
    #[must_use]
    pub fn emotion(&self, agent: usize, axis: usize) -> f32 {
        self.emotions[self.emotion_index(agent, axis)]
    }

    /// Reads the directed relation `from -> to` as `(u, a, t, r)`.
    #[must_use]
    pub fn relation(&self, from: usize, to: usize) -> (f32, f32, f32, f32) {
        let base = self.relation_base(from, to);
        (
            self.relations[base],
            self.relations[base + 1],
            self.relations[base + 2],
            self.relations[base + 3],
        )
    }

    /// Reads a single relation channel `from -> to`.
    #[must_use]
    pub fn relation_channel(&self, from: usize, to: usize, channel: usize) -> f32 {
        self.relations[self.relation_base(from, to) + channel]
    }

    /// Reads the sensitivity multiplier for `agent`.
    #[must_use]
    pub fn sensitivity(&self, agent: usize) -> f32 {
        self.sensitivities[agent]
    }

    /// Reads the archetype index assigned to `agent`.
    #[must_use]
    pub fn archetype_of(&self, agent: usize) -> usize {
        self.agent_archetypes[agent]
    }

    /// Reads the archetype configuration assigned to `agent`, materialising
    /// the default-inert configuration if none was ever set for that index.
    #[must_use]
    pub fn archetype_config_for(&self, agent: usize) -> ArchetypeConfig {
        let idx = self.archetype_of(agent);
        self.archetype_configs
            .get(idx)
            .cloned()
            .unwrap_or_default()
    }

    /// Reads the emission weight `W[agent][axis][channel]`.
    #[must_use]
    pub fn emission_weight(&self, agent: usize, axis: usize, channel: usize) -> f32 {
        self.emission_weights[self.emission_base(agent, axis) + channel]
    }

    /// Full emotion tensor as a flat `N x A` row-major slice.
    #[must_use]
    pub fn emotions(&self) -> &[f32] {
        &self.emotions
    }

    /// Full relation tensor as a flat `N x N x 4` row-major slice.
    #[must_use]
    pub fn relations(&self) -> &[f32] {
        &self.relations
    }

    /// Full sensitivity vector.
    #[must_use]
    pub fn sensitivities(&self) -> &[f32] {
        &self.sensitivities
    }

    pub(crate) fn ensure_archetype_slot(&mut self, idx: usize) {
        if idx >= self.archetype_configs.len() {
            self.archetype_configs.resize(idx + 1, ArchetypeConfig::default());
        }
    }
}
