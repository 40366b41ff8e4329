//! The public `Engine` facade: owned state, owned RNG, setters, and the
//! pipeline entry points (§4.1, §4.11).

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::archetype::ArchetypeConfig;
use crate::cycle::perform_daily_cycle;
use crate::interaction::InteractionLog;
use crate::state::EngineState;

/// The simulation engine: a fixed population of agents, their shared
/// tensors, an owned deterministic RNG, and the daily-cycle pipeline.
///
/// Constructed with a fixed `N`; the host populates entities through the
/// setters before running any cycle. Every `Engine` owns a private
/// [`StdRng`] — engines never share RNG state, so running several engines
/// concurrently produces independent, reproducible streams.
#[derive(Debug)]
pub struct Engine {
    state: EngineState,
    rng: StdRng,
    agent_names: Vec<String>,
    last_day_interactions: InteractionLog,
}

impl Engine {
    /// Creates an engine for `n` agents, zero-initialised, seeded from `0`.
    ///
    /// Agent names default to `"agent-<index>"`; call
    /// [`Engine::set_agent_name`] or [`Engine::seed`] to customise either
    /// before running cycles.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Engine {
            state: EngineState::new(n),
            rng: StdRng::seed_from_u64(0),
            agent_names: (0..n).map(|i| format!("agent-{i}")).collect(),
            last_day_interactions: Vec::new(),
        }
    }

    /// Number of agents.
    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.state.num_agents()
    }

    /// Re-seeds the engine's RNG, discarding any prior stream state.
    pub fn seed(&mut self, s: u64) {
        self.rng = StdRng::seed_from_u64(s);
    }

    /// Sets a single emotion axis value for `agent`. Does not clamp: the
    /// host is trusted to supply an in-range initial value.
    ///
    /// # Panics
    ///
    /// Panics if `agent` or `axis` is out of range.
    pub fn set_emotion(&mut self, agent: usize, axis: usize, value: f32) {
        let idx = self.state.emotion_index(agent, axis);
        self.state.emotions[idx] = value;
    }

    /// Sets a directed relation `from -> to` to `(u, a, t, r)`. Does not
    /// clamp.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is out of range.
    pub fn set_relation(&mut self, from: usize, to: usize, u: f32, a: f32, t: f32, r: f32) {
        let base = self.state.relation_base(from, to);
        self.state.relations[base] = u;
        self.state.relations[base + 1] = a;
        self.state.relations[base + 2] = t;
        self.state.relations[base + 3] = r;
    }

    /// Sets the emission weight `W[agent][axis]` to `(du, da, dt, dr)`.
    ///
    /// # Panics
    ///
    /// Panics if `agent` or `axis` is out of range.
    pub fn set_emission_weight(&mut self, agent: usize, axis: usize, du: f32, da: f32, dt: f32, dr: f32) {
        let base = self.state.emission_base(agent, axis);
        self.state.emission_weights[base] = du;
        self.state.emission_weights[base + 1] = da;
        self.state.emission_weights[base + 2] = dt;
        self.state.emission_weights[base + 3] = dr;
    }

    /// Sets the sensitivity multiplier for `agent`.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is out of range.
    pub fn set_sensitivity(&mut self, agent: usize, value: f32) {
        self.state.sensitivities[agent] = value;
    }

    /// Assigns archetype index `k` to `agent`.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is out of range.
    pub fn set_agent_archetype(&mut self, agent: usize, k: usize) {
        self.state.agent_archetypes[agent] = k;
    }

    /// Sets (or replaces) the configuration for archetype index `k`.
    pub fn set_archetype_config(&mut self, k: usize, config: ArchetypeConfig) {
        self.state.ensure_archetype_slot(k);
        self.state.archetype_configs[k] = config;
    }

    /// Sets the display name used for `agent` in CSV output.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is out of range.
    pub fn set_agent_name(&mut self, agent: usize, name: impl Into<String>) {
        self.agent_names[agent] = name.into();
    }

    /// Reads the display name for `agent`.
    #[must_use]
    pub fn agent_name(&self, agent: usize) -> &str {
        &self.agent_names[agent]
    }

    /// Borrows the underlying tensor state for read-only inspection.
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The interaction records produced by the most recent
    /// [`Engine::perform_daily_cycle`] call.
    #[must_use]
    pub fn last_day_interactions(&self) -> &[crate::interaction::InteractionRecord] {
        &self.last_day_interactions
    }

    /// Runs [`crate::influence::influence_emotions`] directly, bypassing
    /// the full daily cycle. Exposed for stage-level testing (§6).
    pub fn influence_emotions(&mut self) {
        crate::influence::influence_emotions(&mut self.state);
    }

    /// Runs [`crate::decay::apply_relation_decay`] directly. Exposed for
    /// stage-level testing (§6).
    pub fn apply_relation_decay(&mut self) {
        crate::decay::apply_relation_decay(&mut self.state);
    }

    /// Runs [`crate::decay::apply_emotion_decay`] directly. Exposed for
    /// stage-level testing (§6).
    pub fn apply_emotion_decay(&mut self) {
        crate::decay::apply_emotion_decay(&mut self.state);
    }

    /// Runs [`crate::reaction::react_to_relations`] directly. Exposed for
    /// stage-level testing (§6).
    pub fn react_to_relations(&mut self) {
        crate::reaction::react_to_relations(&mut self.state);
    }

    /// Runs [`crate::reaction::react_to_emotions`] directly. Exposed for
    /// stage-level testing (§6).
    pub fn react_to_emotions(&mut self) {
        crate::reaction::react_to_emotions(&mut self.state);
    }

    /// Runs one simulated day end to end (§4.11).
    pub fn perform_daily_cycle(&mut self, n_iters: usize) {
        debug!(n_iters, agents = self.state.num_agents(), "daily cycle start");
        perform_daily_cycle(&mut self.state, &mut self.rng, n_iters, &mut self.last_day_interactions);
        debug!(
            interactions = self.last_day_interactions.len(),
            "daily cycle complete"
        );
    }
}
