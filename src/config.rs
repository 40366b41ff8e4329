//! Optional TOML configuration loading for archetype tables and agent
//! names (§3.1). Layered over the programmatic setters in [`crate::engine`];
//! nothing in the core pipeline depends on it.

use std::collections::HashMap;

use serde::Deserialize;

use crate::archetype::ArchetypeConfig;
use crate::engine::Engine;
use crate::error::ConfigError;
use crate::state::NUM_AXES;
use crate::transform::ScoreTransform;

#[derive(Debug, Deserialize)]
struct RawConfig {
    agents: Vec<RawAgent>,
    archetypes: HashMap<String, RawArchetype>,
}

#[derive(Debug, Deserialize)]
struct RawAgent {
    name: String,
    archetype: String,
}

#[derive(Debug, Deserialize)]
struct RawArchetype {
    refusal_chance: f32,
    decay_rate: f32,
    temperature: f32,
    emotion_decay: f32,
    emotion_coefficients: [f32; NUM_AXES],
    scoring_affinity: String,
    scoring_utility: String,
    scoring_trust: String,
    scoring_responsiveness: String,
}

fn parse_transform(archetype: &str, tag: &str) -> Result<ScoreTransform, ConfigError> {
    match tag {
        "linear" => Ok(ScoreTransform::Linear),
        "log" => Ok(ScoreTransform::Log),
        "exp" => Ok(ScoreTransform::Exp),
        "sigmoid" => Ok(ScoreTransform::Sigmoid),
        "periodic" => Ok(ScoreTransform::Periodic),
        other => Err(ConfigError::UnknownScoringTransform {
            archetype: archetype.to_string(),
            tag: other.to_string(),
        }),
    }
}

fn validate(name: &str, raw: &RawArchetype) -> Result<ArchetypeConfig, ConfigError> {
    if !(0.0..=1.0).contains(&raw.refusal_chance) {
        return Err(ConfigError::RefusalChanceOutOfRange {
            archetype: name.to_string(),
            value: raw.refusal_chance,
        });
    }
    if raw.temperature <= 0.0 {
        return Err(ConfigError::NonPositiveTemperature {
            archetype: name.to_string(),
            value: raw.temperature,
        });
    }
    if raw.decay_rate < 0.0 {
        return Err(ConfigError::NegativeDecay {
            archetype: name.to_string(),
            field: "decay_rate",
            value: raw.decay_rate,
        });
    }
    if raw.emotion_decay < 0.0 {
        return Err(ConfigError::NegativeDecay {
            archetype: name.to_string(),
            field: "emotion_decay",
            value: raw.emotion_decay,
        });
    }

    Ok(ArchetypeConfig {
        refusal_chance: raw.refusal_chance,
        decay_rate: raw.decay_rate,
        temperature: raw.temperature,
        emotion_decay: raw.emotion_decay,
        emotion_coefficients: raw.emotion_coefficients,
        scoring_affinity: parse_transform(name, &raw.scoring_affinity)?,
        scoring_utility: parse_transform(name, &raw.scoring_utility)?,
        scoring_trust: parse_transform(name, &raw.scoring_trust)?,
        scoring_responsiveness: parse_transform(name, &raw.scoring_responsiveness)?,
    })
}

/// A validated archetype table and agent name list, ready to materialise
/// into an [`Engine`].
#[derive(Debug, Clone)]
pub struct Config {
    agent_names: Vec<String>,
    agent_archetype_index: Vec<usize>,
    archetype_configs: Vec<ArchetypeConfig>,
}

impl Config {
    /// Parses and validates a TOML document into a [`Config`].
    ///
    /// Each `[[agents]]` entry's `archetype` must name a key present under
    /// `[archetypes.*]`; every archetype's fields are validated against
    /// the invariants in §3.1 (refusal chance in `[0, 1]`, positive
    /// temperature, non-negative decays, known scoring-transform tags).
    pub fn from_toml_str(input: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut archetype_names: Vec<&String> = raw.archetypes.keys().collect();
        archetype_names.sort();
        let archetype_index: HashMap<&str, usize> = archetype_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut archetype_configs = Vec::with_capacity(archetype_names.len());
        for name in &archetype_names {
            let raw_archetype = &raw.archetypes[*name];
            archetype_configs.push(validate(name, raw_archetype)?);
        }

        let mut agent_names = Vec::with_capacity(raw.agents.len());
        let mut agent_archetype_index = Vec::with_capacity(raw.agents.len());
        for (i, agent) in raw.agents.iter().enumerate() {
            let idx = *archetype_index
                .get(agent.archetype.as_str())
                .ok_or_else(|| ConfigError::MissingArchetype {
                    agent: i,
                    archetype: agent.archetype.clone(),
                })?;
            agent_names.push(agent.name.clone());
            agent_archetype_index.push(idx);
        }

        Ok(Config {
            agent_names,
            agent_archetype_index,
            archetype_configs,
        })
    }

    /// Number of agents described by this configuration.
    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.agent_names.len()
    }

    /// Builds a fresh [`Engine`] sized for this configuration's agent
    /// count and applies every agent name, archetype assignment, and
    /// archetype configuration via the ordinary setters.
    #[must_use]
    pub fn build_engine(&self) -> Engine {
        let mut engine = Engine::new(self.num_agents());
        for (k, config) in self.archetype_configs.iter().enumerate() {
            engine.set_archetype_config(k, config.clone());
        }
        for (i, name) in self.agent_names.iter().enumerate() {
            engine.set_agent_name(i, name.clone());
            engine.set_agent_archetype(i, self.agent_archetype_index[i]);
        }
        engine
    }
}
