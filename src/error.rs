//! Typed configuration errors (§7). Manual `Display`/`std::error::Error`
//! impls, matching the rest of this codebase's avoidance of `thiserror`.

use std::fmt;

/// A configuration document failed to load into a valid archetype table.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The document could not be parsed as TOML.
    Parse(String),
    /// An agent referenced an archetype name absent from the document.
    MissingArchetype { agent: usize, archetype: String },
    /// `refusal_chance` was outside `[0, 1]`.
    RefusalChanceOutOfRange { archetype: String, value: f32 },
    /// `temperature` was not strictly positive.
    NonPositiveTemperature { archetype: String, value: f32 },
    /// `decay_rate` or `emotion_decay` was negative.
    NegativeDecay { archetype: String, field: &'static str, value: f32 },
    /// A scoring-transform tag did not match the closed set.
    UnknownScoringTransform { archetype: String, tag: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "failed to parse configuration: {msg}"),
            ConfigError::MissingArchetype { agent, archetype } => write!(
                f,
                "agent {agent} references archetype '{archetype}', which is not defined"
            ),
            ConfigError::RefusalChanceOutOfRange { archetype, value } => write!(
                f,
                "archetype '{archetype}' has refusal_chance {value} outside [0, 1]"
            ),
            ConfigError::NonPositiveTemperature { archetype, value } => write!(
                f,
                "archetype '{archetype}' has non-positive temperature {value}"
            ),
            ConfigError::NegativeDecay { archetype, field, value } => write!(
                f,
                "archetype '{archetype}' has negative {field} {value}"
            ),
            ConfigError::UnknownScoringTransform { archetype, tag } => write!(
                f,
                "archetype '{archetype}' has unknown scoring transform tag '{tag}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
