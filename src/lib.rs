//! Deterministic simulation core for co-evolving agent emotion and
//! relation tensors.
//!
//! A fixed population of `N` agents each carries a seven-axis emotion
//! vector and a directed relation toward every other agent. Each
//! simulated day runs a fixed pipeline — relation decay, reaction to
//! relations, emotion decay, reaction to emotions, group emotional
//! influence, then a round of target selection and interaction — driven
//! by an RNG owned by the engine instance.
//!
//! # Example
//!
//! ```
//! use social_sim_engine::Engine;
//!
//! let mut engine = Engine::new(4);
//! engine.seed(42);
//! engine.set_relation(0, 1, 5.0, 5.0, 5.0, 0.0);
//! engine.perform_daily_cycle(1);
//! assert!(!engine.last_day_interactions().is_empty());
//! ```
//!
//! # Configuration
//!
//! Archetype tables and agent names can be loaded from a TOML document
//! via [`config::Config`], layered over the programmatic setters on
//! [`Engine`]; nothing in the pipeline itself depends on it.

pub mod archetype;
pub mod classify;
pub mod config;
pub mod csv_log;
pub mod cycle;
pub mod decay;
pub mod engine;
pub mod error;
pub mod influence;
pub mod interaction;
pub mod reaction;
pub mod selection;
pub mod state;
pub mod transform;

pub use archetype::ArchetypeConfig;
pub use classify::{classify, TargetClass};
pub use config::Config;
pub use engine::Engine;
pub use error::ConfigError;
pub use interaction::{InteractionKind, InteractionLog, InteractionRecord};
pub use state::EngineState;
pub use transform::ScoreTransform;
